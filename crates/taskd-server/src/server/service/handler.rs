//! HTTP handlers for the todo service.
//!
//! [`TodoService`] is the composition root for request handling: it owns the
//! store handle and the bulk-insert pipeline, and is cloned into every
//! handler as axum state. The handlers cover single-item CRUD plus the bulk
//! POST path, which feeds the dispatch queue and aggregates per-item replies
//! into one batch response.
//!
//! ## Request flow (bulk POST)
//!
//! 1. Parse the envelope (path segments + `{"todolist": [...]}` body).
//! 2. Create the per-batch reply channel.
//! 3. Submit one [`InsertRequest`] per item to the dispatch queue.
//! 4. Collect exactly one reply per item and serialize the batch.

use std::sync::Arc;

use axum::Router;
use axum::extract::{OriginalUri, Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use serde::Deserialize;
use taskd_core::{Error, Item, NIL_TODO_ID, Result, TodoList};
use tokio::sync::mpsc;
use tower_http::trace::TraceLayer;

use crate::server::bulk::{BulkInserter, InsertRequest, collect_responses};
use crate::server::config::ServerConfig;
use crate::server::store::TodoStore;

/// Shared state behind every handler.
///
/// Owns the [`BulkInserter`] (dispatch queue, launcher, task tracker) so that
/// the pipeline is explicitly constructed and injected rather than ambient
/// process state.
#[derive(Clone)]
pub struct TodoService<S> {
    store: S,
    bulk: Arc<BulkInserter>,
}

impl<S> TodoService<S>
where
    S: TodoStore + Clone,
{
    /// Builds the service state and spawns the bulk-insert launcher.
    pub fn new(store: S, config: &ServerConfig) -> Self {
        let bulk = BulkInserter::new(
            store.clone(),
            config.max_inflight_inserts,
            config.shutdown_timeout,
        );
        Self {
            store,
            bulk: Arc::new(bulk),
        }
    }

    /// Handle to the bulk pipeline, used by the composition root to drive
    /// shutdown after the listener stops.
    pub fn bulk(&self) -> Arc<BulkInserter> {
        Arc::clone(&self.bulk)
    }
}

/// Builds the route table.
pub fn router<S>(service: TodoService<S>) -> Router
where
    S: TodoStore + Clone,
{
    Router::new()
        .route("/health", get(health))
        .route("/todos", get(list_todos::<S>).post(post_todos::<S>))
        .route(
            "/todos/{id}",
            get(get_todo::<S>)
                .put(put_todo::<S>)
                .delete(delete_todo::<S>),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

async fn health() -> &'static str {
    "I'm healthy!\n"
}

async fn list_todos<S>(
    State(service): State<TodoService<S>>,
    OriginalUri(uri): OriginalUri,
) -> Result<Response>
where
    S: TodoStore + Clone,
{
    let path_nodes = parse_path_segments(uri.path())?;
    let mut items = service.store.list().await?;

    // An empty table reads as "no todos found", not an empty collection.
    if items.is_empty() {
        return Err(Error::NotFound);
    }

    for item in &mut items {
        item.set_self_ref(&path_nodes[0]);
    }

    Ok(Json(TodoList { items }).into_response())
}

async fn get_todo<S>(
    State(service): State<TodoService<S>>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<i64>,
) -> Result<Response>
where
    S: TodoStore + Clone,
{
    let path_nodes = parse_path_segments(uri.path())?;
    let mut item = service.store.get(id).await?.ok_or(Error::NotFound)?;
    item.set_self_ref(&path_nodes[0]);

    Ok(Json(item).into_response())
}

#[derive(Deserialize, Default)]
struct BulkParams {
    #[serde(default)]
    bulk: Option<String>,
}

async fn post_todos<S>(
    State(service): State<TodoService<S>>,
    OriginalUri(uri): OriginalUri,
    Query(params): Query<BulkParams>,
    body: String,
) -> Result<Response>
where
    S: TodoStore + Clone,
{
    // Any non-empty `bulk` value selects the batch pipeline.
    if params.bulk.as_deref().is_some_and(|v| !v.is_empty()) {
        return handle_bulk_post(&service, uri.path(), &body).await;
    }

    let path_nodes = parse_path_segments(uri.path())?;
    let item = decode_document::<Item>(&body)?;

    // A SERIAL column's first value is 1, so 0 reliably marks an unset ID.
    if item.id != NIL_TODO_ID {
        return Err(Error::Validation {
            detail: format!("expected Item.ID = 0, got Item.ID = {}", item.id),
        });
    }
    if path_nodes.len() != 1 {
        return Err(Error::MalformedRequest {
            detail: format!("expected a single-segment collection path, got {path_nodes:?}"),
        });
    }

    let id = service.store.insert(&item).await?;
    tracing::debug!(id, "todo created");

    let location = format!("/{}/{}", path_nodes[0], id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)]).into_response())
}

async fn handle_bulk_post<S>(
    service: &TodoService<S>,
    origin_path: &str,
    body: &str,
) -> Result<Response>
where
    S: TodoStore + Clone,
{
    let (list, path_nodes) = parse_bulk_request(origin_path, body)?;
    let expected = list.items.len();

    let (reply_tx, mut reply_rx) = mpsc::channel(expected.max(1));

    for item in list.items {
        service
            .bulk
            .submit(InsertRequest {
                item,
                path_nodes: path_nodes.clone(),
                origin_path: origin_path.to_string(),
                reply_tx: reply_tx.clone(),
            })
            .await?;
    }
    // The aggregator must see the channel close if a task dies without
    // replying; only tasks may hold senders from here on.
    drop(reply_tx);

    tracing::debug!("bulk post dispatched {expected} insert requests");

    let batch = collect_responses(expected, &mut reply_rx, &path_nodes[0]).await;

    let body = serde_json::to_vec(&batch).map_err(|e| Error::Serialization {
        detail: e.to_string(),
    })?;

    Ok((
        StatusCode::CREATED,
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response())
}

async fn put_todo<S>(
    State(service): State<TodoService<S>>,
    Path(id): Path<i64>,
    body: String,
) -> Result<Response>
where
    S: TodoStore + Clone,
{
    let item = decode_document::<Item>(&body)?;

    if item.id != id {
        return Err(Error::Validation {
            detail: format!(
                "resource ID in url ({id}) doesn't match resource ID in request body ({})",
                item.id
            ),
        });
    }

    service.store.update(&item).await?;
    Ok(StatusCode::OK.into_response())
}

async fn delete_todo<S>(
    State(service): State<TodoService<S>>,
    Path(id): Path<i64>,
) -> Result<Response>
where
    S: TodoStore + Clone,
{
    service.store.delete(id).await?;
    Ok(StatusCode::OK.into_response())
}

/// Splits a request path into its non-empty segments.
///
/// `/todos` and `/todos/` both yield `["todos"]`. A path with no segments is
/// malformed: there is no collection to address.
pub fn parse_path_segments(path: &str) -> Result<Vec<String>> {
    let nodes: Vec<String> = path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect();

    if nodes.is_empty() {
        return Err(Error::MalformedRequest {
            detail: format!("expected a collection path, got {path:?}"),
        });
    }

    Ok(nodes)
}

/// Parses a bulk payload into an ordered item list plus path segments.
///
/// No side effects beyond reading the request: nothing is dispatched here.
pub fn parse_bulk_request(path: &str, body: &str) -> Result<(TodoList, Vec<String>)> {
    let path_nodes = parse_path_segments(path)?;
    let list = decode_document::<TodoList>(body)?;
    Ok((list, path_nodes))
}

/// Decodes one JSON document from the body.
///
/// Unknown fields are a decode error (the types opt in via
/// `deny_unknown_fields`). Trailing JSON after the document is tolerated with
/// a warning, matching the lenient reader behavior clients have come to rely
/// on.
fn decode_document<'de, T: Deserialize<'de>>(body: &'de str) -> Result<T> {
    let mut deserializer = serde_json::Deserializer::from_str(body);
    let value = T::deserialize(&mut deserializer).map_err(|e| Error::Decode {
        detail: e.to_string(),
    })?;

    if deserializer.end().is_err() {
        tracing::warn!("Additional JSON after decoded document");
    }

    Ok(value)
}
