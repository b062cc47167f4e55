//! The single-item insert task.

use axum::http::StatusCode;
use taskd_core::{InsertReply, NIL_TODO_ID};
use tokio::sync::mpsc;

use crate::server::bulk::request::InsertRequest;
use crate::server::store::TodoStore;

/// Processes one [`InsertRequest`] inside its own task.
///
/// Sends exactly one reply per request: the first failing check wins and the
/// task returns immediately after reporting it. Per-item failures are folded
/// into the reply and never escape the task boundary.
pub async fn process_insert<S: TodoStore>(store: S, request: InsertRequest) {
    let InsertRequest {
        mut item,
        path_nodes,
        origin_path,
        reply_tx,
    } = request;

    tracing::debug!(path = %origin_path, "insert task entry: {item:?}");

    if item.id != NIL_TODO_ID {
        let detail = format!("expected Item.ID = 0, got Item.ID = {}", item.id);
        tracing::error!(path = %origin_path, status = 400, %detail, "invalid insert");
        send_reply(
            &reply_tx,
            InsertReply::failed(item, StatusCode::BAD_REQUEST.as_u16(), detail),
        )
        .await;
        return;
    }

    if path_nodes.len() != 1 {
        let detail = format!("expected a single-segment collection path, got {path_nodes:?}");
        tracing::error!(path = %origin_path, status = 400, %detail, "malformed request path");
        send_reply(
            &reply_tx,
            InsertReply::failed(item, StatusCode::BAD_REQUEST.as_u16(), detail),
        )
        .await;
        return;
    }

    match store.insert(&item).await {
        Ok(id) => {
            item.id = id;
            tracing::debug!(path = %origin_path, id, "insert task exit");
            send_reply(&reply_tx, InsertReply::created(item)).await;
        }
        Err(err) => {
            let detail = err.to_string();
            tracing::error!(path = %origin_path, status = 500, %detail, "insert failed");
            send_reply(
                &reply_tx,
                InsertReply::failed(item, StatusCode::INTERNAL_SERVER_ERROR.as_u16(), detail),
            )
            .await;
        }
    }
}

async fn send_reply(reply_tx: &mpsc::Sender<InsertReply>, reply: InsertReply) {
    if reply_tx.send(reply).await.is_err() {
        tracing::warn!("Reply channel closed before insert response could be delivered");
    }
}
