//! Persistence seam for todo items.
//!
//! [`TodoStore`] is the single seam between the HTTP/pipeline layers and the
//! database: handlers and insert tasks are generic over it, which keeps them
//! testable against an in-memory double. [`PgTodoStore`] is the production
//! implementation over a shared [`sqlx::PgPool`]; correctness under concurrent
//! insert tasks relies entirely on the pool's own connection management, with
//! no additional application-level locking.

use core::future::Future;

use anyhow::Context;
use sqlx::Row;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use taskd_core::{Error, Item, Result};

use crate::server::config::ServerConfig;

const GET_ALL_TODOS_QUERY: &str = "SELECT id, note, duedate, repeat, completed FROM todo";
const GET_TODO_QUERY: &str = "SELECT id, note, duedate, repeat, completed FROM todo WHERE id = $1";
const INSERT_TODO_STMT: &str =
    "INSERT INTO todo (note, duedate, repeat, completed) VALUES ($1, $2, $3, $4) RETURNING id";
const UPDATE_TODO_STMT: &str =
    "UPDATE todo SET note = $1, duedate = $2, repeat = $3, completed = $4 WHERE id = $5";
const DELETE_TODO_STMT: &str = "DELETE FROM todo WHERE id = $1";

/// Storage operations for todo items.
///
/// `insert` owns item validation: an item that fails the domain rules is
/// rejected before any statement reaches the database.
pub trait TodoStore: Send + Sync + 'static {
    /// Persists a new item and returns its generated identifier.
    fn insert(&self, item: &Item) -> impl Future<Output = Result<i64>> + Send;

    /// Returns all items.
    fn list(&self) -> impl Future<Output = Result<Vec<Item>>> + Send;

    /// Returns the item identified by `id`, or `None` if there is no match.
    fn get(&self, id: i64) -> impl Future<Output = Result<Option<Item>>> + Send;

    /// Overwrites the item identified by `item.id`.
    fn update(&self, item: &Item) -> impl Future<Output = Result<()>> + Send;

    /// Deletes the item identified by `id`.
    fn delete(&self, id: i64) -> impl Future<Output = Result<()>> + Send;
}

/// Postgres-backed [`TodoStore`].
///
/// Cloning is cheap: the inner pool is reference-counted and shared.
#[derive(Clone)]
pub struct PgTodoStore {
    pool: PgPool,
}

impl PgTodoStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn item_from_row(row: &PgRow) -> core::result::Result<Item, sqlx::Error> {
    Ok(Item {
        id: row.try_get("id")?,
        selfref: String::new(),
        note: row.try_get("note")?,
        duedate: row.try_get("duedate")?,
        repeat: row.try_get("repeat")?,
        completed: row.try_get("completed")?,
    })
}

fn persistence(err: sqlx::Error) -> Error {
    Error::Persistence {
        detail: err.to_string(),
    }
}

impl TodoStore for PgTodoStore {
    async fn insert(&self, item: &Item) -> Result<i64> {
        item.validate()?;

        let row = sqlx::query(INSERT_TODO_STMT)
            .bind(&item.note)
            .bind(item.duedate)
            .bind(item.repeat)
            .bind(item.completed)
            .fetch_one(&self.pool)
            .await
            .map_err(persistence)?;

        row.try_get("id").map_err(persistence)
    }

    async fn list(&self) -> Result<Vec<Item>> {
        let rows = sqlx::query(GET_ALL_TODOS_QUERY)
            .fetch_all(&self.pool)
            .await
            .map_err(persistence)?;

        rows.iter()
            .map(|row| item_from_row(row).map_err(persistence))
            .collect()
    }

    async fn get(&self, id: i64) -> Result<Option<Item>> {
        let row = sqlx::query(GET_TODO_QUERY)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(persistence)?;

        row.as_ref()
            .map(|row| item_from_row(row).map_err(persistence))
            .transpose()
    }

    async fn update(&self, item: &Item) -> Result<()> {
        item.validate()?;

        sqlx::query(UPDATE_TODO_STMT)
            .bind(&item.note)
            .bind(item.duedate)
            .bind(item.repeat)
            .bind(item.completed)
            .bind(item.id)
            .execute(&self.pool)
            .await
            .map_err(persistence)?;

        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        sqlx::query(DELETE_TODO_STMT)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(persistence)?;

        Ok(())
    }
}

/// Opens the connection pool and verifies the database is reachable.
///
/// A failure here is a startup-time configuration error; the caller is
/// expected to exit.
pub async fn connect_pool(config: &ServerConfig) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.postgres_url())
        .await
        .context("unable to open a database connection")?;

    sqlx::query("SELECT 1")
        .execute(&pool)
        .await
        .context("database unreachable")?;

    Ok(pool)
}
