//! # Common ToDo Types
//!
//! This module defines the shared types used on the wire by the todo service.
//! Both the request and response sides of the API use these types, so the JSON
//! field names here are the canonical contract.
//!
//! ## Overview
//!
//! - [`Item`] - a single todo entry
//! - [`TodoList`] - the `{"todolist": [...]}` wrapper used by list responses
//!   and bulk-insert request bodies
//! - [`InsertReply`] - the per-item outcome of a bulk insert
//! - [`BatchResult`] - the ordered collection of [`InsertReply`]s returned for
//!   one bulk request

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::error::{Error, Result};

/// The identifier value of an [`Item`] that has not been persisted yet.
///
/// `SERIAL` columns start at 1, so 0 reliably means "unset". Insert requests
/// must carry this value; the database assigns the real identifier.
pub const NIL_TODO_ID: i64 = 0;

/// A single todo entry.
///
/// `id` is zero until the item is persisted, and `selfref` is populated only
/// after successful creation (or when the item is served back to a client).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Item {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub selfref: String,
    #[serde(default)]
    pub note: String,
    #[serde(default = "unset_duedate")]
    pub duedate: DateTime<Utc>,
    #[serde(default)]
    pub repeat: bool,
    #[serde(default)]
    pub completed: bool,
}

fn unset_duedate() -> DateTime<Utc> {
    DateTime::UNIX_EPOCH
}

impl Item {
    /// Checks the domain rules an item must satisfy before it can be written.
    pub fn validate(&self) -> Result<()> {
        if self.note.is_empty() {
            return Err(Error::Validation {
                detail: "ToDo note must be populated".to_string(),
            });
        }
        Ok(())
    }

    /// Points `selfref` at this item's resource path within `collection`.
    pub fn set_self_ref(&mut self, collection: &str) {
        self.selfref = format!("/{}/{}", collection, self.id);
    }
}

/// A collection of todo items.
///
/// Serves double duty as the list-GET response body and the bulk-insert
/// request body.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TodoList {
    #[serde(rename = "todolist")]
    pub items: Vec<Item>,
}

/// The outcome of one bulk-insert request for one item.
///
/// Exactly one reply is produced per submitted item. On success the item
/// carries its newly assigned identifier; on failure `error` holds the detail
/// and `http_status` a non-2xx code.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InsertReply {
    pub item: Item,
    #[serde(rename = "httpStatus")]
    pub http_status: u16,
    pub error: Option<String>,
}

impl InsertReply {
    /// Reply for a successfully persisted item (201).
    pub fn created(item: Item) -> Self {
        Self {
            item,
            http_status: 201,
            error: None,
        }
    }

    /// Reply for an item that could not be persisted.
    pub fn failed(item: Item, http_status: u16, detail: impl Into<String>) -> Self {
        Self {
            item,
            http_status,
            error: Some(detail.into()),
        }
    }

    /// Whether this reply reports a created item.
    pub fn is_created(&self) -> bool {
        self.http_status == 201
    }
}

/// The aggregated response body for one bulk-insert request.
///
/// Replies appear in arrival order, not submission order. The collection is
/// complete once it holds one reply per submitted item.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    pub responses: Vec<InsertReply>,
}

impl BatchResult {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            responses: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, reply: InsertReply) {
        self.responses.push(reply);
    }

    pub fn len(&self) -> usize {
        self.responses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_item() -> Item {
        Item {
            id: 0,
            selfref: String::new(),
            note: "get groceries".to_string(),
            duedate: Utc.with_ymd_and_hms(2026, 9, 1, 12, 0, 0).unwrap(),
            repeat: false,
            completed: false,
        }
    }

    #[test]
    fn item_serializes_with_wire_field_names() {
        let json = serde_json::to_value(sample_item()).unwrap();
        assert_eq!(json["id"], 0);
        assert_eq!(json["selfref"], "");
        assert_eq!(json["note"], "get groceries");
        assert_eq!(json["duedate"], "2026-09-01T12:00:00Z");
        assert_eq!(json["repeat"], false);
        assert_eq!(json["completed"], false);
    }

    #[test]
    fn item_decodes_with_missing_fields_defaulted() {
        let item: Item = serde_json::from_str(r#"{"note":"a"}"#).unwrap();
        assert_eq!(item.id, NIL_TODO_ID);
        assert_eq!(item.note, "a");
        assert_eq!(item.duedate, DateTime::UNIX_EPOCH);
        assert!(!item.repeat);
        assert!(!item.completed);
    }

    #[test]
    fn item_rejects_unknown_fields() {
        let result: std::result::Result<Item, _> =
            serde_json::from_str(r#"{"note":"a","priority":3}"#);
        assert!(result.is_err());
    }

    #[test]
    fn validate_rejects_empty_note() {
        let mut item = sample_item();
        item.note.clear();
        let err = item.validate().unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
    }

    #[test]
    fn validate_accepts_populated_note() {
        assert!(sample_item().validate().is_ok());
    }

    #[test]
    fn set_self_ref_formats_resource_path() {
        let mut item = sample_item();
        item.id = 42;
        item.set_self_ref("todos");
        assert_eq!(item.selfref, "/todos/42");
    }

    #[test]
    fn todo_list_uses_todolist_wrapper() {
        let list = TodoList {
            items: vec![sample_item()],
        };
        let json = serde_json::to_value(&list).unwrap();
        assert!(json["todolist"].is_array());

        let parsed: TodoList =
            serde_json::from_str(r#"{"todolist":[{"note":"a"},{"note":"b"}]}"#).unwrap();
        assert_eq!(parsed.items.len(), 2);
    }

    #[test]
    fn insert_reply_wire_shape() {
        let created = InsertReply::created(sample_item());
        let json = serde_json::to_value(&created).unwrap();
        assert_eq!(json["httpStatus"], 201);
        assert!(json["error"].is_null());
        assert!(created.is_created());

        let failed = InsertReply::failed(sample_item(), 500, "db down");
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["httpStatus"], 500);
        assert_eq!(json["error"], "db down");
        assert!(!failed.is_created());
    }

    #[test]
    fn batch_result_grows_in_push_order() {
        let mut batch = BatchResult::with_capacity(2);
        assert!(batch.is_empty());
        batch.push(InsertReply::created(sample_item()));
        batch.push(InsertReply::failed(sample_item(), 400, "bad id"));
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.responses[0].http_status, 201);
        assert_eq!(batch.responses[1].http_status, 400);
    }
}
