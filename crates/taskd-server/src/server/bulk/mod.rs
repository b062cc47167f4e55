//! The concurrent bulk-insert pipeline.
//!
//! A bulk POST is decomposed into one [`request::InsertRequest`] per item and
//! pushed onto a bounded dispatch queue. A long-lived launcher task
//! ([`launcher::launcher_loop`]) drains the queue and spawns one insert task
//! ([`processor::process_insert`]) per request. Each task sends exactly one
//! reply on the batch's reply channel, and the originating handler collects
//! them with [`coordinator::collect_responses`].
//!
//! The queue bounds how many inserts can be *pending launch*; once launched, a
//! task runs to completion independent of queue state. Nothing is persisted or
//! retried: a restart loses queued requests by design.

pub mod coordinator;
pub mod launcher;
pub mod processor;
pub mod request;

pub use coordinator::collect_responses;
pub use launcher::{BulkInserter, launcher_loop};
pub use processor::process_insert;
pub use request::InsertRequest;
