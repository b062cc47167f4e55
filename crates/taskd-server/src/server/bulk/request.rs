use taskd_core::{InsertReply, Item};
use tokio::sync::mpsc;

/// One queued unit of bulk-insert work.
///
/// Created once per item in a batch payload and consumed exactly once by the
/// insert task that dequeues it; never retried or re-queued. The reply sender
/// belongs to the originating batch, so replies from concurrent batches cannot
/// interleave.
pub struct InsertRequest {
    /// The item to persist. Its `id` must be unset (zero).
    pub item: Item,
    /// Parsed segments of the request path; the insert task enforces the
    /// one-segment collection shape.
    pub path_nodes: Vec<String>,
    /// The originating request path, carried for log context only.
    pub origin_path: String,
    /// Where the insert task posts its single outcome.
    pub reply_tx: mpsc::Sender<InsertReply>,
}
