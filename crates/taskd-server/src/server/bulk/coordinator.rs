//! Response aggregation for bulk inserts.

use taskd_core::{BatchResult, InsertReply};
use tokio::sync::mpsc;

/// Collects exactly `expected` replies from the batch's reply channel.
///
/// Blocks per reply with no timeout; the batch response waits for its slowest
/// insert. Replies are appended in arrival order, which is not the submission
/// order when inserts complete at different speeds. Successful replies get
/// their `selfref` populated from the collection segment and the newly
/// assigned identifier.
///
/// A closed channel before `expected` replies means a task died without
/// replying; the partial batch is returned rather than waiting forever.
pub async fn collect_responses(
    expected: usize,
    reply_rx: &mut mpsc::Receiver<InsertReply>,
    collection: &str,
) -> BatchResult {
    let mut batch = BatchResult::with_capacity(expected);

    for received in 0..expected {
        match reply_rx.recv().await {
            Some(mut reply) => {
                tracing::debug!(status = reply.http_status, "bulk insert response received");
                if reply.is_created() {
                    reply.item.set_self_ref(collection);
                }
                batch.push(reply);
            }
            None => {
                tracing::warn!(
                    "Reply channel closed after {received} of {expected} responses, returning partial batch"
                );
                break;
            }
        }
    }

    batch
}
