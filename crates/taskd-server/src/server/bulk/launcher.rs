//! Dispatch queue ownership and the insert-task launcher.
//!
//! [`BulkInserter`] is constructed by the service composition root and owns
//! the producer side of the bounded dispatch queue, the shutdown token, and
//! the tracker for spawned insert tasks. [`launcher_loop`] is the single
//! long-lived consumer: it waits on {queue-has-item, shutdown-signaled} and
//! spawns one task per dequeued request without waiting for it to finish.

use core::time::Duration;

use taskd_core::{Error, Result};
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use crate::server::bulk::processor::process_insert;
use crate::server::bulk::request::InsertRequest;
use crate::server::store::TodoStore;

/// Handle to the bulk-insert pipeline.
///
/// Cheap to share via `Arc`; the handler side uses [`submit`](Self::submit)
/// and the composition root drives [`shutdown`](Self::shutdown) once the HTTP
/// listener has stopped.
pub struct BulkInserter {
    queue_tx: mpsc::Sender<InsertRequest>,
    shutdown_token: CancellationToken,
    tracker: TaskTracker,
    shutdown_timeout: Duration,
}

impl BulkInserter {
    /// Creates the dispatch queue and spawns the launcher for the lifetime of
    /// the process.
    ///
    /// `queue_capacity` bounds how many insert requests can be pending launch
    /// at once; a full queue applies backpressure to `submit` rather than
    /// dropping requests.
    pub fn new<S>(store: S, queue_capacity: usize, shutdown_timeout: Duration) -> Self
    where
        S: TodoStore + Clone,
    {
        let (queue_tx, queue_rx) = mpsc::channel(queue_capacity);
        let shutdown_token = CancellationToken::new();
        let tracker = TaskTracker::new();

        tokio::spawn(launcher_loop(
            store,
            queue_rx,
            shutdown_token.clone(),
            tracker.clone(),
        ));

        Self {
            queue_tx,
            shutdown_token,
            tracker,
            shutdown_timeout,
        }
    }

    /// Pushes one insert request onto the dispatch queue.
    ///
    /// Awaits queue capacity when the queue is full. Fails fast with
    /// [`Error::ServiceShutdown`] once shutdown has begun, and with a channel
    /// error if the launcher has stopped (so callers never block against a
    /// launcher that is not running).
    pub async fn submit(&self, request: InsertRequest) -> Result<()> {
        if self.shutdown_token.is_cancelled() {
            return Err(Error::ServiceShutdown);
        }

        self.queue_tx
            .send(request)
            .await
            .map_err(|_| Error::Channel {
                context: "insert dispatch queue closed".to_string(),
            })
    }

    /// Gracefully shuts down the pipeline.
    ///
    /// Cancels the launcher so no further tasks launch, then waits up to the
    /// configured timeout for already-launched insert tasks to finish. Tasks
    /// still running after the timeout are abandoned, not cancelled.
    pub async fn shutdown(&self) {
        tracing::info!("Refusing new bulk insert requests");
        self.shutdown_token.cancel();
        self.tracker.close();

        match timeout(self.shutdown_timeout, self.tracker.wait()).await {
            Ok(()) => tracing::info!("All in-flight insert tasks drained"),
            Err(_) => tracing::warn!(
                "Insert task drain timed out ({} tasks still running)",
                self.tracker.len()
            ),
        }
    }
}

/// The long-lived launcher: drains the dispatch queue and spawns one insert
/// task per request.
///
/// Runs until the shutdown token is cancelled or every queue producer is
/// dropped. Spawned tasks are tracked but not awaited here; a panicking task
/// is isolated by the task boundary and never takes the launcher down.
pub async fn launcher_loop<S>(
    store: S,
    mut queue_rx: mpsc::Receiver<InsertRequest>,
    shutdown_token: CancellationToken,
    tracker: TaskTracker,
) where
    S: TodoStore + Clone,
{
    tracing::info!("Bulk insert launcher starting");

    loop {
        tokio::select! {
            maybe_request = queue_rx.recv() => {
                match maybe_request {
                    Some(request) => {
                        tracker.spawn(process_insert(store.clone(), request));
                    }
                    None => {
                        tracing::info!("Dispatch queue closed, launcher exiting");
                        break;
                    }
                }
            }
            () = shutdown_token.cancelled() => {
                tracing::info!("Bulk insert launcher exiting");
                break;
            }
        }
    }
}
