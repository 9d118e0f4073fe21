//! The fan-out routing hub
//!
//! One read loop per endpoint pulls chunks and repeats each one to all
//! other endpoints under a shared broadcast lock, so chunks from
//! different sources never interleave mid-write on a destination.

use std::io;
use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;

use crate::endpoint::{Endpoint, EndpointError, ReadOutcome};

use super::cancel::CancelToken;
use super::config::RouterConfig;
use super::error::RouterError;
use super::stats::{EndpointCounters, RouterStats};

/// State shared between the router handle and its read loops
struct Shared {
    endpoints: Vec<Arc<dyn Endpoint>>,
    broadcast_lock: Mutex<()>,
    cancel: CancelToken,
    counters: Vec<EndpointCounters>,
    config: RouterConfig,
}

/// Byte-stream fan-out router
///
/// Wires a fixed set of duplex endpoints together so that every chunk
/// read from one endpoint is written to all the others, the way a
/// network hub repeats frames. Construction spawns one read loop per
/// endpoint; each loop runs until cancellation, end-of-stream, or a
/// read failure on its endpoint.
///
/// Failures while routing are delivered through the error channel
/// returned alongside the router. The channel closes once every read
/// loop has exited, so draining it to `None` doubles as a termination
/// signal. The channel is bounded at one slot per endpoint; while it is
/// full, a loop with a failure to report waits for the receiver, so
/// drain it concurrently with routing.
///
/// ```no_run
/// use std::sync::Arc;
/// use bytehub::{CancelToken, Endpoint, MemoryStream, Router};
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let scope = CancelToken::new();
/// let left = Arc::new(MemoryStream::new());
/// let right = Arc::new(MemoryStream::new());
///
/// let (router, mut errors) = Router::new(
///     &scope,
///     vec![left.clone() as Arc<dyn Endpoint>, right.clone()],
/// );
///
/// left.send(b"hello")?; // the read loops repeat it to `right`
///
/// router.close().await?;
/// assert!(errors.recv().await.is_none());
/// # Ok(())
/// # }
/// ```
pub struct Router {
    shared: Arc<Shared>,
    tasks: Vec<JoinHandle<()>>,
}

impl Router {
    /// Create a router over `endpoints` with default configuration
    ///
    /// Returns the router and the receiving end of its error channel;
    /// the channel holds at most one failure per endpoint, and a loop
    /// that cannot push a failure waits until the receiver drains. The
    /// router's cancellation token is derived from `scope`, so
    /// triggering `scope` stops every router created under it.
    pub fn new(
        scope: &CancelToken,
        endpoints: Vec<Arc<dyn Endpoint>>,
    ) -> (Self, mpsc::Receiver<RouterError>) {
        Self::with_config(scope, endpoints, RouterConfig::default())
    }

    /// Create a router with custom configuration
    pub fn with_config(
        scope: &CancelToken,
        endpoints: Vec<Arc<dyn Endpoint>>,
        config: RouterConfig,
    ) -> (Self, mpsc::Receiver<RouterError>) {
        // One slot per endpoint; tokio channels reject zero capacity.
        let capacity = endpoints.len().max(1);
        let (error_tx, error_rx) = mpsc::channel(capacity);

        let counters = endpoints.iter().map(|_| EndpointCounters::default()).collect();
        let shared = Arc::new(Shared {
            endpoints,
            broadcast_lock: Mutex::new(()),
            cancel: scope.child(),
            counters,
            config,
        });

        let mut tasks = Vec::with_capacity(shared.endpoints.len());
        for index in 0..shared.endpoints.len() {
            let shared = Arc::clone(&shared);
            let errors = error_tx.clone();
            tasks.push(tokio::spawn(async move {
                read_loop(shared, index, errors).await;
            }));
        }
        // The local sender drops here; the channel closes once the last
        // read loop releases its clone.

        tracing::debug!(
            endpoints = shared.endpoints.len(),
            buffer = shared.config.read_buffer_size,
            "Router started"
        );

        (Self { shared, tasks }, error_rx)
    }

    /// Get the router configuration
    pub fn config(&self) -> &RouterConfig {
        &self.shared.config
    }

    /// Number of endpoints wired into this router
    pub fn endpoint_count(&self) -> usize {
        self.shared.endpoints.len()
    }

    /// Whether cancellation has been triggered, here or on the scope
    pub fn is_cancelled(&self) -> bool {
        self.shared.cancel.is_cancelled()
    }

    /// Stop routing without closing the endpoints
    ///
    /// Read loops exit at their next iteration; chunks already buffered
    /// in the endpoints stay where they are.
    pub fn cancel(&self) {
        self.shared.cancel.trigger();
    }

    /// Shut the router down: trigger cancellation, then close every endpoint
    ///
    /// Every endpoint is closed even if an earlier close fails; the
    /// first failure is returned after the sweep completes.
    pub async fn close(&self) -> Result<(), RouterError> {
        self.shared.cancel.trigger();
        tracing::info!(endpoints = self.shared.endpoints.len(), "Closing router");

        let mut first_failure = None;
        for (index, endpoint) in self.shared.endpoints.iter().enumerate() {
            if let Err(source) = endpoint.close().await {
                tracing::warn!(endpoint = index, error = %source, "Endpoint close failed");
                if first_failure.is_none() {
                    first_failure = Some(RouterError::Close {
                        endpoint: index,
                        source,
                    });
                }
            }
        }

        match first_failure {
            None => Ok(()),
            Some(err) => Err(err),
        }
    }

    /// Wait for every read loop to exit
    ///
    /// Does not trigger cancellation itself; pair it with
    /// [`Router::close`], [`Router::cancel`] or a scope trigger. The
    /// error channel closes at the same moment the last loop exits.
    pub async fn join(&mut self) {
        for task in self.tasks.drain(..) {
            let _ = task.await;
        }
    }

    /// Snapshot the per-endpoint routing statistics
    pub fn stats(&self) -> RouterStats {
        RouterStats {
            endpoints: self
                .shared
                .counters
                .iter()
                .map(EndpointCounters::snapshot)
                .collect(),
        }
    }
}

impl Drop for Router {
    fn drop(&mut self) {
        // Read loops must not outlive the handle. Endpoints stay open;
        // closing them remains the caller's decision.
        self.shared.cancel.trigger();
    }
}

/// Drive one endpoint: read chunks and repeat them to every peer
async fn read_loop(shared: Arc<Shared>, index: usize, errors: mpsc::Sender<RouterError>) {
    let endpoint = Arc::clone(&shared.endpoints[index]);
    let mut buf = vec![0u8; shared.config.read_buffer_size.max(1)];

    loop {
        if shared.cancel.is_cancelled() {
            tracing::debug!(endpoint = index, "Read loop cancelled");
            break;
        }

        match endpoint.read(&mut buf).await {
            Ok(ReadOutcome::Eof) => {
                tracing::debug!(endpoint = index, "Read loop finished at end of stream");
                break;
            }
            Ok(ReadOutcome::Data(0)) => {
                // Nothing buffered right now; let the other loops run.
                tokio::task::yield_now().await;
            }
            Ok(ReadOutcome::Data(count)) => {
                shared.counters[index].record_read(count);
                broadcast(&shared, index, &buf[..count], &errors).await;
            }
            Err(source) => {
                shared.counters[index].record_error();
                tracing::warn!(endpoint = index, error = %source, "Read failed, loop exiting");
                let _ = errors
                    .send(RouterError::Read {
                        endpoint: index,
                        source,
                    })
                    .await;
                break;
            }
        }
    }
}

/// Repeat one chunk to every endpoint except the source
///
/// The broadcast lock is held for the whole sweep. A destination that
/// rejects the chunk is reported on the error channel and skipped; the
/// remaining destinations still receive the chunk.
async fn broadcast(
    shared: &Shared,
    source: usize,
    chunk: &[u8],
    errors: &mpsc::Sender<RouterError>,
) {
    let _guard = shared.broadcast_lock.lock().await;

    for (index, destination) in shared.endpoints.iter().enumerate() {
        if Arc::ptr_eq(destination, &shared.endpoints[source]) {
            continue;
        }

        match deliver(destination.as_ref(), chunk).await {
            Ok(()) => {
                shared.counters[index].record_write(chunk.len());
                tracing::trace!(from = source, to = index, bytes = chunk.len(), "Chunk repeated");
            }
            Err(cause) => {
                shared.counters[index].record_error();
                tracing::warn!(from = source, to = index, error = %cause, "Fan-out write failed");
                let _ = errors
                    .send(RouterError::Write {
                        endpoint: index,
                        source: cause,
                    })
                    .await;
            }
        }
    }
}

/// Write `chunk` to `destination` in full
///
/// An endpoint may accept fewer bytes than offered; the remainder is
/// resubmitted from the new offset. Accepting zero bytes from a
/// non-empty chunk counts as a failed write.
async fn deliver(destination: &dyn Endpoint, chunk: &[u8]) -> Result<(), EndpointError> {
    let mut offset = 0;
    while offset < chunk.len() {
        match destination.write(&chunk[offset..]).await? {
            0 => {
                return Err(EndpointError::Io(io::Error::new(
                    io::ErrorKind::WriteZero,
                    "failed to write whole chunk",
                )));
            }
            accepted => offset += accepted,
        }
    }
    Ok(())
}
