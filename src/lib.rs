//! Fan-out byte-stream routing over duplex endpoints
//!
//! `bytehub` wires a fixed set of bidirectional byte streams together so
//! that every chunk read from one endpoint is repeated to all the
//! others, the way a network hub repeats frames. It does not parse or
//! reorder anything; it moves bytes, reports failures, and shuts down
//! cooperatively.
//!
//! # Endpoints
//!
//! Anything implementing [`Endpoint`] can be routed: `read` yields bytes
//! from the endpoint's far side, `write` sends bytes toward it, `close`
//! is idempotent. Two implementations ship with the crate:
//!
//! - [`MemoryStream`] is the in-process terminal: application code talks
//!   to the hub with the non-blocking [`MemoryStream::send`] and
//!   [`MemoryStream::recv`], while the router drives the trait side.
//! - [`TcpEndpoint`] wraps a [`tokio::net::TcpStream`] so live
//!   connections can join the same router as in-memory streams.
//!
//! # Routing
//!
//! [`Router::new`] spawns one read loop per endpoint. Each chunk a loop
//! reads is written to every *other* endpoint under a shared broadcast
//! lock, so fan-outs from different sources never interleave on a
//! destination. Read failures retire the failing endpoint's loop; write
//! failures are reported and skipped without stopping the fan-out. Both
//! arrive on the bounded error channel returned at construction, which
//! closes once every loop has exited.
//!
//! # Shutdown
//!
//! Loops poll a [`CancelToken`] between reads; nothing is ever aborted
//! mid-operation. [`Router::close`] triggers cancellation and closes
//! every endpoint. Triggering the parent scope token (or dropping the
//! router) stops the loops but leaves the endpoints open.
//!
//! # Quick start
//!
//! ```no_run
//! use std::sync::Arc;
//! use bytehub::{CancelToken, Endpoint, MemoryStream, ReadOutcome, Router};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let scope = CancelToken::new();
//! let alice = Arc::new(MemoryStream::new());
//! let bob = Arc::new(MemoryStream::new());
//! let carol = Arc::new(MemoryStream::new());
//!
//! let (router, mut errors) = Router::new(&scope, vec![
//!     alice.clone() as Arc<dyn Endpoint>,
//!     bob.clone(),
//!     carol.clone(),
//! ]);
//!
//! // Everything alice sends shows up at bob and carol, never back at alice.
//! alice.send(b"hello")?;
//!
//! let mut buf = [0u8; 64];
//! loop {
//!     match bob.recv(&mut buf)? {
//!         ReadOutcome::Data(0) => tokio::task::yield_now().await,
//!         ReadOutcome::Data(n) => {
//!             assert_eq!(&buf[..n], b"hello");
//!             break;
//!         }
//!         ReadOutcome::Eof => break,
//!     }
//! }
//!
//! router.close().await?;
//! while let Some(err) = errors.recv().await {
//!     eprintln!("routing error: {}", err);
//! }
//! # Ok(())
//! # }
//! ```

pub mod endpoint;
pub mod router;

pub use endpoint::{Endpoint, EndpointError, MemoryStream, ReadOutcome, TcpEndpoint};
pub use router::{
    CancelToken, EndpointStats, Router, RouterConfig, RouterError, RouterStats,
};
