//! Fan-out routing over duplex endpoints
//!
//! The router owns a fixed set of endpoints and repeats every chunk read
//! from one of them to all the others, the way a network hub repeats
//! frames. Failures stream out of a bounded error channel; shutdown is
//! cooperative through a cancellation token.
//!
//! # Architecture
//!
//! ```text
//!                            Arc<Shared>
//!                 ┌────────────────────────────────┐
//!                 │ endpoints: Vec<Arc<dyn ..>>    │
//!                 │ broadcast_lock: Mutex<()>      │
//!                 │ cancel: CancelToken            │
//!                 └───────────────┬────────────────┘
//!                                 │
//!            ┌────────────────────┼────────────────────┐
//!            │                    │                    │
//!            ▼                    ▼                    ▼
//!       [read loop 0]        [read loop 1]        [read loop 2]
//!       endpoint.read()      endpoint.read()      endpoint.read()
//!            │                    │                    │
//!            └── broadcast to every *other* endpoint ──┘
//!                      (under broadcast_lock)
//!                                 │
//!                        mpsc::Sender<RouterError>
//!                                 │
//!                                 ▼
//!                        caller drains errors
//! ```
//!
//! # Shutdown
//!
//! Loops poll the cancellation token between reads, so an in-flight
//! operation always completes. [`Router::close`] triggers the token and
//! closes every endpoint; letting the parent scope trigger (or dropping
//! the router) cancels the loops but leaves the endpoints open.

pub mod cancel;
pub mod config;
pub mod error;
pub mod hub;
pub mod stats;

pub use cancel::CancelToken;
pub use config::{RouterConfig, DEFAULT_READ_BUFFER_SIZE};
pub use error::RouterError;
pub use hub::Router;
pub use stats::{EndpointStats, RouterStats};
