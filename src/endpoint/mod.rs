//! Duplex endpoints
//!
//! This module defines the [`Endpoint`] trait that the router consumes
//! plus the two bundled implementations: [`MemoryStream`] for in-memory
//! plumbing and tests, and [`TcpEndpoint`] for live sockets.

pub mod duplex;
pub mod error;
pub mod memory;
pub mod tcp;

pub use duplex::{Endpoint, ReadOutcome};
pub use error::EndpointError;
pub use memory::MemoryStream;
pub use tcp::TcpEndpoint;
