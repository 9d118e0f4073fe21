//! Error types for routing

use std::fmt;

use crate::endpoint::EndpointError;

/// Errors produced while a router runs or shuts down
///
/// `Read` and `Write` failures flow through the router's error channel
/// as routing continues or winds down; `Close` failures are returned by
/// [`Router::close`](super::Router::close). The `endpoint` field is the
/// index of the affected endpoint in construction order.
#[derive(Debug)]
pub enum RouterError {
    /// A read failed and that endpoint's loop has exited
    Read {
        endpoint: usize,
        source: EndpointError,
    },
    /// A fan-out write to one destination failed; routing continued
    Write {
        endpoint: usize,
        source: EndpointError,
    },
    /// Closing an endpoint failed during router shutdown
    Close {
        endpoint: usize,
        source: EndpointError,
    },
}

impl RouterError {
    /// Index of the endpoint this error concerns
    pub fn endpoint(&self) -> usize {
        match self {
            RouterError::Read { endpoint, .. }
            | RouterError::Write { endpoint, .. }
            | RouterError::Close { endpoint, .. } => *endpoint,
        }
    }
}

impl fmt::Display for RouterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouterError::Read { endpoint, source } => {
                write!(f, "Read failed on endpoint {}: {}", endpoint, source)
            }
            RouterError::Write { endpoint, source } => {
                write!(f, "Write failed on endpoint {}: {}", endpoint, source)
            }
            RouterError::Close { endpoint, source } => {
                write!(f, "Close failed on endpoint {}: {}", endpoint, source)
            }
        }
    }
}

impl std::error::Error for RouterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RouterError::Read { source, .. }
            | RouterError::Write { source, .. }
            | RouterError::Close { source, .. } => Some(source),
        }
    }
}
