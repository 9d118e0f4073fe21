//! Error types for endpoint operations

use std::fmt;
use std::io;

/// Errors surfaced by endpoint reads, writes and closes
#[derive(Debug)]
pub enum EndpointError {
    /// The endpoint no longer accepts data
    Closed,
    /// The underlying transport failed
    Io(io::Error),
}

impl fmt::Display for EndpointError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndpointError::Closed => write!(f, "Endpoint is closed"),
            EndpointError::Io(err) => write!(f, "I/O failure: {}", err),
        }
    }
}

impl std::error::Error for EndpointError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EndpointError::Closed => None,
            EndpointError::Io(err) => Some(err),
        }
    }
}

impl From<io::Error> for EndpointError {
    fn from(err: io::Error) -> Self {
        EndpointError::Io(err)
    }
}
