//! The duplex endpoint capability
//!
//! Anything a router can wire together implements [`Endpoint`]: a
//! bidirectional byte stream with an explicit close. The contract is
//! deliberately small so that in-memory buffers, sockets and test
//! doubles all fit behind the same object-safe surface.

use async_trait::async_trait;

use super::error::EndpointError;

/// Result of a successful read from an endpoint
///
/// A read distinguishes three situations: bytes were produced, nothing
/// is available right now, and the stream has ended. The first two are
/// both [`ReadOutcome::Data`]; a count of zero means "nothing yet, ask
/// again later" and is not an end-of-stream signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    /// `buf[..n]` holds the bytes read; `n` may be zero
    Data(usize),
    /// The stream has ended and no further bytes will arrive
    Eof,
}

/// A bidirectional byte stream that can be routed
///
/// The two directions are distinct: `read` yields bytes originating at
/// the endpoint's far side (a socket's remote peer, a stream's owning
/// application), and `write` sends bytes toward that far side. A
/// conforming endpoint never returns its own written bytes from `read`.
///
/// Implementations decide whether reads block. An in-memory endpoint
/// returns [`ReadOutcome::Data`] with a count of zero when nothing is
/// queued; a socket-backed endpoint waits for bytes instead. Callers
/// that poll must tolerate both.
///
/// Closing is idempotent. After a close, writes fail with
/// [`EndpointError::Closed`] while reads drain whatever was buffered
/// before reporting [`ReadOutcome::Eof`].
#[async_trait]
pub trait Endpoint: Send + Sync {
    /// Read up to `buf.len()` bytes into `buf`
    async fn read(&self, buf: &mut [u8]) -> Result<ReadOutcome, EndpointError>;

    /// Write the contents of `buf`, returning the number of bytes accepted
    ///
    /// Accepting fewer bytes than offered is allowed; accepting zero
    /// from a non-empty `buf` means no progress can be made.
    async fn write(&self, buf: &[u8]) -> Result<usize, EndpointError>;

    /// Close the endpoint for writing
    async fn close(&self) -> Result<(), EndpointError>;
}
