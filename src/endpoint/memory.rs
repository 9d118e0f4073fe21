//! In-memory duplex endpoint
//!
//! `MemoryStream` is the in-process terminal of a router: application
//! code holds one side, the router drives the other. Bytes passed to
//! [`MemoryStream::send`] come out of the routing-facing [`Endpoint::read`];
//! bytes the router delivers via [`Endpoint::write`] come out of
//! [`MemoryStream::recv`]. The two directions are independent queues, so
//! routed data is never echoed back into the hub. Nothing here ever
//! blocks.

use std::sync::Mutex;

use async_trait::async_trait;
use bytes::{Buf, BytesMut};

use super::duplex::{Endpoint, ReadOutcome};
use super::error::EndpointError;

/// In-memory byte stream with explicit close semantics
///
/// Each direction is a first-in first-out queue. Closing flips a single
/// one-way flag covering both directions: `send` and the routing-facing
/// write are rejected from that point on, while `recv` and the
/// routing-facing read keep draining bytes buffered before the close and
/// only then report [`ReadOutcome::Eof`]. Closing twice is harmless.
#[derive(Debug)]
pub struct MemoryStream {
    inner: Mutex<Inner>,
}

#[derive(Debug)]
struct Inner {
    /// Bytes the application sent, awaiting the router
    outbound: BytesMut,
    /// Bytes the router delivered, awaiting the application
    inbound: BytesMut,
    closed: bool,
}

impl Inner {
    fn push(&mut self, queue: Direction, buf: &[u8]) -> Result<usize, EndpointError> {
        if self.closed {
            return Err(EndpointError::Closed);
        }
        self.queue_mut(queue).extend_from_slice(buf);
        Ok(buf.len())
    }

    fn pull(&mut self, queue: Direction, buf: &mut [u8]) -> Result<ReadOutcome, EndpointError> {
        let closed = self.closed;
        let queue = self.queue_mut(queue);
        if queue.is_empty() {
            if closed {
                return Ok(ReadOutcome::Eof);
            }
            return Ok(ReadOutcome::Data(0));
        }

        let count = buf.len().min(queue.len());
        buf[..count].copy_from_slice(&queue[..count]);
        queue.advance(count);
        Ok(ReadOutcome::Data(count))
    }

    fn queue_mut(&mut self, queue: Direction) -> &mut BytesMut {
        match queue {
            Direction::Outbound => &mut self.outbound,
            Direction::Inbound => &mut self.inbound,
        }
    }
}

#[derive(Clone, Copy)]
enum Direction {
    Outbound,
    Inbound,
}

impl MemoryStream {
    /// Create an open stream with both queues empty
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                outbound: BytesMut::new(),
                inbound: BytesMut::new(),
                closed: false,
            }),
        }
    }

    /// Queue bytes for the router to pick up and fan out
    ///
    /// Non-blocking; fails with [`EndpointError::Closed`] once the stream
    /// is closed, queueing nothing.
    pub fn send(&self, buf: &[u8]) -> Result<usize, EndpointError> {
        self.inner.lock().unwrap().push(Direction::Outbound, buf)
    }

    /// Take delivered bytes out of the stream
    ///
    /// Non-blocking. Returns `Data(0)` when nothing has been delivered
    /// yet, and `Eof` only once the stream is closed and fully drained.
    pub fn recv(&self, buf: &mut [u8]) -> Result<ReadOutcome, EndpointError> {
        self.inner.lock().unwrap().pull(Direction::Inbound, buf)
    }

    /// Whether the stream has been closed
    pub fn is_closed(&self) -> bool {
        self.inner.lock().unwrap().closed
    }

    /// Bytes queued by `send` and not yet picked up by the router
    pub fn pending_send(&self) -> usize {
        self.inner.lock().unwrap().outbound.len()
    }

    /// Bytes delivered by the router and not yet taken by `recv`
    pub fn pending_recv(&self) -> usize {
        self.inner.lock().unwrap().inbound.len()
    }
}

impl Default for MemoryStream {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Endpoint for MemoryStream {
    async fn read(&self, buf: &mut [u8]) -> Result<ReadOutcome, EndpointError> {
        self.inner.lock().unwrap().pull(Direction::Outbound, buf)
    }

    async fn write(&self, buf: &[u8]) -> Result<usize, EndpointError> {
        self.inner.lock().unwrap().push(Direction::Inbound, buf)
    }

    async fn close(&self) -> Result<(), EndpointError> {
        self.inner.lock().unwrap().closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_new_stream_is_open_and_empty() {
        let stream = MemoryStream::new();
        assert!(!stream.is_closed());
        assert_eq!(stream.pending_send(), 0);
        assert_eq!(stream.pending_recv(), 0);

        let mut buf = [0u8; 8];
        assert_eq!(stream.recv(&mut buf).unwrap(), ReadOutcome::Data(0));
        assert_eq!(stream.read(&mut buf).await.unwrap(), ReadOutcome::Data(0));
    }

    #[tokio::test]
    async fn test_sent_bytes_come_out_of_the_routing_side() {
        let stream = MemoryStream::new();
        assert_eq!(stream.send(b"hello").unwrap(), 5);
        assert_eq!(stream.pending_send(), 5);

        let mut buf = [0u8; 8];
        assert_eq!(stream.read(&mut buf).await.unwrap(), ReadOutcome::Data(5));
        assert_eq!(&buf[..5], b"hello");
        assert_eq!(stream.pending_send(), 0);
    }

    #[tokio::test]
    async fn test_written_bytes_come_out_of_recv() {
        let stream = MemoryStream::new();
        assert_eq!(stream.write(b"for you").await.unwrap(), 7);
        assert_eq!(stream.pending_recv(), 7);

        let mut buf = [0u8; 16];
        assert_eq!(stream.recv(&mut buf).unwrap(), ReadOutcome::Data(7));
        assert_eq!(&buf[..7], b"for you");
    }

    #[tokio::test]
    async fn test_directions_do_not_cross() {
        let stream = MemoryStream::new();
        stream.send(b"abc").unwrap();
        stream.write(b"xyz").await.unwrap();

        // recv never sees sent bytes, read never sees written bytes.
        let mut buf = [0u8; 8];
        assert_eq!(stream.recv(&mut buf).unwrap(), ReadOutcome::Data(3));
        assert_eq!(&buf[..3], b"xyz");
        assert_eq!(stream.recv(&mut buf).unwrap(), ReadOutcome::Data(0));

        assert_eq!(stream.read(&mut buf).await.unwrap(), ReadOutcome::Data(3));
        assert_eq!(&buf[..3], b"abc");
        assert_eq!(stream.read(&mut buf).await.unwrap(), ReadOutcome::Data(0));
    }

    #[tokio::test]
    async fn test_partial_reads_preserve_order() {
        let stream = MemoryStream::new();
        stream.send(b"abcdef").unwrap();

        let mut buf = [0u8; 4];
        assert_eq!(stream.read(&mut buf).await.unwrap(), ReadOutcome::Data(4));
        assert_eq!(&buf[..4], b"abcd");
        assert_eq!(stream.read(&mut buf).await.unwrap(), ReadOutcome::Data(2));
        assert_eq!(&buf[..2], b"ef");
    }

    #[tokio::test]
    async fn test_interleaved_sends_concatenate() {
        let stream = MemoryStream::new();
        stream.send(b"ab").unwrap();
        stream.send(b"cd").unwrap();

        let mut buf = [0u8; 3];
        assert_eq!(stream.read(&mut buf).await.unwrap(), ReadOutcome::Data(3));
        assert_eq!(&buf[..3], b"abc");

        stream.send(b"ef").unwrap();
        let mut rest = [0u8; 8];
        assert_eq!(stream.read(&mut rest).await.unwrap(), ReadOutcome::Data(3));
        assert_eq!(&rest[..3], b"def");
    }

    #[tokio::test]
    async fn test_drained_stream_reports_zero_not_eof() {
        let stream = MemoryStream::new();
        stream.write(b"x").await.unwrap();

        let mut buf = [0u8; 4];
        assert_eq!(stream.recv(&mut buf).unwrap(), ReadOutcome::Data(1));
        assert_eq!(stream.recv(&mut buf).unwrap(), ReadOutcome::Data(0));
        assert_eq!(stream.recv(&mut buf).unwrap(), ReadOutcome::Data(0));
    }

    #[tokio::test]
    async fn test_send_and_write_fail_after_close() {
        let stream = MemoryStream::new();
        stream.send(b"early").unwrap();
        stream.close().await.unwrap();

        assert!(matches!(
            stream.send(b"late").unwrap_err(),
            EndpointError::Closed
        ));
        assert!(matches!(
            stream.write(b"late").await.unwrap_err(),
            EndpointError::Closed
        ));
        assert_eq!(stream.pending_send(), 5);
    }

    #[tokio::test]
    async fn test_close_drains_both_directions_before_eof() {
        let stream = MemoryStream::new();
        stream.send(b"keep").unwrap();
        stream.write(b"give").await.unwrap();
        stream.close().await.unwrap();

        let mut buf = [0u8; 8];
        assert_eq!(stream.read(&mut buf).await.unwrap(), ReadOutcome::Data(4));
        assert_eq!(&buf[..4], b"keep");
        assert_eq!(stream.read(&mut buf).await.unwrap(), ReadOutcome::Eof);

        assert_eq!(stream.recv(&mut buf).unwrap(), ReadOutcome::Data(4));
        assert_eq!(&buf[..4], b"give");
        assert_eq!(stream.recv(&mut buf).unwrap(), ReadOutcome::Eof);
        assert_eq!(stream.recv(&mut buf).unwrap(), ReadOutcome::Eof);
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let stream = MemoryStream::new();
        stream.close().await.unwrap();
        stream.close().await.unwrap();
        assert!(stream.is_closed());

        let mut buf = [0u8; 4];
        assert_eq!(stream.read(&mut buf).await.unwrap(), ReadOutcome::Eof);
        assert_eq!(stream.recv(&mut buf).unwrap(), ReadOutcome::Eof);
    }

    #[tokio::test]
    async fn test_zero_length_send() {
        let stream = MemoryStream::new();
        assert_eq!(stream.send(b"").unwrap(), 0);
        assert_eq!(stream.pending_send(), 0);

        stream.close().await.unwrap();
        assert!(matches!(
            stream.send(b"").unwrap_err(),
            EndpointError::Closed
        ));
    }
}
