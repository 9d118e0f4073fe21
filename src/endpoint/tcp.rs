//! TCP-backed duplex endpoint
//!
//! `TcpEndpoint` adapts a [`tokio::net::TcpStream`] to the [`Endpoint`]
//! contract so live sockets and in-memory streams can share a router.
//! Reads wait for bytes from the peer; a zero-byte read from the socket
//! is reported as end-of-stream. Closing shuts down the write half,
//! which sends FIN to the peer while leaving buffered inbound data
//! readable.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio::sync::Mutex;

use super::duplex::{Endpoint, ReadOutcome};
use super::error::EndpointError;

/// Duplex endpoint wrapping one TCP connection
pub struct TcpEndpoint {
    reader: Mutex<OwnedReadHalf>,
    writer: Mutex<OwnedWriteHalf>,
    closed: AtomicBool,
}

impl TcpEndpoint {
    /// Wrap an established connection
    pub fn new(stream: TcpStream) -> Self {
        let (reader, writer) = stream.into_split();
        Self {
            reader: Mutex::new(reader),
            writer: Mutex::new(writer),
            closed: AtomicBool::new(false),
        }
    }

    /// Connect to `addr` and wrap the resulting stream
    pub async fn connect(addr: impl ToSocketAddrs) -> Result<Self, EndpointError> {
        let stream = TcpStream::connect(addr).await?;
        Ok(Self::new(stream))
    }

    /// Whether this side has been closed for writing
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Endpoint for TcpEndpoint {
    async fn read(&self, buf: &mut [u8]) -> Result<ReadOutcome, EndpointError> {
        let mut reader = self.reader.lock().await;
        let count = reader.read(buf).await?;
        if count == 0 && !buf.is_empty() {
            return Ok(ReadOutcome::Eof);
        }
        Ok(ReadOutcome::Data(count))
    }

    async fn write(&self, buf: &[u8]) -> Result<usize, EndpointError> {
        if self.is_closed() {
            return Err(EndpointError::Closed);
        }

        let mut writer = self.writer.lock().await;
        writer.write_all(buf).await?;
        Ok(buf.len())
    }

    async fn close(&self) -> Result<(), EndpointError> {
        // First close wins; later calls are no-ops.
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        let mut writer = self.writer.lock().await;
        writer.shutdown().await?;
        Ok(())
    }
}
