//! Routing statistics
//!
//! Read loops bump per-endpoint atomic counters as chunks move through
//! the router; [`Router::stats`](super::Router::stats) turns them into
//! plain snapshot values.

use std::sync::atomic::{AtomicU64, Ordering};

/// Live counters for one endpoint, updated by the read loops
#[derive(Debug, Default)]
pub(super) struct EndpointCounters {
    bytes_in: AtomicU64,
    bytes_out: AtomicU64,
    chunks_in: AtomicU64,
    errors: AtomicU64,
}

impl EndpointCounters {
    pub(super) fn record_read(&self, bytes: usize) {
        self.bytes_in.fetch_add(bytes as u64, Ordering::Relaxed);
        self.chunks_in.fetch_add(1, Ordering::Relaxed);
    }

    pub(super) fn record_write(&self, bytes: usize) {
        self.bytes_out.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    pub(super) fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    pub(super) fn snapshot(&self) -> EndpointStats {
        EndpointStats {
            bytes_in: self.bytes_in.load(Ordering::Relaxed),
            bytes_out: self.bytes_out.load(Ordering::Relaxed),
            chunks_in: self.chunks_in.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time statistics for one endpoint
#[derive(Debug, Clone, Default)]
pub struct EndpointStats {
    /// Bytes read from this endpoint
    pub bytes_in: u64,
    /// Bytes fanned out to this endpoint
    pub bytes_out: u64,
    /// Chunks read from this endpoint
    pub chunks_in: u64,
    /// Read and write failures attributed to this endpoint
    pub errors: u64,
}

/// Point-in-time statistics for a whole router
#[derive(Debug, Clone, Default)]
pub struct RouterStats {
    /// Per-endpoint statistics, in construction order
    pub endpoints: Vec<EndpointStats>,
}

impl RouterStats {
    /// Total bytes read across all endpoints
    pub fn total_bytes_in(&self) -> u64 {
        self.endpoints.iter().map(|e| e.bytes_in).sum()
    }

    /// Total bytes fanned out across all endpoints
    pub fn total_bytes_out(&self) -> u64 {
        self.endpoints.iter().map(|e| e.bytes_out).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_start_at_zero() {
        let counters = EndpointCounters::default();
        let stats = counters.snapshot();
        assert_eq!(stats.bytes_in, 0);
        assert_eq!(stats.bytes_out, 0);
        assert_eq!(stats.chunks_in, 0);
        assert_eq!(stats.errors, 0);
    }

    #[test]
    fn test_records_accumulate() {
        let counters = EndpointCounters::default();
        counters.record_read(100);
        counters.record_read(24);
        counters.record_write(50);
        counters.record_error();

        let stats = counters.snapshot();
        assert_eq!(stats.bytes_in, 124);
        assert_eq!(stats.chunks_in, 2);
        assert_eq!(stats.bytes_out, 50);
        assert_eq!(stats.errors, 1);
    }

    #[test]
    fn test_router_totals() {
        let stats = RouterStats {
            endpoints: vec![
                EndpointStats {
                    bytes_in: 10,
                    bytes_out: 4,
                    ..Default::default()
                },
                EndpointStats {
                    bytes_in: 6,
                    bytes_out: 12,
                    ..Default::default()
                },
            ],
        };
        assert_eq!(stats.total_bytes_in(), 16);
        assert_eq!(stats.total_bytes_out(), 12);
    }
}
