//! Dispatch metrics for observability

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for one dispatcher instance
#[derive(Debug, Default)]
pub struct DispatchMetrics {
    /// Events accepted into the store
    dispatched: AtomicU64,
    /// Total record bytes written to the store
    stored_bytes: AtomicU64,
    /// Flushes started
    flush_attempts: AtomicU64,
    /// Events acknowledged by the collector
    events_delivered: AtomicU64,
    /// Submissions the transport failed to deliver
    send_failures: AtomicU64,
    /// Stored records that could not be decoded
    decode_failures: AtomicU64,
}

impl DispatchMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dispatched(&self) -> u64 {
        self.dispatched.load(Ordering::Relaxed)
    }

    /// Count one stored record of `bytes` length
    pub fn record_stored(&self, bytes: usize) {
        self.dispatched.fetch_add(1, Ordering::Relaxed);
        self.stored_bytes.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    pub fn stored_bytes(&self) -> u64 {
        self.stored_bytes.load(Ordering::Relaxed)
    }

    pub fn flush_attempts(&self) -> u64 {
        self.flush_attempts.load(Ordering::Relaxed)
    }

    pub fn inc_flush_attempts(&self) {
        self.flush_attempts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn events_delivered(&self) -> u64 {
        self.events_delivered.load(Ordering::Relaxed)
    }

    pub fn add_events_delivered(&self, count: usize) {
        self.events_delivered.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn send_failures(&self) -> u64 {
        self.send_failures.load(Ordering::Relaxed)
    }

    pub fn inc_send_failures(&self) {
        self.send_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn decode_failures(&self) -> u64 {
        self.decode_failures.load(Ordering::Relaxed)
    }

    pub fn inc_decode_failures(&self) {
        self.decode_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            dispatched: self.dispatched(),
            stored_bytes: self.stored_bytes(),
            flush_attempts: self.flush_attempts(),
            events_delivered: self.events_delivered(),
            send_failures: self.send_failures(),
            decode_failures: self.decode_failures(),
        }
    }
}

/// Snapshot of dispatch metrics (for reporting)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub dispatched: u64,
    pub stored_bytes: u64,
    pub flush_attempts: u64,
    pub events_delivered: u64,
    pub send_failures: u64,
    pub decode_failures: u64,
}
