//! Dispatcher - store-and-forward pipeline from `dispatch` to the collector

use std::sync::Arc;
use std::time::Instant;

use codec::{encode_struct, COMPACT_CONTENT_TYPE};
use contracts::{
    App, CorruptRecordPolicy, Device, Event, FlushMode, MembershipTier, NativeAppSubmission,
    RecordStore, SubmissionTransport, SubscriptionType, TelemetryConfig,
};
use tokio::runtime::Handle;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

use crate::error::DispatcherError;
use crate::metrics::{DispatchMetrics, MetricsSnapshot};
use crate::record::{decode_record, encode_record, now_ms};
use crate::store::ConfiguredStore;
use crate::transport::ConfiguredTransport;

/// Identity and policy the dispatcher stamps onto every submission
#[derive(Debug, Clone, Default)]
pub struct DispatcherConfig {
    pub app: App,
    pub device: Option<Device>,
    pub device_id: String,
    pub user_id: Option<String>,
    pub krux_id: Option<String>,
    pub subscription: Option<SubscriptionType>,
    pub membership_tier: Option<MembershipTier>,
    pub flush_mode: FlushMode,
    pub corrupt_records: CorruptRecordPolicy,
}

impl From<&TelemetryConfig> for DispatcherConfig {
    fn from(config: &TelemetryConfig) -> Self {
        Self {
            app: config.app.clone(),
            device: config.device.clone(),
            device_id: config.identity.device_id.clone(),
            user_id: config.identity.user_id.clone(),
            krux_id: config.identity.krux_id.clone(),
            subscription: config.identity.subscription,
            membership_tier: config.identity.membership_tier,
            flush_mode: config.dispatch.flush_mode,
            corrupt_records: config.dispatch.corrupt_records,
        }
    }
}

/// What a single flush did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushOutcome {
    /// Nothing decodable was stored; no request was made
    Empty,
    /// The collector acknowledged `events` events, now removed from the store
    Delivered { events: usize },
    /// The transport failed; all `events` events stay stored
    SendFailed { events: usize },
}

impl FlushOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Delivered { .. } => "delivered",
            Self::SendFailed { .. } => "send_failed",
        }
    }

    /// Number of events carried by the submission, zero when empty
    pub fn events(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::Delivered { events } | Self::SendFailed { events } => *events,
        }
    }
}

struct Inner<S, X> {
    config: DispatcherConfig,
    store: Arc<S>,
    transport: Arc<X>,
    flush_lock: Mutex<()>,
    metrics: DispatchMetrics,
}

/// Accepts events, persists them and forwards them in batches
///
/// Cloning is cheap; clones share the store, transport and metrics.
pub struct Dispatcher<S, X> {
    inner: Arc<Inner<S, X>>,
    runtime: Handle,
}

impl<S, X> Clone for Dispatcher<S, X> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            runtime: self.runtime.clone(),
        }
    }
}

impl<S, X> Dispatcher<S, X>
where
    S: RecordStore + Send + Sync + 'static,
    X: SubmissionTransport + Send + Sync + 'static,
{
    /// Create a dispatcher whose background work runs on `runtime`
    pub fn new(
        config: DispatcherConfig,
        store: Arc<S>,
        transport: Arc<X>,
        runtime: Handle,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                store,
                transport,
                flush_lock: Mutex::new(()),
                metrics: DispatchMetrics::new(),
            }),
            runtime,
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.inner.store
    }

    pub fn transport(&self) -> &Arc<X> {
        &self.inner.transport
    }

    /// Get dispatcher metrics
    pub fn metrics(&self) -> MetricsSnapshot {
        self.inner.metrics.snapshot()
    }

    /// Persist `event` and then flush everything pending
    ///
    /// Returns at once. The handle resolves when the background flush
    /// completes; callers are free to drop it.
    pub fn dispatch(&self, event: Event) -> JoinHandle<Result<FlushOutcome, DispatcherError>> {
        let inner = Arc::clone(&self.inner);
        self.runtime.spawn(async move {
            let event_id = event.event_id.clone();
            let result = inner.store_and_flush(event).await;
            if let Err(e) = &result {
                error!(event_id = %event_id, error = %e, "Dispatch failed");
            }
            result
        })
    }

    /// Send everything currently stored
    ///
    /// Hosts may call this on startup to drain records left by a previous run.
    pub async fn flush(&self) -> Result<FlushOutcome, DispatcherError> {
        self.inner.flush().await
    }
}

impl<S, X> Inner<S, X>
where
    S: RecordStore + Send + Sync + 'static,
    X: SubmissionTransport + Send + Sync + 'static,
{
    #[instrument(
        name = "dispatcher_dispatch",
        skip(self, event),
        fields(event_id = %event.event_id)
    )]
    async fn store_and_flush(&self, event: Event) -> Result<FlushOutcome, DispatcherError> {
        let record = encode_record(&event, now_ms())?;
        let bytes = record.len();
        self.store.put(&event.event_id, record).await?;

        self.metrics.record_stored(bytes);
        observability::record_dispatch(self.store.name(), bytes);
        debug!(event_id = %event.event_id, bytes, "Event stored");

        self.flush().await
    }

    #[instrument(
        name = "dispatcher_flush",
        skip(self),
        fields(store = %self.store.name(), transport = %self.transport.name())
    )]
    async fn flush(&self) -> Result<FlushOutcome, DispatcherError> {
        let _guard = match self.config.flush_mode {
            FlushMode::SingleFlight => Some(self.flush_lock.lock().await),
            FlushMode::Concurrent => None,
        };
        self.metrics.inc_flush_attempts();

        let records = self.store.get_all().await?;
        let record_count = records.len();
        let now = now_ms();

        let mut keys = Vec::with_capacity(record_count);
        let mut events = Vec::with_capacity(record_count);
        let mut corrupt = Vec::new();
        for record in records {
            let decoded = decode_record(record.bytes).and_then(|(stored_at, mut event)| {
                let age = now
                    .checked_sub(stored_at)
                    .ok_or(DispatcherError::TimestampOutOfRange { stored_at_ms: stored_at })?;
                event.age_ms_long = Some(age);
                Ok(event)
            });
            match decoded {
                Ok(event) => {
                    keys.push(record.key);
                    events.push(event);
                }
                Err(e) => {
                    warn!(key = %record.key, error = %e, "Skipping undecodable record");
                    self.metrics.inc_decode_failures();
                    observability::record_decode_failure(e.kind());
                    corrupt.push(record.key);
                }
            }
        }
        self.handle_corrupt(&corrupt).await;

        if events.is_empty() {
            debug!(records = record_count, "No events to flush");
            observability::record_flush(FlushOutcome::Empty.label(), 0);
            return Ok(FlushOutcome::Empty);
        }

        let event_count = events.len();
        let body = encode_struct(&self.submission(events))?;
        debug!(
            records = record_count,
            events = event_count,
            bytes = body.len(),
            "Sending submission"
        );

        let sent = Instant::now();
        let posted = self.transport.post(body, COMPACT_CONTENT_TYPE).await;
        observability::record_flush_latency_ms(sent.elapsed().as_secs_f64() * 1000.0);

        let outcome = match posted {
            Ok(()) => {
                let removed = self.remove_all(&keys).await;
                self.metrics.add_events_delivered(event_count);
                info!(events = event_count, removed, "Submission delivered");
                FlushOutcome::Delivered { events: event_count }
            }
            Err(e) => {
                self.metrics.inc_send_failures();
                warn!(events = event_count, error = %e, "Submission failed, records kept");
                FlushOutcome::SendFailed { events: event_count }
            }
        };
        observability::record_flush(outcome.label(), event_count);
        Ok(outcome)
    }

    fn submission(&self, events: Vec<Event>) -> NativeAppSubmission {
        let config = &self.config;
        NativeAppSubmission {
            app: config.app.clone(),
            device: config.device.clone(),
            device_id: config.device_id.clone(),
            user_id: config.user_id.clone(),
            krux_id: config.krux_id.clone(),
            subscription_id: config.subscription,
            events,
            membership_tier: config.membership_tier,
        }
    }

    /// Remove delivered records; a failed removal only means a resend later
    async fn remove_all(&self, keys: &[String]) -> usize {
        let mut removed = 0;
        for key in keys {
            match self.store.remove(key).await {
                Ok(()) => removed += 1,
                Err(e) => warn!(key = %key, error = %e, "Failed to remove delivered record"),
            }
        }
        removed
    }

    async fn handle_corrupt(&self, keys: &[String]) {
        if keys.is_empty() || self.config.corrupt_records == CorruptRecordPolicy::Retain {
            return;
        }
        for key in keys {
            match self.store.remove(key).await {
                Ok(()) => warn!(key = %key, "Dead-letter: undecodable record removed"),
                Err(e) => warn!(key = %key, error = %e, "Failed to remove undecodable record"),
            }
        }
    }
}

/// Convenience function to create a dispatcher from a loaded configuration
///
/// Must be called from within a tokio runtime; that runtime runs the
/// background flushes. `dry_run` swaps the HTTP transport for a log transport.
pub fn create_dispatcher(
    config: &TelemetryConfig,
    dry_run: bool,
) -> Result<Dispatcher<ConfiguredStore, ConfiguredTransport>, DispatcherError> {
    let runtime = Handle::try_current()
        .map_err(|e| DispatcherError::setup("dispatcher", e.to_string()))?;
    let store = ConfiguredStore::from_config(&config.store)?;
    let transport = ConfiguredTransport::from_config(&config.endpoint, dry_run)?;
    Ok(Dispatcher::new(
        DispatcherConfig::from(config),
        Arc::new(store),
        Arc::new(transport),
        runtime,
    ))
}
