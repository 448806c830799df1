use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam::channel::{unbounded, Sender};
use tracing::{error, warn};

use super::buffer::MetricBuffer;
use super::encoder::{encode, MetricKind, SampleRate};
use super::job::{initialize_job, FlushShared};
use super::sampler::Sampler;
use super::writer::{ClientState, Transport, TransportType};
use crate::{MetricResult, MetricsError};

/// Trait defining the metric calls the gateway forwards.
///
/// None of these calls fail: transport problems are logged, rejected samples
/// are silently dropped.
pub trait MetricClientTrait: Send + Sync {
    /// Adds `delta` to a counter, subject to `sample_rate`.
    fn count(&self, key: &str, delta: i64, sample_rate: f32);

    /// Records a point-in-time value. Never sampled.
    fn gauge(&self, key: &str, value: i64);

    /// Records a duration in milliseconds, subject to `sample_rate`.
    fn timing(&self, key: &str, millis: i64, sample_rate: f32);

    /// Records an occurrence of `value` in a set. Never sampled.
    fn set(&self, key: &str, value: i64);

    /// Hands everything buffered to the flush job and returns immediately.
    fn flush(&self);
}

/// Configuration options for the StatsD client.
#[derive(Debug)]
pub struct StatsdClientOptions {
    /// Collector host name or address.
    pub host: String,
    /// Collector UDP port.
    pub port: u16,
    /// Flush the whole buffer after every metric call.
    pub autoflush: bool,
    /// Prefix prepended verbatim to every key on the wire. Include a trailing dot if desired.
    pub stats_prefix: String,
    /// Drain the buffer on this period from the background job. `None` means manual flushes only.
    pub flush_interval: Option<Duration>,
    /// Number of background threads writing packets. At least one is always started.
    pub flush_workers: usize,
    /// Fixed sampler seed. `None` seeds from the clock.
    pub sampler_seed: Option<u64>,
    /// How the transport obtains its writer on `open`.
    pub transport_type: TransportType,
}

impl Default for StatsdClientOptions {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8125,
            autoflush: false,
            stats_prefix: String::new(),
            flush_interval: None,
            flush_workers: 1,
            sampler_seed: None,
            transport_type: TransportType::Udp,
        }
    }
}

/// Buffering StatsD client sending over UDP.
///
/// Metric calls encode the update, apply sampling and upsert it into a
/// per-key buffer (last write wins). Packets are written by background
/// threads, so no call ever blocks on the network. The client starts
/// unopened: call [`open`](Self::open) to connect. Dropping the client
/// flushes what is still buffered and joins the background threads.
///
/// This type is `Send + Sync` and can be shared across threads via `Arc<StatsdClient>`.
///
/// # Example
///
/// ```no_run
/// use statsd_gateway::{MetricClientTrait, StatsdClient, StatsdClientOptions};
///
/// let client = StatsdClient::new(StatsdClientOptions {
///     host: "127.0.0.1".to_string(),
///     port: 8125,
///     ..Default::default()
/// });
/// client.open();
///
/// client.count("requests", 1, 1.0);
/// client.gauge("connections", 12);
/// client.timing("latency", 42, 0.5);
/// client.flush();
/// ```
pub struct StatsdClient {
    shared: Arc<FlushShared>,
    sampler: Sampler,
    autoflush: AtomicBool,
    sender: Option<Sender<String>>,
    // only used in cold path
    job_handles: Vec<JoinHandle<()>>,
}

impl StatsdClient {
    /// Creates an unopened client and starts its flush workers.
    #[must_use]
    pub fn new(options: StatsdClientOptions) -> Self {
        let (sender, receiver) = unbounded::<String>();
        let shared = Arc::new(FlushShared {
            buffer: MetricBuffer::new(),
            transport: Transport::new(options.host, options.port, options.transport_type),
            stats_prefix: options.stats_prefix,
        });
        let job_handles = initialize_job(
            options.flush_workers,
            options.flush_interval,
            &receiver,
            &shared,
        );
        let sampler = options
            .sampler_seed
            .map_or_else(Sampler::from_time, Sampler::with_seed);

        Self {
            shared,
            sampler,
            autoflush: AtomicBool::new(options.autoflush),
            sender: Some(sender),
            job_handles,
        }
    }

    /// Connects the transport. A failure is logged and leaves the client
    /// degraded: metric calls keep working and sends are dropped.
    pub fn open(&self) {
        if let Err(err) = self.try_open() {
            error!(
                "Failed to open StatsD transport to {}: {err}",
                self.shared.transport.endpoint()
            );
        }
    }

    /// Connects the transport, returning the failure to the caller.
    ///
    /// # Errors
    /// Returns address resolution or socket errors.
    pub fn try_open(&self) -> MetricResult<()> {
        self.shared.transport.open()
    }

    /// Releases the socket. Later sends are logged no-ops.
    pub fn close(&self) {
        self.shared.transport.close();
    }

    /// Enables or disables flushing after every metric call.
    pub fn set_autoflush(&self, autoflush: bool) {
        self.autoflush.store(autoflush, Ordering::Relaxed);
    }

    /// Whether every metric call flushes.
    pub fn autoflush(&self) -> bool {
        self.autoflush.load(Ordering::Relaxed)
    }

    /// Current transport lifecycle state.
    pub fn state(&self) -> ClientState {
        self.shared.transport.state()
    }

    /// Number of keys waiting for the next flush.
    pub fn pending(&self) -> usize {
        self.shared.buffer.len()
    }

    /// Shuts down the client, flushing any pending metrics.
    pub fn shutdown(self) {
        drop(self);
    }

    fn record(&self, key: &str, kind: MetricKind, value: i64, sample_rate: SampleRate) {
        if !self.sampler.accept(sample_rate) {
            return;
        }
        let metric = encode(kind, value).with_sample_rate(sample_rate);
        self.shared.buffer.put(key, metric);

        if self.autoflush() {
            self.flush();
        }
    }

    fn dispatch(&self, packet: String) -> MetricResult<()> {
        let sender = self.sender.as_ref().ok_or(MetricsError::QueueClosed)?;
        sender.send(packet).map_err(|_| MetricsError::QueueClosed)
    }
}

impl MetricClientTrait for StatsdClient {
    fn count(&self, key: &str, delta: i64, sample_rate: f32) {
        self.record(key, MetricKind::Count, delta, SampleRate::new(sample_rate));
    }

    fn gauge(&self, key: &str, value: i64) {
        self.record(key, MetricKind::Gauge, value, SampleRate::ALWAYS);
    }

    fn timing(&self, key: &str, millis: i64, sample_rate: f32) {
        self.record(key, MetricKind::Timing, millis, SampleRate::new(sample_rate));
    }

    fn set(&self, key: &str, value: i64) {
        self.record(key, MetricKind::Set, value, SampleRate::ALWAYS);
    }

    fn flush(&self) {
        let Some(packet) = self.shared.buffer.drain_all(&self.shared.stats_prefix) else {
            return;
        };
        if let Err(err) = self.dispatch(packet) {
            warn!("Dropping metrics packet: {err}");
        }
    }
}

impl std::fmt::Debug for StatsdClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatsdClient")
            .field("transport", &self.shared.transport)
            .field("autoflush", &self.autoflush())
            .field("workers", &self.job_handles.len())
            .finish_non_exhaustive()
    }
}

impl Drop for StatsdClient {
    fn drop(&mut self) {
        self.flush();

        // Dropping the sender disconnects the channel; workers write what is
        // already queued, worker 0 drains the buffer once more, then they exit.
        drop(self.sender.take());

        for handle in self.job_handles.drain(..) {
            let _ = handle.join();
        }
    }
}
