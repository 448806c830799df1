/// Macro for incrementing a counter, with optional delta and sample rate.
///
/// Omitted arguments take the gateway defaults: delta `1`, sample rate `1.0`.
///
/// # Examples
///
/// ```
/// use statsd_gateway::{count, MetricClientTrait, StatsdClient, StatsdClientOptions};
///
/// let client = StatsdClient::new(StatsdClientOptions::default());
///
/// count!(client, "requests.total");
/// count!(client, "bytes.sent", 1024);
/// count!(client, "cache.miss", 1, 0.1);
/// ```
#[macro_export]
macro_rules! count {
    ($client:expr, $key:expr) => {
        $client.count($key, 1, 1.0)
    };
    ($client:expr, $key:expr, $delta:expr) => {
        $client.count($key, $delta, 1.0)
    };
    ($client:expr, $key:expr, $delta:expr, $sample_rate:expr) => {
        $client.count($key, $delta, $sample_rate)
    };
}

/// Macro for recording a gauge. The value defaults to `1`.
///
/// # Examples
///
/// ```
/// use statsd_gateway::{gauge, MetricClientTrait, StatsdClient, StatsdClientOptions};
///
/// let client = StatsdClient::new(StatsdClientOptions::default());
///
/// gauge!(client, "workers.busy", 12);
/// gauge!(client, "feature.enabled");
/// ```
#[macro_export]
macro_rules! gauge {
    ($client:expr, $key:expr) => {
        $client.gauge($key, 1)
    };
    ($client:expr, $key:expr, $value:expr) => {
        $client.gauge($key, $value)
    };
}

/// Macro for recording a timing in milliseconds. The sample rate defaults to `1.0`.
///
/// # Examples
///
/// ```
/// use statsd_gateway::{timing, MetricClientTrait, StatsdClient, StatsdClientOptions};
///
/// let client = StatsdClient::new(StatsdClientOptions::default());
///
/// timing!(client, "render.ms", 16);
/// timing!(client, "db.query.ms", 3, 0.25);
/// ```
#[macro_export]
macro_rules! timing {
    ($client:expr, $key:expr, $millis:expr) => {
        $client.timing($key, $millis, 1.0)
    };
    ($client:expr, $key:expr, $millis:expr, $sample_rate:expr) => {
        $client.timing($key, $millis, $sample_rate)
    };
}

/// Macro for recording a set member. The value defaults to `1`.
///
/// # Examples
///
/// ```
/// use statsd_gateway::{set, MetricClientTrait, StatsdClient, StatsdClientOptions};
///
/// let client = StatsdClient::new(StatsdClientOptions::default());
///
/// set!(client, "visitors", 4711);
/// set!(client, "heartbeat.seen");
/// ```
#[macro_export]
macro_rules! set {
    ($client:expr, $key:expr) => {
        $client.set($key, 1)
    };
    ($client:expr, $key:expr, $value:expr) => {
        $client.set($key, $value)
    };
}
