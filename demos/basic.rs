//! Basic usage of all four metric types with manual flushing.
//!
//! Run with: `cargo run --example basic`

use statsd_gateway::{count, MetricClientTrait, StatsdClient, StatsdClientOptions};

fn main() {
    let client = StatsdClient::new(StatsdClientOptions {
        host: "127.0.0.1".to_string(),
        port: 8125,
        stats_prefix: "myapp.".to_string(),
        ..Default::default()
    });
    client.open();

    // Counter, sent for roughly one call in ten with `|@0.100000` appended
    client.count("request.count", 1, 0.1);

    // Gauge, last value before the flush wins
    client.gauge("queue.depth", 12);
    client.gauge("queue.depth", 9);

    // Timing in milliseconds
    client.timing("request.latency", 42, 1.0);

    // Set, counts unique values per flush interval
    client.set("users.unique", 1001);

    // Macros fill in the usual defaults
    count!(client, "request.ok");

    // Everything above leaves in one datagram
    client.flush();

    client.shutdown();
}
