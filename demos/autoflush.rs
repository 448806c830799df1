//! Autoflush sends every metric as soon as it is recorded; a flush interval
//! drains buffered metrics in the background instead.
//!
//! Run with: `cargo run --example autoflush`

use statsd_gateway::{gauge, timing, MetricClientTrait, StatsdClient, StatsdClientOptions};
use std::time::Duration;

fn main() {
    let client = StatsdClient::new(StatsdClientOptions {
        autoflush: true,
        ..Default::default()
    });
    client.open();

    // One datagram each
    gauge!(client, "workers.busy", 3);
    timing!(client, "job.duration", 120);

    // Switch to buffering at runtime; nothing leaves until the next flush
    client.set_autoflush(false);
    client.count("batched", 1, 1.0);
    println!("pending keys: {}", client.pending());
    client.flush();

    // Periodic flushing from the background job
    let periodic = StatsdClient::new(StatsdClientOptions {
        flush_interval: Some(Duration::from_millis(100)),
        ..Default::default()
    });
    periodic.open();
    for i in 0..10 {
        periodic.gauge("tick", i);
        std::thread::sleep(Duration::from_millis(30));
    }

    client.shutdown();
    periodic.shutdown();
}
