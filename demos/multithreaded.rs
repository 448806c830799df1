//! Sharing a StatsdClient across multiple threads using Arc.
//!
//! Run with: `cargo run --example multithreaded`

use statsd_gateway::{count, MetricClientTrait, StatsdClient, StatsdClientOptions};
use std::sync::Arc;
use std::time::Duration;

fn main() {
    let client = Arc::new(StatsdClient::new(StatsdClientOptions {
        stats_prefix: "myapp.".to_string(),
        flush_interval: Some(Duration::from_millis(50)),
        flush_workers: 2,
        ..Default::default()
    }));
    client.open();

    let mut handles = Vec::new();

    // Spawn worker threads that record metrics concurrently
    for thread_id in 0..4 {
        let client = client.clone();
        let handle = std::thread::spawn(move || {
            for i in 0..100 {
                client.timing(&format!("task.{thread_id}.duration"), i * 10, 0.5);
                count!(client, "tasks.completed");
            }
        });
        handles.push(handle);
    }

    // Wait for all threads to finish
    for handle in handles {
        handle.join().unwrap();
    }

    // shutdown() requires ownership, unwrap the Arc
    // (only succeeds when no other Arc references remain)
    match Arc::try_unwrap(client) {
        Ok(c) => c.shutdown(),
        Err(_) => eprintln!("Warning: other Arc references still alive, cannot shutdown cleanly"),
    }
}
