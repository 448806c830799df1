use statsd_gateway::{
    MetricClientTrait, StatsdClient, StatsdClientOptions, TransportType, Writer,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Default)]
struct CollectingWriter {
    packets: Mutex<Vec<String>>,
}

impl Writer for CollectingWriter {
    fn write(&self, buf: &[u8]) -> std::io::Result<usize> {
        self.packets
            .lock()
            .unwrap()
            .push(String::from_utf8(buf.to_vec()).unwrap());
        Ok(buf.len())
    }
}

fn create_test_client(writer: Arc<CollectingWriter>, autoflush: bool) -> StatsdClient {
    let client = StatsdClient::new(StatsdClientOptions {
        autoflush,
        flush_interval: Some(Duration::from_millis(5)),
        flush_workers: 4,
        transport_type: TransportType::Custom(writer),
        ..Default::default()
    });
    client.open();
    client
}

/// Latest value seen on the wire for every key, in packet order.
fn last_values(writer: &CollectingWriter) -> HashMap<String, String> {
    let mut values = HashMap::new();
    for packet in writer.packets.lock().unwrap().iter() {
        for line in packet.split('\n') {
            let (key, rest) = line.split_once(':').unwrap();
            values.insert(key.to_string(), rest.to_string());
        }
    }
    values
}

#[test]
fn test_parallel_distinct_keys_are_all_delivered() {
    let writer = Arc::new(CollectingWriter::default());
    let client = Arc::new(create_test_client(writer.clone(), false));
    let num_threads = 8;
    let iterations_per_thread = 2_000;

    let handles: Vec<_> = (0..num_threads)
        .map(|thread_id| {
            let client = Arc::clone(&client);
            thread::spawn(move || {
                for i in 0..iterations_per_thread {
                    client.gauge(&format!("thread.{thread_id}.key.{i}"), i);
                    if i % 100 == 0 {
                        client.flush();
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    Arc::try_unwrap(client).unwrap().shutdown();

    let values = last_values(&writer);
    assert_eq!(values.len(), (num_threads * iterations_per_thread) as usize);
    assert_eq!(values["thread.3.key.1999"], "1999|g");
}

#[test]
fn test_parallel_autoflush_shared_key() {
    let writer = Arc::new(CollectingWriter::default());
    let client = Arc::new(create_test_client(writer.clone(), true));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let client = Arc::clone(&client);
            thread::spawn(move || {
                for _ in 0..1_000 {
                    client.count("shared.counter", 1, 1.0);
                    client.timing("shared.timing", 3, 0.5);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    Arc::try_unwrap(client).unwrap().shutdown();

    let packets = writer.packets.lock().unwrap();
    assert!(!packets.is_empty());
    for packet in packets.iter() {
        for line in packet.split('\n') {
            assert!(
                line == "shared.counter:1|c" || line == "shared.timing:3|t|@0.500000",
                "unexpected line {line:?}"
            );
        }
    }
}
