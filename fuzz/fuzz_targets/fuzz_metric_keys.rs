#![no_main]

use libfuzzer_sys::fuzz_target;
use statsd_gateway::{
    MetricClientTrait, StatsdClient, StatsdClientOptions, TransportType, Writer,
};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct CollectingWriter {
    packets: Mutex<Vec<Vec<u8>>>,
}

impl Writer for CollectingWriter {
    fn write(&self, buf: &[u8]) -> std::io::Result<usize> {
        self.packets.lock().unwrap().push(buf.to_vec());
        Ok(buf.len())
    }
}

// Arbitrary keys and prefixes must never panic and always produce one packet
fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let (prefix, keys) = text.split_once('\0').unwrap_or(("", text));

    let writer = Arc::new(CollectingWriter::default());
    let client = StatsdClient::new(StatsdClientOptions {
        stats_prefix: prefix.to_string(),
        sampler_seed: Some(0),
        transport_type: TransportType::Custom(writer.clone()),
        ..Default::default()
    });
    client.open();

    for key in keys.split('\u{1}') {
        client.gauge(key, 1);
    }
    client.flush();
    client.shutdown();

    // split always yields at least one key, so exactly one packet left
    let packets = writer.packets.lock().unwrap();
    assert_eq!(packets.len(), 1);
    let packet = String::from_utf8(packets[0].clone()).unwrap();
    assert!(packet.starts_with(prefix));
    assert!(packet.ends_with(":1|g"));
});
