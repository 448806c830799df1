#![no_main]

use libfuzzer_sys::fuzz_target;
use statsd_gateway::{encode, MetricKind, SampleRate};

// Fuzz target focusing on numeric edge cases of the wire encoding
fuzz_target!(|data: &[u8]| {
    if data.len() < 12 {
        return;
    }

    let value = i64::from_le_bytes([
        data[0], data[1], data[2], data[3],
        data[4], data[5], data[6], data[7],
    ]);
    let rate = f32::from_le_bytes([data[8], data[9], data[10], data[11]]);

    for kind in [MetricKind::Count, MetricKind::Gauge, MetricKind::Timing, MetricKind::Set] {
        let plain = encode(kind, value);
        let (number, tag) = plain.as_str().split_once('|').unwrap();
        assert_eq!(number.parse::<i64>().unwrap(), value);
        assert_eq!(tag, kind.wire_tag());

        let rate = SampleRate::new(rate);
        let sampled = encode(kind, value).with_sample_rate(rate);
        if rate.is_always() {
            assert_eq!(sampled.as_str(), plain.as_str());
        } else {
            let suffix = sampled.as_str().rsplit_once("|@").unwrap().1;
            assert!(suffix.parse::<f32>().is_ok());
        }
    }
});
