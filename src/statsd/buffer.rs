use std::mem;

use parking_lot::Mutex;

use super::encoder::EncodedMetric;
use crate::HashMap;

/// Separator between entries of one flushed datagram.
pub const PACKET_DELIMITER: char = '\n';

/// Coalescing store of pending metric updates, keyed by metric name.
///
/// Holds at most one entry per key: a later `put` for the same key replaces
/// the earlier value (last write wins). `drain_all` swaps the whole map out
/// under the lock and serializes the packet after releasing it, so writers
/// are never blocked by packet construction.
#[derive(Debug, Default)]
pub struct MetricBuffer {
    entries: Mutex<HashMap<String, EncodedMetric>>,
}

impl MetricBuffer {
    /// Creates an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Upserts the pending value for `key`.
    pub fn put(&self, key: &str, metric: EncodedMetric) {
        let mut entries = self.entries.lock();
        if let Some(slot) = entries.get_mut(key) {
            *slot = metric;
        } else {
            entries.insert(key.to_owned(), metric);
        }
    }

    /// Takes every pending entry and builds one packet from them.
    ///
    /// Each entry becomes `"<prefix><key>:<metric>"`; entries are joined by
    /// [`PACKET_DELIMITER`] in unspecified order. Returns `None` when nothing
    /// was pending.
    pub fn drain_all(&self, prefix: &str) -> Option<String> {
        let snapshot = {
            let mut entries = self.entries.lock();
            if entries.is_empty() {
                return None;
            }
            mem::take(&mut *entries)
        };

        let packet_len = snapshot
            .iter()
            .map(|(key, metric)| prefix.len() + key.len() + 1 + metric.len())
            .sum::<usize>()
            + snapshot.len()
            - 1;

        let mut packet = String::with_capacity(packet_len);
        for (key, metric) in &snapshot {
            if !packet.is_empty() {
                packet.push(PACKET_DELIMITER);
            }
            packet.push_str(prefix);
            packet.push_str(key);
            packet.push(':');
            packet.push_str(metric.as_str());
        }
        Some(packet)
    }

    /// Number of distinct keys pending.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
