use std::sync::Arc;
use std::thread::{Builder, JoinHandle};
use std::time::Duration;

use crossbeam::channel::{never, tick, Receiver};
use crossbeam::select;
use tracing::{debug, error, trace};

use super::buffer::MetricBuffer;
use super::writer::Transport;

/// State shared between the client handle and its flush workers.
pub struct FlushShared {
    pub buffer: MetricBuffer,
    pub transport: Transport,
    pub stats_prefix: String,
}

impl FlushShared {
    fn flush_now(&self) {
        if let Some(packet) = self.buffer.drain_all(&self.stats_prefix) {
            self.send(&packet);
        }
    }

    fn send(&self, packet: &str) {
        let written = self.transport.send(packet.as_bytes());
        trace!("flushed {written} bytes to {}", self.transport.endpoint());
    }
}

struct FlushWorker {
    id: usize,
    shared: Arc<FlushShared>,
    packets: Receiver<String>,
    ticker: Receiver<std::time::Instant>,
}

impl FlushWorker {
    fn run(self) {
        loop {
            select! {
                recv(self.packets) -> packet => match packet {
                    Ok(packet) => self.shared.send(&packet),
                    // every sender is gone, the client is shutting down
                    Err(_) => break,
                },
                recv(self.ticker) -> _ => self.shared.flush_now(),
            }
        }

        // packets queued before the disconnect were already received above
        if self.id == 0 {
            self.shared.flush_now();
        }
        debug!("flush worker {} stopped", self.id);
    }
}

/// Spawns `workers` threads that write queued packets to the transport.
///
/// Worker 0 also drains the buffer every `flush_interval`, when one is set,
/// and once more after the packet channel closes.
pub fn initialize_job(
    workers: usize,
    flush_interval: Option<Duration>,
    receiver: &Receiver<String>,
    shared: &Arc<FlushShared>,
) -> Vec<JoinHandle<()>> {
    (0..workers.max(1))
        .filter_map(|id| {
            let ticker = match (id, flush_interval) {
                (0, Some(interval)) if !interval.is_zero() => tick(interval),
                _ => never(),
            };
            let worker = FlushWorker {
                id,
                shared: Arc::clone(shared),
                packets: receiver.clone(),
                ticker,
            };
            Builder::new()
                .name(format!("statsd-flush-{id}"))
                .spawn(move || worker.run())
                .map_err(|err| error!("Failed to spawn flush worker {id}: {err}"))
                .ok()
        })
        .collect()
}
