// https://github.com/statsd/statsd/blob/master/docs/metric_types.md
mod buffer;
pub mod client;
pub mod encoder;
mod job;
pub mod macros;
mod sampler;
pub mod writer;

pub use buffer::{MetricBuffer, PACKET_DELIMITER};
pub use sampler::Sampler;
