//! # statsd-gateway
//!
//! Relays metric submissions to a StatsD-compatible collector over UDP.
//!
//! The core is [`StatsdClient`]: it encodes count, gauge, timing and set
//! updates into the StatsD line protocol, applies sample rates, coalesces
//! updates per key until the next flush and writes packets from background
//! threads so that no caller ever waits on the network. With the default
//! `gateway` feature the crate also ships the HTTP front end that turns
//! form-encoded `POST`s into client calls.
//!
//! ## Quick Start
//!
//! ```no_run
//! use statsd_gateway::{count, gauge, MetricClientTrait, StatsdClient, StatsdClientOptions};
//!
//! let client = StatsdClient::new(StatsdClientOptions {
//!     host: "127.0.0.1".to_string(),
//!     port: 8125,
//!     stats_prefix: "myapp.".to_string(),
//!     ..Default::default()
//! });
//! client.open();
//!
//! client.count("request.count", 1, 1.0);
//! client.timing("request.latency", 42, 0.5);
//! gauge!(client, "connections.active", 100);
//! count!(client, "cache.miss");
//!
//! // one datagram: "myapp.request.count:1|c\nmyapp.request.latency:42|t|@0.500000\n..."
//! client.flush();
//! ```

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![warn(clippy::missing_errors_doc)]
#![warn(clippy::missing_panics_doc)]
#![allow(clippy::module_name_repetitions)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

mod error;
#[cfg(feature = "gateway")]
pub mod gateway;
mod statsd;

pub use error::MetricsError;
pub use statsd::client::{MetricClientTrait, StatsdClient, StatsdClientOptions};
pub use statsd::encoder::{encode, EncodedMetric, MetricKind, SampleRate};
pub use statsd::writer::{ClientState, TransportType, UdpSocketWriter, Writer};
pub use statsd::{MetricBuffer, Sampler, PACKET_DELIMITER};

/// Result type for transport operations.
///
/// Wraps errors that can occur while opening the transport or sending packets.
pub type MetricResult<T> = Result<T, MetricsError>;

type HashMap<K, V> = hashbrown::HashMap<K, V>;
