use thiserror::Error;

/// Errors that can occur while opening the transport or shipping packets.
///
/// Metric calls never return these. They are logged where they happen and
/// only surface through [`StatsdClient::try_open`](crate::StatsdClient::try_open).
#[derive(Error, Debug)]
pub enum MetricsError {
    /// A custom error with a free-form message.
    #[error("Custom error: {0}")]
    Custom(String),

    /// An I/O error from the standard library.
    #[error("Std Io error: {0}")]
    StdIo(#[from] std::io::Error),

    /// The collector address resolved to nothing.
    #[error("No address resolved for {0}")]
    Unresolved(String),

    /// A send was attempted while no socket is installed.
    #[error("Transport is {0}")]
    TransportUnavailable(&'static str),

    /// The flush job is gone and cannot take more packets.
    #[error("Flush queue is closed")]
    QueueClosed,
}

impl From<String> for MetricsError {
    fn from(value: String) -> Self {
        Self::Custom(value)
    }
}

impl From<&str> for MetricsError {
    fn from(value: &str) -> Self {
        Self::Custom(value.to_string())
    }
}
