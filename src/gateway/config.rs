use std::time::Duration;

use clap::ValueEnum;

/// What the gateway does after answering 400 for a malformed form field.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum InvalidInputPolicy {
    /// Stop there; the client is not called.
    #[default]
    Reject,
    /// Still call the client, with zero in place of every malformed field.
    ForwardDefault,
}

/// Configuration of the HTTP front end.
#[derive(Clone, Debug)]
pub struct GatewayConfig {
    /// Address the HTTP listener binds to.
    pub listen_host: String,
    /// Port the HTTP listener binds to.
    pub listen_port: u16,
    /// Shared HMAC secret for `X-JWT-Token`. `None` lets every request through.
    pub jwt_secret: Option<String>,
    /// Handling of malformed numeric fields.
    pub invalid_input: InvalidInputPolicy,
    /// Upper bound on the time spent serving one request.
    pub request_timeout: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listen_host: "127.0.0.1".to_string(),
            listen_port: 80,
            jwt_secret: None,
            invalid_input: InvalidInputPolicy::Reject,
            request_timeout: Duration::from_secs(1),
        }
    }
}

impl GatewayConfig {
    /// `host:port` for the HTTP listener.
    #[must_use]
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.listen_host, self.listen_port)
    }
}
