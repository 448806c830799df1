use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Request failures the gateway reports to its HTTP callers.
///
/// Collector problems never show up here: metric delivery is best-effort.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// A form field could not be parsed.
    #[error("{0}")]
    BadRequest(&'static str),

    /// A secret is configured but the request carries no token.
    #[error("Token not specified")]
    MissingToken,

    /// The token is malformed, expired or signed with another key.
    #[error("Error parsing token")]
    InvalidToken,
}

impl GatewayError {
    /// HTTP status answered for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::MissingToken => StatusCode::UNAUTHORIZED,
            Self::InvalidToken => StatusCode::FORBIDDEN,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}
