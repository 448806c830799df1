use std::collections::HashMap;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde_json::Value;
use tracing::debug;

use super::error::GatewayError;
use super::GatewayState;

/// Header carrying the signed token.
pub const JWT_HEADER: &str = "x-jwt-token";

/// Checks HMAC-signed tokens against the shared secret.
///
/// Any of HS256, HS384 and HS512 is accepted. No claim is required;
/// `exp` and `nbf` are enforced when the token carries them.
#[derive(Clone)]
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    /// Creates a verifier for `secret`.
    #[must_use]
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        validation.required_spec_claims.clear();
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.validate_aud = false;

        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Verifies signature and time claims of `token`.
    ///
    /// # Errors
    /// Returns the decoding failure.
    pub fn verify(&self, token: &str) -> Result<(), jsonwebtoken::errors::Error> {
        decode::<HashMap<String, Value>>(token, &self.key, &self.validation).map(|_| ())
    }
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("algorithms", &self.validation.algorithms)
            .finish_non_exhaustive()
    }
}

/// Middleware gating the metric routes behind [`TokenVerifier`].
///
/// Without a configured secret every request passes.
pub async fn require_token(
    State(state): State<GatewayState>,
    request: Request,
    next: Next,
) -> Result<Response, GatewayError> {
    let Some(verifier) = state.verifier.as_deref() else {
        return Ok(next.run(request).await);
    };

    let header = request
        .headers()
        .get(JWT_HEADER)
        .filter(|value| !value.is_empty())
        .ok_or(GatewayError::MissingToken)?;
    let token = header.to_str().map_err(|_| GatewayError::InvalidToken)?;

    verifier.verify(token).map_err(|err| {
        debug!("Rejected token: {err}");
        GatewayError::InvalidToken
    })?;

    Ok(next.run(request).await)
}
