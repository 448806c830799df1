//! HTTP front end translating form-encoded requests into client calls.
//!
//! | Method | Path | Form fields | Client call |
//! |---|---|---|---|
//! | GET | `/heartbeat` | | none, answers `OK` |
//! | POST | `/count/{key}` | `delta` (default 1), `sampleRate` (default 1) | [`count`](crate::MetricClientTrait::count) |
//! | POST | `/gauge/{key}` | `value` (default 1) | [`gauge`](crate::MetricClientTrait::gauge) |
//! | POST | `/timing/{key}` | `time` (required), `sampleRate` (default 1) | [`timing`](crate::MetricClientTrait::timing) |
//! | POST | `/set/{key}` | `value` (default 1) | [`set`](crate::MetricClientTrait::set) |
//!
//! Metric routes sit behind the `X-JWT-Token` gate when a secret is
//! configured. Every route reflects CORS headers for requests carrying an
//! `Origin`.

use std::future::Future;
use std::sync::Arc;

use axum::extract::Request;
use axum::http::{header, HeaderName, HeaderValue, Method};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower::{Layer as _, ServiceBuilder};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
mod handlers;
pub mod logging;

pub use auth::{TokenVerifier, JWT_HEADER};
pub use config::{GatewayConfig, InvalidInputPolicy};
pub use error::GatewayError;

use crate::MetricClientTrait;

/// State shared by every request handler.
#[derive(Clone)]
pub struct GatewayState {
    client: Arc<dyn MetricClientTrait>,
    verifier: Option<Arc<TokenVerifier>>,
    invalid_input: InvalidInputPolicy,
}

impl GatewayState {
    /// Builds the state from a client and the gateway configuration.
    #[must_use]
    pub fn new(client: Arc<dyn MetricClientTrait>, config: &GatewayConfig) -> Self {
        let verifier = config
            .jwt_secret
            .as_deref()
            .filter(|secret| !secret.is_empty())
            .map(|secret| Arc::new(TokenVerifier::new(secret)));

        Self {
            client,
            verifier,
            invalid_input: config.invalid_input,
        }
    }
}

impl std::fmt::Debug for GatewayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayState")
            .field("jwt", &self.verifier.is_some())
            .field("invalid_input", &self.invalid_input)
            .finish_non_exhaustive()
    }
}

const ALLOWED_METHODS: [Method; 4] = [Method::GET, Method::POST, Method::HEAD, Method::OPTIONS];

fn allowed_headers() -> [HeaderName; 6] {
    [
        HeaderName::from_static("x-requested-with"),
        header::ORIGIN,
        header::ACCEPT,
        header::CONTENT_TYPE,
        HeaderName::from_static("authentication"),
        HeaderName::from_static(JWT_HEADER),
    ]
}

// Joined the same way `CorsLayer` writes them on preflight.
fn joined<T: AsRef<str>>(items: impl IntoIterator<Item = T>) -> HeaderValue {
    let list = items
        .into_iter()
        .map(|item| item.as_ref().to_owned())
        .collect::<Vec<_>>()
        .join(",");
    HeaderValue::from_str(&list).unwrap_or_else(|_| HeaderValue::from_static(""))
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(ALLOWED_METHODS)
        .allow_headers(allowed_headers())
        .expose_headers([HeaderName::from_static("x-sentry-error"), header::RETRY_AFTER])
}

/// `CorsLayer` lists allowed headers and methods on preflight only; every
/// other response to a request with an `Origin` carries them too.
async fn cors_allow_lists(request: Request, next: Next) -> Response {
    let has_origin = request.headers().contains_key(header::ORIGIN);
    let mut response = next.run(request).await;
    if has_origin {
        let headers = response.headers_mut();
        headers
            .entry(header::ACCESS_CONTROL_ALLOW_HEADERS)
            .or_insert_with(|| joined(allowed_headers()));
        headers
            .entry(header::ACCESS_CONTROL_ALLOW_METHODS)
            .or_insert_with(|| joined(ALLOWED_METHODS.iter().map(Method::as_str)));
    }
    response
}

/// Creates the gateway router.
#[must_use]
pub fn create_router(client: Arc<dyn MetricClientTrait>, config: &GatewayConfig) -> Router {
    let state = GatewayState::new(client, config);

    let metrics = Router::new()
        .route("/count/:key", post(handlers::count))
        .route("/gauge/:key", post(handlers::gauge))
        .route("/timing/:key", post(handlers::timing))
        .route("/set/:key", post(handlers::set))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_token,
        ));

    Router::new()
        .route("/heartbeat", get(handlers::heartbeat))
        .merge(metrics)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(config.request_timeout))
                .layer(middleware::from_fn(cors_allow_lists))
                .layer(cors_layer()),
        )
        .with_state(state)
}

/// Router wrapped so that `/count/x/` routes like `/count/x`.
#[must_use]
pub fn create_app(
    client: Arc<dyn MetricClientTrait>,
    config: &GatewayConfig,
) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(create_router(client, config))
}

/// Serves the gateway on `listener` until `shutdown` resolves.
///
/// # Errors
/// Returns the listener's I/O error.
pub async fn serve(
    listener: TcpListener,
    client: Arc<dyn MetricClientTrait>,
    config: &GatewayConfig,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let app = create_app(client, config);
    axum::serve(
        listener,
        axum::ServiceExt::<axum::extract::Request>::into_make_service(app),
    )
    .with_graceful_shutdown(shutdown)
    .await
}
