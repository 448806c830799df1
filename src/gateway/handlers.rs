use std::str::FromStr;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Form;
use tracing::warn;

use super::config::InvalidInputPolicy;
use super::error::GatewayError;
use super::GatewayState;
use crate::MetricClientTrait;

type RawForm = Form<Vec<(String, String)>>;

/// Form-encoded request body, kept as ordered name/value pairs.
///
/// Repeated names are legal on the wire; the first occurrence wins.
#[derive(Debug, Default)]
struct FormFields(Vec<(String, String)>);

impl FormFields {
    // Bodies that are not form-encoded carry no fields.
    fn from_body(form: Option<RawForm>) -> Self {
        Self(form.map(|Form(pairs)| pairs).unwrap_or_default())
    }

    fn first(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value.as_str())
    }
}

// Absent and empty fields fall back to `default`; `None` means malformed.
fn optional_field<T: FromStr>(raw: Option<&str>, default: T) -> Option<T> {
    match raw {
        None | Some("") => Some(default),
        Some(raw) => raw.parse().ok(),
    }
}

fn required_field<T: FromStr>(raw: Option<&str>) -> Option<T> {
    raw.filter(|raw| !raw.is_empty())?.parse().ok()
}

/// Remembers the first malformed field of a request while the rest is parsed.
#[derive(Debug, Default)]
struct FieldErrors {
    first: Option<&'static str>,
}

impl FieldErrors {
    fn check<T: Default>(&mut self, parsed: Option<T>, message: &'static str) -> T {
        parsed.unwrap_or_else(|| {
            warn!("{message}");
            self.first.get_or_insert(message);
            T::default()
        })
    }

    /// Calls the client unless the policy says a malformed request stops here.
    fn forward(
        self,
        policy: InvalidInputPolicy,
        client: &dyn MetricClientTrait,
        call: impl FnOnce(&dyn MetricClientTrait),
    ) -> Result<StatusCode, GatewayError> {
        let Some(message) = self.first else {
            call(client);
            return Ok(StatusCode::OK);
        };
        if policy == InvalidInputPolicy::ForwardDefault {
            call(client);
        }
        Err(GatewayError::BadRequest(message))
    }
}

pub async fn heartbeat() -> &'static str {
    "OK"
}

pub async fn count(
    State(state): State<GatewayState>,
    Path(key): Path<String>,
    form: Option<RawForm>,
) -> Result<StatusCode, GatewayError> {
    let form = FormFields::from_body(form);
    let mut errors = FieldErrors::default();
    let delta = errors.check(
        optional_field(form.first("delta"), 1_i64),
        "Invalid delta specified",
    );
    let sample_rate = errors.check(
        optional_field(form.first("sampleRate"), 1.0_f32),
        "Invalid sample rate specified",
    );

    errors.forward(state.invalid_input, state.client.as_ref(), |client| {
        client.count(&key, delta, sample_rate);
    })
}

pub async fn gauge(
    State(state): State<GatewayState>,
    Path(key): Path<String>,
    form: Option<RawForm>,
) -> Result<StatusCode, GatewayError> {
    let form = FormFields::from_body(form);
    let mut errors = FieldErrors::default();
    let value = errors.check(
        optional_field(form.first("value"), 1_i64),
        "Invalid value specified",
    );

    errors.forward(state.invalid_input, state.client.as_ref(), |client| {
        client.gauge(&key, value);
    })
}

pub async fn timing(
    State(state): State<GatewayState>,
    Path(key): Path<String>,
    form: Option<RawForm>,
) -> Result<StatusCode, GatewayError> {
    let form = FormFields::from_body(form);
    let mut errors = FieldErrors::default();
    let millis = errors.check(
        required_field::<i64>(form.first("time")),
        "Invalid time specified",
    );
    let sample_rate = errors.check(
        optional_field(form.first("sampleRate"), 1.0_f32),
        "Invalid sample rate specified",
    );

    errors.forward(state.invalid_input, state.client.as_ref(), |client| {
        client.timing(&key, millis, sample_rate);
    })
}

pub async fn set(
    State(state): State<GatewayState>,
    Path(key): Path<String>,
    form: Option<RawForm>,
) -> Result<StatusCode, GatewayError> {
    let form = FormFields::from_body(form);
    let mut errors = FieldErrors::default();
    let value = errors.check(
        optional_field(form.first("value"), 1_i64),
        "Invalid value specified",
    );

    errors.forward(state.invalid_input, state.client.as_ref(), |client| {
        client.set(&key, value);
    })
}
