use std::sync::Arc;
use std::time::Instant;

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use serde_json::Value;
use tracing::{debug, warn};

use crate::audit::AuditEvent;
use crate::error::AppError;
use crate::metrics::{SIGNUP_LATENCY, SIGNUP_REQUESTS, SIGNUPS_ACCEPTED, SIGNUPS_INVALID, SIGNUPS_RATE_LIMITED};
use crate::models::SignupResponse;
use crate::state::AppState;
use crate::validation::{client_id, is_valid_email};

// A `null` body carries no fields; report it like a parse failure
fn extract_email(payload: &Value) -> Result<&str, AppError> {
    if payload.is_null() {
        return Err(AppError::Internal("request body is null".to_string()));
    }

    let email = match payload.get("email").and_then(Value::as_str) {
        Some(email) if !email.is_empty() => email,
        _ => return Err(AppError::Validation("Email is required")),
    };

    if !is_valid_email(email) {
        return Err(AppError::Validation("Invalid email format"));
    }

    Ok(email)
}

// Beta signup intake. The rate limit is checked before the body is read.
pub async fn signup_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<SignupResponse>, AppError> {
    SIGNUP_REQUESTS.inc();
    let start_time = Instant::now();

    let client_id = client_id(&headers);
    let now_ms = state.clock.now_ms();

    if !state.limiter.check_and_record(&client_id, now_ms).await {
        SIGNUPS_RATE_LIMITED.inc();
        warn!(client_id = %client_id, "Signup rate limit exceeded");
        return Err(AppError::RateLimited);
    }

    let payload: Value = serde_json::from_slice(&body)?;
    let email = extract_email(&payload).inspect_err(|e| {
        if let AppError::Validation(reason) = e {
            SIGNUPS_INVALID.inc();
            debug!(client_id = %client_id, reason, "Signup rejected");
        }
    })?;

    state.audit.record(AuditEvent {
        email: email.to_string(),
        client_id,
        timestamp: state.clock.now(),
    });

    SIGNUPS_ACCEPTED.inc();
    SIGNUP_LATENCY.observe(start_time.elapsed().as_secs_f64());

    Ok(Json(SignupResponse::accepted()))
}

pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
