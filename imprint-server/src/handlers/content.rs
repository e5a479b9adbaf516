//! Operation dispatch handler
//!
//! Handles POST /content requests carrying a `mode` discriminator, so one
//! endpoint serves both registration and claims.

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Response,
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::claim::resolve_claim;
use super::register::register_content;
use crate::error::ApiError;
use crate::state::AppState;

/// Register or claim content, selected by `mode`
///
/// `{"mode": "register", ...}` behaves exactly like `POST /register` and
/// `{"mode": "claim", ...}` exactly like `POST /claim`. Any other or missing
/// mode is rejected.
#[utoipa::path(
    post,
    path = "/content",
    tag = "Registration",
    request_body(
        content = Object,
        description = "RegisterRequest or ClaimRequest fields plus `mode`: \"register\" | \"claim\""
    ),
    responses(
        (status = 201, description = "Fingerprint registered (mode = register)"),
        (status = 200, description = "Already registered, or claim resolved"),
        (status = 400, description = "Unknown mode, missing fields or malformed body")
    )
)]
pub async fn content_handler(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = payload?;

    let mode = body
        .get("mode")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    match mode.as_str() {
        "register" => register_content(&state, parse(body)?),
        "claim" => resolve_claim(&state, parse(body)?),
        _ => Err(ApiError::unknown_operation(mode)),
    }
}

fn parse<T: DeserializeOwned>(body: Value) -> Result<T, ApiError> {
    serde_json::from_value(body)
        .map_err(|e| ApiError::bad_request(format!("Invalid request body: {e}")))
}
