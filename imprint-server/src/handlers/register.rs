//! Registration handler
//!
//! Handles POST /register requests to register a content fingerprint.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use imprint_core::{DispatchStatus, MatchKind, RegistrationOutcome};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::state::AppState;
use crate::validation::{null_as_empty, validate_registration};

/// Request to register a work.
///
/// Missing or null fields deserialize as empty strings so that every absent field is
/// reported in a single validation error.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterRequest {
    /// Registrant identifier
    #[schema(example = "alice")]
    #[serde(deserialize_with = "null_as_empty")]
    pub owner: String,
    /// SHA3-256 of the file bytes, hex-encoded
    #[schema(example = "3a985da74fe225b2045c172d6bd390bd855f086e3e9d525b46bfe24511431532")]
    #[serde(deserialize_with = "null_as_empty")]
    pub exact_hash: String,
    /// Perceptual hash as a bit string
    #[schema(example = "0110100111010010")]
    #[serde(deserialize_with = "null_as_empty")]
    pub perceptual_hash: String,
    #[schema(example = "sunset.png")]
    #[serde(deserialize_with = "null_as_empty")]
    pub file_name: String,
    /// Audit-only device identifier
    #[schema(example = "TW96aWxsYS81LjAgKFgxMTsgTGludXgg")]
    #[serde(deserialize_with = "null_as_empty")]
    pub device_fingerprint: String,
    /// One-time verification code; checked for presence only
    #[schema(example = "482913")]
    #[serde(deserialize_with = "null_as_empty")]
    pub verification_code: String,
}

/// Downstream notification state of a minted record
#[derive(Debug, Serialize, ToSchema)]
pub struct NotificationSummary {
    /// "scheduled", "disabled" or "no_runtime"
    #[schema(example = "scheduled")]
    pub state: &'static str,
    /// Notifiers the record was sent to
    #[schema(example = json!(["cardano-anchor", "polygon-mint"]))]
    pub notifiers: Vec<String>,
}

/// Response for a newly registered work (201)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MintedResponse {
    #[schema(example = "minted")]
    pub status: &'static str,
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = "alice")]
    pub owner: String,
    pub exact_hash: String,
    pub perceptual_hash: String,
    #[schema(example = "sunset.png")]
    pub file_name: String,
    #[schema(value_type = String, example = "2026-01-01T12:00:00Z")]
    pub created_at: DateTime<Utc>,
    #[schema(example = "Fingerprint is unique. Ready to mint & anchor.")]
    pub message: String,
    pub notifications: NotificationSummary,
}

/// Response when the content, or a near-duplicate, is already registered (200)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AlreadyRegisteredResponse {
    #[schema(example = "already_registered")]
    pub status: &'static str,
    /// Owner of the prior registration
    #[schema(example = "alice")]
    pub owner: String,
    #[schema(example = 1)]
    pub matched_id: u64,
    #[schema(example = "sunset.png")]
    pub matched_file: String,
    /// Hamming distance, present for perceptual matches
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = 4)]
    pub distance: Option<u32>,
    /// "exact" or "perceptual"
    #[schema(example = "perceptual")]
    pub match_kind: &'static str,
    #[schema(value_type = String, example = "2026-01-01T12:00:00Z")]
    pub registered_at: DateTime<Utc>,
    pub message: String,
}

/// Register a content fingerprint
///
/// First registration wins. A submission whose exact hash is already on
/// record, or whose perceptual hash is within the similarity threshold of a
/// registered work, is reported as already registered and not stored.
#[utoipa::path(
    post,
    path = "/register",
    tag = "Registration",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Fingerprint registered", body = MintedResponse),
        (status = 200, description = "Content already registered", body = AlreadyRegisteredResponse),
        (status = 400, description = "Missing fields or malformed body")
    )
)]
pub async fn register_handler(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload?;
    register_content(&state, request)
}

/// Shared by `/register` and `/content` with `mode = "register"`.
pub(crate) fn register_content(
    state: &AppState,
    request: RegisterRequest,
) -> Result<Response, ApiError> {
    let submission = validate_registration(request)?;
    let report = state.registry.register(submission)?;
    let message = report.outcome.message();

    let response = match report.outcome {
        RegistrationOutcome::Minted { record } => {
            let notifications = notification_summary(state, report.dispatch);
            let body = MintedResponse {
                status: "minted",
                id: record.id,
                owner: record.owner,
                exact_hash: record.exact_hash,
                perceptual_hash: record.perceptual_hash,
                file_name: record.file_name,
                created_at: record.created_at,
                message,
                notifications,
            };
            (StatusCode::CREATED, Json(body)).into_response()
        }
        RegistrationOutcome::AlreadyRegistered {
            matched,
            kind,
            distance,
        } => {
            let body = AlreadyRegisteredResponse {
                status: "already_registered",
                owner: matched.owner,
                matched_id: matched.id,
                matched_file: matched.file_name,
                distance,
                match_kind: match kind {
                    MatchKind::Exact => "exact",
                    MatchKind::Perceptual => "perceptual",
                },
                registered_at: matched.created_at,
                message,
            };
            (StatusCode::OK, Json(body)).into_response()
        }
    };

    Ok(response)
}

fn notification_summary(state: &AppState, dispatch: Option<DispatchStatus>) -> NotificationSummary {
    match dispatch {
        Some(DispatchStatus::Scheduled { .. }) => NotificationSummary {
            state: "scheduled",
            notifiers: state.registry.notifier_names(),
        },
        Some(DispatchStatus::NoRuntime) => NotificationSummary {
            state: "no_runtime",
            notifiers: Vec::new(),
        },
        Some(DispatchStatus::Disabled) | None => NotificationSummary {
            state: "disabled",
            notifiers: Vec::new(),
        },
    }
}
