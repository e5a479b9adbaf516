//! Claim handler
//!
//! Handles POST /claim requests to resolve ownership disputes.

use axum::{
    extract::{rejection::JsonRejection, State},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use imprint_core::ClaimOutcome;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::state::AppState;
use crate::validation::{null_as_empty, validate_claim};

/// Request to resolve who registered a work first.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ClaimRequest {
    /// Identity asserting ownership
    #[schema(example = "bob")]
    #[serde(deserialize_with = "null_as_empty")]
    pub claimant: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub exact_hash: String,
    #[schema(example = "0110100111010011")]
    #[serde(deserialize_with = "null_as_empty")]
    pub perceptual_hash: String,
    #[schema(example = "sunset-copy.jpg")]
    #[serde(deserialize_with = "null_as_empty")]
    pub file_name: String,
    /// Free-form claim category, echoed back (default "unspecified")
    #[schema(example = "copyright")]
    pub claim_type: Option<String>,
    /// Number of supporting documents, echoed back (default 0)
    #[schema(example = 2)]
    pub evidence_count: Option<u32>,
}

/// Response when nothing on record is close to the claimed content
#[derive(Debug, Serialize, ToSchema)]
pub struct NoMatchResponse {
    #[schema(example = "no_match")]
    pub status: &'static str,
    pub message: String,
}

/// Response naming the presumed original owner
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedResponse {
    #[schema(example = "resolved")]
    pub status: &'static str,
    #[schema(example = "alice")]
    pub original_owner: String,
    #[schema(example = "bob")]
    pub claimant: String,
    /// Whether the claimant is the registrant on record
    #[schema(example = false)]
    pub same_user: bool,
    #[schema(example = 1)]
    pub matched_id: u64,
    #[schema(example = "sunset.png")]
    pub matched_file: String,
    #[schema(example = 3)]
    pub distance: u32,
    #[schema(value_type = String, example = "2026-01-01T12:00:00Z")]
    pub registered_at: DateTime<Utc>,
    #[schema(example = "copyright")]
    pub claim_type: String,
    #[schema(example = 2)]
    pub evidence_count: u32,
    pub message: String,
}

/// Resolve an ownership claim
///
/// Advisory and read-only: ranks registered works within the similarity
/// threshold by distance, then registration time, and names the best
/// candidate's registrant.
#[utoipa::path(
    post,
    path = "/claim",
    tag = "Claims",
    request_body = ClaimRequest,
    responses(
        (status = 200, description = "Claim resolved; `status` is \"no_match\" (NoMatchResponse) when nothing is close", body = ResolvedResponse),
        (status = 400, description = "Missing fields or malformed body")
    )
)]
pub async fn claim_handler(
    State(state): State<AppState>,
    payload: Result<Json<ClaimRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload?;
    resolve_claim(&state, request)
}

/// Shared by `/claim` and `/content` with `mode = "claim"`.
pub(crate) fn resolve_claim(state: &AppState, request: ClaimRequest) -> Result<Response, ApiError> {
    let claim = validate_claim(request)?;
    let outcome = state.registry.resolve_claim(claim)?;
    let message = outcome.message();

    let response = match outcome {
        ClaimOutcome::NoMatch => Json(NoMatchResponse {
            status: "no_match",
            message,
        })
        .into_response(),
        ClaimOutcome::Resolved(verdict) => Json(ResolvedResponse {
            status: "resolved",
            original_owner: verdict.original_owner,
            claimant: verdict.claimant,
            same_user: verdict.same_user,
            matched_id: verdict.matched_id,
            matched_file: verdict.matched_file,
            distance: verdict.distance,
            registered_at: verdict.registered_at,
            claim_type: verdict.claim_type,
            evidence_count: verdict.evidence_count,
            message,
        })
        .into_response(),
    };

    Ok(response)
}
