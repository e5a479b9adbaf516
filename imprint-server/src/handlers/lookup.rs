//! Lookup handlers
//!
//! Read-only views of the registry: exact-hash verification, listings and
//! per-record notification history.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use chrono::{DateTime, Utc};
use imprint_core::{ContentRecord, DeliveryStatus};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::ApiError;
use crate::state::AppState;
use crate::validation::null_as_empty;

/// Request to check whether exact content is registered
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct VerifyRequest {
    #[schema(example = "3a985da74fe225b2045c172d6bd390bd855f086e3e9d525b46bfe24511431532")]
    #[serde(deserialize_with = "null_as_empty")]
    pub exact_hash: String,
}

/// Response for an exact-hash lookup
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    /// Whether a record with this exact hash exists
    #[schema(example = true)]
    pub registered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "alice")]
    pub owner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = 1)]
    pub record_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "sunset.png")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, example = "2026-01-01T12:00:00Z")]
    pub registered_at: Option<DateTime<Utc>>,
}

/// A registered work as returned by lookups
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordResponse {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = "alice")]
    pub owner: String,
    pub exact_hash: String,
    pub perceptual_hash: String,
    #[schema(example = "sunset.png")]
    pub file_name: String,
    pub device_fingerprint: String,
    #[schema(example = "approved")]
    pub status: String,
    #[schema(value_type = String, example = "2026-01-01T12:00:00Z")]
    pub created_at: DateTime<Utc>,
}

impl From<ContentRecord> for RecordResponse {
    fn from(record: ContentRecord) -> Self {
        let status = serde_json::to_value(record.status)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default();

        Self {
            id: record.id,
            owner: record.owner,
            exact_hash: record.exact_hash,
            perceptual_hash: record.perceptual_hash,
            file_name: record.file_name,
            device_fingerprint: record.device_fingerprint,
            status,
            created_at: record.created_at,
        }
    }
}

/// Query parameters for listing records
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListContentsQuery {
    /// Registrant whose records to list
    pub owner: String,
}

/// Response for an owner listing
#[derive(Debug, Serialize, ToSchema)]
pub struct ListContentsResponse {
    #[schema(example = "alice")]
    pub owner: String,
    #[schema(example = 1)]
    pub count: usize,
    pub records: Vec<RecordResponse>,
}

/// One delivery attempt for a record
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryResponse {
    #[schema(example = "cardano-anchor")]
    pub notifier: String,
    #[schema(example = true)]
    pub delivered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "cardano-preprod")]
    pub network: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "cardano_tx_3a985da74fe225b2")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[schema(value_type = String, example = "2026-01-01T12:00:01Z")]
    pub attempted_at: DateTime<Utc>,
}

impl From<DeliveryStatus> for DeliveryResponse {
    fn from(status: DeliveryStatus) -> Self {
        let (network, reference, secondary_reference, message) = match status.receipt {
            Some(receipt) => (
                Some(receipt.network),
                Some(receipt.reference),
                receipt.secondary_reference,
                Some(receipt.message),
            ),
            None => (None, None, None, None),
        };

        Self {
            notifier: status.notifier,
            delivered: status.delivered,
            network,
            reference,
            secondary_reference,
            message,
            error: status.error,
            attempted_at: status.attempted_at,
        }
    }
}

/// Response listing a record's notification deliveries
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationsResponse {
    #[schema(example = 1)]
    pub record_id: u64,
    pub deliveries: Vec<DeliveryResponse>,
}

/// Check whether exact content is registered
#[utoipa::path(
    post,
    path = "/verify",
    tag = "Lookup",
    request_body = VerifyRequest,
    responses(
        (status = 200, description = "Lookup completed", body = VerifyResponse),
        (status = 400, description = "Missing exactHash or malformed body")
    )
)]
pub async fn verify_handler(
    State(state): State<AppState>,
    payload: Result<Json<VerifyRequest>, JsonRejection>,
) -> Result<Json<VerifyResponse>, ApiError> {
    let Json(request) = payload?;

    if request.exact_hash.trim().is_empty() {
        return Err(ApiError::missing_fields(["exactHash"]));
    }

    let response = match state.registry.lookup(&request.exact_hash) {
        Some(record) => VerifyResponse {
            registered: true,
            owner: Some(record.owner),
            record_id: Some(record.id),
            file_name: Some(record.file_name),
            registered_at: Some(record.created_at),
        },
        None => VerifyResponse {
            registered: false,
            owner: None,
            record_id: None,
            file_name: None,
            registered_at: None,
        },
    };

    Ok(Json(response))
}

/// List the records registered by one owner
#[utoipa::path(
    get,
    path = "/contents",
    tag = "Lookup",
    params(ListContentsQuery),
    responses(
        (status = 200, description = "Records in registration order", body = ListContentsResponse),
        (status = 400, description = "Missing owner parameter")
    )
)]
pub async fn list_contents_handler(
    State(state): State<AppState>,
    query: Result<Query<ListContentsQuery>, QueryRejection>,
) -> Result<Json<ListContentsResponse>, ApiError> {
    let owner = query
        .ok()
        .map(|Query(q)| q.owner)
        .filter(|owner| !owner.trim().is_empty())
        .ok_or_else(|| ApiError::missing_fields(["owner"]))?;

    let records: Vec<RecordResponse> = state
        .registry
        .records_for_owner(&owner)
        .into_iter()
        .map(RecordResponse::from)
        .collect();

    Ok(Json(ListContentsResponse {
        owner,
        count: records.len(),
        records,
    }))
}

/// Fetch one record by id
#[utoipa::path(
    get,
    path = "/contents/{id}",
    tag = "Lookup",
    params(("id" = u64, Path, description = "Record id")),
    responses(
        (status = 200, description = "Record found", body = RecordResponse),
        (status = 404, description = "No record with this id")
    )
)]
pub async fn get_content_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<RecordResponse>, ApiError> {
    state
        .registry
        .get(id)
        .map(|record| Json(record.into()))
        .ok_or_else(|| ApiError::not_found(format!("Record {id} not found")))
}

/// Downstream notification history of a record
#[utoipa::path(
    get,
    path = "/contents/{id}/notifications",
    tag = "Lookup",
    params(("id" = u64, Path, description = "Record id")),
    responses(
        (status = 200, description = "Deliveries in arrival order", body = NotificationsResponse),
        (status = 404, description = "No record with this id")
    )
)]
pub async fn notifications_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<NotificationsResponse>, ApiError> {
    if state.registry.get(id).is_none() {
        return Err(ApiError::not_found(format!("Record {id} not found")));
    }

    let deliveries = state
        .registry
        .deliveries(id)
        .into_iter()
        .map(DeliveryResponse::from)
        .collect();

    Ok(Json(NotificationsResponse {
        record_id: id,
        deliveries,
    }))
}
