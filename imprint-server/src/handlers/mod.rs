//! HTTP request handlers
//!
//! This module contains all the request handlers for the API endpoints.

pub mod claim;
pub mod content;
pub mod health;
pub mod lookup;
pub mod register;

pub use crate::state::AppState;
pub use claim::{claim_handler, ClaimRequest, NoMatchResponse, ResolvedResponse};
pub use content::content_handler;
pub use health::{health, ready, HealthResponse, ReadyResponse};
pub use lookup::{
    get_content_handler, list_contents_handler, notifications_handler, verify_handler,
    DeliveryResponse, ListContentsQuery, ListContentsResponse, NotificationsResponse,
    RecordResponse, VerifyRequest, VerifyResponse,
};
pub use register::{
    register_handler, AlreadyRegisteredResponse, MintedResponse, NotificationSummary,
    RegisterRequest,
};
