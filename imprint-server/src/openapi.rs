//! OpenAPI documentation configuration
//!
//! Generates the OpenAPI 3.0 document for the Imprint registry API.

use utoipa::OpenApi;

use crate::handlers::{
    AlreadyRegisteredResponse, ClaimRequest, DeliveryResponse, HealthResponse,
    ListContentsResponse, MintedResponse, NoMatchResponse, NotificationSummary,
    NotificationsResponse, ReadyResponse, RecordResponse, RegisterRequest, ResolvedResponse,
    VerifyRequest, VerifyResponse,
};

/// Imprint registry API - OpenAPI Documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Imprint - Content Registry API",
        version = "0.1.0",
        description = r#"
## First-Come Content Fingerprint Registry

Imprint records who registered a piece of content first and answers
ownership disputes. Every work is identified by two fingerprints:

- **Exact hash** - SHA3-256 of the original bytes
- **Perceptual hash** - bit string compared by Hamming distance, so
  re-encoded or resized copies still match

### How It Works

1. **Register** a work via `POST /register`; the first registrant wins
2. Exact copies and near-duplicates of a registered work are reported as
   already registered and never stored
3. **Claim** a work via `POST /claim` to learn who registered it first
4. Newly registered works are announced to downstream ledger services;
   delivery results are visible under `/contents/{id}/notifications`
"#,
        license(name = "MIT OR Apache-2.0")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    tags(
        (name = "Registration", description = "Register content fingerprints"),
        (name = "Claims", description = "Resolve ownership disputes against the registry"),
        (name = "Lookup", description = "Read-only registry queries"),
        (name = "Health", description = "Service health and readiness endpoints")
    ),
    paths(
        crate::handlers::health::health,
        crate::handlers::health::ready,
        crate::handlers::register::register_handler,
        crate::handlers::claim::claim_handler,
        crate::handlers::content::content_handler,
        crate::handlers::lookup::verify_handler,
        crate::handlers::lookup::list_contents_handler,
        crate::handlers::lookup::get_content_handler,
        crate::handlers::lookup::notifications_handler,
    ),
    components(
        schemas(
            HealthResponse,
            ReadyResponse,
            RegisterRequest,
            MintedResponse,
            AlreadyRegisteredResponse,
            NotificationSummary,
            ClaimRequest,
            ResolvedResponse,
            NoMatchResponse,
            VerifyRequest,
            VerifyResponse,
            RecordResponse,
            ListContentsResponse,
            DeliveryResponse,
            NotificationsResponse,
        )
    )
)]
pub struct ApiDoc;
