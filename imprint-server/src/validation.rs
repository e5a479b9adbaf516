//! Request validation module
//!
//! Turns wire requests into core submissions and claims. Every empty field is
//! reported at once, in wire order.

use imprint_core::{require_fields, Claim, Submission};
use serde::{Deserialize, Deserializer};

use crate::error::ApiError;
use crate::handlers::{ClaimRequest, RegisterRequest};

/// Upper bound on `evidenceCount`, far above any realistic upload count
pub const MAX_EVIDENCE_COUNT: u32 = 1_000;

/// Deserialize a JSON `null` string field as empty, so it is reported as
/// missing by validation rather than rejected as malformed.
pub fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Validate a registration request.
///
/// The verification code is only checked for presence; it is not stored.
pub fn validate_registration(request: RegisterRequest) -> Result<Submission, ApiError> {
    require_fields(&[
        ("owner", &request.owner),
        ("exactHash", &request.exact_hash),
        ("perceptualHash", &request.perceptual_hash),
        ("fileName", &request.file_name),
        ("deviceFingerprint", &request.device_fingerprint),
        ("verificationCode", &request.verification_code),
    ])?;

    Ok(Submission::new(
        request.owner,
        request.exact_hash,
        request.perceptual_hash,
        request.file_name,
        request.device_fingerprint,
    ))
}

/// Validate a claim request.
pub fn validate_claim(request: ClaimRequest) -> Result<Claim, ApiError> {
    require_fields(&[
        ("claimant", &request.claimant),
        ("exactHash", &request.exact_hash),
        ("perceptualHash", &request.perceptual_hash),
        ("fileName", &request.file_name),
    ])?;

    if let Some(count) = request.evidence_count {
        if count > MAX_EVIDENCE_COUNT {
            return Err(ApiError::bad_request(format!(
                "evidenceCount {count} exceeds maximum of {MAX_EVIDENCE_COUNT}"
            )));
        }
    }

    let mut claim = Claim::new(
        request.claimant,
        request.exact_hash,
        request.perceptual_hash,
        request.file_name,
    );
    if let Some(claim_type) = request.claim_type {
        claim = claim.with_claim_type(claim_type);
    }
    if let Some(count) = request.evidence_count {
        claim = claim.with_evidence_count(count);
    }

    Ok(claim)
}

#[cfg(test)]
mod tests {
    use super::*;
    use imprint_core::RegistryError;

    fn register_request() -> RegisterRequest {
        RegisterRequest {
            owner: "alice".into(),
            exact_hash: "H1".into(),
            perceptual_hash: "0000".into(),
            file_name: "a.png".into(),
            device_fingerprint: "dev".into(),
            verification_code: "123456".into(),
        }
    }

    #[test]
    fn test_valid_registration() {
        let submission = validate_registration(register_request()).unwrap();
        assert_eq!(submission.owner, "alice");
        assert_eq!(submission.device_fingerprint, "dev");
    }

    #[test]
    fn test_missing_verification_code_is_reported() {
        let request = RegisterRequest {
            owner: String::new(),
            verification_code: "   ".into(),
            ..register_request()
        };

        match validate_registration(request) {
            Err(ApiError::Registry(RegistryError::Validation { missing_fields })) => {
                assert_eq!(missing_fields, vec!["owner", "verificationCode"]);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_null_fields_are_reported_missing() {
        let request: RegisterRequest = serde_json::from_value(serde_json::json!({
            "owner": null,
            "exactHash": "H1",
            "perceptualHash": null,
            "fileName": "a.png",
            "deviceFingerprint": "dev",
            "verificationCode": "123456"
        }))
        .unwrap();

        match validate_registration(request) {
            Err(ApiError::Registry(RegistryError::Validation { missing_fields })) => {
                assert_eq!(missing_fields, vec!["owner", "perceptualHash"]);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_claim_optional_fields() {
        let claim = validate_claim(ClaimRequest {
            claimant: "bob".into(),
            exact_hash: "H2".into(),
            perceptual_hash: "0000".into(),
            file_name: "b.png".into(),
            claim_type: Some("copyright".into()),
            evidence_count: Some(2),
        })
        .unwrap();

        assert_eq!(claim.claim_type.as_deref(), Some("copyright"));
        assert_eq!(claim.evidence_count, Some(2));
    }

    #[test]
    fn test_claim_evidence_count_bound() {
        let result = validate_claim(ClaimRequest {
            claimant: "bob".into(),
            exact_hash: "H2".into(),
            perceptual_hash: "0000".into(),
            file_name: "b.png".into(),
            claim_type: None,
            evidence_count: Some(MAX_EVIDENCE_COUNT + 1),
        });
        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }
}
