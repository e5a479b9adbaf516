use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Missing required fields: {}", missing_fields.join(", "))]
    Validation { missing_fields: Vec<String> },

    #[error("Perceptual hash length mismatch: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },

    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    #[error("Notification error: {0}")]
    Notification(String),

    #[error("Fingerprint error: {0}")]
    Fingerprint(String),

    #[error("Exact hash {exact_hash} already registered as record {existing_id}")]
    DuplicateExactHash { exact_hash: String, existing_id: u64 },
}

impl RegistryError {
    /// Build a validation error from the names of the empty fields.
    pub fn missing<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Validation {
            missing_fields: fields.into_iter().map(Into::into).collect(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RegistryError>;

/// Reject a request whose named fields are empty or whitespace-only.
///
/// Field names are reported in the order given, so callers list them in
/// wire order.
pub fn require_fields(fields: &[(&str, &str)]) -> Result<()> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(RegistryError::missing(missing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_fields_ok() {
        assert!(require_fields(&[("owner", "alice"), ("exactHash", "H1")]).is_ok());
    }

    #[test]
    fn test_require_fields_reports_in_order() {
        let err = require_fields(&[("owner", ""), ("exactHash", "H1"), ("fileName", "  ")])
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::Validation {
                missing_fields: vec!["owner".to_string(), "fileName".to_string()]
            }
        );
    }

    #[test]
    fn test_validation_display_lists_fields() {
        let err = RegistryError::missing(["owner", "fileName"]);
        assert_eq!(err.to_string(), "Missing required fields: owner, fileName");
    }
}
