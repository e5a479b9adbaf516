//! Common utility functions shared across CLI commands.

use std::path::Path;

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chrono::{DateTime, Utc};
use imprint_core::Fingerprint;
use serde_json::Value;
use tracing::{debug, info};

/// Length of the derived device fingerprint.
const DEVICE_FINGERPRINT_LEN: usize = 32;

/// Read an image from disk and fingerprint it.
pub fn fingerprint_file(path: &Path) -> Result<Fingerprint> {
    let content =
        std::fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))?;

    info!(path = %path.display(), bytes = content.len(), "Read file");

    let fingerprint = Fingerprint::from_bytes(&content)?;
    debug!(exact_hash = %fingerprint.exact_hash, "Computed fingerprint");

    Ok(fingerprint)
}

/// Derive a stable identifier for this machine.
///
/// Base64 of `hostname|os|arch`, truncated to 32 characters.
pub fn device_fingerprint() -> String {
    let hostname = std::env::var("HOSTNAME")
        .or_else(|_| std::env::var("COMPUTERNAME"))
        .unwrap_or_else(|_| "unknown-host".to_string());

    encode_device(&hostname, std::env::consts::OS, std::env::consts::ARCH)
}

fn encode_device(hostname: &str, os: &str, arch: &str) -> String {
    let mut encoded = BASE64.encode(format!("{hostname}|{os}|{arch}"));
    encoded.truncate(DEVICE_FINGERPRINT_LEN);
    encoded
}

/// Format an RFC 3339 timestamp from the server as a human-readable UTC string.
pub fn format_timestamp(value: &Value) -> String {
    let raw = value.as_str().unwrap_or_default();
    match raw.parse::<DateTime<Utc>>() {
        Ok(dt) => dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Join a registry path onto a server URL.
pub fn endpoint(server: &str, path: &str) -> String {
    format!("{}/{}", server.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Shorten a hash for display.
pub fn short_hash(hash: &str) -> &str {
    hash.get(..16).unwrap_or(hash)
}
