//! Subcommand implementations.

pub mod claim;
pub mod distance;
pub mod fingerprint;
pub mod register;

use anyhow::{bail, Context, Result};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::utils::endpoint;

/// POST a JSON body to the registry and return the decoded response.
///
/// 4xx responses become "Registry rejected" errors carrying the server's
/// message and missing fields.
pub(crate) async fn post_to_registry<T: Serialize>(
    server: &str,
    path: &str,
    body: &T,
) -> Result<(u16, Value)> {
    let url = endpoint(server, path);
    debug!(url = %url, "Posting to registry");

    let response = reqwest::Client::new()
        .post(&url)
        .json(body)
        .send()
        .await
        .with_context(|| format!("Failed to reach registry at {server}"))?;

    let status = response.status();
    let json: Value = response
        .json()
        .await
        .with_context(|| format!("Invalid response from registry (HTTP {status})"))?;

    if status.is_client_error() {
        let message = json["error"].as_str().unwrap_or("request rejected");
        match json["missingFields"].as_array() {
            Some(fields) => {
                let fields: Vec<&str> = fields.iter().filter_map(Value::as_str).collect();
                bail!("Registry rejected request: {message} ({})", fields.join(", "))
            }
            None => bail!("Registry rejected request: {message}"),
        }
    }

    if !status.is_success() {
        bail!("Registry error (HTTP {status})");
    }

    Ok((status.as_u16(), json))
}
