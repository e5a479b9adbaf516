//! Webhook notifier with retry and backoff.
//!
//! POSTs each [`MintedEvent`] as JSON to a configured endpoint. Connection
//! failures and 429/502/503/504 responses are retried with exponential
//! backoff; any other non-success status aborts immediately.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use backoff::{future::retry_notify, ExponentialBackoff};
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use super::{DownstreamNotifier, MintedEvent, NotificationReceipt};
use crate::error::{RegistryError, Result};

/// Configuration for a webhook notifier.
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    /// Endpoint receiving the JSON event
    pub url: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Maximum retry attempts for transient errors
    pub max_retries: u32,
    pub initial_interval: Duration,
    pub max_interval: Duration,
    /// Reject plain-HTTP endpoints
    pub https_only: bool,
}

impl WebhookConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: Duration::from_secs(5),
            max_retries: 3,
            initial_interval: Duration::from_millis(200),
            max_interval: Duration::from_secs(2),
            https_only: false,
        }
    }
}

/// Notifier that forwards events to an HTTP endpoint.
pub struct WebhookNotifier {
    client: Client,
    config: WebhookConfig,
}

impl WebhookNotifier {
    pub fn new(config: WebhookConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .https_only(config.https_only)
            .build()
            .map_err(|e| {
                RegistryError::Notification(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self { client, config })
    }

    pub fn url(&self) -> &str {
        &self.config.url
    }

    async fn post_once(
        &self,
        event: &MintedEvent,
    ) -> std::result::Result<NotificationReceipt, backoff::Error<RegistryError>> {
        let start = Instant::now();

        let response = self
            .client
            .post(&self.config.url)
            .json(event)
            .send()
            .await
            .map_err(|e| {
                let latency_ms = start.elapsed().as_millis() as u64;
                if is_transient_error(&e) {
                    warn!(error = %e, latency_ms, "Transient webhook error, will retry");
                    backoff::Error::transient(RegistryError::Notification(format!(
                        "Transient webhook error: {e}"
                    )))
                } else {
                    warn!(error = %e, latency_ms, "Permanent webhook error, aborting");
                    backoff::Error::permanent(RegistryError::Notification(format!(
                        "Webhook request failed: {e}"
                    )))
                }
            })?;

        let status = response.status();
        debug!(status = %status, "Webhook responded");

        if !status.is_success() {
            let err = RegistryError::Notification(format!("Webhook returned status: {status}"));
            return if is_transient_status(status) {
                warn!(status = %status, "Transient webhook status, will retry");
                Err(backoff::Error::transient(err))
            } else {
                warn!(status = %status, "Webhook rejected event");
                Err(backoff::Error::permanent(err))
            };
        }

        debug!(
            latency_ms = start.elapsed().as_millis() as u64,
            "Webhook delivery completed"
        );

        Ok(NotificationReceipt {
            notifier: self.name().to_string(),
            network: self.config.url.clone(),
            reference: event.event_id.to_string(),
            secondary_reference: None,
            message: format!("Webhook accepted event with status {}.", status.as_u16()),
        })
    }

    fn build_backoff(&self) -> ExponentialBackoff {
        ExponentialBackoff {
            initial_interval: self.config.initial_interval,
            max_interval: self.config.max_interval,
            max_elapsed_time: Some(self.config.timeout * self.config.max_retries),
            ..Default::default()
        }
    }
}

#[async_trait]
impl DownstreamNotifier for WebhookNotifier {
    async fn notify(&self, event: &MintedEvent) -> Result<NotificationReceipt> {
        retry_notify(
            self.build_backoff(),
            || self.post_once(event),
            |err: RegistryError, duration: Duration| {
                warn!(
                    error = %err,
                    retry_after_ms = duration.as_millis() as u64,
                    "Webhook retry scheduled"
                );
            },
        )
        .await
    }

    fn name(&self) -> &str {
        "webhook"
    }
}

/// Check if a reqwest error is transient and should be retried.
pub fn is_transient_error(error: &reqwest::Error) -> bool {
    error.is_timeout() || error.is_connect() || error.is_request()
}

/// Check if an HTTP status code indicates a transient error.
pub fn is_transient_status(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
            | StatusCode::BAD_GATEWAY
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_status_codes() {
        assert!(is_transient_status(StatusCode::TOO_MANY_REQUESTS));
        assert!(is_transient_status(StatusCode::SERVICE_UNAVAILABLE));
        assert!(is_transient_status(StatusCode::GATEWAY_TIMEOUT));
        assert!(is_transient_status(StatusCode::BAD_GATEWAY));
        assert!(!is_transient_status(StatusCode::NOT_FOUND));
        assert!(!is_transient_status(StatusCode::INTERNAL_SERVER_ERROR));
    }

    #[test]
    fn test_config_defaults() {
        let config = WebhookConfig::new("http://localhost:9000/hook");
        assert_eq!(config.max_retries, 3);
        assert!(!config.https_only);
    }

    #[tokio::test]
    async fn test_https_only_rejects_plain_http() {
        let notifier = WebhookNotifier::new(WebhookConfig {
            https_only: true,
            max_retries: 1,
            ..WebhookConfig::new("http://127.0.0.1:9/hook")
        })
        .unwrap();

        let event = MintedEvent {
            event_id: uuid::Uuid::new_v4(),
            record_id: 1,
            owner: "alice".into(),
            exact_hash: "H1".into(),
            perceptual_hash: "0000".into(),
            file_name: "a.png".into(),
            registered_at: chrono::Utc::now(),
        };

        assert!(notifier.notify(&event).await.is_err());
    }
}
