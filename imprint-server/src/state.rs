//! Application state module
//!
//! Defines shared state accessible across all request handlers.

use std::sync::Arc;

use imprint_core::{DownstreamNotifier, Registry, SimulatedLedger};

use crate::config::Config;
use crate::error::ApiError;

/// Application state containing shared resources.
#[derive(Clone, Debug)]
pub struct AppState {
    /// The registry every handler reads from and registers into
    pub registry: Arc<Registry>,
}

impl AppState {
    pub fn new(registry: Registry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    /// Build the registry and its notifiers from configuration.
    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        let mut notifiers: Vec<Arc<dyn DownstreamNotifier>> = Vec::new();

        if config.simulated_ledgers {
            notifiers.extend(SimulatedLedger::all());
        }

        if let Some(url) = &config.notify_webhook_url {
            notifiers.push(webhook_notifier(url)?);
        }

        let registry = Registry::builder()
            .settings(config.registry_settings())
            .notifiers(notifiers)
            .build();

        tracing::info!(
            similarity_threshold = config.similarity_threshold,
            notifiers = ?registry.notifier_names(),
            "Registry initialized"
        );

        Ok(Self::new(registry))
    }
}

#[cfg(feature = "webhook")]
fn webhook_notifier(url: &str) -> Result<Arc<dyn DownstreamNotifier>, ApiError> {
    use imprint_core::{WebhookConfig, WebhookNotifier};

    let notifier = WebhookNotifier::new(WebhookConfig::new(url))?;
    Ok(Arc::new(notifier))
}

#[cfg(not(feature = "webhook"))]
fn webhook_notifier(_url: &str) -> Result<Arc<dyn DownstreamNotifier>, ApiError> {
    Err(ApiError::internal(
        "NOTIFY_WEBHOOK_URL is set but the server was built without the webhook feature",
    ))
}
