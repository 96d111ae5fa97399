use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tracing::{info, warn};

use crate::error::IntegrationError;
use crate::items::{ItemsApi, DEFAULT_ENDPOINT};
use crate::types::ProviderItem;

/// A non-blocking handle to an in-flight async request.
/// Call `try_recv()` from the event loop to check for results without blocking.
pub struct PendingRequest<T> {
    receiver: mpsc::Receiver<Result<T, IntegrationError>>,
}

impl<T> PendingRequest<T> {
    /// Non-blocking check for the result. Returns `None` if still pending.
    pub fn try_recv(&self) -> Option<Result<T, IntegrationError>> {
        self.receiver.try_recv().ok()
    }

    /// Blocking wait for the result. Only use during startup loading.
    pub fn wait(self) -> Result<T, IntegrationError> {
        self.receiver.recv().map_err(|_| IntegrationError::Network("Channel closed".into()))?
    }
}

/// Transport settings for the provider client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// GraphQL endpoint URL
    pub endpoint: String,
    /// Per-request HTTP timeout
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Facade for all game-data provider interactions.
/// Owns a background tokio runtime and dispatches async work via channels.
pub struct IntegrationClient {
    runtime: tokio::runtime::Runtime,
    items_api: Arc<ItemsApi>,
}

impl IntegrationClient {
    /// Create a new integration client with a background tokio runtime.
    pub fn new(config: ClientConfig) -> Result<Self, IntegrationError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .map_err(|e| IntegrationError::Network(format!("Failed to create runtime: {}", e)))?;

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| IntegrationError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            runtime,
            items_api: Arc::new(ItemsApi::new(client, config.endpoint)),
        })
    }

    /// Fetch all weapon and weapon-mod records. Fired once per session; no retry.
    pub fn fetch_items(&self) -> PendingRequest<Vec<ProviderItem>> {
        let (tx, rx) = mpsc::channel();
        let api = Arc::clone(&self.items_api);

        self.runtime.spawn(async move {
            let result = api.fetch_weapons_and_mods().await;
            match &result {
                Ok(items) => info!("Fetched {} provider items", items.len()),
                Err(IntegrationError::Offline) => warn!("Game-data provider is unreachable"),
                Err(e) => warn!("Item fetch failed: {}", e),
            }
            let _ = tx.send(result);
        });

        PendingRequest { receiver: rx }
    }
}
