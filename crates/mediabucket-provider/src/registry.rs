//! Provider registry for managing initialized upload providers

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::provider::{ProviderInfo, UploadProvider};

/// Registry the host uses to look up upload providers by name.
///
/// Thread-safe and async-compatible using tokio's RwLock. Registration normally
/// happens once at startup; lookups happen per request.
#[derive(Clone)]
pub struct ProviderRegistry {
    providers: Arc<RwLock<HashMap<String, Arc<dyn UploadProvider>>>>,
    provider_info: Arc<RwLock<HashMap<String, ProviderInfo>>>,
}

impl ProviderRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            providers: Arc::new(RwLock::new(HashMap::new())),
            provider_info: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Register a provider. A provider registered under the same name is replaced.
    pub async fn register(&self, provider: Arc<dyn UploadProvider>, info: ProviderInfo) -> Result<()> {
        let name = provider.name().to_string();

        let mut providers = self.providers.write().await;
        let mut provider_info = self.provider_info.write().await;

        if providers.insert(name.clone(), provider).is_some() {
            tracing::warn!(provider = %name, "Replacing registered upload provider");
        }
        provider_info.insert(name, info);

        Ok(())
    }

    /// Get a provider by name
    pub async fn get(&self, name: &str) -> Result<Arc<dyn UploadProvider>> {
        let providers = self.providers.read().await;

        providers
            .get(name)
            .cloned()
            .with_context(|| format!("Upload provider '{}' not found", name))
    }

    /// List all registered providers
    pub async fn list(&self) -> Result<Vec<ProviderInfo>> {
        let provider_info = self.provider_info.read().await;

        Ok(provider_info.values().cloned().collect())
    }

    /// Check if a provider is registered
    pub async fn contains(&self, name: &str) -> Result<bool> {
        let providers = self.providers.read().await;

        Ok(providers.contains_key(name))
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
