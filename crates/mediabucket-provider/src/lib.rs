//! mediabucket upload provider
//!
//! The adapter a content-management host loads to store media in a Google Cloud
//! Storage bucket: `GcsUploadProvider::init(config)` yields a provider exposing
//! `upload(file)` and `delete(file)`.

pub mod bucket;
pub mod gcs_provider;
pub mod provider;
pub mod registry;

pub use gcs_provider::{GcsUploadProvider, PROVIDER_NAME};
pub use mediabucket_core::{FileUpload, ProviderConfig, ProviderError, ProviderResult};
pub use provider::{ProviderInfo, UploadProvider};
pub use registry::ProviderRegistry;

/// Initialize the Google Cloud Storage provider from the host's settings
pub async fn init(config: &serde_json::Value) -> ProviderResult<GcsUploadProvider> {
    GcsUploadProvider::init(config).await
}
