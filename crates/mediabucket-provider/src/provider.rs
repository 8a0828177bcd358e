//! Upload provider contract
//!
//! This is the surface the host sees: a named provider with `upload` and
//! `delete` hooks, plus the description and configuration fields it declares.

use async_trait::async_trait;
use mediabucket_core::{ConfigField, FileUpload, ProviderResult};
use serde::Serialize;
use std::fmt::Debug;

/// Trait that all upload providers must implement
#[async_trait]
pub trait UploadProvider: Send + Sync + Debug {
    /// Get the provider name/identifier
    fn name(&self) -> &str;

    /// Store the file and fill in `file.url` (and `file.formats` for images)
    async fn upload(&self, file: &mut FileUpload) -> ProviderResult<()>;

    /// Remove every object previously written for the file
    async fn delete(&self, file: &FileUpload) -> ProviderResult<()>;
}

/// Provider information for listing available providers
#[derive(Debug, Clone, Serialize)]
pub struct ProviderInfo {
    /// Provider name/identifier
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Configuration fields the provider declares
    pub config_fields: Vec<ConfigField>,
}
