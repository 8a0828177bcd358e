//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use async_trait::async_trait;
use bytes::Bytes;
use mediabucket_core::{BucketLocation, ProviderError};
use thiserror::Error;

use crate::StorageBackend;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for ProviderError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::UploadFailed(msg) => ProviderError::Upload(msg),
            StorageError::DeleteFailed(msg) => ProviderError::Delete(msg),
            StorageError::InvalidKey(msg) => ProviderError::InvalidFile(msg),
            StorageError::ConfigError(msg) => ProviderError::InvalidConfig(msg),
            other => ProviderError::Storage(other.to_string()),
        }
    }
}

/// Metadata written with an object
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectOptions {
    pub content_type: String,
    pub cache_control: Option<String>,
    /// Grant read access on the object to everyone
    pub public_read: bool,
}

/// Storage abstraction trait
///
/// A storage instance is bound to a single bucket. Keys are produced by the
/// `keys` module and must not contain `..` or a leading `/`.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Name of the bucket this storage writes to
    fn bucket(&self) -> &str;

    /// Check whether the bucket exists
    async fn bucket_exists(&self) -> StorageResult<bool>;

    /// Create the bucket in the given location.
    ///
    /// With `public_read` the bucket's default object ACL grants read access to
    /// everyone. Creating a bucket that already exists is not an error.
    async fn create_bucket(&self, location: BucketLocation, public_read: bool)
        -> StorageResult<()>;

    /// Write an object, replacing any existing object with the same key
    async fn put_object(
        &self,
        storage_key: &str,
        data: Bytes,
        options: &ObjectOptions,
    ) -> StorageResult<()>;

    /// Delete an object. A missing object yields `StorageError::NotFound`.
    async fn delete(&self, storage_key: &str) -> StorageResult<()>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
