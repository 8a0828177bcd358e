#[cfg(feature = "storage-gcs")]
use crate::GcsStorage;
#[cfg(feature = "storage-local")]
use crate::LocalStorage;
use crate::{Storage, StorageBackend, StorageError, StorageResult};
use mediabucket_core::NormalizedConfig;
use std::path::Path;
use std::sync::Arc;

/// Create a storage backend for the configured bucket
///
/// `local_root` is required for the local backend and ignored otherwise.
pub async fn create_storage(
    backend: StorageBackend,
    config: &NormalizedConfig,
    local_root: Option<&Path>,
) -> StorageResult<Arc<dyn Storage>> {
    match backend {
        #[cfg(feature = "storage-gcs")]
        StorageBackend::Gcs => {
            let storage =
                GcsStorage::new(config.bucket_name.clone(), &config.service_account).await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-gcs"))]
        StorageBackend::Gcs => Err(StorageError::ConfigError(
            "GCS storage backend not available (storage-gcs feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-local")]
        StorageBackend::Local => {
            let root = local_root.ok_or_else(|| {
                StorageError::ConfigError("Local storage root not configured".to_string())
            })?;
            let storage = LocalStorage::new(root, config.bucket_name.clone()).await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-local"))]
        StorageBackend::Local => {
            let _ = local_root;
            Err(StorageError::ConfigError(
                "Local storage backend not available (storage-local feature not enabled)"
                    .to_string(),
            ))
        }
    }
}
