use crate::keys::validate_key;
use crate::traits::{ObjectOptions, Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use mediabucket_core::BucketLocation;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Local filesystem storage implementation
///
/// The bucket is the directory `{root}/{bucket}`. Object options (content type,
/// cache control, public access) are not persisted.
#[derive(Clone)]
pub struct LocalStorage {
    root: PathBuf,
    bucket: String,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `root` - Directory under which bucket directories live
    /// * `bucket` - Bucket name; must be a single path segment
    pub async fn new(root: impl Into<PathBuf>, bucket: impl Into<String>) -> StorageResult<Self> {
        let root = root.into();
        let bucket = bucket.into();

        if bucket.is_empty() || bucket.contains('/') || bucket.contains("..") {
            return Err(StorageError::ConfigError(format!(
                "Invalid bucket name for local storage: {}",
                bucket
            )));
        }

        fs::create_dir_all(&root).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                root.display(),
                e
            ))
        })?;

        Ok(LocalStorage { root, bucket })
    }

    fn bucket_path(&self) -> PathBuf {
        self.root.join(&self.bucket)
    }

    /// Convert storage key to filesystem path with security validation
    fn key_to_path(&self, storage_key: &str) -> StorageResult<PathBuf> {
        validate_key(storage_key)?;
        Ok(self.bucket_path().join(storage_key))
    }

    /// Ensure parent directory exists
    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for LocalStorage {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn bucket_exists(&self) -> StorageResult<bool> {
        Ok(fs::metadata(self.bucket_path())
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false))
    }

    async fn create_bucket(
        &self,
        location: BucketLocation,
        _public_read: bool,
    ) -> StorageResult<()> {
        fs::create_dir_all(self.bucket_path()).await?;
        tracing::info!(
            bucket = %self.bucket,
            location = %location,
            path = %self.bucket_path().display(),
            "Local bucket created"
        );
        Ok(())
    }

    async fn put_object(
        &self,
        storage_key: &str,
        data: Bytes,
        _options: &ObjectOptions,
    ) -> StorageResult<()> {
        let path = self.key_to_path(storage_key)?;
        self.ensure_parent_dir(&path).await?;

        fs::write(&path, &data)
            .await
            .map_err(|e| StorageError::UploadFailed(e.to_string()))?;

        tracing::info!(
            bucket = %self.bucket,
            key = %storage_key,
            size_bytes = data.len() as u64,
            "Local upload successful"
        );

        Ok(())
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        let path = self.key_to_path(storage_key)?;

        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!(bucket = %self.bucket, key = %storage_key, "Local delete successful");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(storage_key.to_string()))
            }
            Err(e) => Err(StorageError::DeleteFailed(e.to_string())),
        }
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_local_storage_bucket_lifecycle() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path(), "media-assets").await.unwrap();

        assert!(!storage.bucket_exists().await.unwrap());
        storage
            .create_bucket(BucketLocation::EuropeWest1, true)
            .await
            .unwrap();
        assert!(storage.bucket_exists().await.unwrap());

        // Creating twice is fine
        storage.create_bucket(BucketLocation::Us, true).await.unwrap();
    }

    #[tokio::test]
    async fn test_local_storage_put_and_delete() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path(), "media-assets").await.unwrap();

        let options = ObjectOptions {
            content_type: "image/png".to_string(),
            cache_control: Some("public, max-age=3600".to_string()),
            public_read: true,
        };
        storage
            .put_object("article/abc/abc.png", Bytes::from_static(b"png bytes"), &options)
            .await
            .unwrap();

        let path = dir.path().join("media-assets/article/abc/abc.png");
        assert_eq!(std::fs::read(&path).unwrap(), b"png bytes");

        storage.delete("article/abc/abc.png").await.unwrap();
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_local_storage_delete_missing() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path(), "media-assets").await.unwrap();

        let result = storage.delete("nonexistent/file.txt").await;
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_local_storage_rejects_traversal() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path(), "media-assets").await.unwrap();

        let result = storage
            .put_object("../escape.txt", Bytes::from_static(b"x"), &ObjectOptions::default())
            .await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let result = storage.delete("/etc/passwd").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
    }

    #[tokio::test]
    async fn test_local_storage_rejects_bad_bucket() {
        let dir = tempdir().unwrap();
        assert!(LocalStorage::new(dir.path(), "../up").await.is_err());
        assert!(LocalStorage::new(dir.path(), "").await.is_err());
    }

    #[tokio::test]
    async fn test_local_storage_backend_type() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path(), "media-assets").await.unwrap();
        assert_eq!(storage.backend_type(), StorageBackend::Local);
        assert_eq!(storage.bucket(), "media-assets");
    }
}
