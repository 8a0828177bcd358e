use crate::keys::validate_key;
use crate::traits::{ObjectOptions, Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use mediabucket_core::{BucketLocation, ServiceAccount};
use object_store::gcp::{GoogleCloudStorage, GoogleCloudStorageBuilder};
use object_store::path::Path;
use object_store::Error as ObjectStoreError;
use object_store::{
    Attribute, Attributes, ObjectStore, ObjectStoreExt, PutOptions, PutPayload,
    Result as ObjectResult,
};
use reqwest::StatusCode;
use serde_json::json;
use std::time::Duration;

const JSON_API_BASE: &str = "https://storage.googleapis.com/storage/v1";
const HTTP_TIMEOUT_SECS: u64 = 30;

/// Bucket and ACL calls against the GCS JSON API, which `object_store` does not
/// cover. Every call takes an OAuth bearer token.
#[derive(Clone)]
pub struct GcsJsonApi {
    http_client: reqwest::Client,
    api_base: String,
    bucket: String,
    project_id: String,
}

impl GcsJsonApi {
    pub fn new(
        api_base: impl Into<String>,
        bucket: impl Into<String>,
        project_id: impl Into<String>,
    ) -> StorageResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()
            .map_err(|e| {
                StorageError::ConfigError(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(GcsJsonApi {
            http_client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            bucket: bucket.into(),
            project_id: project_id.into(),
        })
    }

    fn bucket_url(&self) -> String {
        format!("{}/b/{}", self.api_base, urlencoding::encode(&self.bucket))
    }

    fn object_url(&self, storage_key: &str) -> String {
        format!("{}/o/{}", self.bucket_url(), urlencoding::encode(storage_key))
    }

    /// 2xx means the bucket exists, 404 that it does not
    pub async fn bucket_exists(&self, token: &str) -> StorageResult<bool> {
        let response = self
            .http_client
            .get(self.bucket_url())
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| StorageError::BackendError(e.to_string()))?;

        match response.status() {
            status if status.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => {
                let body = response.text().await.unwrap_or_default();
                tracing::error!(
                    bucket = %self.bucket,
                    status = %status,
                    "GCS bucket lookup failed"
                );
                Err(StorageError::BackendError(format!(
                    "An error occurs when we try to retrieve the Bucket \"{}\" ({}): {}",
                    self.bucket, status, body
                )))
            }
        }
    }

    /// Create the bucket. 409 (already exists) counts as success.
    pub async fn create_bucket(
        &self,
        token: &str,
        location: BucketLocation,
        public_read: bool,
    ) -> StorageResult<()> {
        let mut query = vec![("project", self.project_id.as_str())];
        if public_read {
            query.push(("predefinedDefaultObjectAcl", "publicRead"));
        }

        let response = self
            .http_client
            .post(format!("{}/b", self.api_base))
            .query(&query)
            .bearer_auth(token)
            .json(&json!({
                "name": self.bucket,
                "location": location.as_str(),
            }))
            .send()
            .await
            .map_err(|e| StorageError::BackendError(e.to_string()))?;

        match response.status() {
            status if status.is_success() => {
                tracing::info!(
                    bucket = %self.bucket,
                    location = %location,
                    public_read,
                    "GCS bucket created"
                );
                Ok(())
            }
            StatusCode::CONFLICT => {
                tracing::debug!(bucket = %self.bucket, "GCS bucket already exists");
                Ok(())
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                tracing::error!(
                    bucket = %self.bucket,
                    location = %location,
                    status = %status,
                    "GCS bucket creation failed"
                );
                Err(StorageError::BackendError(format!(
                    "Failed to create bucket \"{}\" ({}): {}",
                    self.bucket, status, body
                )))
            }
        }
    }

    /// Apply the `publicRead` predefined ACL to one object.
    ///
    /// Buckets with uniform bucket-level access reject object ACLs; access there
    /// is governed by bucket IAM, so the rejection is logged and ignored.
    pub async fn make_object_public(&self, token: &str, storage_key: &str) -> StorageResult<()> {
        let response = self
            .http_client
            .patch(self.object_url(storage_key))
            .query(&[("predefinedAcl", "publicRead")])
            .bearer_auth(token)
            .json(&json!({}))
            .send()
            .await
            .map_err(|e| StorageError::UploadFailed(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        if status == StatusCode::BAD_REQUEST
            && body.to_lowercase().contains("uniform bucket-level access")
        {
            tracing::warn!(
                bucket = %self.bucket,
                key = %storage_key,
                "Uniform bucket-level access enabled, object ACL not set"
            );
            return Ok(());
        }

        tracing::error!(
            bucket = %self.bucket,
            key = %storage_key,
            status = %status,
            "GCS object ACL update failed"
        );
        Err(StorageError::UploadFailed(format!(
            "Failed to make \"{}\" public ({}): {}",
            storage_key, status, body
        )))
    }
}

/// Google Cloud Storage implementation
///
/// Object reads and writes go through `object_store`; bucket metadata and ACLs
/// go through `GcsJsonApi` with the same credentials.
#[derive(Clone)]
pub struct GcsStorage {
    store: GoogleCloudStorage,
    api: GcsJsonApi,
    bucket: String,
}

impl GcsStorage {
    /// Create a new GcsStorage instance
    ///
    /// # Arguments
    /// * `bucket` - Bucket name
    /// * `service_account` - Validated service account key
    pub async fn new(bucket: String, service_account: &ServiceAccount) -> StorageResult<Self> {
        Self::with_api_base(bucket, service_account, JSON_API_BASE).await
    }

    /// Same as `new`, with bucket and ACL calls sent to `api_base`
    pub async fn with_api_base(
        bucket: String,
        service_account: &ServiceAccount,
        api_base: &str,
    ) -> StorageResult<Self> {
        let store = GoogleCloudStorageBuilder::new()
            .with_bucket_name(bucket.clone())
            .with_service_account_key(service_account.raw_json())
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        let api = GcsJsonApi::new(api_base, bucket.clone(), service_account.project_id.clone())?;

        Ok(GcsStorage { store, api, bucket })
    }

    async fn bearer_token(&self) -> StorageResult<String> {
        let credential = self
            .store
            .credentials()
            .get_credential()
            .await
            .map_err(|e| StorageError::BackendError(format!("Failed to obtain token: {}", e)))?;
        Ok(credential.bearer.clone())
    }
}

#[async_trait]
impl Storage for GcsStorage {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn bucket_exists(&self) -> StorageResult<bool> {
        let token = self.bearer_token().await?;
        self.api.bucket_exists(&token).await
    }

    async fn create_bucket(
        &self,
        location: BucketLocation,
        public_read: bool,
    ) -> StorageResult<()> {
        let token = self.bearer_token().await?;
        self.api.create_bucket(&token, location, public_read).await
    }

    async fn put_object(
        &self,
        storage_key: &str,
        data: Bytes,
        options: &ObjectOptions,
    ) -> StorageResult<()> {
        validate_key(storage_key)?;
        let size = data.len() as u64;
        let location = Path::from(storage_key.to_string());
        let start = std::time::Instant::now();

        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, options.content_type.clone().into());
        if let Some(cache_control) = &options.cache_control {
            attributes.insert(Attribute::CacheControl, cache_control.clone().into());
        }
        let put_options = PutOptions {
            attributes,
            ..Default::default()
        };

        let result: ObjectResult<_> = self
            .store
            .put_opts(&location, PutPayload::from(data), put_options)
            .await;

        result.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %storage_key,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "GCS upload failed"
            );
            StorageError::UploadFailed(e.to_string())
        })?;

        if options.public_read {
            let token = self.bearer_token().await?;
            self.api.make_object_public(&token, storage_key).await?;
        }

        tracing::info!(
            bucket = %self.bucket,
            key = %storage_key,
            size_bytes = size,
            public_read = options.public_read,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "GCS upload successful"
        );

        Ok(())
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        validate_key(storage_key)?;
        let start = std::time::Instant::now();
        let location = Path::from(storage_key.to_string());

        let result: ObjectResult<_> = self.store.delete(&location).await;

        result.map_err(|e| match e {
            ObjectStoreError::NotFound { .. } => StorageError::NotFound(storage_key.to_string()),
            other => {
                tracing::error!(
                    error = %other,
                    bucket = %self.bucket,
                    key = %storage_key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "GCS delete failed"
                );
                StorageError::DeleteFailed(other.to_string())
            }
        })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %storage_key,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "GCS delete successful"
        );

        Ok(())
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Gcs
    }
}
