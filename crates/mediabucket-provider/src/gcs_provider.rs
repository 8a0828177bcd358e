//! Google Cloud Storage upload provider

use async_trait::async_trait;
use bytes::Bytes;
use futures::future::join_all;
use mediabucket_core::{
    FileUpload, NormalizedConfig, ProviderConfig, ProviderError, ProviderResult,
};
use mediabucket_processing::{ImageFormat, ImageProcessor, ImageTransformer, ImageVariant};
use mediabucket_storage::{
    create_storage, keys, ObjectOptions, Storage, StorageBackend, StorageError,
};
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

use crate::bucket::ensure_bucket;
use crate::provider::{ProviderInfo, UploadProvider};

pub const PROVIDER_NAME: &str = "google-cloud-storage";

const DEFAULT_MIME: &str = "application/octet-stream";

/// Upload provider backed by a Google Cloud Storage bucket.
///
/// Images in a resizable format are stored four times (the original plus three
/// width-bounded copies); everything else is stored once.
pub struct GcsUploadProvider {
    config: NormalizedConfig,
    storage: Arc<dyn Storage>,
}

impl Debug for GcsUploadProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("GcsUploadProvider")
            .field("bucket", &self.config.bucket_name)
            .field("base_url", &self.config.base_url)
            .field("backend", &self.storage.backend_type())
            .finish()
    }
}

/// One object written or removed for a file
struct ObjectTarget {
    variant: ImageVariant,
    key: String,
}

/// Image the resized variants are derived from
#[derive(Clone, Copy)]
struct ResizeSource {
    format: ImageFormat,
    /// Width after EXIF orientation
    width: u32,
}

impl GcsUploadProvider {
    /// Initialize the provider from the host's JSON settings.
    ///
    /// Normalizes the configuration, validates the service account, connects to
    /// GCS and makes sure the bucket exists.
    pub async fn init(config: &serde_json::Value) -> ProviderResult<Self> {
        let config = ProviderConfig::from_value(config)?.normalize()?;
        let storage = create_storage(StorageBackend::Gcs, &config, None).await?;
        Self::from_normalized(config, storage).await
    }

    /// Same as `init`, against an already constructed storage backend
    pub async fn with_storage(
        config: &serde_json::Value,
        storage: Arc<dyn Storage>,
    ) -> ProviderResult<Self> {
        let config = ProviderConfig::from_value(config)?.normalize()?;
        Self::from_normalized(config, storage).await
    }

    pub async fn from_normalized(
        config: NormalizedConfig,
        storage: Arc<dyn Storage>,
    ) -> ProviderResult<Self> {
        if storage.bucket() != config.bucket_name {
            return Err(ProviderError::InvalidConfig(format!(
                "Storage is bound to bucket \"{}\" but \"{}\" is configured",
                storage.bucket(),
                config.bucket_name
            )));
        }

        ensure_bucket(storage.as_ref(), config.bucket_location, config.public_files).await?;

        tracing::info!(
            bucket = %config.bucket_name,
            base_url = %config.base_url,
            backend = %storage.backend_type(),
            "Upload provider initialized"
        );

        Ok(Self { config, storage })
    }

    pub fn info() -> ProviderInfo {
        ProviderInfo {
            name: PROVIDER_NAME.to_string(),
            description: "Store media in a Google Cloud Storage bucket, with resized image variants"
                .to_string(),
            config_fields: ProviderConfig::schema(),
        }
    }

    pub fn config(&self) -> &NormalizedConfig {
        &self.config
    }

    /// Objects belonging to `file`, full-size first
    fn targets(
        &self,
        file: &FileUpload,
        variants: &[ImageVariant],
    ) -> ProviderResult<Vec<ObjectTarget>> {
        let ext = file.normalized_ext();
        if !ext.is_empty() {
            keys::validate_segment("extension", &ext)?;
        }
        let dir = keys::object_dir(&self.config.base_path, file.parent_ref(), &file.hash)?;

        Ok(variants
            .iter()
            .map(|variant| ObjectTarget {
                variant: *variant,
                key: keys::object_key(&dir, variant.key_prefix(), &file.hash, &ext),
            })
            .collect())
    }

    fn variants_for_mime(mime: &str) -> &'static [ImageVariant] {
        if ImageTransformer::resizable_format(mime).is_some() {
            &ImageVariant::ALL
        } else {
            &ImageVariant::FULL_ONLY
        }
    }

    /// `None` when the file gets no resized variants: not a resizable format, or
    /// a header that cannot be read.
    fn resize_source(file: &FileUpload) -> Option<ResizeSource> {
        let format = ImageTransformer::resizable_format(&file.mime)?;
        match ImageProcessor::oriented_dimensions(&file.buffer, format) {
            Ok((width, _)) => Some(ResizeSource { format, width }),
            Err(e) => {
                tracing::warn!(
                    hash = %file.hash,
                    mime = %file.mime,
                    error = %e,
                    "Unreadable image, uploading full size only"
                );
                None
            }
        }
    }

    async fn upload_variant(
        &self,
        target: &ObjectTarget,
        buffer: Bytes,
        source: Option<ResizeSource>,
        options: &ObjectOptions,
    ) -> anyhow::Result<()> {
        let data = match (target.variant.max_width(), source) {
            (Some(max_width), Some(source)) if source.width > max_width => {
                ImageTransformer::resize_to_width_blocking(buffer, max_width, source.format).await?
            }
            _ => buffer,
        };

        self.storage.put_object(&target.key, data, options).await?;
        Ok(())
    }
}

#[async_trait]
impl UploadProvider for GcsUploadProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn upload(&self, file: &mut FileUpload) -> ProviderResult<()> {
        let source = Self::resize_source(file);
        let variants: &[ImageVariant] = if source.is_some() {
            &ImageVariant::ALL
        } else {
            &ImageVariant::FULL_ONLY
        };
        let targets = self.targets(file, variants)?;
        let options = ObjectOptions {
            content_type: match file.mime.trim() {
                "" => DEFAULT_MIME.to_string(),
                mime => mime.to_lowercase(),
            },
            cache_control: Some(self.config.cache_control()),
            public_read: self.config.public_files,
        };

        tracing::debug!(
            bucket = %self.config.bucket_name,
            hash = %file.hash,
            mime = %options.content_type,
            size_bytes = file.buffer.len() as u64,
            variants = targets.len(),
            "Uploading file"
        );

        let uploads = targets.iter().map(|target| {
            self.upload_variant(target, file.buffer.clone(), source, &options)
        });
        let results = join_all(uploads).await;

        let mut full_url = None;
        let mut formats = Vec::new();
        for (target, result) in targets.iter().zip(results) {
            match (target.variant, result) {
                (ImageVariant::Full, Ok(())) => {
                    full_url = Some(keys::public_url(&self.config.base_url, &target.key));
                }
                (ImageVariant::Full, Err(e)) => {
                    tracing::error!(
                        bucket = %self.config.bucket_name,
                        key = %target.key,
                        error = %e,
                        "Full-size upload failed"
                    );
                    let message = match e.downcast_ref::<StorageError>() {
                        Some(StorageError::UploadFailed(msg)) => msg.clone(),
                        _ => format!("{:#}", e),
                    };
                    return Err(ProviderError::Upload(message));
                }
                (variant, Ok(())) => {
                    formats.push((
                        variant.name().to_string(),
                        keys::public_url(&self.config.base_url, &target.key),
                    ));
                }
                (variant, Err(e)) => {
                    tracing::warn!(
                        bucket = %self.config.bucket_name,
                        key = %target.key,
                        variant = %variant,
                        error = %e,
                        "Resized variant upload failed, skipping"
                    );
                }
            }
        }

        file.url = full_url;
        file.formats.extend(formats);
        Ok(())
    }

    async fn delete(&self, file: &FileUpload) -> ProviderResult<()> {
        let variants: &[ImageVariant] = if file.formats.is_empty() {
            Self::variants_for_mime(&file.mime)
        } else {
            &ImageVariant::ALL
        };
        let targets = self.targets(file, variants)?;

        let deletions = targets
            .iter()
            .map(|target| self.storage.delete(&target.key));
        let results = join_all(deletions).await;

        let mut outcome = Ok(());
        for (target, result) in targets.iter().zip(results) {
            match (target.variant, result) {
                (_, Ok(())) => {}
                (ImageVariant::Full, Err(StorageError::NotFound(_))) => {
                    tracing::warn!(
                        bucket = %self.config.bucket_name,
                        key = %target.key,
                        "Remote file was not found, you may have to delete it manually"
                    );
                }
                (ImageVariant::Full, Err(e)) => {
                    tracing::error!(
                        bucket = %self.config.bucket_name,
                        key = %target.key,
                        error = %e,
                        "Delete failed"
                    );
                    outcome = Err(ProviderError::Delete(match e {
                        StorageError::DeleteFailed(msg) => msg,
                        other => other.to_string(),
                    }));
                }
                (variant, Err(StorageError::NotFound(_))) => {
                    tracing::debug!(key = %target.key, variant = %variant, "Variant already absent");
                }
                (variant, Err(e)) => {
                    tracing::warn!(
                        bucket = %self.config.bucket_name,
                        key = %target.key,
                        variant = %variant,
                        error = %e,
                        "Variant delete failed, skipping"
                    );
                }
            }
        }

        outcome
    }
}
