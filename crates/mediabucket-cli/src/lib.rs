//! Helpers behind the `mediabucket` binary

use anyhow::Context;
use bytes::Bytes;
use mediabucket_core::{FileUpload, LogLevel, ProviderConfig, ProviderError};
use mediabucket_provider::GcsUploadProvider;
use mediabucket_storage::{create_storage, StorageBackend};
use sha2::{Digest, Sha256};
use std::path::Path;

/// Build the provider from environment configuration.
///
/// With `local_root` the bucket is a directory under that path instead of GCS.
pub async fn provider_from_env(local_root: Option<&Path>) -> anyhow::Result<GcsUploadProvider> {
    let config = ProviderConfig::from_env()?
        .normalize()
        .context("Invalid provider configuration")?;

    let backend = if local_root.is_some() {
        StorageBackend::Local
    } else {
        StorageBackend::Gcs
    };
    let storage = create_storage(backend, &config, local_root)
        .await
        .context("Failed to create storage backend")?;

    Ok(GcsUploadProvider::from_normalized(config, storage).await?)
}

/// Provider error behind a command failure, if any
pub fn provider_error(err: &anyhow::Error) -> Option<&ProviderError> {
    err.chain().find_map(|cause| cause.downcast_ref::<ProviderError>())
}

/// Log a failed command at the level its provider error calls for
pub fn report_error(err: &anyhow::Error) {
    let Some(provider_err) = provider_error(err) else {
        tracing::error!(error = %format!("{:#}", err), "Command failed");
        return;
    };

    let code = provider_err.error_code();
    let recoverable = provider_err.is_recoverable();
    match provider_err.log_level() {
        LogLevel::Debug => {
            tracing::debug!(code, recoverable, error = %format!("{:#}", err), "Command failed")
        }
        LogLevel::Warn => {
            tracing::warn!(code, recoverable, error = %format!("{:#}", err), "Command failed")
        }
        LogLevel::Error => {
            tracing::error!(code, recoverable, error = %format!("{:#}", err), "Command failed")
        }
    }
}

/// SHA-256 of the content, hex encoded; used as the file hash
pub fn content_hash(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Mime type for a file extension (without the dot)
pub fn mime_for_extension(ext: &str) -> &'static str {
    match ext.to_lowercase().as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "tif" | "tiff" => "image/tiff",
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        "json" => "application/json",
        "mp4" => "video/mp4",
        "mp3" => "audio/mpeg",
        _ => "application/octet-stream",
    }
}

/// Read a file from disk into an upload record
pub fn file_upload_from_path(path: &Path, parent_ref: Option<&str>) -> anyhow::Result<FileUpload> {
    let data = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_string();

    let hash = content_hash(&data);

    let mut file = FileUpload::new(
        Bytes::from(data),
        hash,
        ext.clone(),
        mime_for_extension(&ext),
    );
    if let Some(parent) = parent_ref {
        file = file.with_related(parent);
    }
    Ok(file)
}
