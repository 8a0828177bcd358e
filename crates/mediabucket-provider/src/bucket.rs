//! Bucket-existence check run once at provider initialization

use mediabucket_core::{BucketLocation, ProviderError, ProviderResult};
use mediabucket_storage::Storage;

/// Make sure the storage's bucket exists, creating it in `location` if needed.
///
/// Any failure is reported as `ProviderError::BucketCheck`; the provider must not
/// start against a bucket it could not verify.
pub async fn ensure_bucket(
    storage: &dyn Storage,
    location: BucketLocation,
    public_read: bool,
) -> ProviderResult<()> {
    let bucket = storage.bucket();

    let exists = storage.bucket_exists().await.map_err(|e| {
        tracing::error!(bucket = %bucket, error = %e, "Bucket lookup failed");
        ProviderError::BucketCheck(e.to_string())
    })?;

    if exists {
        tracing::debug!(bucket = %bucket, "Bucket exists");
        return Ok(());
    }

    tracing::info!(
        bucket = %bucket,
        location = %location,
        public_read,
        "Bucket not found, creating it"
    );

    storage
        .create_bucket(location, public_read)
        .await
        .map_err(|e| {
            tracing::error!(bucket = %bucket, error = %e, "Bucket creation failed");
            ProviderError::BucketCheck(format!(
                "Bucket \"{}\" does not exist and could not be created: {}",
                bucket, e
            ))
        })
}
