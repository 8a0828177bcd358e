//! Object key and public URL derivation.
//!
//! Key layout: `[{base_path}/]{parent_ref or hash}/{hash}/{name}` where `name` is
//! `{hash}{ext}` for the full-size object and `{variant}_{hash}{ext}` otherwise.

use crate::traits::{StorageError, StorageResult};

/// Reject segments that would change the key's directory structure
pub fn validate_segment(label: &str, segment: &str) -> StorageResult<()> {
    if segment.is_empty() {
        return Err(StorageError::InvalidKey(format!("{} is empty", label)));
    }
    if segment.contains('/')
        || segment.contains('\\')
        || segment == "."
        || segment.contains("..")
        || segment.chars().any(char::is_control)
    {
        return Err(StorageError::InvalidKey(format!(
            "{} contains invalid characters: {}",
            label, segment
        )));
    }
    Ok(())
}

/// Directory holding every object derived from one uploaded file
pub fn object_dir(base_path: &str, parent_ref: Option<&str>, hash: &str) -> StorageResult<String> {
    validate_segment("hash", hash)?;
    let group = match parent_ref {
        Some(parent) => {
            validate_segment("related ref", parent)?;
            parent
        }
        None => hash,
    };

    if base_path.is_empty() {
        Ok(format!("{}/{}", group, hash))
    } else {
        Ok(format!("{}/{}/{}", base_path, group, hash))
    }
}

/// Full key of one object inside `dir`. `variant` is `None` for the full-size object.
pub fn object_key(dir: &str, variant: Option<&str>, hash: &str, ext: &str) -> String {
    match variant {
        Some(variant) => format!("{}/{}_{}{}", dir, variant, hash, ext),
        None => format!("{}/{}{}", dir, hash, ext),
    }
}

/// Public URL of `key` under `base_url`. Each key segment is percent-encoded.
pub fn public_url(base_url: &str, key: &str) -> String {
    let encoded: Vec<String> = key
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect();
    format!("{}/{}", base_url.trim_end_matches('/'), encoded.join("/"))
}

/// Keys must be relative and must not climb out of the bucket
pub fn validate_key(storage_key: &str) -> StorageResult<()> {
    if storage_key.is_empty() || storage_key.contains("..") || storage_key.starts_with('/') {
        return Err(StorageError::InvalidKey(
            "Storage key contains invalid characters".to_string(),
        ));
    }
    Ok(())
}
