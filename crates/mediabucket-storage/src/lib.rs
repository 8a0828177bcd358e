//! mediabucket storage library
//!
//! This crate provides the Storage trait and its implementations for Google Cloud
//! Storage and the local filesystem.
//!
//! # Storage key format
//!
//! All objects derived from one uploaded file share a directory:
//!
//! - `{parent_ref}/{hash}/` when the file is attached to a parent entity
//! - `{hash}/{hash}/` otherwise
//!
//! optionally prefixed with the configured base path. Keys must not contain `..`
//! or a leading `/`. Key generation is centralized in the `keys` module.

pub mod factory;
#[cfg(feature = "storage-gcs")]
pub mod gcs;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
#[cfg(feature = "storage-gcs")]
pub use gcs::{GcsJsonApi, GcsStorage};
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use mediabucket_core::StorageBackend;
pub use traits::{ObjectOptions, Storage, StorageError, StorageResult};
