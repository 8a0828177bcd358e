//! mediabucket core library
//!
//! Configuration, service-account validation, the file upload record and the
//! error type shared by the storage, processing and provider crates.

pub mod config;
pub mod error;
pub mod models;
pub mod schema;
pub mod service_account;
pub mod storage_types;

// Re-export commonly used types
pub use config::{BaseUrlTemplate, BucketLocation, NormalizedConfig, ProviderConfig};
pub use error::{LogLevel, ProviderError, ProviderResult};
pub use models::{FileUpload, RelatedRef};
pub use schema::{ConfigField, FieldKind};
pub use service_account::{validate_service_account, ServiceAccount};
pub use storage_types::StorageBackend;
