//! Error types module
//!
//! All provider failures are unified under `ProviderError`. Storage backends have
//! their own `StorageError` (in mediabucket-storage) which is folded into
//! `ProviderError::Storage` at the provider boundary.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues
    Warn,
    /// Error level - for unexpected failures
    Error,
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("{0}")]
    InvalidConfig(String),

    #[error("{0}")]
    InvalidServiceAccount(String),

    #[error("Bucket check failed: {0}")]
    BucketCheck(String),

    #[error("Invalid file: {0}")]
    InvalidFile(String),

    #[error("Upload failed: {0}")]
    Upload(String),

    #[error("Delete failed: {0}")]
    Delete(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl ProviderError {
    /// Machine-readable error code (e.g., "INVALID_CONFIG")
    pub fn error_code(&self) -> &'static str {
        match self {
            ProviderError::InvalidConfig(_) => "INVALID_CONFIG",
            ProviderError::InvalidServiceAccount(_) => "INVALID_SERVICE_ACCOUNT",
            ProviderError::BucketCheck(_) => "BUCKET_CHECK_FAILED",
            ProviderError::InvalidFile(_) => "INVALID_FILE",
            ProviderError::Upload(_) => "UPLOAD_FAILED",
            ProviderError::Delete(_) => "DELETE_FAILED",
            ProviderError::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Whether the operation may succeed if retried without changing the input
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ProviderError::BucketCheck(_)
                | ProviderError::Upload(_)
                | ProviderError::Delete(_)
                | ProviderError::Storage(_)
        )
    }

    /// Level at which the failure is reported
    pub fn log_level(&self) -> LogLevel {
        match self {
            ProviderError::InvalidConfig(_)
            | ProviderError::InvalidServiceAccount(_)
            | ProviderError::InvalidFile(_) => LogLevel::Debug,
            ProviderError::Upload(_) | ProviderError::Delete(_) | ProviderError::Storage(_) => {
                LogLevel::Warn
            }
            ProviderError::BucketCheck(_) => LogLevel::Error,
        }
    }
}

pub type ProviderResult<T> = Result<T, ProviderError>;
