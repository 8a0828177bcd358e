//! Service account credential validation
//!
//! The credential is handed to the storage SDK verbatim; this module only checks
//! that it is usable before any network call is attempted.

use std::fmt::{Debug, Formatter, Result as FmtResult};

use serde_json::Value;

use crate::error::{ProviderError, ProviderResult};

const REQUIRED_FIELDS: [&str; 3] = ["project_id", "client_email", "private_key"];

/// A validated service account key.
///
/// `raw` is the original JSON text; it is what the SDK receives.
#[derive(Clone)]
pub struct ServiceAccount {
    pub project_id: String,
    pub client_email: String,
    private_key: String,
    raw: String,
}

impl ServiceAccount {
    pub fn private_key(&self) -> &str {
        &self.private_key
    }

    /// Original JSON text of the key file
    pub fn raw_json(&self) -> &str {
        &self.raw
    }
}

impl Debug for ServiceAccount {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ServiceAccount")
            .field("project_id", &self.project_id)
            .field("client_email", &self.client_email)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// Validate service account JSON text.
///
/// Checks, in order: presence, JSON syntax, then each of `project_id`,
/// `client_email` and `private_key`.
pub fn validate_service_account(text: &str) -> ProviderResult<ServiceAccount> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ProviderError::InvalidServiceAccount(
            "\"Service Account JSON\" is required!".to_string(),
        ));
    }

    let parsed: Value = serde_json::from_str(text).map_err(|_| {
        ProviderError::InvalidServiceAccount(
            "Error parsing data \"Service Account JSON\", please be sure to copy/paste the full JSON file."
                .to_string(),
        )
    })?;

    let object = parsed.as_object().ok_or_else(|| {
        ProviderError::InvalidServiceAccount(
            "Error parsing data \"Service Account JSON\", please be sure to copy/paste the full JSON file."
                .to_string(),
        )
    })?;

    let mut fields = Vec::with_capacity(REQUIRED_FIELDS.len());
    for field in REQUIRED_FIELDS {
        match object.get(field).and_then(Value::as_str).map(str::trim) {
            Some(value) if !value.is_empty() => fields.push(value.to_string()),
            _ => {
                return Err(ProviderError::InvalidServiceAccount(format!(
                    "Error parsing data \"Service Account JSON\". Missing \"{}\" field in JSON file.",
                    field
                )))
            }
        }
    }

    let private_key = fields.pop().unwrap_or_default();
    let client_email = fields.pop().unwrap_or_default();
    let project_id = fields.pop().unwrap_or_default();

    Ok(ServiceAccount {
        project_id,
        client_email,
        private_key,
        raw: text.to_string(),
    })
}
