//! File upload record exchanged with the host

use std::collections::BTreeMap;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Reference to the entity a file is attached to (e.g. an article's cover).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedRef {
    /// Collection or model name of the parent
    #[serde(rename = "ref")]
    pub ref_name: String,
    #[serde(default, rename = "refId", skip_serializing_if = "Option::is_none")]
    pub ref_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// A single file handed to the provider.
///
/// Inputs are `buffer`, `hash`, `ext`, `mime` and `related`. The provider fills in
/// `url` and `formats` on upload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileUpload {
    #[serde(skip)]
    pub buffer: Bytes,
    pub hash: String,
    /// Extension including the leading dot, e.g. `.png`. May be empty.
    pub ext: String,
    pub mime: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related: Vec<RelatedRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Public URL per resized variant name (`large`, `medium`, `small`)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub formats: BTreeMap<String, String>,
}

impl FileUpload {
    pub fn new(
        buffer: impl Into<Bytes>,
        hash: impl Into<String>,
        ext: impl Into<String>,
        mime: impl Into<String>,
    ) -> Self {
        Self {
            buffer: buffer.into(),
            hash: hash.into(),
            ext: ext.into(),
            mime: mime.into(),
            ..Default::default()
        }
    }

    pub fn with_related(mut self, ref_name: impl Into<String>) -> Self {
        self.related.push(RelatedRef {
            ref_name: ref_name.into(),
            ref_id: None,
            field: None,
        });
        self
    }

    /// Name of the first parent reference, if any
    pub fn parent_ref(&self) -> Option<&str> {
        self.related
            .first()
            .map(|r| r.ref_name.trim())
            .filter(|r| !r.is_empty())
    }

    /// Lowercased extension with a leading dot, or empty
    pub fn normalized_ext(&self) -> String {
        let ext = self.ext.trim().trim_start_matches('.').to_lowercase();
        if ext.is_empty() {
            String::new()
        } else {
            format!(".{}", ext)
        }
    }
}
