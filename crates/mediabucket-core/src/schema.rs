//! Declared configuration fields, as presented in the host's settings UI.

use serde::Serialize;

use crate::config::{BaseUrlTemplate, BucketLocation, ProviderConfig};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Textarea,
    Enum { values: Vec<String> },
    Boolean,
    Number,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfigField {
    pub key: &'static str,
    pub label: &'static str,
    #[serde(flatten)]
    pub kind: FieldKind,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl ProviderConfig {
    /// Fields the provider declares to its host
    pub fn schema() -> Vec<ConfigField> {
        vec![
            ConfigField {
                key: "serviceAccount",
                label: "Service Account JSON",
                kind: FieldKind::Textarea,
                required: true,
                default: None,
            },
            ConfigField {
                key: "bucketName",
                label: "Bucket name",
                kind: FieldKind::Text,
                required: true,
                default: None,
            },
            ConfigField {
                key: "bucketLocation",
                label: "Bucket location",
                kind: FieldKind::Enum {
                    values: BucketLocation::ALL.iter().map(|l| l.to_string()).collect(),
                },
                required: false,
                default: Some(BucketLocation::default().to_string()),
            },
            ConfigField {
                key: "baseUrl",
                label: "Base URL",
                kind: FieldKind::Enum {
                    values: BaseUrlTemplate::ALL
                        .iter()
                        .map(|t| t.template().to_string())
                        .collect(),
                },
                required: false,
                default: Some(BaseUrlTemplate::default().template().to_string()),
            },
            ConfigField {
                key: "basePath",
                label: "Base path",
                kind: FieldKind::Text,
                required: false,
                default: None,
            },
            ConfigField {
                key: "publicFiles",
                label: "Public files",
                kind: FieldKind::Boolean,
                required: false,
                default: Some("true".to_string()),
            },
            ConfigField {
                key: "cacheMaxAge",
                label: "Cache max age (seconds)",
                kind: FieldKind::Number,
                required: false,
                default: Some("3600".to_string()),
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_declares_required_fields() {
        let schema = ProviderConfig::schema();
        let required: Vec<&str> = schema
            .iter()
            .filter(|f| f.required)
            .map(|f| f.key)
            .collect();
        assert_eq!(required, vec!["serviceAccount", "bucketName"]);
    }

    #[test]
    fn test_schema_serializes_enum_values() {
        let schema = ProviderConfig::schema();
        let json = serde_json::to_value(&schema).unwrap();

        let location = json
            .as_array()
            .unwrap()
            .iter()
            .find(|f| f["key"] == "bucketLocation")
            .unwrap();
        assert_eq!(location["type"], "enum");
        assert_eq!(location["default"], "US");
        let values = location["values"].as_array().unwrap();
        assert_eq!(values.len(), BucketLocation::ALL.len());
        assert!(values.iter().any(|v| v == "europe-west1"));

        let base_url = json
            .as_array()
            .unwrap()
            .iter()
            .find(|f| f["key"] == "baseUrl")
            .unwrap();
        assert_eq!(base_url["values"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_schema_keys_match_config_keys() {
        // Every declared key must round-trip through ProviderConfig's serde names
        let config = serde_json::to_value(ProviderConfig::default()).unwrap();
        for field in ProviderConfig::schema() {
            assert!(
                config.get(field.key).is_some(),
                "{} is not a ProviderConfig field",
                field.key
            );
        }
    }
}
