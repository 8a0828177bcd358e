use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Objects written for every uploaded image.
///
/// `Full` is the original buffer; the others are resized to a maximum width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageVariant {
    Full,
    Large,
    Medium,
    Small,
}

impl ImageVariant {
    pub const ALL: [ImageVariant; 4] = [
        ImageVariant::Full,
        ImageVariant::Large,
        ImageVariant::Medium,
        ImageVariant::Small,
    ];

    pub const FULL_ONLY: [ImageVariant; 1] = [ImageVariant::Full];

    pub fn name(&self) -> &'static str {
        match self {
            ImageVariant::Full => "full",
            ImageVariant::Large => "large",
            ImageVariant::Medium => "medium",
            ImageVariant::Small => "small",
        }
    }

    /// Maximum width in pixels; `None` for the untouched original
    pub fn max_width(&self) -> Option<u32> {
        match self {
            ImageVariant::Full => None,
            ImageVariant::Large => Some(1000),
            ImageVariant::Medium => Some(750),
            ImageVariant::Small => Some(500),
        }
    }

    /// Prefix used in the object name; the full-size object has none
    pub fn key_prefix(&self) -> Option<&'static str> {
        match self {
            ImageVariant::Full => None,
            other => Some(other.name()),
        }
    }
}

impl Display for ImageVariant {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resized_widths_are_decreasing() {
        let widths: Vec<u32> = ImageVariant::ALL
            .iter()
            .filter_map(|v| v.max_width())
            .collect();
        assert_eq!(widths, vec![1000, 750, 500]);
        assert_eq!(ImageVariant::Full.max_width(), None);
    }

    #[test]
    fn test_key_prefix() {
        assert_eq!(ImageVariant::Full.key_prefix(), None);
        assert_eq!(ImageVariant::Small.key_prefix(), Some("small"));
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&ImageVariant::Medium).unwrap();
        assert_eq!(json, "\"medium\"");
        assert_eq!(ImageVariant::Large.to_string(), "large");
    }
}
