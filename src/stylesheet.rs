//! Stylesheets for tag cloud colors
//!
//! Markers are colored by group lane through `group-N` tokens; labels,
//! marker outlines and the background have their own tokens. A stylesheet
//! only needs to override the tokens it cares about.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading or parsing stylesheets
#[derive(Error, Debug)]
pub enum StylesheetError {
    #[error("Failed to read stylesheet file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse stylesheet TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// A stylesheet mapping color tokens to concrete values
#[derive(Debug, Clone, PartialEq)]
pub struct Stylesheet {
    pub name: Option<String>,
    pub description: Option<String>,
    /// Color mappings: token name -> CSS color
    pub colors: HashMap<String, String>,
}

#[derive(Deserialize)]
struct TomlStylesheet {
    metadata: Option<TomlMetadata>,
    #[serde(default)]
    colors: HashMap<String, String>,
}

#[derive(Deserialize)]
struct TomlMetadata {
    name: Option<String>,
    description: Option<String>,
}

/// Category10-style group palette plus neutral label colors
const DEFAULT_PALETTE: &[(&str, &str)] = &[
    ("group-0", "#1f77b4"),
    ("group-1", "#ff7f0e"),
    ("group-2", "#2ca02c"),
    ("group-3", "#d62728"),
    ("group-4", "#9467bd"),
    ("group-5", "#8c564b"),
    ("group-6", "#e377c2"),
    ("group-7", "#7f7f7f"),
    ("group-8", "#bcbd22"),
    ("group-9", "#17becf"),
    ("label", "#333333"),
    ("marker-stroke", "#ffffff"),
    ("background", "#ffffff"),
];

impl Stylesheet {
    /// Load stylesheet from TOML file
    pub fn from_file(path: &Path) -> Result<Self, StylesheetError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load stylesheet from TOML string
    pub fn from_str(content: &str) -> Result<Self, StylesheetError> {
        let parsed: TomlStylesheet = toml::from_str(content)?;

        Ok(Stylesheet {
            name: parsed.metadata.as_ref().and_then(|m| m.name.clone()),
            description: parsed.metadata.as_ref().and_then(|m| m.description.clone()),
            colors: parsed.colors,
        })
    }

    /// Look up a token in this stylesheet only
    pub fn resolve(&self, token: &str) -> Option<&str> {
        self.colors.get(token).map(|s| s.as_str())
    }

    /// Resolve a token, falling back to the default palette
    pub fn resolve_or_default(&self, token: &str) -> String {
        if let Some(color) = self.resolve(token) {
            return color.to_string();
        }
        if let Some((_, color)) = DEFAULT_PALETTE.iter().find(|(name, _)| *name == token) {
            return color.to_string();
        }
        if token.starts_with("group") {
            return "#7f7f7f".to_string();
        }
        if token == "background" || token.starts_with("marker") {
            return "#ffffff".to_string();
        }
        "#333333".to_string()
    }

    /// Fill color for markers in `lane`.
    ///
    /// Lanes beyond the defined `group-N` tokens wrap around the palette.
    pub fn group_color(&self, lane: usize) -> String {
        let defined = (0..)
            .take_while(|i| self.resolve(&format!("group-{}", i)).is_some())
            .count();
        let token = if defined > 0 {
            format!("group-{}", lane % defined)
        } else {
            format!("group-{}", lane % DEFAULT_GROUP_COUNT)
        };
        self.resolve_or_default(&token)
    }
}

const DEFAULT_GROUP_COUNT: usize = 10;

impl Default for Stylesheet {
    fn default() -> Self {
        Stylesheet {
            name: Some("default".to_string()),
            description: None,
            colors: DEFAULT_PALETTE
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty() -> Stylesheet {
        Stylesheet {
            name: None,
            description: None,
            colors: HashMap::new(),
        }
    }

    #[test]
    fn test_default_stylesheet() {
        let stylesheet = Stylesheet::default();
        assert_eq!(stylesheet.resolve("group-0"), Some("#1f77b4"));
        assert_eq!(stylesheet.resolve("label"), Some("#333333"));
        assert_eq!(stylesheet.resolve("nonexistent"), None);
    }

    #[test]
    fn test_group_colors_wrap_default_palette() {
        let stylesheet = Stylesheet::default();
        assert_eq!(stylesheet.group_color(1), "#ff7f0e");
        assert_eq!(stylesheet.group_color(11), "#ff7f0e");
        assert_eq!(empty().group_color(3), "#d62728");
    }

    #[test]
    fn test_group_colors_wrap_custom_palette() {
        let stylesheet = Stylesheet::from_str(
            r##"
[colors]
group-0 = "#000000"
group-1 = "#111111"
"##,
        )
        .expect("Should parse");
        assert_eq!(stylesheet.group_color(0), "#000000");
        assert_eq!(stylesheet.group_color(3), "#111111");
    }

    #[test]
    fn test_resolve_or_default_fallback() {
        let stylesheet = Stylesheet::from_str("[colors]\nlabel = \"#222222\"\n").unwrap();
        assert_eq!(stylesheet.resolve_or_default("label"), "#222222");
        assert_eq!(stylesheet.resolve_or_default("marker-stroke"), "#ffffff");
        assert_eq!(empty().resolve_or_default("group-42"), "#7f7f7f");
        assert_eq!(empty().resolve_or_default("whatever"), "#333333");
    }

    #[test]
    fn test_parse_toml_with_metadata() {
        let toml_str = r##"
[metadata]
name = "Dark"
description = "Light labels on dark markers"

[colors]
label = "#eeeeee"
"##;
        let stylesheet = Stylesheet::from_str(toml_str).expect("Should parse");
        assert_eq!(stylesheet.name, Some("Dark".to_string()));
        assert_eq!(stylesheet.description.as_deref(), Some("Light labels on dark markers"));
        assert_eq!(stylesheet.resolve("label"), Some("#eeeeee"));
    }

    #[test]
    fn test_invalid_toml_error() {
        let result = Stylesheet::from_str("this is not valid toml {{{{");
        assert!(matches!(result, Err(StylesheetError::ParseError(_))));
    }
}
