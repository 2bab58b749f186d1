//! TOML tag datasets.
//!
//! ```toml
//! [canvas]
//! width = 600
//! height = 400
//!
//! [font_scale]
//! domain = [0.0, 1.0]
//! range = [10.0, 20.0]
//!
//! [layout]
//! padding = 15.0
//!
//! [[tag]]
//! label = "rust"
//! size = 0.9
//! group = "systems"
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DatasetError, Span};
use crate::layout::LayoutConfig;
use crate::scale::LinearScale;

/// One tag as supplied by the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub label: String,
    pub size: f64,
    #[serde(default)]
    pub group: Option<String>,
    /// Label of a companion tag this one may overlap
    #[serde(default)]
    pub other: Option<String>,
}

impl Tag {
    pub fn new(label: impl Into<String>, size: f64) -> Self {
        Self {
            label: label.into(),
            size,
            group: None,
            other: None,
        }
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn with_other(mut self, other: impl Into<String>) -> Self {
        self.other = Some(other.into());
        self
    }
}

/// Canvas dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

/// A parsed dataset file
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub canvas: Canvas,
    #[serde(default)]
    pub font_scale: Option<LinearScale>,
    #[serde(default)]
    pub layout: Option<LayoutConfig>,
    #[serde(default, rename = "tag")]
    pub tags: Vec<Tag>,
}

impl Dataset {
    /// Load a dataset from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, DatasetError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load a dataset from a TOML string
    pub fn from_str(content: &str) -> Result<Self, DatasetError> {
        let dataset: Dataset = toml::from_str(content)?;

        let mut seen = HashSet::new();
        for tag in &dataset.tags {
            if !tag.size.is_finite() {
                return Err(DatasetError::InvalidSize {
                    label: tag.label.clone(),
                    span: locate_label(content, &tag.label, 0),
                });
            }
            if !seen.insert(tag.label.as_str()) {
                return Err(DatasetError::DuplicateLabel {
                    label: tag.label.clone(),
                    span: locate_label(content, &tag.label, 1),
                });
            }
        }
        Ok(dataset)
    }

    /// Canvas width and height as given
    pub fn canvas_size(&self) -> (f64, f64) {
        (self.canvas.width, self.canvas.height)
    }
}

/// Span of the `nth` quoted occurrence of `label` in `source`
fn locate_label(source: &str, label: &str, nth: usize) -> Option<Span> {
    let quoted = format!("\"{}\"", label);
    source
        .match_indices(&quoted)
        .nth(nth)
        .map(|(start, m)| start..start + m.len())
}
