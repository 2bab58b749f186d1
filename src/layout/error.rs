//! Error types for the layout engine

use thiserror::Error;

/// Errors that can occur while driving the simulation
#[derive(Debug, Error, PartialEq)]
pub enum LayoutError {
    /// Operation addressed a tag that is not in the current dataset
    #[error("unknown tag '{id}'")]
    UnknownTag { id: String },
}

impl LayoutError {
    /// Create an unknown tag error
    pub fn unknown(id: impl Into<String>) -> Self {
        Self::UnknownTag { id: id.into() }
    }
}
