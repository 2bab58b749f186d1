//! Error types for configuration and dataset loading

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// Problems detected while building a tag cloud, before any simulation runs
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("must define a tag_labels accessor")]
    MissingTagLabels,

    #[error("must define a tag_size accessor")]
    MissingTagSize,

    #[error("canvas must have a positive finite size, got {width}x{height}")]
    InvalidCanvas { width: f64, height: f64 },

    #[error("font scale domain and range must be finite")]
    InvalidFontScale,

    #[error("invalid layout configuration: {0}")]
    InvalidLayout(String),
}

/// Problems loading a tag dataset
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid dataset: {message}")]
    Syntax { message: String, span: Option<Span> },

    #[error("duplicate tag label '{label}'")]
    DuplicateLabel { label: String, span: Option<Span> },

    #[error("tag '{label}' has a non-finite size")]
    InvalidSize { label: String, span: Option<Span> },
}

impl From<toml::de::Error> for DatasetError {
    fn from(err: toml::de::Error) -> Self {
        DatasetError::Syntax {
            message: err.message().to_string(),
            span: err.span(),
        }
    }
}

impl DatasetError {
    /// Source span of the error, when it points into the dataset text
    pub fn span(&self) -> Option<&Span> {
        match self {
            DatasetError::Io(_) => None,
            DatasetError::Syntax { span, .. }
            | DatasetError::DuplicateLabel { span, .. }
            | DatasetError::InvalidSize { span, .. } => span.as_ref(),
        }
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let Some(span) = self.span().cloned() else {
            return format!("Error: {}", self);
        };

        let mut buf = Vec::new();
        let message = self.to_string();
        let written = Report::build(ReportKind::Error, filename, span.start)
            .with_message(&message)
            .with_label(
                Label::new((filename, span))
                    .with_message(&message)
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);
        if written.is_err() {
            return format!("Error: {}", self);
        }
        String::from_utf8_lossy(&buf).into_owned()
    }
}
