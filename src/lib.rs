//! Tag Cloud - force-directed tag cloud layout
//!
//! This library lays out weighted tags as non-overlapping labels, pulled
//! toward per-group lanes across the canvas, and renders the result as SVG
//! or JSON.
//!
//! # Example
//!
//! ```rust
//! use tag_cloud::render;
//!
//! let svg = render(r#"
//!     [[tag]]
//!     label = "rust"
//!     size = 0.9
//! "#).unwrap();
//! assert!(svg.contains("<svg"));
//! assert!(svg.contains("rust"));
//! ```

pub mod cloud;
pub mod dataset;
pub mod error;
pub mod layout;
pub mod measure;
pub mod renderer;
pub mod scale;
pub mod stylesheet;

pub use cloud::{TagCloud, TagCloudBuilder};
pub use dataset::{Dataset, Tag};
pub use error::{ConfigError, DatasetError};
pub use layout::{LayoutConfig, LayoutError, LayoutSnapshot, Simulation, TickObserver};
pub use measure::{MonospaceMeasurer, TagMeasurer};
pub use renderer::{render_json, render_svg, render_svg_with_stylesheet, SvgConfig};
pub use scale::LinearScale;

use thiserror::Error;
use tracing::{debug, info};

// Re-export Stylesheet for public API
pub use stylesheet::Stylesheet;

/// Errors that can occur during the render pipeline
#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to serialize layout: {0}")]
    Json(#[from] serde_json::Error),
}

/// Output produced by the render pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Svg,
    Json,
}

/// Configuration for the complete render pipeline
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Layout configuration; overrides the dataset's `[layout]` table
    pub layout: Option<LayoutConfig>,
    /// Canvas size; overrides the dataset's `[canvas]` table
    pub canvas: Option<(f64, f64)>,
    /// SVG output configuration
    pub svg: SvgConfig,
    /// Stylesheet for color resolution
    pub stylesheet: Stylesheet,
    pub format: OutputFormat,
    /// Upper bound on simulation ticks before the snapshot is taken
    pub max_ticks: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            layout: None,
            canvas: None,
            svg: SvgConfig::default(),
            stylesheet: Stylesheet::default(),
            format: OutputFormat::Svg,
            max_ticks: 1000,
        }
    }
}

impl RenderConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the layout configuration
    pub fn with_layout(mut self, config: LayoutConfig) -> Self {
        self.layout = Some(config);
        self
    }

    pub fn with_canvas(mut self, width: f64, height: f64) -> Self {
        self.canvas = Some((width, height));
        self
    }

    /// Set the SVG configuration
    pub fn with_svg(mut self, config: SvgConfig) -> Self {
        self.svg = config;
        self
    }

    /// Set the stylesheet for color resolution
    pub fn with_stylesheet(mut self, stylesheet: Stylesheet) -> Self {
        self.stylesheet = stylesheet;
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_max_ticks(mut self, max_ticks: usize) -> Self {
        self.max_ticks = max_ticks;
        self
    }
}

/// Render a TOML dataset with default configuration
pub fn render(source: &str) -> Result<String, RenderError> {
    render_with_config(source, RenderConfig::default())
}

/// Render a TOML dataset with custom configuration
///
/// # Example
///
/// ```rust
/// use tag_cloud::{render_with_config, LayoutConfig, OutputFormat, RenderConfig};
///
/// let config = RenderConfig::new()
///     .with_layout(LayoutConfig::default().with_padding(4.0))
///     .with_canvas(200.0, 100.0)
///     .with_format(OutputFormat::Json);
///
/// let json = render_with_config("[[tag]]\nlabel = \"a\"\nsize = 1.0\n", config).unwrap();
/// assert!(json.contains("\"font_size\": 20.0"));
/// ```
pub fn render_with_config(source: &str, config: RenderConfig) -> Result<String, RenderError> {
    let dataset = Dataset::from_str(source)?;
    render_dataset(&dataset, &config)
}

/// Render an already parsed dataset
pub fn render_dataset(dataset: &Dataset, config: &RenderConfig) -> Result<String, RenderError> {
    let snapshot = layout_dataset(dataset, config)?;
    match config.format {
        OutputFormat::Svg => Ok(render_svg_with_stylesheet(
            &snapshot,
            &config.svg,
            &config.stylesheet,
        )),
        OutputFormat::Json => Ok(render_json(&snapshot)?),
    }
}

/// Run the simulation for a dataset until it settles and return the layout
pub fn layout_dataset(
    dataset: &Dataset,
    config: &RenderConfig,
) -> Result<LayoutSnapshot, RenderError> {
    let (width, height) = config.canvas.unwrap_or_else(|| dataset.canvas_size());
    let layout = config
        .layout
        .clone()
        .or_else(|| dataset.layout.clone())
        .unwrap_or_default();

    let mut cloud = TagCloud::<Tag>::builder()
        .tag_labels(|t: &Tag| t.label.clone())
        .tag_size(|t: &Tag| t.size)
        .group_id(|t: &Tag| t.group.clone())
        .paired_with(|t: &Tag| t.other.clone())
        .font_scale(dataset.font_scale.unwrap_or_default())
        .layout(layout)
        .build(width, height)?;

    let rec = cloud.update(dataset.tags.clone());
    debug!(tags = rec.added.len(), groups = cloud.simulation().num_groups(), "dataset loaded");

    let ticks = cloud.run_to_idle(config.max_ticks, ());
    info!(ticks, settled = cloud.simulation().is_idle(), "layout finished");

    Ok(cloud.snapshot())
}
