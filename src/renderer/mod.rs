//! Renderers for layout snapshots
//!
//! SVG output draws one group per tag: a marker circle colored by lane and
//! the label centered on it. JSON output is the snapshot itself.

pub mod config;
pub mod json;
pub mod svg;

pub use config::SvgConfig;
pub use json::render_json;
pub use svg::{render_svg, render_svg_with_stylesheet};
