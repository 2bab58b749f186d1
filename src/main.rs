//! Tag Cloud CLI
//!
//! Usage:
//!   tag-cloud [OPTIONS] [FILE]
//!
//! Reads a TOML tag dataset, runs the layout until it settles and prints
//! SVG (default) or JSON to stdout.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use tag_cloud::{
    render_dataset, Dataset, LayoutConfig, OutputFormat, RenderConfig, Stylesheet, SvgConfig,
};

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Svg,
    Json,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Svg => OutputFormat::Svg,
            Format::Json => OutputFormat::Json,
        }
    }
}

#[derive(Parser)]
#[command(name = "tag-cloud")]
#[command(about = "Force-directed tag cloud layout")]
struct Cli {
    /// Dataset file (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Stylesheet file for group colors (TOML format)
    #[arg(short, long)]
    stylesheet: Option<PathBuf>,

    /// Layout configuration file, replacing the dataset's [layout] table
    #[arg(short, long)]
    layout: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "svg")]
    format: Format,

    /// Canvas width, overriding the dataset
    #[arg(long, requires = "height")]
    width: Option<f64>,

    /// Canvas height, overriding the dataset
    #[arg(long, requires = "width")]
    height: Option<f64>,

    /// Stop after this many ticks even if the layout has not settled
    #[arg(long, default_value_t = 1000)]
    max_ticks: usize,

    /// Size the viewBox to the tags instead of the canvas
    #[arg(long)]
    fit: bool,

    /// Omit the marker circles behind labels
    #[arg(long)]
    no_markers: bool,

    /// Log simulation progress to stderr (RUST_LOG takes precedence)
    #[arg(short, long)]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.debug { "tag_cloud=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    let stylesheet = match &cli.stylesheet {
        Some(path) => match Stylesheet::from_file(path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Error loading stylesheet '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => Stylesheet::default(),
    };

    let layout = cli.layout.as_ref().map(|path| {
        let parsed = fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|content| toml::from_str::<LayoutConfig>(&content).map_err(|e| e.to_string()));
        match parsed {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error loading layout '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        }
    });

    let (source, filename) = match &cli.input {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => (content, path.display().to_string()),
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => (buffer, "<stdin>".to_string()),
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    std::process::exit(1);
                }
            }
        }
    };

    let dataset = match Dataset::from_str(&source) {
        Ok(dataset) => dataset,
        Err(e) => {
            eprintln!("{}", e.format(&source, &filename).trim_end());
            std::process::exit(1);
        }
    };

    let mut config = RenderConfig::new()
        .with_stylesheet(stylesheet)
        .with_format(cli.format.into())
        .with_max_ticks(cli.max_ticks)
        .with_svg(
            SvgConfig::new()
                .with_fit_to_content(cli.fit)
                .with_markers(!cli.no_markers),
        );
    if let Some(layout) = layout {
        config = config.with_layout(layout);
    }
    if let (Some(width), Some(height)) = (cli.width, cli.height) {
        config = config.with_canvas(width, height);
    }

    match render_dataset(&dataset, &config) {
        Ok(output) => {
            println!("{}", output);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
