//! SVG generation from layout snapshots

use crate::layout::{BoundingBox, LayoutSnapshot, PlacedTag};
use crate::stylesheet::Stylesheet;

use super::SvgConfig;

/// Build SVG elements incrementally
pub struct SvgBuilder {
    config: SvgConfig,
    styles: Vec<String>,
    elements: Vec<String>,
    indent: usize,
}

impl SvgBuilder {
    /// Create a new SVG builder
    pub fn new(config: SvgConfig) -> Self {
        Self {
            config,
            styles: vec![],
            elements: vec![],
            indent: 1,
        }
    }

    /// Add CSS custom properties and per-lane rules from a stylesheet
    pub fn add_stylesheet(&mut self, stylesheet: &Stylesheet, num_groups: usize) {
        let prefix = self.prefix();
        let mut tokens: Vec<(&String, &String)> = stylesheet.colors.iter().collect();
        tokens.sort();

        let mut css = String::from(":root {\n");
        for (token, value) in tokens {
            css.push_str(&format!("      --{}: {};\n", token, value));
        }
        css.push_str("    }");
        self.styles.push(css);

        self.styles.push(format!(
            ".{}label {{ fill: {}; }}",
            prefix,
            stylesheet.resolve_or_default("label")
        ));
        self.styles.push(format!(
            ".{}marker {{ stroke: {}; }}",
            prefix,
            stylesheet.resolve_or_default("marker-stroke")
        ));
        for lane in 0..num_groups {
            self.styles.push(format!(
                ".{}group{} .{}marker {{ fill: {}; }}",
                prefix,
                lane,
                prefix,
                stylesheet.group_color(lane)
            ));
        }
    }

    fn prefix(&self) -> String {
        self.config.class_prefix.clone().unwrap_or_default()
    }

    fn indent_str(&self) -> String {
        if self.config.pretty_print {
            "  ".repeat(self.indent)
        } else {
            String::new()
        }
    }

    fn newline(&self) -> &str {
        if self.config.pretty_print {
            "\n"
        } else {
            ""
        }
    }

    /// Add a marker circle
    pub fn add_circle(&mut self, cx: f64, cy: f64, r: f64, classes: &[String]) {
        let prefix = self.prefix();
        let class_list = std::iter::once(format!("{}marker", prefix))
            .chain(classes.iter().cloned())
            .collect::<Vec<_>>()
            .join(" ");

        self.elements.push(format!(
            r#"{}<circle class="{}" cx="{}" cy="{}" r="{}"/>"#,
            self.indent_str(),
            class_list,
            cx,
            cy,
            r
        ));
    }

    /// Add a label centered on (x, y)
    pub fn add_text_element(&mut self, text: &str, x: f64, y: f64, font_size: f64) {
        let prefix = self.prefix();
        self.elements.push(format!(
            r#"{}<text class="{}label" x="{}" y="{}" font-size="{}" text-anchor="middle" dominant-baseline="middle">{}</text>"#,
            self.indent_str(),
            prefix,
            x,
            y,
            font_size,
            escape_xml(text)
        ));
    }

    /// Open a group element carrying the tag key and classes
    pub fn start_group(&mut self, key: Option<&str>, classes: &[String]) {
        let key_attr = key
            .map(|k| format!(r#" data-tag="{}""#, escape_xml(k)))
            .unwrap_or_default();
        let class_attr = if classes.is_empty() {
            String::new()
        } else {
            format!(r#" class="{}""#, classes.join(" "))
        };

        self.elements
            .push(format!("{}<g{}{}>", self.indent_str(), class_attr, key_attr));
        self.indent += 1;
    }

    /// Close a group element
    pub fn end_group(&mut self) {
        self.indent = self.indent.saturating_sub(1);
        self.elements.push(format!("{}</g>", self.indent_str()));
    }

    /// Build the final SVG string
    pub fn build(self, viewbox: BoundingBox) -> String {
        let padding = self.config.viewbox_padding;
        let vb_x = viewbox.x - padding;
        let vb_y = viewbox.y - padding;
        let vb_w = viewbox.width + 2.0 * padding;
        let vb_h = viewbox.height + 2.0 * padding;

        let nl = self.newline();

        let mut svg = String::new();

        if self.config.standalone {
            svg.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
            svg.push_str(nl);
        }

        svg.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{} {} {} {}">"#,
            vb_x, vb_y, vb_w, vb_h
        ));
        svg.push_str(nl);

        if !self.styles.is_empty() {
            svg.push_str("  <style>");
            svg.push_str(nl);
            for style in &self.styles {
                svg.push_str("    ");
                svg.push_str(style);
                svg.push_str(nl);
            }
            svg.push_str("  </style>");
            svg.push_str(nl);
        }

        for elem in &self.elements {
            svg.push_str(elem);
            svg.push_str(nl);
        }

        svg.push_str("</svg>");

        svg
    }
}

/// Render a snapshot to an SVG string (with default stylesheet)
pub fn render_svg(snapshot: &LayoutSnapshot, config: &SvgConfig) -> String {
    render_svg_with_stylesheet(snapshot, config, &Stylesheet::default())
}

/// Render a snapshot to an SVG string with a custom stylesheet
pub fn render_svg_with_stylesheet(
    snapshot: &LayoutSnapshot,
    config: &SvgConfig,
    stylesheet: &Stylesheet,
) -> String {
    let mut builder = SvgBuilder::new(config.clone());
    builder.add_stylesheet(stylesheet, snapshot.num_groups);

    for tag in &snapshot.tags {
        render_tag(tag, config, &mut builder);
    }

    let viewbox = if config.fit_to_content {
        snapshot.bounds()
    } else {
        BoundingBox::new(0.0, 0.0, snapshot.canvas.width, snapshot.canvas.height)
    };
    builder.build(viewbox)
}

fn render_tag(tag: &PlacedTag, config: &SvgConfig, builder: &mut SvgBuilder) {
    let prefix = config.class_prefix.clone().unwrap_or_default();
    let classes = vec![format!("{}tag", prefix), format!("{}group{}", prefix, tag.group)];

    builder.start_group(Some(&tag.id), &classes);
    if config.show_markers {
        builder.add_circle(tag.x, tag.y, tag.radius, &[]);
    }
    builder.add_text_element(&tag.id, tag.x, tag.y, tag.font_size);
    builder.end_group();
}

/// Escape special XML characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
