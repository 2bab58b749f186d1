//! Label measurement.
//!
//! The layout never renders text itself; it asks a [`TagMeasurer`] how large a
//! label will be at a given font size and sizes the node's marker from that.

use unicode_width::UnicodeWidthStr;

use crate::layout::Size;

/// Measures the rendered extent of a tag label
pub trait TagMeasurer {
    fn measure(&self, label: &str, font_size: f64) -> Size;
}

impl<F> TagMeasurer for F
where
    F: Fn(&str, f64) -> Size,
{
    fn measure(&self, label: &str, font_size: f64) -> Size {
        self(label, font_size)
    }
}

/// Approximate measurer assuming a monospace-like advance per display column
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMeasurer {
    /// Advance of one display column as a fraction of the font size
    pub char_width: f64,
    /// Line box height as a fraction of the font size
    pub line_height: f64,
}

impl Default for MonospaceMeasurer {
    fn default() -> Self {
        Self {
            char_width: 0.6,
            line_height: 1.2,
        }
    }
}

impl TagMeasurer for MonospaceMeasurer {
    fn measure(&self, label: &str, font_size: f64) -> Size {
        let columns = UnicodeWidthStr::width(label) as f64;
        Size::new(
            columns * self.char_width * font_size,
            self.line_height * font_size,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monospace_scales_with_font() {
        let m = MonospaceMeasurer::default();
        let small = m.measure("rust", 10.0);
        let big = m.measure("rust", 20.0);
        assert!((small.width - 24.0).abs() < 1e-9);
        assert!((small.height - 12.0).abs() < 1e-9);
        assert!((big.width - 2.0 * small.width).abs() < 1e-9);
    }

    #[test]
    fn test_wide_characters_take_two_columns() {
        let m = MonospaceMeasurer::default();
        let narrow = m.measure("ab", 10.0);
        let wide = m.measure("漢字", 10.0);
        assert!((wide.width - 2.0 * narrow.width).abs() < 1e-9);
    }

    #[test]
    fn test_closure_measurer() {
        let fixed = |_: &str, _: f64| Size::new(5.0, 5.0);
        assert_eq!(fixed.measure("anything", 12.0), Size::new(5.0, 5.0));
    }
}
