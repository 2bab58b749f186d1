//! Linear scale mapping a tag's size metric to a font size.

use serde::Deserialize;

/// Maps `domain` linearly onto `range`
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
    /// Clamp results to the range
    #[serde(default)]
    pub clamp: bool,
}

impl Default for LinearScale {
    fn default() -> Self {
        Self::new((0.0, 1.0), (10.0, 20.0))
    }
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self {
            domain,
            range,
            clamp: false,
        }
    }

    pub fn with_clamp(mut self, clamp: bool) -> Self {
        self.clamp = clamp;
        self
    }

    /// Map `value`; a degenerate domain maps everything to the start of the range
    pub fn apply(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = d1 - d0;
        let mut t = if span == 0.0 { 0.0 } else { (value - d0) / span };
        if self.clamp {
            t = t.clamp(0.0, 1.0);
        }
        r0 + (r1 - r0) * t
    }

    pub fn is_finite(&self) -> bool {
        [self.domain.0, self.domain.1, self.range.0, self.range.1]
            .iter()
            .all(|v| v.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scale() {
        let scale = LinearScale::default();
        assert_eq!(scale.apply(0.0), 10.0);
        assert_eq!(scale.apply(1.0), 20.0);
        assert_eq!(scale.apply(0.5), 15.0);
    }

    #[test]
    fn test_extrapolates_unless_clamped() {
        let scale = LinearScale::default();
        assert_eq!(scale.apply(2.0), 30.0);
        assert_eq!(scale.with_clamp(true).apply(2.0), 20.0);
    }

    #[test]
    fn test_degenerate_domain() {
        let scale = LinearScale::new((3.0, 3.0), (8.0, 16.0));
        assert_eq!(scale.apply(100.0), 8.0);
    }

    #[test]
    fn test_deserialize_from_toml() {
        let scale: LinearScale = toml::from_str("domain = [0.0, 10.0]\nrange = [12.0, 36.0]").unwrap();
        assert_eq!(scale.apply(5.0), 24.0);
        assert!(!scale.clamp);
    }
}
