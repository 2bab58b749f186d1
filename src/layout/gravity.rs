//! Gravity toward each group's lane anchor.
//!
//! Groups sit in equally spaced vertical lanes: with `n` groups the canvas
//! width is cut into `n + 1` slices and lane `g` is anchored on the boundary
//! after slice `g`. Every lane is anchored at half the canvas height.

use super::types::{Node, Point, Size};

/// Width of one lane slice
pub fn lane_width(canvas: Size, num_groups: usize) -> f64 {
    canvas.width / (num_groups.max(1) as f64 + 1.0)
}

/// Anchor point of lane `lane` out of `num_groups`
pub fn anchor(canvas: Size, num_groups: usize, lane: usize) -> Point {
    Point::new(
        lane_width(canvas, num_groups) * (lane as f64 + 1.0),
        canvas.height / 2.0,
    )
}

/// Pull `node` toward `target`; the vertical pull is `vertical_ratio` times stronger.
pub fn apply(node: &mut Node, target: Point, strength: f64, vertical_ratio: f64) {
    node.x += (target.x - node.x) * strength;
    node.y += (target.y - node.y) * strength * vertical_ratio;
}
