//! Pairwise collision resolution.
//!
//! Overlapping markers are pushed apart along the line joining their centers.
//! Each node of the pair moves by `alpha` times the overlap; with the cooling
//! schedule shrinking `alpha`, a cluster settles over several ticks instead of
//! snapping apart and oscillating.
//!
//! A node the sizing adapter has not reported yet does not push anything; it
//! only gets pushed by its sized neighbors.

use super::quadtree::QuadTree;
use super::types::{BoundingBox, Node};

/// Golden angle in radians, used to spread coincident pairs in distinct directions
const GOLDEN_ANGLE: f64 = 2.399_963_229_728_653;

/// Distance each node of a coincident pair is nudged
const COINCIDENT_NUDGE: f64 = 0.01;

/// Per-tick parameters of the collision pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionParams {
    pub padding: f64,
    pub search_radius: f64,
    pub alpha: f64,
}

/// Resolve every overlap between node `index` and its neighbors in `tree`.
///
/// `tree` must have been built from `nodes` (same indices). Positions read
/// here are live, so corrections made earlier in the same pass are visible.
pub fn collide(nodes: &mut [Node], tree: &QuadTree, index: usize, params: &CollisionParams) {
    let reach = nodes[index].extent() + params.search_radius + params.padding;
    let window = BoundingBox::around(nodes[index].position(), reach);

    tree.visit(|quad| {
        for &other in quad.points() {
            if other == index || nodes[index].is_linked_to(&nodes[other]) {
                continue;
            }
            separate(nodes, index, other, params);
        }
        !quad.bounds().intersects(&window)
    });
}

/// Apply the correction for one pair if their markers overlap.
///
/// Each node moves only if its partner is sized.
fn separate(nodes: &mut [Node], a: usize, b: usize, params: &CollisionParams) {
    let move_a = nodes[b].is_sized();
    let move_b = nodes[a].is_sized();
    if !move_a && !move_b {
        return;
    }

    let mut x = nodes[a].x - nodes[b].x;
    let mut y = nodes[a].y - nodes[b].y;
    let dist = (x * x + y * y).sqrt();
    let min_separation = nodes[a].extent() + nodes[b].extent() + params.padding;
    if dist >= min_separation {
        return;
    }

    if dist == 0.0 {
        nudge_apart(nodes, a, b, move_a, move_b);
        return;
    }

    let l = (dist - min_separation) / dist * params.alpha;
    x *= l;
    y *= l;
    if move_a {
        nodes[a].x -= x;
        nodes[a].y -= y;
    }
    if move_b {
        nodes[b].x += x;
        nodes[b].y += y;
    }
}

/// Move a coincident pair a hair apart; the direction depends only on the pair.
fn nudge_apart(nodes: &mut [Node], a: usize, b: usize, move_a: bool, move_b: bool) {
    let (lo, hi, move_lo, move_hi) = if a < b {
        (a, b, move_a, move_b)
    } else {
        (b, a, move_b, move_a)
    };
    let angle = GOLDEN_ANGLE * (lo * 31 + hi) as f64;
    let (dx, dy) = (angle.cos() * COINCIDENT_NUDGE, angle.sin() * COINCIDENT_NUDGE);
    if move_lo {
        nodes[lo].x += dx;
        nodes[lo].y += dy;
    }
    if move_hi {
        nodes[hi].x -= dx;
        nodes[hi].y -= dy;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::types::{Point, Size};

    fn node(id: &str, x: f64, y: f64, side: f64) -> Node {
        let mut n = Node::new(id);
        n.x = x;
        n.y = y;
        n.size = Some(Size::new(side, side));
        n.positioned = true;
        n
    }

    fn params(alpha: f64) -> CollisionParams {
        CollisionParams {
            padding: 0.0,
            search_radius: 100.0,
            alpha,
        }
    }

    fn run(nodes: &mut [Node], p: &CollisionParams) {
        let positions: Vec<Point> = nodes.iter().map(|n| n.position()).collect();
        let tree = QuadTree::build(&positions);
        for i in 0..nodes.len() {
            collide(nodes, &tree, i, p);
        }
    }

    #[test]
    fn test_overlapping_pair_moves_apart_symmetrically() {
        let mut nodes = vec![node("a", 0.0, 0.0, 20.0), node("b", 10.0, 0.0, 20.0)];
        let p = params(0.5);
        let positions: Vec<Point> = nodes.iter().map(|n| n.position()).collect();
        let tree = QuadTree::build(&positions);
        collide(&mut nodes, &tree, 0, &p);

        // overlap 10; each node moves alpha * overlap
        assert!((nodes[0].x + 5.0).abs() < 1e-9);
        assert!((nodes[1].x - 15.0).abs() < 1e-9);
        assert_eq!(nodes[0].y, 0.0);
    }

    #[test]
    fn test_separated_pair_is_untouched() {
        let mut nodes = vec![node("a", 0.0, 0.0, 20.0), node("b", 30.0, 0.0, 20.0)];
        run(&mut nodes, &params(0.5));
        assert_eq!(nodes[0].x, 0.0);
        assert_eq!(nodes[1].x, 30.0);
    }

    #[test]
    fn test_padding_counts_as_overlap() {
        let mut nodes = vec![node("a", 0.0, 0.0, 20.0), node("b", 25.0, 0.0, 20.0)];
        let p = CollisionParams {
            padding: 10.0,
            ..params(0.5)
        };
        run(&mut nodes, &p);
        assert!(nodes[1].x - nodes[0].x > 25.0);
    }

    #[test]
    fn test_linked_nodes_never_push() {
        let mut a = node("a", 0.0, 0.0, 20.0);
        a.other = Some("b".to_string());
        let b = node("b", 1.0, 0.0, 20.0);
        let mut nodes = vec![a, b];
        run(&mut nodes, &params(0.5));
        assert_eq!(nodes[0].x, 0.0);
        assert_eq!(nodes[1].x, 1.0);
    }

    #[test]
    fn test_coincident_pair_is_nudged_without_nan() {
        let mut nodes = vec![node("a", 5.0, 5.0, 20.0), node("b", 5.0, 5.0, 20.0)];
        run(&mut nodes, &params(0.5));
        for n in &nodes {
            assert!(n.x.is_finite() && n.y.is_finite());
        }
        assert!(nodes[0].position().distance_to(nodes[1].position()) > 0.0);
    }

    fn unsized_node(id: &str, x: f64, y: f64) -> Node {
        let mut n = Node::new(id);
        n.x = x;
        n.y = y;
        n.positioned = true;
        n
    }

    #[test]
    fn test_unsized_node_is_still_pushed_by_padding() {
        let mut nodes = vec![node("a", 0.0, 0.0, 20.0), unsized_node("u", 2.0, 0.0)];
        run(&mut nodes, &params(0.5));
        assert!(nodes[1].x > 2.0);
        assert_eq!(nodes[0].x, 0.0);
        assert_eq!(nodes[0].y, 0.0);
    }

    #[test]
    fn test_unsized_node_never_pushes_a_sized_one() {
        let mut nodes = vec![node("big", 200.0, 100.0, 40.0), unsized_node("u", 205.0, 100.0)];
        let p = CollisionParams {
            padding: 15.0,
            ..params(0.5)
        };
        let positions: Vec<Point> = nodes.iter().map(|n| n.position()).collect();
        let tree = QuadTree::build(&positions);
        collide(&mut nodes, &tree, 1, &p);
        assert_eq!(nodes[0].position(), Point::new(200.0, 100.0));
        assert!(nodes[1].x > 205.0);

        collide(&mut nodes, &tree, 0, &p);
        assert_eq!(nodes[0].position(), Point::new(200.0, 100.0));
    }

    #[test]
    fn test_unsized_pair_is_ignored() {
        let mut nodes = vec![unsized_node("u", 0.0, 0.0), unsized_node("v", 1.0, 0.0)];
        let p = CollisionParams {
            padding: 15.0,
            ..params(0.5)
        };
        run(&mut nodes, &p);
        assert_eq!(nodes[0].x, 0.0);
        assert_eq!(nodes[1].x, 1.0);
    }

    #[test]
    fn test_coincident_unsized_node_is_nudged_alone() {
        let mut nodes = vec![node("a", 5.0, 5.0, 20.0), unsized_node("u", 5.0, 5.0)];
        run(&mut nodes, &params(0.5));
        assert_eq!(nodes[0].position(), Point::new(5.0, 5.0));
        assert_ne!(nodes[1].position(), Point::new(5.0, 5.0));
    }

    #[test]
    fn test_far_nodes_are_untouched() {
        let mut nodes: Vec<Node> = (0..50)
            .map(|i| node(&i.to_string(), i as f64 * 1000.0, 0.0, 10.0))
            .collect();
        let before: Vec<f64> = nodes.iter().map(|n| n.x).collect();
        run(&mut nodes, &params(0.5));
        let after: Vec<f64> = nodes.iter().map(|n| n.x).collect();
        assert_eq!(before, after);
    }
}
