//! Force layout engine for tag clouds
//!
//! Nodes are pulled toward the anchor of their group lane and pushed apart
//! wherever their marker circles overlap. Overlap queries go through a
//! quadtree rebuilt every tick, and the whole system cools down over a few
//! hundred ticks until it settles.

pub mod collision;
pub mod config;
pub mod error;
pub mod gravity;
pub mod quadtree;
pub mod reconcile;
pub mod simulation;
pub mod types;

pub use collision::{collide, CollisionParams};
pub use config::LayoutConfig;
pub use error::LayoutError;
pub use quadtree::{Quad, QuadTree};
pub use reconcile::{Reconciliation, RetiredCache};
pub use simulation::{NodeSpec, Simulation, SimulationState, TickObserver};
pub use types::*;

/// Pairs of nodes whose marker circles overlap by more than `tolerance`.
///
/// Linked pairs and pairs of unsized nodes are skipped. Useful for checking a
/// settled layout.
pub fn overlapping_pairs(nodes: &[Node], padding: f64, tolerance: f64) -> Vec<(String, String)> {
    let positions: Vec<Point> = nodes.iter().map(|n| n.position()).collect();
    let tree = QuadTree::build(&positions);
    let max_extent = nodes.iter().map(|n| n.extent()).fold(0.0, f64::max);

    let mut pairs = Vec::new();
    for (i, node) in nodes.iter().enumerate() {
        let reach = node.extent() + max_extent + padding;
        for j in tree.query(&BoundingBox::around(node.position(), reach)) {
            if j <= i || node.is_linked_to(&nodes[j]) {
                continue;
            }
            if !node.is_sized() && !nodes[j].is_sized() {
                continue;
            }
            let other = &nodes[j];
            let min_sep = node.extent() + other.extent() + padding;
            if node.position().distance_to(other.position()) + tolerance < min_sep {
                pairs.push((node.id.clone(), other.id.clone()));
            }
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, x: f64, y: f64) -> Node {
        let mut n = Node::new(id);
        n.x = x;
        n.y = y;
        n.size = Some(Size::new(10.0, 10.0));
        n.positioned = true;
        n
    }

    #[test]
    fn test_overlapping_pairs() {
        let nodes = vec![node("a", 0.0, 0.0), node("b", 12.0, 0.0), node("c", 100.0, 0.0)];
        assert_eq!(
            overlapping_pairs(&nodes, 4.0, 0.5),
            vec![("a".to_string(), "b".to_string())]
        );
        assert!(overlapping_pairs(&nodes, 0.0, 0.5).is_empty());
    }

    #[test]
    fn test_unsized_pairs_are_not_reported() {
        let mut nodes = vec![node("a", 0.0, 0.0), node("b", 1.0, 0.0), node("c", 2.0, 0.0)];
        nodes[0].size = None;
        nodes[1].size = None;
        assert_eq!(
            overlapping_pairs(&nodes, 4.0, 0.0),
            vec![
                ("a".to_string(), "c".to_string()),
                ("b".to_string(), "c".to_string())
            ]
        );
    }

    #[test]
    fn test_linked_pairs_are_not_reported() {
        let mut nodes = vec![node("a", 0.0, 0.0), node("b", 1.0, 0.0)];
        nodes[1].other = Some("a".to_string());
        assert!(overlapping_pairs(&nodes, 0.0, 0.0).is_empty());
    }
}
