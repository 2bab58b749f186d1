//! Behavioral tests for the force layout, driven through the public TagCloud API.

use pretty_assertions::assert_eq;

use tag_cloud::layout::{gravity, overlapping_pairs, Node, Size};
use tag_cloud::{ConfigError, Tag, TagCloud};

/// Largest overlap tolerated between settled markers, in pixels
const EPSILON: f64 = 0.5;

fn cloud(width: f64, height: f64) -> TagCloud<Tag> {
    TagCloud::builder()
        .tag_labels(|t: &Tag| t.label.clone())
        .tag_size(|t: &Tag| t.size)
        .group_id(|t: &Tag| t.group.clone())
        .paired_with(|t: &Tag| t.other.clone())
        .build(width, height)
        .expect("valid configuration")
}

fn min_separation(a: &Node, b: &Node, padding: f64) -> f64 {
    a.extent() + b.extent() + padding
}

fn settle(cloud: &mut TagCloud<Tag>) {
    cloud.run_to_idle(10_000, ());
    assert!(cloud.simulation().is_idle(), "simulation should cool down");
}

fn assert_no_overlap(cloud: &TagCloud<Tag>) {
    let padding = cloud.simulation().config().padding;
    let nodes = cloud.simulation().nodes();
    for (i, a) in nodes.iter().enumerate() {
        for b in &nodes[i + 1..] {
            let required = min_separation(a, b, padding);
            let dist = a.position().distance_to(b.position());
            assert!(
                dist >= required - EPSILON,
                "{} and {} overlap: {:.2} < {:.2}",
                a.id,
                b.id,
                dist,
                required
            );
        }
    }
}

fn dense_tags(n: usize, groups: usize) -> Vec<Tag> {
    (0..n)
        .map(|i| {
            let size = (i * 37 % 101) as f64 / 100.0;
            Tag::new(format!("tag{i}"), size).with_group(format!("g{}", i % groups))
        })
        .collect()
}

#[test]
fn test_missing_required_accessors() {
    let no_labels = TagCloud::<Tag>::builder()
        .tag_size(|t: &Tag| t.size)
        .build(400.0, 300.0);
    assert_eq!(no_labels.err(), Some(ConfigError::MissingTagLabels));

    let no_size = TagCloud::<Tag>::builder()
        .tag_labels(|t: &Tag| t.label.clone())
        .build(400.0, 300.0);
    assert_eq!(no_size.err(), Some(ConfigError::MissingTagSize));
}

#[test]
fn test_no_residual_overlap_at_idle() {
    let mut cloud = cloud(800.0, 600.0);
    cloud.update(vec![
        Tag::new("alpha", 0.1),
        Tag::new("beta", 0.9),
        Tag::new("gamma", 0.4),
        Tag::new("delta", 0.6),
        Tag::new("eps", 1.0),
        Tag::new("zeta", 0.0),
    ]);
    settle(&mut cloud);
    assert_no_overlap(&cloud);
}

#[test]
fn test_dense_cloud_settles_without_overlap() {
    for n in [30, 60] {
        let mut cloud = cloud(800.0, 600.0);
        cloud.update(dense_tags(n, 1));
        settle(&mut cloud);
        assert_no_overlap(&cloud);
        let padding = cloud.simulation().config().padding;
        let pairs = overlapping_pairs(cloud.simulation().nodes(), padding, EPSILON);
        assert!(pairs.is_empty(), "{n} tags left overlapping pairs: {pairs:?}");
    }
}

#[test]
fn test_dense_lanes_settle_without_overlap() {
    let mut cloud = cloud(800.0, 600.0);
    cloud.update(dense_tags(45, 3));
    settle(&mut cloud);
    assert_eq!(cloud.simulation().num_groups(), 3);
    assert_no_overlap(&cloud);
}

#[test]
fn test_paired_nodes_may_coincide() {
    let mut cloud = cloud(400.0, 300.0);
    cloud.update(vec![
        Tag::new("sun", 0.8).with_other("moon"),
        Tag::new("moon", 0.8),
    ]);
    settle(&mut cloud);

    let sim = cloud.simulation();
    let sun = sim.node("sun").unwrap();
    let moon = sim.node("moon").unwrap();
    let dist = sun.position().distance_to(moon.position());
    assert!(dist < min_separation(sun, moon, sim.config().padding));
    assert!(dist < 5.0, "paired nodes should both settle on the anchor, got {dist}");
}

#[test]
fn test_identical_resupply_is_a_fixed_point() {
    let data = || {
        vec![
            Tag::new("a", 0.3),
            Tag::new("b", 0.7),
            Tag::new("c", 0.5).with_group("other"),
        ]
    };
    let mut cloud = cloud(600.0, 400.0);
    cloud.update(data());
    settle(&mut cloud);
    let before: Vec<(f64, f64)> = cloud.simulation().nodes().iter().map(|n| (n.x, n.y)).collect();

    let rec = cloud.update(data());
    assert!(!rec.has_changes());
    assert_eq!(rec.retained, vec!["a", "b", "c"]);
    assert!(!cloud.tick(()));

    let after: Vec<(f64, f64)> = cloud.simulation().nodes().iter().map(|n| (n.x, n.y)).collect();
    assert_eq!(before, after);
}

#[test]
fn test_readded_tag_restores_position() {
    let mut cloud = cloud(400.0, 300.0);
    cloud.update(vec![Tag::new("a", 0.2), Tag::new("b", 0.9), Tag::new("c", 0.5)]);
    settle(&mut cloud);
    let b = cloud.simulation().node("b").unwrap().position();

    let rec = cloud.update(vec![Tag::new("a", 0.2), Tag::new("c", 0.5)]);
    assert_eq!(rec.removed, vec!["b"]);
    settle(&mut cloud);

    let rec = cloud.update(vec![Tag::new("a", 0.2), Tag::new("b", 0.9), Tag::new("c", 0.5)]);
    assert_eq!(rec.added, vec!["b"]);
    assert_eq!(rec.restored, vec!["b"]);
    assert_eq!(cloud.simulation().node("b").unwrap().position(), b);
}

#[test]
fn test_group_means_separate_by_a_lane() {
    let width = 1200.0;
    let mut cloud = cloud(width, 600.0);
    let mut data = Vec::new();
    for i in 0..4 {
        data.push(Tag::new(format!("left{i}"), 0.25 * i as f64).with_group("left"));
        data.push(Tag::new(format!("right{i}"), 0.25 * i as f64).with_group("right"));
    }
    cloud.update(data);
    settle(&mut cloud);

    let sim = cloud.simulation();
    assert_eq!(sim.num_groups(), 2);
    let mean_x = |lane: usize| {
        let xs: Vec<f64> = sim.nodes().iter().filter(|n| n.group == lane).map(|n| n.x).collect();
        xs.iter().sum::<f64>() / xs.len() as f64
    };
    let lane_width = gravity::lane_width(Size::new(width, 600.0), 2);
    assert!(mean_x(1) - mean_x(0) >= lane_width - 5.0);
}

#[test]
fn test_nodes_settle_nearest_their_own_lane() {
    let mut cloud = cloud(800.0, 600.0);
    let mut data = Vec::new();
    for i in 0..4 {
        data.push(Tag::new(format!("x{i}"), 0.3 * i as f64).with_group("x"));
        data.push(Tag::new(format!("y{i}"), 1.0 - 0.3 * i as f64).with_group("y"));
    }
    cloud.update(data);
    settle(&mut cloud);

    let sim = cloud.simulation();
    let anchors = [sim.anchor(0), sim.anchor(1)];
    for node in sim.nodes() {
        let own = (node.x - anchors[node.group].x).abs();
        let other = (node.x - anchors[1 - node.group].x).abs();
        assert!(own < other, "{} at x={:.1} drifted out of its lane", node.id, node.x);
    }
}

#[test]
fn test_two_tag_scenario() {
    let mut cloud = cloud(400.0, 300.0);
    cloud.update(vec![Tag::new("a", 0.2), Tag::new("b", 0.9)]);
    settle(&mut cloud);

    let sim = cloud.simulation();
    let a = sim.node("a").unwrap();
    let b = sim.node("b").unwrap();
    let required = min_separation(a, b, 15.0);
    assert!(a.position().distance_to(b.position()) >= required - EPSILON);

    let centroid_x = (a.x + b.x) / 2.0;
    let centroid_y = (a.y + b.y) / 2.0;
    assert!((centroid_x - 200.0).abs() < 2.0);
    assert!((centroid_y - 150.0).abs() < 2.0);
}

#[test]
fn test_unsized_tag_pops_in_after_measurement() {
    let mut cloud = cloud(400.0, 300.0);
    cloud.update(vec![Tag::new("a", 0.5), Tag::new("b", 0.5)]);
    let sim = cloud.simulation_mut();
    sim.set_size("b", Size::zero()).unwrap();
    sim.run_to_idle(10_000, ());
    let zero_extent = sim.node("b").unwrap().extent();
    assert_eq!(zero_extent, 0.0);

    sim.set_size("b", Size::new(30.0, 18.0)).unwrap();
    sim.resume();
    sim.run_to_idle(10_000, ());
    let a = sim.node("a").unwrap();
    let b = sim.node("b").unwrap();
    assert!(a.position().distance_to(b.position()) >= min_separation(a, b, 15.0) - EPSILON);
}
