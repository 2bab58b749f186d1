//! Tick-driven force simulation.
//!
//! The driver owns node state and the cooling coefficient. The host schedules
//! ticks: [`Simulation::tick`] runs one synchronous pass and returns whether
//! it wants another one. Nothing here spawns threads or timers.

use std::collections::{HashMap, HashSet};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::{debug, trace};

use super::collision::{self, CollisionParams};
use super::config::LayoutConfig;
use super::error::LayoutError;
use super::gravity;
use super::quadtree::QuadTree;
use super::reconcile::{assign_lanes, Reconciliation, RetiredCache};
use super::types::{Node, Point, Size, TagUpdate};

/// Collision coefficient of the idle-time settle passes
const SETTLE_STRENGTH: f64 = 0.5;

/// Lifecycle of the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SimulationState {
    /// No ticks are wanted; node state is kept
    Stopped,
    /// Freshly (re)started, alpha still high
    Running,
    /// Alpha has decayed below half its initial value
    Cooling,
}

/// Rendering collaborator fed after every tick.
///
/// The tick that takes the simulation idle reports one last frame with
/// alpha 0, carrying the settled positions.
pub trait TickObserver {
    fn on_tick(&mut self, alpha: f64, updates: &[TagUpdate]);
}

impl TickObserver for () {
    fn on_tick(&mut self, _alpha: f64, _updates: &[TagUpdate]) {}
}

/// Records every frame
impl TickObserver for Vec<Vec<TagUpdate>> {
    fn on_tick(&mut self, _alpha: f64, updates: &[TagUpdate]) {
        self.push(updates.to_vec());
    }
}

impl<O: TickObserver + ?Sized> TickObserver for &mut O {
    fn on_tick(&mut self, alpha: f64, updates: &[TagUpdate]) {
        (**self).on_tick(alpha, updates);
    }
}

/// Input for one node when (re)supplying the dataset
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NodeSpec {
    pub id: String,
    pub group: Option<String>,
    pub other: Option<String>,
    /// Known size, or `None` to keep the current one (zero for new nodes)
    pub size: Option<Size>,
}

impl NodeSpec {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_size(mut self, size: Size) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn with_other(mut self, other: impl Into<String>) -> Self {
        self.other = Some(other.into());
        self
    }
}

/// The force simulation
#[derive(Debug, Clone)]
pub struct Simulation {
    config: LayoutConfig,
    canvas: Size,
    nodes: Vec<Node>,
    index: HashMap<String, usize>,
    num_groups: usize,
    retired: RetiredCache,
    alpha: f64,
    state: SimulationState,
    ticks: u64,
    rng: ChaCha8Rng,
}

impl Simulation {
    pub fn new(canvas: Size, config: LayoutConfig) -> Self {
        Self {
            retired: RetiredCache::new(config.retired_capacity),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
            canvas,
            nodes: Vec::new(),
            index: HashMap::new(),
            num_groups: 1,
            alpha: 0.0,
            state: SimulationState::Stopped,
            ticks: 0,
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Replace the configuration; takes effect on the next tick
    pub fn set_config(&mut self, config: LayoutConfig) {
        self.retired.set_capacity(config.retired_capacity);
        self.config = config;
    }

    pub fn canvas(&self) -> Size {
        self.canvas
    }

    pub fn set_canvas(&mut self, canvas: Size) {
        self.canvas = canvas;
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn num_groups(&self) -> usize {
        self.num_groups
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn state(&self) -> SimulationState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == SimulationState::Stopped
    }

    /// Total number of passes run since creation
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Anchor of lane `lane` on the current canvas
    pub fn anchor(&self, lane: usize) -> Point {
        gravity::anchor(self.canvas, self.num_groups, lane)
    }

    /// Match `specs` against the current nodes by id.
    ///
    /// Survivors keep position and velocity, newcomers start unpositioned (or
    /// at their retired position) with the supplied size, and nodes missing
    /// from `specs` are dropped. The first spec wins for a repeated id.
    pub fn set_nodes(&mut self, specs: Vec<NodeSpec>) -> Reconciliation {
        let mut rec = Reconciliation::default();

        let mut unique: Vec<NodeSpec> = Vec::with_capacity(specs.len());
        let mut taken: HashSet<String> = HashSet::with_capacity(specs.len());
        for spec in specs {
            if !taken.insert(spec.id.clone()) {
                rec.duplicates.push(spec.id);
            } else {
                unique.push(spec);
            }
        }
        if !rec.duplicates.is_empty() {
            tracing::warn!(duplicates = ?rec.duplicates, "ignoring repeated tag keys");
        }

        let groups: Vec<Option<String>> = unique.iter().map(|s| s.group.clone()).collect();
        let (lanes, num_groups) = assign_lanes(&groups);
        rec.lanes_changed = !self.nodes.is_empty() && num_groups != self.num_groups;

        let mut previous: Vec<Option<Node>> = std::mem::take(&mut self.nodes)
            .into_iter()
            .map(Some)
            .collect();
        let previous_index = std::mem::take(&mut self.index);

        let mut nodes = Vec::with_capacity(unique.len());
        for (spec, lane) in unique.into_iter().zip(lanes) {
            let existing = previous_index
                .get(&spec.id)
                .and_then(|&i| previous[i].take());
            let node = match existing {
                Some(mut node) => {
                    if node.group != lane || node.other != spec.other {
                        rec.moved.push(spec.id.clone());
                    }
                    if let Some(size) = spec.size {
                        if node.size != Some(size) {
                            rec.resized.push(spec.id.clone());
                        }
                        node.size = Some(size);
                    }
                    node.group = lane;
                    node.other = spec.other;
                    rec.retained.push(spec.id);
                    node
                }
                None => {
                    let mut node = Node::new(spec.id.clone());
                    if let Some(p) = self.retired.revive(&spec.id) {
                        node.x = p.x;
                        node.y = p.y;
                        node.positioned = true;
                        rec.restored.push(spec.id.clone());
                    }
                    node.size = spec.size;
                    node.group = lane;
                    node.other = spec.other;
                    rec.added.push(spec.id);
                    node
                }
            };
            nodes.push(node);
        }

        for node in previous.into_iter().flatten() {
            if node.positioned {
                self.retired.retire(node.id.clone(), node.position());
            }
            rec.removed.push(node.id);
        }

        self.index = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.clone(), i))
            .collect();
        self.nodes = nodes;
        self.num_groups = num_groups;

        debug!(
            added = rec.added.len(),
            removed = rec.removed.len(),
            retained = rec.retained.len(),
            groups = num_groups,
            "reconciled nodes"
        );
        rec
    }

    /// Report a measured size for `id`
    pub fn set_size(&mut self, id: &str, size: Size) -> Result<(), LayoutError> {
        let node = self.node_mut(id)?;
        node.size = Some(size);
        Ok(())
    }

    /// Hold `id` at `position` until [`Simulation::unpin`]
    pub fn pin(&mut self, id: &str, position: Point) -> Result<(), LayoutError> {
        let node = self.node_mut(id)?;
        node.pinned = Some(position);
        node.x = position.x;
        node.y = position.y;
        node.vx = 0.0;
        node.vy = 0.0;
        node.positioned = true;
        Ok(())
    }

    pub fn unpin(&mut self, id: &str) -> Result<(), LayoutError> {
        self.node_mut(id)?.pinned = None;
        Ok(())
    }

    fn node_mut(&mut self, id: &str) -> Result<&mut Node, LayoutError> {
        match self.index.get(id) {
            Some(&i) => Ok(&mut self.nodes[i]),
            None => Err(LayoutError::unknown(id)),
        }
    }

    /// Seed unset positions and reset the cooling coefficient
    pub fn start(&mut self) {
        self.seed_positions();
        self.alpha = self.config.initial_alpha;
        self.state = SimulationState::Running;
        debug!(nodes = self.nodes.len(), alpha = self.alpha, "simulation started");
    }

    /// Reheat without reseeding
    pub fn resume(&mut self) {
        self.alpha = self.config.initial_alpha;
        self.state = SimulationState::Running;
        debug!(alpha = self.alpha, "simulation resumed");
    }

    /// Stop issuing ticks; node state is kept
    pub fn stop(&mut self) {
        self.alpha = 0.0;
        self.state = SimulationState::Stopped;
        debug!(ticks = self.ticks, "simulation stopped");
    }

    /// Run one tick if the simulation is active.
    ///
    /// Returns `true` when the host should schedule another tick. Once alpha
    /// falls below `alpha_min` the remaining overlaps are settled and the
    /// simulation stops.
    pub fn tick<O: TickObserver>(&mut self, mut observer: O) -> bool {
        if self.state == SimulationState::Stopped {
            return false;
        }

        self.alpha *= self.config.alpha_decay;
        if self.alpha < self.config.alpha_min {
            self.alpha = 0.0;
            self.state = SimulationState::Stopped;
            let passes = self.settle();
            debug!(ticks = self.ticks, settle_passes = passes, "simulation idle");
            observer.on_tick(self.alpha, &self.updates());
            return false;
        }
        if self.alpha < self.config.initial_alpha / 2.0 {
            self.state = SimulationState::Cooling;
        }

        self.step(self.alpha);
        observer.on_tick(self.alpha, &self.updates());
        true
    }

    /// Tick until idle or `max_ticks` passes have run; returns the number run
    pub fn run_to_idle<O: TickObserver>(&mut self, max_ticks: usize, mut observer: O) -> usize {
        let mut ran = 0;
        while ran < max_ticks && self.tick(&mut observer) {
            ran += 1;
        }
        ran
    }

    /// One pass of momentum, gravity and collision at the given alpha,
    /// regardless of the lifecycle state.
    pub fn step(&mut self, alpha: f64) {
        self.seed_positions();

        let before: Vec<Point> = self.nodes.iter().map(|n| n.position()).collect();
        let friction = self.config.friction;
        for node in &mut self.nodes {
            node.x += node.vx * friction;
            node.y += node.vy * friction;
        }

        let pull = alpha * self.config.gravity_strength;
        let ratio = self.config.vertical_gravity_ratio;
        for node in &mut self.nodes {
            let target = gravity::anchor(self.canvas, self.num_groups, node.group);
            gravity::apply(node, target, pull, ratio);
        }

        let positions: Vec<Point> = self.nodes.iter().map(|n| n.position()).collect();
        let tree = QuadTree::build(&positions);
        let params = CollisionParams {
            padding: self.config.padding,
            search_radius: self.config.max_collision_search_radius,
            alpha: self.config.collision_strength * alpha / self.config.initial_alpha,
        };
        for i in 0..self.nodes.len() {
            collision::collide(&mut self.nodes, &tree, i, &params);
        }

        for (node, prev) in self.nodes.iter_mut().zip(before) {
            if let Some(pin) = node.pinned {
                node.x = pin.x;
                node.y = pin.y;
                node.vx = 0.0;
                node.vy = 0.0;
            } else {
                node.vx = node.x - prev.x;
                node.vy = node.y - prev.y;
            }
        }

        self.ticks += 1;
        trace!(tick = self.ticks, alpha, nodes = self.nodes.len(), "tick");
    }

    /// Collision-only passes without gravity or momentum, each node of a pair
    /// taking half the overlap, until no node moves more than `settle_tolerance` or
    /// `settle_passes` have run. Leaves every velocity at zero and returns the
    /// number of passes run.
    fn settle(&mut self) -> usize {
        let params = CollisionParams {
            padding: self.config.padding,
            search_radius: self.config.max_collision_search_radius,
            alpha: SETTLE_STRENGTH,
        };
        let mut passes = 0;
        while passes < self.config.settle_passes {
            passes += 1;
            let before: Vec<Point> = self.nodes.iter().map(|n| n.position()).collect();
            let tree = QuadTree::build(&before);
            for i in 0..self.nodes.len() {
                collision::collide(&mut self.nodes, &tree, i, &params);
            }

            let mut moved: f64 = 0.0;
            for (node, prev) in self.nodes.iter_mut().zip(&before) {
                if let Some(pin) = node.pinned {
                    node.x = pin.x;
                    node.y = pin.y;
                }
                moved = moved.max(node.position().distance_to(*prev));
            }
            if moved <= self.config.settle_tolerance {
                break;
            }
        }

        for node in &mut self.nodes {
            node.vx = 0.0;
            node.vy = 0.0;
        }
        passes
    }

    /// Current `{id, x, y, dx, dy}` of every node
    pub fn updates(&self) -> Vec<TagUpdate> {
        let half_padding = self.config.padding / 2.0;
        self.nodes
            .iter()
            .map(|n| {
                let size = n.size.unwrap_or_default();
                TagUpdate {
                    id: n.id.clone(),
                    x: n.x,
                    y: n.y,
                    dx: size.width,
                    dy: size.height,
                    radius: n.extent() + half_padding,
                }
            })
            .collect()
    }

    /// Place every unpositioned node near its lane anchor
    fn seed_positions(&mut self) {
        let jitter = self.config.seed_jitter;
        for i in 0..self.nodes.len() {
            if self.nodes[i].positioned {
                continue;
            }
            let anchor = gravity::anchor(self.canvas, self.num_groups, self.nodes[i].group);
            let (ox, oy) = if jitter > 0.0 {
                (
                    self.rng.gen_range(-jitter..=jitter),
                    self.rng.gen_range(-jitter..=jitter),
                )
            } else {
                (0.0, 0.0)
            };
            let node = &mut self.nodes[i];
            node.x = anchor.x + ox;
            node.y = anchor.y + oy;
            node.vx = 0.0;
            node.vy = 0.0;
            node.positioned = true;
        }
    }
}
