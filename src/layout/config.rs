//! Configuration for the layout simulation

use serde::Deserialize;

/// Configuration options for the force simulation
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Extra gap enforced between adjacent marker boundaries
    pub padding: f64,

    /// Influence radius added to a node's extent when searching for neighbors
    pub max_collision_search_radius: f64,

    /// Cooling coefficient right after a (re)start
    pub initial_alpha: f64,

    /// Geometric decay applied to alpha on every tick
    pub alpha_decay: f64,

    /// The simulation goes idle once alpha falls below this
    pub alpha_min: f64,

    /// Fraction of velocity kept from one tick to the next
    pub friction: f64,

    /// Gravity coefficient as a fraction of alpha
    pub gravity_strength: f64,

    /// Vertical gravity multiplier relative to the horizontal pull
    pub vertical_gravity_ratio: f64,

    /// Collision coefficient at `initial_alpha`; shrinks proportionally as alpha decays
    pub collision_strength: f64,

    /// Half-width of the random offset applied when seeding a new node
    pub seed_jitter: f64,

    /// Seed for the jitter generator
    pub seed: u64,

    /// How many removed nodes keep their last position for re-entry
    pub retired_capacity: usize,

    /// Collision-only passes run when the simulation goes idle
    pub settle_passes: usize,

    /// Settling ends early once no node moves farther than this in a pass
    pub settle_tolerance: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            padding: 15.0,
            max_collision_search_radius: 100.0,
            initial_alpha: 0.1,
            alpha_decay: 0.99,
            alpha_min: 0.005,
            friction: 0.9,
            gravity_strength: 0.1,
            vertical_gravity_ratio: 1.618,
            collision_strength: 0.5,
            seed_jitter: 10.0,
            seed: 0x7A6C_0D5E,
            retired_capacity: 256,
            settle_passes: 300,
            settle_tolerance: 0.01,
        }
    }
}

impl LayoutConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the padding between markers
    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    /// Set the collision search radius
    pub fn with_max_collision_search_radius(mut self, radius: f64) -> Self {
        self.max_collision_search_radius = radius;
        self
    }

    /// Set the cooling schedule
    pub fn with_cooling(mut self, initial_alpha: f64, alpha_decay: f64, alpha_min: f64) -> Self {
        self.initial_alpha = initial_alpha;
        self.alpha_decay = alpha_decay;
        self.alpha_min = alpha_min;
        self
    }

    /// Set the velocity friction
    pub fn with_friction(mut self, friction: f64) -> Self {
        self.friction = friction;
        self
    }

    /// Set the gravity strength
    pub fn with_gravity_strength(mut self, strength: f64) -> Self {
        self.gravity_strength = strength;
        self
    }

    /// Set the collision strength
    pub fn with_collision_strength(mut self, strength: f64) -> Self {
        self.collision_strength = strength;
        self
    }

    /// Set the seeding jitter and its random seed
    pub fn with_seed(mut self, seed: u64, jitter: f64) -> Self {
        self.seed = seed;
        self.seed_jitter = jitter;
        self
    }

    /// Set the collision-only passes run at idle and their early-exit tolerance
    pub fn with_settling(mut self, passes: usize, tolerance: f64) -> Self {
        self.settle_passes = passes;
        self.settle_tolerance = tolerance;
        self
    }

    /// Check the values that would make the simulation diverge or never stop.
    /// Returns the reason for the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        let non_negative = [
            ("padding", self.padding),
            ("max_collision_search_radius", self.max_collision_search_radius),
            ("gravity_strength", self.gravity_strength),
            ("vertical_gravity_ratio", self.vertical_gravity_ratio),
            ("collision_strength", self.collision_strength),
            ("seed_jitter", self.seed_jitter),
            ("settle_tolerance", self.settle_tolerance),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{} must be a non-negative number, got {}", name, value));
            }
        }
        if !(self.initial_alpha > 0.0 && self.initial_alpha.is_finite()) {
            return Err(format!("initial_alpha must be positive, got {}", self.initial_alpha));
        }
        if !(self.alpha_decay > 0.0 && self.alpha_decay < 1.0) {
            return Err(format!("alpha_decay must lie in (0, 1), got {}", self.alpha_decay));
        }
        if !(self.alpha_min > 0.0 && self.alpha_min < self.initial_alpha) {
            return Err(format!(
                "alpha_min must lie in (0, initial_alpha), got {}",
                self.alpha_min
            ));
        }
        if !(0.0..1.0).contains(&self.friction) {
            return Err(format!("friction must lie in [0, 1), got {}", self.friction));
        }
        Ok(())
    }
}
