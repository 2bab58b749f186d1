//! Tag cloud front end.
//!
//! [`TagCloudBuilder`] collects the accessors that read labels, sizes and
//! groups out of the caller's data, and refuses to build without the two
//! required ones. [`TagCloud`] then turns each dataset into simulation nodes,
//! measures their labels and drives the simulation.

use std::collections::HashMap;

use crate::error::ConfigError;
use crate::layout::{
    LayoutConfig, LayoutError, LayoutSnapshot, NodeSpec, PlacedTag, Point, Reconciliation,
    Simulation, Size, TickObserver,
};
use crate::measure::{MonospaceMeasurer, TagMeasurer};
use crate::scale::LinearScale;

type KeyFn<T> = Box<dyn Fn(&T) -> String>;
type OptionalKeyFn<T> = Box<dyn Fn(&T) -> Option<String>>;
type SizeFn<T> = Box<dyn Fn(&T) -> f64>;
type ClickFn<T> = Box<dyn Fn(&T)>;

/// Builder for a [`TagCloud`]
pub struct TagCloudBuilder<T> {
    tag_labels: Option<KeyFn<T>>,
    tag_size: Option<SizeFn<T>>,
    group_id: Option<OptionalKeyFn<T>>,
    paired_with: Option<OptionalKeyFn<T>>,
    tag_click_callback: Option<ClickFn<T>>,
    font_scale: LinearScale,
    layout: LayoutConfig,
    measurer: Box<dyn TagMeasurer>,
}

impl<T> Default for TagCloudBuilder<T> {
    fn default() -> Self {
        Self {
            tag_labels: None,
            tag_size: None,
            group_id: None,
            paired_with: None,
            tag_click_callback: None,
            font_scale: LinearScale::default(),
            layout: LayoutConfig::default(),
            measurer: Box::new(MonospaceMeasurer::default()),
        }
    }
}

impl<T> TagCloudBuilder<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Display text and identity key of a datum (required)
    pub fn tag_labels(mut self, f: impl Fn(&T) -> String + 'static) -> Self {
        self.tag_labels = Some(Box::new(f));
        self
    }

    /// Size metric of a datum, fed through the font scale (required)
    pub fn tag_size(mut self, f: impl Fn(&T) -> f64 + 'static) -> Self {
        self.tag_size = Some(Box::new(f));
        self
    }

    /// Group key of a datum; without it every tag shares one lane
    pub fn group_id(mut self, f: impl Fn(&T) -> Option<String> + 'static) -> Self {
        self.group_id = Some(Box::new(f));
        self
    }

    /// Key of a companion tag the datum never collides with
    pub fn paired_with(mut self, f: impl Fn(&T) -> Option<String> + 'static) -> Self {
        self.paired_with = Some(Box::new(f));
        self
    }

    /// Handler invoked by [`TagCloud::click`]
    pub fn tag_click_callback(mut self, f: impl Fn(&T) + 'static) -> Self {
        self.tag_click_callback = Some(Box::new(f));
        self
    }

    pub fn font_scale(mut self, scale: LinearScale) -> Self {
        self.font_scale = scale;
        self
    }

    pub fn padding(mut self, padding: f64) -> Self {
        self.layout.padding = padding;
        self
    }

    pub fn max_collision_search_radius(mut self, radius: f64) -> Self {
        self.layout.max_collision_search_radius = radius;
        self
    }

    /// Replace the whole layout configuration
    pub fn layout(mut self, config: LayoutConfig) -> Self {
        self.layout = config;
        self
    }

    pub fn measurer(mut self, measurer: impl TagMeasurer + 'static) -> Self {
        self.measurer = Box::new(measurer);
        self
    }

    /// Validate the configuration and create the cloud for a `width` x `height` canvas
    pub fn build(self, width: f64, height: f64) -> Result<TagCloud<T>, ConfigError> {
        let tag_labels = self.tag_labels.ok_or(ConfigError::MissingTagLabels)?;
        let tag_size = self.tag_size.ok_or(ConfigError::MissingTagSize)?;
        validate_canvas(width, height)?;
        if !self.font_scale.is_finite() {
            return Err(ConfigError::InvalidFontScale);
        }
        self.layout.validate().map_err(ConfigError::InvalidLayout)?;

        Ok(TagCloud {
            tag_labels,
            tag_size,
            group_id: self.group_id,
            paired_with: self.paired_with,
            tag_click_callback: self.tag_click_callback,
            font_scale: self.font_scale,
            measurer: self.measurer,
            simulation: Simulation::new(Size::new(width, height), self.layout),
            data: Vec::new(),
            by_key: HashMap::new(),
        })
    }
}

fn validate_canvas(width: f64, height: f64) -> Result<(), ConfigError> {
    if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidCanvas { width, height })
    }
}

/// A configured tag cloud bound to one canvas
pub struct TagCloud<T> {
    tag_labels: KeyFn<T>,
    tag_size: SizeFn<T>,
    group_id: Option<OptionalKeyFn<T>>,
    paired_with: Option<OptionalKeyFn<T>>,
    tag_click_callback: Option<ClickFn<T>>,
    font_scale: LinearScale,
    measurer: Box<dyn TagMeasurer>,
    simulation: Simulation,
    data: Vec<T>,
    by_key: HashMap<String, usize>,
}

impl<T> TagCloud<T> {
    pub fn builder() -> TagCloudBuilder<T> {
        TagCloudBuilder::new()
    }

    /// Supply a dataset.
    ///
    /// Every datum is measured, matched to the existing nodes by label, and
    /// the simulation is (re)started when anything changed.
    pub fn update(&mut self, data: Vec<T>) -> Reconciliation {
        let specs: Vec<NodeSpec> = data
            .iter()
            .map(|datum| {
                let id = (self.tag_labels)(datum);
                let font_size = self.font_scale.apply((self.tag_size)(datum));
                let size = self.measurer.measure(&id, font_size);
                NodeSpec {
                    group: self.group_id.as_ref().and_then(|f| f(datum)),
                    other: self.paired_with.as_ref().and_then(|f| f(datum)),
                    size: Some(size),
                    id,
                }
            })
            .collect();

        self.by_key.clear();
        for (i, spec) in specs.iter().enumerate() {
            self.by_key.entry(spec.id.clone()).or_insert(i);
        }
        self.data = data;

        let rec = self.simulation.set_nodes(specs);
        if rec.has_changes() {
            self.simulation.start();
        }
        rec
    }

    /// Run one tick; returns whether another is wanted
    pub fn tick<O: TickObserver>(&mut self, observer: O) -> bool {
        self.simulation.tick(observer)
    }

    /// Tick until idle or `max_ticks`; returns the number of ticks run
    pub fn run_to_idle<O: TickObserver>(&mut self, max_ticks: usize, observer: O) -> usize {
        self.simulation.run_to_idle(max_ticks, observer)
    }

    /// Reheat the simulation without reseeding
    pub fn resume(&mut self) {
        self.simulation.resume();
    }

    pub fn stop(&mut self) {
        self.simulation.stop();
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    /// Direct access for hosts feeding sizes or pins asynchronously
    pub fn simulation_mut(&mut self) -> &mut Simulation {
        &mut self.simulation
    }

    /// The dataset last passed to [`TagCloud::update`]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn datum(&self, id: &str) -> Option<&T> {
        self.by_key.get(id).map(|&i| &self.data[i])
    }

    /// Font size of a tag through the font scale
    pub fn font_size_of(&self, id: &str) -> Option<f64> {
        self.datum(id).map(|d| self.font_scale.apply((self.tag_size)(d)))
    }

    /// Swap the layout configuration of a live cloud and reheat it so the new
    /// values take effect
    pub fn set_layout_config(&mut self, config: LayoutConfig) -> Result<(), ConfigError> {
        config.validate().map_err(ConfigError::InvalidLayout)?;
        self.simulation.set_config(config);
        self.simulation.resume();
        Ok(())
    }

    /// Resize the canvas; lane anchors move with it
    pub fn set_canvas(&mut self, width: f64, height: f64) -> Result<(), ConfigError> {
        validate_canvas(width, height)?;
        self.simulation.set_canvas(Size::new(width, height));
        self.simulation.resume();
        Ok(())
    }

    /// Hold a tag at `position`, as while it is being dragged
    pub fn pin(&mut self, id: &str, position: Point) -> Result<(), LayoutError> {
        self.simulation.pin(id, position)?;
        self.simulation.resume();
        Ok(())
    }

    pub fn unpin(&mut self, id: &str) -> Result<(), LayoutError> {
        self.simulation.unpin(id)
    }

    /// Invoke the click callback for tag `id`.
    ///
    /// Returns whether a callback was configured.
    pub fn click(&self, id: &str) -> Result<bool, LayoutError> {
        let datum = self.datum(id).ok_or_else(|| LayoutError::unknown(id))?;
        match &self.tag_click_callback {
            Some(callback) => {
                callback(datum);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Tag whose marker circle contains `point`, nearest center first
    pub fn hit_test(&self, point: Point) -> Option<&str> {
        let half_padding = self.simulation.config().padding / 2.0;
        self.simulation
            .nodes()
            .iter()
            .filter(|n| n.positioned)
            .map(|n| (n, n.position().distance_to(point)))
            .filter(|(n, d)| *d <= n.extent() + half_padding)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(n, _)| n.id.as_str())
    }

    /// Current layout with font sizes, in dataset order
    pub fn snapshot(&self) -> LayoutSnapshot {
        let half_padding = self.simulation.config().padding / 2.0;
        let tags = self
            .simulation
            .nodes()
            .iter()
            .map(|n| {
                let size = n.size.unwrap_or_default();
                PlacedTag {
                    id: n.id.clone(),
                    group: n.group,
                    x: n.x,
                    y: n.y,
                    width: size.width,
                    height: size.height,
                    radius: n.extent() + half_padding,
                    font_size: self.font_size_of(&n.id).unwrap_or(self.font_scale.range.0),
                }
            })
            .collect();
        LayoutSnapshot {
            canvas: self.simulation.canvas(),
            num_groups: self.simulation.num_groups(),
            alpha: self.simulation.alpha(),
            tags,
        }
    }
}
