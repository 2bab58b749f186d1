//! Core types for the layout engine

use serde::Serialize;

/// A 2D point in canvas coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance_to(&self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Measured extent of a rendered label
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    /// Create a size, clamping negative or non-finite measurements to zero
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: clamp_extent(width),
            height: clamp_extent(height),
        }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    /// Half of the larger dimension: the radius of the circle enclosing the label
    pub fn extent(&self) -> f64 {
        self.width.max(self.height) / 2.0
    }
}

fn clamp_extent(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 {
        v
    } else {
        0.0
    }
}

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Square box of half-side `r` centered on `center`
    pub fn around(center: Point, r: f64) -> Self {
        Self::new(center.x - r, center.y - r, 2.0 * r, 2.0 * r)
    }

    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    /// Right edge x-coordinate
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge y-coordinate
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point {
            x: self.x + self.width / 2.0,
            y: self.y + self.height / 2.0,
        }
    }

    /// Check if this box contains a point (edges inclusive)
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.right()
            && point.y >= self.y
            && point.y <= self.bottom()
    }

    /// Check if this box intersects another (touching edges count)
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.x <= other.right()
            && self.right() >= other.x
            && self.y <= other.bottom()
            && self.bottom() >= other.y
    }

    /// Expand this box to include a point
    pub fn expand_to_include(&self, point: Point) -> BoundingBox {
        let x = self.x.min(point.x);
        let y = self.y.min(point.y);
        let right = self.right().max(point.x);
        let bottom = self.bottom().max(point.y);
        BoundingBox::new(x, y, right - x, bottom - y)
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::zero()
    }
}

/// One tag inside the simulation
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Identity key, unique within a dataset
    pub id: String,
    pub x: f64,
    pub y: f64,
    /// Velocity carried from the previous tick
    pub vx: f64,
    pub vy: f64,
    /// Measured label extent; `None` until the sizing adapter has reported
    pub size: Option<Size>,
    /// Lane index of the node's group
    pub group: usize,
    /// Key of a linked node that this node never collides with
    pub other: Option<String>,
    /// Fixed position held by the host (e.g. while dragging)
    pub pinned: Option<Point>,
    /// Whether `x`/`y` hold a real position yet
    pub positioned: bool,
}

impl Node {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            x: 0.0,
            y: 0.0,
            vx: 0.0,
            vy: 0.0,
            size: None,
            group: 0,
            other: None,
            pinned: None,
            positioned: false,
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Whether the sizing adapter has reported for this node
    pub fn is_sized(&self) -> bool {
        self.size.is_some()
    }

    /// Collision extent; unsized nodes count as zero-radius
    pub fn extent(&self) -> f64 {
        self.size.map(|s| s.extent()).unwrap_or(0.0)
    }

    /// Whether collisions between `self` and `other` are suppressed
    pub fn is_linked_to(&self, other: &Node) -> bool {
        self.other.as_deref() == Some(other.id.as_str())
            || other.other.as_deref() == Some(self.id.as_str())
    }
}

/// Position update emitted to the rendering collaborator after every tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagUpdate {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub dx: f64,
    pub dy: f64,
    /// Radius of the marker circle drawn behind the label
    pub radius: f64,
}

/// A tag as placed on the canvas, ready for rendering
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedTag {
    pub id: String,
    pub group: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub radius: f64,
    pub font_size: f64,
}

impl PlacedTag {
    /// Top-left corner of the label box
    pub fn label_origin(&self) -> Point {
        Point::new(self.x - self.width / 2.0, self.y - self.height / 2.0)
    }
}

/// Complete layout at one moment of the simulation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutSnapshot {
    pub canvas: Size,
    pub num_groups: usize,
    pub alpha: f64,
    pub tags: Vec<PlacedTag>,
}

impl LayoutSnapshot {
    pub fn tag(&self, id: &str) -> Option<&PlacedTag> {
        self.tags.iter().find(|t| t.id == id)
    }

    /// Smallest box containing every marker circle, or the canvas when empty
    pub fn bounds(&self) -> BoundingBox {
        let mut tags = self.tags.iter();
        let Some(first) = tags.next() else {
            return BoundingBox::new(0.0, 0.0, self.canvas.width, self.canvas.height);
        };
        let mut bounds = BoundingBox::around(Point::new(first.x, first.y), first.radius);
        for tag in tags {
            let b = BoundingBox::around(Point::new(tag.x, tag.y), tag.radius);
            bounds = bounds
                .expand_to_include(Point::new(b.x, b.y))
                .expand_to_include(Point::new(b.right(), b.bottom()));
        }
        bounds
    }
}
