//! Region quadtree over node positions.
//!
//! The tree is a read-only snapshot: it is rebuilt from scratch every tick and
//! only answers "which points lie near here". Callers walk it top-down with
//! [`QuadTree::visit`] and prune every quad whose bounds miss their query window,
//! which keeps collision checks well below quadratic for dispersed layouts.

use super::types::{BoundingBox, Point};

/// Points closer than this on both axes are treated as coincident and share a leaf.
const COINCIDENT: f64 = 1e-9;

/// Depth cap; deeper inserts stay in the leaf they reached.
const MAX_DEPTH: usize = 32;

/// One cell of the partition
#[derive(Debug, Clone)]
pub struct Quad {
    bounds: BoundingBox,
    points: Vec<usize>,
    children: Option<[usize; 4]>,
}

impl Quad {
    fn leaf(bounds: BoundingBox) -> Self {
        Self {
            bounds,
            points: Vec::new(),
            children: None,
        }
    }

    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    /// Indices of the points stored directly in this quad (empty for internal quads)
    pub fn points(&self) -> &[usize] {
        &self.points
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }
}

/// A quadtree snapshot of a set of points
#[derive(Debug, Clone, Default)]
pub struct QuadTree {
    quads: Vec<Quad>,
    positions: Vec<Point>,
}

impl QuadTree {
    /// Build a tree over `positions`; point `i` is reported as index `i`.
    pub fn build(positions: &[Point]) -> Self {
        let mut tree = Self {
            quads: Vec::new(),
            positions: positions.to_vec(),
        };
        let Some(root) = square_extent(positions) else {
            return tree;
        };
        tree.quads.push(Quad::leaf(root));
        for index in 0..positions.len() {
            tree.insert(index);
        }
        tree
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Number of quads in the partition
    pub fn quad_count(&self) -> usize {
        self.quads.len()
    }

    /// Bounds of the root quad
    pub fn bounds(&self) -> Option<BoundingBox> {
        self.quads.first().map(|q| q.bounds)
    }

    /// Position of point `index` at build time, `None` if out of range
    pub fn position(&self, index: usize) -> Option<Point> {
        self.positions.get(index).copied()
    }

    fn insert(&mut self, index: usize) {
        let point = self.positions[index];
        let mut current = 0;
        let mut depth = 0;
        loop {
            if let Some(children) = self.quads[current].children {
                current = children[child_slot(&self.quads[current].bounds, point)];
                depth += 1;
                continue;
            }

            let quad = &self.quads[current];
            let must_share = quad.points.is_empty()
                || depth >= MAX_DEPTH
                || quad
                    .points
                    .first()
                    .is_some_and(|&p| coincident(self.positions[p], point));
            if must_share {
                self.quads[current].points.push(index);
                return;
            }

            self.split(current);
        }
    }

    /// Turn a leaf into an internal quad, pushing its points one level down.
    fn split(&mut self, current: usize) {
        let bounds = self.quads[current].bounds;
        let first = self.quads.len();
        for slot in 0..4 {
            self.quads.push(Quad::leaf(quadrant(&bounds, slot)));
        }
        let children = [first, first + 1, first + 2, first + 3];
        let points = std::mem::take(&mut self.quads[current].points);
        self.quads[current].children = Some(children);
        for p in points {
            let slot = child_slot(&bounds, self.positions[p]);
            self.quads[children[slot]].points.push(p);
        }
    }

    /// Walk the tree top-down, pre-order.
    ///
    /// `f` receives each quad; returning `true` skips that quad's children.
    pub fn visit<F>(&self, mut f: F)
    where
        F: FnMut(&Quad) -> bool,
    {
        if self.quads.is_empty() {
            return;
        }
        let mut stack = vec![0usize];
        while let Some(current) = stack.pop() {
            let quad = &self.quads[current];
            if f(quad) {
                continue;
            }
            if let Some(children) = quad.children {
                stack.extend(children.iter().rev());
            }
        }
    }

    /// Indices of every point whose build-time position lies inside `window`
    pub fn query(&self, window: &BoundingBox) -> Vec<usize> {
        let mut found = Vec::new();
        self.visit(|quad| {
            found.extend(
                quad.points()
                    .iter()
                    .copied()
                    .filter(|&p| window.contains(self.positions[p])),
            );
            !quad.bounds().intersects(window)
        });
        found
    }
}

fn coincident(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() < COINCIDENT && (a.y - b.y).abs() < COINCIDENT
}

/// Square box covering all points, or `None` for an empty set
fn square_extent(positions: &[Point]) -> Option<BoundingBox> {
    let first = positions.first()?;
    let mut bounds = BoundingBox::new(first.x, first.y, 0.0, 0.0);
    for p in &positions[1..] {
        bounds = bounds.expand_to_include(*p);
    }
    let side = bounds.width.max(bounds.height).max(1.0);
    Some(BoundingBox::new(bounds.x, bounds.y, side, side))
}

/// Child index for `point`: bit 0 set for the right half, bit 1 for the bottom half
fn child_slot(bounds: &BoundingBox, point: Point) -> usize {
    let mid = bounds.center();
    let right = point.x >= mid.x;
    let bottom = point.y >= mid.y;
    (right as usize) | ((bottom as usize) << 1)
}

fn quadrant(bounds: &BoundingBox, slot: usize) -> BoundingBox {
    let w = bounds.width / 2.0;
    let h = bounds.height / 2.0;
    let x = if slot & 1 == 1 { bounds.x + w } else { bounds.x };
    let y = if slot & 2 == 2 { bounds.y + h } else { bounds.y };
    BoundingBox::new(x, y, w, h)
}
