//! Point model shared by the generator, the search strategies and the simulator

use super::distance::euclidean;

/// Cluster assignment of a point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Label {
    /// Not processed yet in the current run
    #[default]
    Unassigned,
    /// Not within eps of any core point
    Noise,
    /// Member of the cluster with the given id
    Cluster(usize),
}

impl Label {
    /// Returns cluster id, if any
    pub fn cluster_id(&self) -> Option<usize> {
        match *self {
            Label::Cluster(c) => Some(c),
            _ => None,
        }
    }

    pub fn is_assigned(&self) -> bool {
        *self != Label::Unassigned
    }

    /// Numeric label in the conventional DBSCAN encoding: cluster id, or -1 for noise
    /// and -2 for unassigned points
    pub fn as_i64(&self) -> i64 {
        match *self {
            Label::Unassigned => -2,
            Label::Noise => -1,
            Label::Cluster(c) => c as i64,
        }
    }
}

/// Display state of a point, derived from its label, core flag and the simulator cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Unvisited,
    /// Point currently under the cursor
    Processing,
    Core,
    Cluster(usize),
    Noise,
}

/// Point is one 2D sample together with its per-run clustering state
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub label: Label,
    pub core: bool,
    /// Indices of all points within eps (including this one), in generation order.
    /// Filled once during core detection.
    pub neighbors: Vec<usize>,
}

/// PointList is a collection of Points
pub type PointList = Vec<Point>;

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point {
            x,
            y,
            label: Label::Unassigned,
            core: false,
            neighbors: Vec::new(),
        }
    }

    /// Euclidean distance to another point
    pub fn dist(&self, b: &Point) -> f64 {
        euclidean(self.xy(), b.xy())
    }

    pub fn xy(&self) -> [f64; 2] {
        [self.x, self.y]
    }

    /// Clears per-run state, keeping the position
    pub fn clear(&mut self) {
        self.label = Label::Unassigned;
        self.core = false;
        self.neighbors.clear();
    }
}

/// Axis-aligned rectangle, `min` is the top-left corner in canvas coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Bounds {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Canvas of the given size with the origin in the top-left corner
    pub fn canvas(width: f64, height: f64) -> Self {
        Bounds::new(0.0, 0.0, width, height)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Checks if (x, y) is inside the rectangle, edges included
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    /// Returns the rectangle shrunk by `margin` on every side
    pub fn inset(&self, margin: f64) -> Bounds {
        Bounds::new(
            self.min_x + margin,
            self.min_y + margin,
            self.max_x - margin,
            self.max_y - margin,
        )
    }

    pub fn validate(&self) -> crate::error::Result<()> {
        let finite = [self.min_x, self.min_y, self.max_x, self.max_y]
            .iter()
            .all(|v| v.is_finite());
        if !finite || self.width() <= 0.0 || self.height() <= 0.0 {
            return Err(crate::error::Error::InvalidParameter {
                name: "bounds",
                message: "must be finite with positive width and height",
            });
        }
        Ok(())
    }
}

/// Calculates bounding rectangle of the points
///
/// Returns `None` for an empty list
pub fn bounding_box(points: &[Point]) -> Option<Bounds> {
    let first = points.first()?;
    let mut b = Bounds::new(first.x, first.y, first.x, first.y);
    for p in &points[1..] {
        b.min_x = b.min_x.min(p.x);
        b.min_y = b.min_y.min(p.y);
        b.max_x = b.max_x.max(p.x);
        b.max_y = b.max_y.max(p.y);
    }
    Some(b)
}

/// Cluster represents one cluster found by a run
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    /// Cluster ID
    pub c: usize,
    /// Indices of points belonging to this cluster
    pub points: Vec<usize>,
}

impl Cluster {
    /// Calculates center and cluster bounds
    ///
    /// Returns `None` if the cluster is empty
    pub fn centroid_and_bounds(&self, points: &[Point]) -> Option<([f64; 2], Bounds)> {
        let members: Vec<Point> = self.points.iter().map(|&i| points[i].clone()).collect();
        let bounds = bounding_box(&members)?;

        let mut center = [0.0, 0.0];
        for p in &members {
            center[0] += p.x;
            center[1] += p.y;
        }
        let n = members.len() as f64;
        Some(([center[0] / n, center[1] / n], bounds))
    }
}
