use crate::error::{Error, Result};

/// Reference canvas the base sizes below are tuned for
pub const BASE_WIDTH: f64 = 800.0;
pub const BASE_HEIGHT: f64 = 430.0;
/// Point radius in pixels on the reference canvas
pub const BASE_POINT_RADIUS: f64 = 4.0;
/// Minimum distance between generated points on the reference canvas
pub const BASE_MIN_DISTANCE: f64 = 12.0;

/// How neighbor queries are answered during core detection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SearchStrategy {
    /// Pairwise scan over all points
    #[default]
    BruteForce,
    /// 2-d tree built once per run
    KdTree,
}

/// Parameters of a DBSCAN run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimConfig {
    /// Neighbourhood radius, inclusive
    pub epsilon: f64,
    /// Minimum number of points in eps-neighbourhood (including the point itself)
    /// for the point to be core
    pub min_points: usize,
    pub search: SearchStrategy,
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            epsilon: 60.0,
            min_points: 4,
            search: SearchStrategy::BruteForce,
        }
    }
}

impl SimConfig {
    pub fn new(epsilon: f64, min_points: usize) -> Self {
        SimConfig {
            epsilon,
            min_points,
            ..SimConfig::default()
        }
    }

    pub fn with_search(mut self, search: SearchStrategy) -> Self {
        self.search = search;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.epsilon.is_finite() || self.epsilon <= 0.0 {
            return Err(Error::InvalidParameter {
                name: "epsilon",
                message: "must be finite and positive",
            });
        }
        if self.min_points == 0 {
            return Err(Error::InvalidParameter {
                name: "min_points",
                message: "must be at least 1",
            });
        }
        Ok(())
    }
}

/// Parameters of the blob generator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneratorConfig {
    /// Candidates closer than this to an accepted point are rejected
    pub min_distance: f64,
    /// Margin on each side, as a fraction of the smaller canvas side
    pub margin_ratio: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            min_distance: BASE_MIN_DISTANCE,
            margin_ratio: 0.05,
        }
    }
}

/// Sizes scaled to a concrete canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasScale {
    /// `sqrt(area / reference area)`
    pub factor: f64,
    pub point_radius: f64,
    pub min_distance: f64,
    /// Suggested eps: a twentieth of the smaller side, scaled, but never below
    /// twice the minimum point distance
    pub epsilon: f64,
}

impl CanvasScale {
    pub fn for_canvas(width: f64, height: f64) -> Self {
        let factor = ((width * height) / (BASE_WIDTH * BASE_HEIGHT)).sqrt();
        let min_distance = BASE_MIN_DISTANCE * factor;
        let base_epsilon = width.min(height) / 20.0;

        CanvasScale {
            factor,
            point_radius: BASE_POINT_RADIUS * factor,
            min_distance,
            epsilon: (base_epsilon * factor).max(min_distance * 2.0),
        }
    }

    /// Generator settings matching this canvas
    pub fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig {
            min_distance: self.min_distance,
            ..GeneratorConfig::default()
        }
    }
}
