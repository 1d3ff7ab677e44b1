//! Package cluster implements step-by-step DBSCAN clustering on planar points
pub mod config;
pub mod distance;
pub mod generator;
pub mod kdtree;
pub mod point;
pub mod progress;
pub mod search;
pub mod simulator;

#[cfg(test)]
mod kdtree_test;
#[cfg(test)]
mod simulator_test;

pub use config::{CanvasScale, GeneratorConfig, SearchStrategy, SimConfig};
pub use generator::{adjusted_target, generate};
pub use kdtree::KDTree;
pub use point::{Bounds, Cluster, Label, Point, PointList, Tag, bounding_box};
pub use progress::{Progress, progress};
pub use search::{NeighborSearch, nearest_core, region_query};
pub use simulator::{ClusterSimulator, Phase, RunState, StepEvent, StepReport, Summary};
