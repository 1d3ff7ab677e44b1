//! Step-by-step DBSCAN clustering simulator.
//!
//! A host generates (or loads) points, starts a run and then advances it one
//! unit of work per clock tick, reading back point states and progress for
//! display after every step.

pub mod cluster;
pub mod driver;
pub mod error;


pub use cluster::{ClusterSimulator, Point, PointList, SimConfig};
pub use driver::Driver;
pub use error::{Error, Result};
