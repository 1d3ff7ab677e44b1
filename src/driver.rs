//! Cooperative driver between a host clock and the simulator.
//!
//! The host calls [`Driver::tick`] on every clock tick. A unit of work is
//! followed by a settle delay for the display to catch up; ticks arriving
//! before it has elapsed are dropped, never queued.

use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::cluster::{ClusterSimulator, PointList, Progress, RunState, SimConfig, StepReport};

#[derive(Debug)]
pub struct Driver {
    sim: ClusterSimulator,
    run: RunState,
    settle: Duration,
    busy_until: Option<Instant>,
    skipped: usize,
}

impl Driver {
    pub fn new(sim: ClusterSimulator, settle: Duration) -> Self {
        Driver {
            sim,
            run: RunState::Idle,
            settle,
            busy_until: None,
            skipped: 0,
        }
    }

    pub fn simulator(&self) -> &ClusterSimulator {
        &self.sim
    }

    pub fn into_simulator(self) -> ClusterSimulator {
        self.sim
    }

    pub fn run_state(&self) -> RunState {
        self.run
    }

    /// Ticks dropped because a settle delay was still outstanding
    pub fn skipped_ticks(&self) -> usize {
        self.skipped
    }

    /// Parameters for the next run
    pub fn set_config(&mut self, config: SimConfig) {
        self.sim.set_config(config);
    }

    /// Starts a fresh run over the current points
    pub fn start(&mut self) {
        self.sim.reset();
        self.run = RunState::Running;
        self.busy_until = None;
        self.skipped = 0;
    }

    pub fn pause(&mut self) {
        if self.run == RunState::Running {
            self.run = RunState::Paused;
            debug!(phase = ?self.sim.phase(), cursor = self.sim.cursor(), "paused");
        }
    }

    pub fn resume(&mut self) {
        if self.run == RunState::Paused {
            self.run = RunState::Running;
            debug!(phase = ?self.sim.phase(), cursor = self.sim.cursor(), "resumed");
        }
    }

    /// Start, pause or resume depending on the current run state
    pub fn toggle(&mut self) {
        match self.run {
            RunState::Idle => self.start(),
            RunState::Running => self.pause(),
            RunState::Paused => self.resume(),
        }
    }

    /// Stops the clock. The run state is discarded by the next `start`.
    pub fn stop(&mut self) {
        self.run = RunState::Idle;
        self.busy_until = None;
    }

    /// Replaces the point set; any run in progress is dropped
    pub fn regenerate(&mut self, points: PointList) {
        self.sim.set_points(points);
        self.stop();
    }

    /// Handles one clock tick
    ///
    /// Returns the step report if a unit of work was performed.
    pub fn tick(&mut self, now: Instant) -> Option<StepReport> {
        if self.run != RunState::Running {
            return None;
        }
        if let Some(until) = self.busy_until {
            if now < until {
                self.skipped += 1;
                trace!(skipped = self.skipped, "tick skipped while settling");
                return None;
            }
        }

        let report = self.sim.advance();
        self.busy_until = Some(now + self.settle);
        if report.done {
            debug!(skipped = self.skipped, "run completed");
            self.stop();
        }
        Some(report)
    }

    pub fn progress(&self) -> Progress {
        self.sim.progress(self.run)
    }
}
