//! Step-by-step DBSCAN.
//!
//! The run is split into three phases so a host can animate it one unit of
//! work at a time:
//!
//! 1. core detection: one point per step, its eps-neighbourhood is computed
//!    and the point is marked core if it holds at least `min_points` points;
//! 2. cluster expansion: one cluster per step, grown depth-first from an
//!    unassigned core point across core neighbours;
//! 3. border assignment: one non-core point per step, attached to the
//!    cluster of the nearest core point within eps, or marked noise.
//!
//! Unlike the textbook single pass, border points go to the *nearest* core
//! point rather than to whichever cluster reaches them first.

use std::collections::VecDeque;

use bitvec::prelude::*;
use tracing::{debug, trace};

use super::config::SimConfig;
use super::point::{Bounds, Cluster, Label, Point, PointList, Tag};
use super::progress::{Progress, progress};
use super::search::{NeighborSearch, nearest_core};

/// Phase of a run, advancing `Idle -> CoreDetection -> ClusterExpansion -> BorderAssignment -> Idle`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    CoreDetection,
    ClusterExpansion,
    BorderAssignment,
}

/// Whether the host clock is driving the simulator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Idle,
    Running,
    Paused,
}

/// Something that happened during one call to [`ClusterSimulator::advance`]
#[derive(Debug, Clone, PartialEq)]
pub enum StepEvent {
    CoreChecked {
        index: usize,
        neighbors: usize,
        core: bool,
    },
    ClusterFormed {
        id: usize,
        size: usize,
    },
    BorderAssigned {
        index: usize,
        label: Label,
    },
    PhaseChanged {
        from: Phase,
        to: Phase,
    },
}

/// State after one call to [`ClusterSimulator::advance`]
#[derive(Debug, Clone, PartialEq)]
pub struct StepReport {
    pub phase: Phase,
    pub cursor: usize,
    /// Set once the run has completed
    pub done: bool,
    pub events: Vec<StepEvent>,
}

/// Clustering result read back from the points
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    /// Clusters ordered by id; member indices in generation order
    pub clusters: Vec<Cluster>,
    pub noise: Vec<usize>,
    pub unassigned: usize,
    pub core: usize,
}

#[derive(Debug)]
pub struct ClusterSimulator {
    points: PointList,
    /// Parameters of the run in progress
    config: SimConfig,
    /// Parameters picked up by the next `reset`
    next_config: SimConfig,
    phase: Phase,
    cursor: usize,
    /// Expansion seeds, then border candidates
    pending: VecDeque<usize>,
    completed: bool,
    search: NeighborSearch,
    /// Points pushed on the expansion stack during this run
    stacked: BitVec,
}

impl ClusterSimulator {
    pub fn new(points: PointList, config: SimConfig) -> Self {
        let stacked = bitvec![0; points.len()];
        ClusterSimulator {
            points,
            config,
            next_config: config,
            phase: Phase::Idle,
            cursor: 0,
            pending: VecDeque::new(),
            completed: false,
            search: NeighborSearch::BruteForce,
            stacked,
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Parameters of the current (or last) run
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// True once the last started run went through all phases
    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Idle && self.completed
    }

    /// Replaces eps / min_points / search for the next run.
    /// The run in progress keeps its parameters.
    pub fn set_config(&mut self, config: SimConfig) {
        self.next_config = config;
    }

    /// Replaces the point set and drops any run in progress
    pub fn set_points(&mut self, points: PointList) {
        self.stacked = bitvec![0; points.len()];
        self.points = points;
        self.phase = Phase::Idle;
        self.cursor = 0;
        self.pending.clear();
        self.completed = false;
        self.search = NeighborSearch::BruteForce;
    }

    /// Starts a new run over the current points
    pub fn reset(&mut self) {
        for p in &mut self.points {
            p.clear();
        }
        self.config = self.next_config;
        self.search = NeighborSearch::new(self.config.search, &self.points);
        self.stacked.fill(false);
        self.phase = Phase::CoreDetection;
        self.cursor = 0;
        self.pending.clear();
        self.completed = false;
        debug!(
            points = self.points.len(),
            eps = self.config.epsilon,
            min_points = self.config.min_points,
            "run started"
        );
    }

    /// Performs one unit of work for the current phase
    ///
    /// Does nothing when idle.
    pub fn advance(&mut self) -> StepReport {
        let mut events = Vec::new();
        match self.phase {
            Phase::Idle => {}
            Phase::CoreDetection => self.detect_core(&mut events),
            Phase::ClusterExpansion => self.expand_next(&mut events),
            Phase::BorderAssignment => self.assign_next_border(&mut events),
        }
        StepReport {
            phase: self.phase,
            cursor: self.cursor,
            done: self.is_complete(),
            events,
        }
    }

    /// Advances until the run completes, returning the number of steps taken.
    /// Returns 0 if no run was started.
    pub fn run_to_completion(&mut self) -> usize {
        let mut steps = 0;
        while self.phase != Phase::Idle {
            self.advance();
            steps += 1;
        }
        steps
    }

    fn detect_core(&mut self, events: &mut Vec<StepEvent>) {
        if self.cursor >= self.points.len() {
            self.pending = (0..self.points.len())
                .filter(|&i| self.points[i].core && !self.points[i].label.is_assigned())
                .collect();
            self.cursor = 0;
            self.enter(Phase::ClusterExpansion, events);
            return;
        }

        let i = self.cursor;
        let neighbors = self.search.neighbors(&self.points, i, self.config.epsilon);
        let core = neighbors.len() >= self.config.min_points;
        trace!(index = i, neighbors = neighbors.len(), core, "core check");
        events.push(StepEvent::CoreChecked {
            index: i,
            neighbors: neighbors.len(),
            core,
        });

        let p = &mut self.points[i];
        p.neighbors = neighbors;
        p.core = core;
        self.cursor += 1;
    }

    fn expand_next(&mut self, events: &mut Vec<StepEvent>) {
        while let Some(start) = self.pending.pop_front() {
            if self.points[start].label.is_assigned() {
                continue;
            }
            let id = self.cursor;
            let size = self.expand_cluster(start, id);
            trace!(id, size, "cluster formed");
            events.push(StepEvent::ClusterFormed { id, size });
            self.cursor += 1;
            break;
        }

        if self.pending.is_empty() {
            self.pending = (0..self.points.len())
                .filter(|&i| !self.points[i].core && !self.points[i].label.is_assigned())
                .collect();
            self.cursor = 0;
            self.enter(Phase::BorderAssignment, events);
        }
    }

    /// Depth-first expansion from core point `start`, returns the number of points labeled
    fn expand_cluster(&mut self, start: usize, id: usize) -> usize {
        let mut size = 0;
        let mut stack = vec![start];
        self.stacked.set(start, true);

        while let Some(i) = stack.pop() {
            if self.points[i].label.is_assigned() {
                continue;
            }
            self.points[i].label = Label::Cluster(id);
            size += 1;

            for &n in &self.points[i].neighbors {
                let q = &self.points[n];
                if q.core && !q.label.is_assigned() && !self.stacked[n] {
                    self.stacked.set(n, true);
                    stack.push(n);
                }
            }
        }
        size
    }

    fn assign_next_border(&mut self, events: &mut Vec<StepEvent>) {
        while self.cursor < self.points.len() {
            let p = &self.points[self.cursor];
            if !p.core && !p.label.is_assigned() {
                break;
            }
            self.cursor += 1;
        }

        if self.cursor >= self.points.len() {
            self.completed = true;
            self.enter(Phase::Idle, events);
            return;
        }

        let i = self.cursor;
        let label = match nearest_core(&self.points, &self.points[i]) {
            Some((c, d)) if d <= self.config.epsilon => self.points[c].label,
            _ => Label::Noise,
        };
        trace!(index = i, ?label, "border assignment");
        events.push(StepEvent::BorderAssigned { index: i, label });

        self.points[i].label = label;
        if self.pending.front() == Some(&i) {
            self.pending.pop_front();
        }
        self.cursor += 1;
    }

    fn enter(&mut self, to: Phase, events: &mut Vec<StepEvent>) {
        let from = self.phase;
        debug!(?from, ?to, queued = self.pending.len(), "phase change");
        events.push(StepEvent::PhaseChanged { from, to });
        self.phase = to;
    }

    /// Display state of point `i`
    pub fn tag(&self, i: usize) -> Tag {
        let p = &self.points[i];
        let under_cursor = i == self.cursor
            && match self.phase {
                Phase::CoreDetection => true,
                Phase::BorderAssignment => !p.core && !p.label.is_assigned(),
                _ => false,
            };

        match p.label {
            _ if under_cursor => Tag::Processing,
            Label::Cluster(c) => Tag::Cluster(c),
            Label::Noise => Tag::Noise,
            Label::Unassigned if p.core => Tag::Core,
            Label::Unassigned => Tag::Unvisited,
        }
    }

    /// Progress percentage and status text for display
    pub fn progress(&self, run: RunState) -> Progress {
        progress(self, run)
    }

    /// Groups the points by label
    pub fn summary(&self) -> Summary {
        let mut clusters: Vec<Cluster> = Vec::new();
        let mut noise = Vec::new();
        let mut unassigned = 0;
        let mut core = 0;

        for (i, p) in self.points.iter().enumerate() {
            if p.core {
                core += 1;
            }
            match p.label {
                Label::Unassigned => unassigned += 1,
                Label::Noise => noise.push(i),
                Label::Cluster(c) => {
                    while clusters.len() <= c {
                        let next = clusters.len();
                        clusters.push(Cluster {
                            c: next,
                            points: Vec::new(),
                        });
                    }
                    clusters[c].points.push(i);
                }
            }
        }

        Summary {
            clusters,
            noise,
            unassigned,
            core,
        }
    }

    /// Maps every point from `from` onto `to` proportionally, keeping labels and phase
    ///
    /// Does nothing if either rectangle is degenerate (see [`Bounds::validate`]).
    pub fn rescale(&mut self, from: Bounds, to: Bounds) {
        if from.validate().is_err() || to.validate().is_err() {
            debug!(?from, ?to, "rescale skipped for degenerate bounds");
            return;
        }
        let sx = to.width() / from.width();
        let sy = to.height() / from.height();
        for p in &mut self.points {
            p.x = to.min_x + (p.x - from.min_x) * sx;
            p.y = to.min_y + (p.y - from.min_y) * sy;
        }
        if self.phase != Phase::Idle {
            self.search = NeighborSearch::new(self.config.search, &self.points);
        }
        trace!(sx, sy, "points rescaled");
    }
}
