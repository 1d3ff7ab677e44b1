use super::simulator::{ClusterSimulator, Phase, RunState};

/// Share of the progress bar given to each phase
const PHASE_SHARE: f64 = 33.33;

/// Progress of a run for display
#[derive(Debug, Clone, PartialEq)]
pub struct Progress {
    /// 0 to 100; exactly 100 only for a completed run
    pub percent: f64,
    pub label: String,
}

/// Projects the simulator state onto a percentage and a status line
///
/// Each phase fills its own third of the bar. Phase shares top out at
/// 99.99, so only a completed run shows 100.
pub fn progress(sim: &ClusterSimulator, run: RunState) -> Progress {
    let points = sim.points();
    let cursor = sim.cursor();

    let (percent, label) = match sim.phase() {
        Phase::Idle if sim.is_complete() => (100.0, "Algorithm completed!".to_string()),
        Phase::Idle => (0.0, "Ready to start".to_string()),
        Phase::CoreDetection => {
            let n = points.len();
            (
                fraction(cursor, n) * PHASE_SHARE,
                format!("Identifying core points... ({cursor}/{n})"),
            )
        }
        Phase::ClusterExpansion => {
            let remaining = points
                .iter()
                .filter(|p| p.core && !p.label.is_assigned())
                .count();
            (
                PHASE_SHARE + fraction(cursor, remaining + cursor) * PHASE_SHARE,
                format!("Forming clusters... ({cursor} clusters formed)"),
            )
        }
        Phase::BorderAssignment => {
            let non_core = points.iter().filter(|p| !p.core).count();
            let processed = points
                .iter()
                .filter(|p| !p.core && p.label.is_assigned())
                .count();
            (
                2.0 * PHASE_SHARE + fraction(processed, non_core) * PHASE_SHARE,
                format!("Assigning border points... ({processed}/{non_core})"),
            )
        }
    };

    let label = if run == RunState::Paused {
        "Algorithm paused...".to_string()
    } else {
        label
    };

    Progress {
        percent: percent.clamp(0.0, 100.0),
        label,
    }
}

fn fraction(done: usize, total: usize) -> f64 {
    done as f64 / total.max(1) as f64
}
