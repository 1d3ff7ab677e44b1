#[cfg(test)]
mod tests {
    use crate::cluster::{
        ClusterSimulator, Label, Phase, Point, PointList, SearchStrategy, SimConfig, StepEvent,
        Tag,
    };
    use quickcheck::{TestResult, quickcheck};

    fn points(coords: &[(f64, f64)]) -> PointList {
        coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    /// Five mutually close points and one far away
    fn tight_cluster_and_outlier() -> PointList {
        points(&[
            (0.0, 0.0),
            (1.0, 0.0),
            (0.0, 1.0),
            (1.0, 1.0),
            (0.5, 0.5),
            (100.0, 100.0),
        ])
    }

    /// Two lines of six points, a point halfway between their inner ends,
    /// a point hanging off the left line and a far away point
    fn two_lines() -> PointList {
        let mut coords = Vec::new();
        for x in 0..6 {
            coords.push((x as f64, 0.0));
        }
        for x in 15..21 {
            coords.push((x as f64, 0.0));
        }
        coords.push((10.0, 0.0));
        coords.push((50.0, 0.0));
        coords.push((-4.0, 0.0));
        points(&coords)
    }

    fn run(points: PointList, config: SimConfig) -> ClusterSimulator {
        let mut sim = ClusterSimulator::new(points, config);
        sim.reset();
        sim.run_to_completion();
        sim
    }

    fn labels(sim: &ClusterSimulator) -> Vec<Label> {
        sim.points().iter().map(|p| p.label).collect()
    }

    #[test]
    fn test_tight_cluster_and_outlier() {
        let sim = run(tight_cluster_and_outlier(), SimConfig::new(10.0, 3));

        for p in &sim.points()[..5] {
            assert!(p.core);
            assert_eq!(p.label, Label::Cluster(0));
        }
        assert!(!sim.points()[5].core);
        assert_eq!(sim.points()[5].label, Label::Noise);

        let summary = sim.summary();
        assert_eq!(summary.clusters.len(), 1);
        assert_eq!(summary.clusters[0].points, vec![0, 1, 2, 3, 4]);
        assert_eq!(summary.noise, vec![5]);
        assert_eq!(summary.unassigned, 0);
        assert_eq!(summary.core, 5);
    }

    #[test]
    fn test_min_points_too_high_gives_only_noise() {
        let sim = run(tight_cluster_and_outlier(), SimConfig::new(10.0, 7));

        assert!(sim.points().iter().all(|p| !p.core));
        assert!(sim.points().iter().all(|p| p.label == Label::Noise));
        assert!(sim.summary().clusters.is_empty());
    }

    #[test]
    fn test_phase_sequence() {
        let mut sim = ClusterSimulator::new(tight_cluster_and_outlier(), SimConfig::new(10.0, 3));
        assert_eq!(sim.phase(), Phase::Idle);
        sim.reset();
        assert_eq!(sim.phase(), Phase::CoreDetection);

        for i in 0..6 {
            let report = sim.advance();
            assert_eq!(report.phase, Phase::CoreDetection);
            assert_eq!(report.cursor, i + 1);
            assert!(!report.done);
            assert!(matches!(
                report.events[..],
                [StepEvent::CoreChecked { index, .. }] if index == i
            ));
        }

        let report = sim.advance();
        assert_eq!(report.phase, Phase::ClusterExpansion);
        assert_eq!(report.cursor, 0);

        // Whole cluster formed in one step
        let report = sim.advance();
        assert_eq!(report.phase, Phase::ClusterExpansion);
        assert_eq!(report.cursor, 1);
        assert_eq!(report.events, vec![StepEvent::ClusterFormed { id: 0, size: 5 }]);

        // Remaining seeds are already assigned and get discarded
        let report = sim.advance();
        assert_eq!(report.phase, Phase::BorderAssignment);
        assert_eq!(
            report.events,
            vec![StepEvent::PhaseChanged {
                from: Phase::ClusterExpansion,
                to: Phase::BorderAssignment
            }]
        );

        let report = sim.advance();
        assert_eq!(report.phase, Phase::BorderAssignment);
        assert_eq!(report.cursor, 6);
        assert_eq!(
            report.events,
            vec![StepEvent::BorderAssigned {
                index: 5,
                label: Label::Noise
            }]
        );

        let report = sim.advance();
        assert_eq!(report.phase, Phase::Idle);
        assert!(report.done);
        assert!(sim.is_complete());
    }

    #[test]
    fn test_run_to_completion_counts_steps() {
        let mut sim = ClusterSimulator::new(tight_cluster_and_outlier(), SimConfig::new(10.0, 3));
        assert_eq!(sim.run_to_completion(), 0);

        sim.reset();
        assert_eq!(sim.run_to_completion(), 11);
    }

    #[test]
    fn test_empty_point_set() {
        let mut sim = ClusterSimulator::new(PointList::new(), SimConfig::default());
        sim.reset();
        assert_eq!(sim.advance().phase, Phase::ClusterExpansion);
        assert_eq!(sim.advance().phase, Phase::BorderAssignment);
        let report = sim.advance();
        assert_eq!(report.phase, Phase::Idle);
        assert!(report.done);
    }

    #[test]
    fn test_advance_after_completion_is_noop() {
        let mut sim = run(two_lines(), SimConfig::new(5.0, 4));
        let before = sim.points().to_vec();

        for _ in 0..3 {
            let report = sim.advance();
            assert!(report.done);
            assert_eq!(report.phase, Phase::Idle);
            assert!(report.events.is_empty());
        }
        assert_eq!(sim.points(), &before[..]);
    }

    #[test]
    fn test_advance_before_start_is_noop() {
        let mut sim = ClusterSimulator::new(two_lines(), SimConfig::new(5.0, 4));
        let report = sim.advance();
        assert!(!report.done);
        assert_eq!(report.phase, Phase::Idle);
        assert!(sim.points().iter().all(|p| p.label == Label::Unassigned));
    }

    #[test]
    fn test_border_points_and_tie_break() {
        let sim = run(two_lines(), SimConfig::new(5.0, 4));
        let points = sim.points();

        for i in 0..6 {
            assert!(points[i].core, "point {} should be core", i);
            assert_eq!(points[i].label, Label::Cluster(0));
        }
        for i in 6..12 {
            assert!(points[i].core, "point {} should be core", i);
            assert_eq!(points[i].label, Label::Cluster(1));
        }

        // Exactly eps away from the last core of each line: the first one in scan order wins
        assert!(!points[12].core);
        assert_eq!(points[12].neighbors, vec![5, 6, 12]);
        assert_eq!(points[12].label, Label::Cluster(0));

        assert_eq!(points[13].label, Label::Noise);

        assert!(!points[14].core);
        assert_eq!(points[14].label, Label::Cluster(0));
    }

    #[test]
    fn test_neighbors_and_core_flag() {
        let sim = run(two_lines(), SimConfig::new(5.0, 4));
        let min_points = sim.config().min_points;

        for (i, p) in sim.points().iter().enumerate() {
            assert!(p.neighbors.contains(&i));
            assert!(p.neighbors.windows(2).all(|w| w[0] < w[1]));
            assert_eq!(p.core, p.neighbors.len() >= min_points);
        }
    }

    #[test]
    fn test_rerun_is_deterministic() {
        let mut sim = run(two_lines(), SimConfig::new(5.0, 4));
        let first = labels(&sim);

        sim.reset();
        assert!(sim.points().iter().all(|p| p.label == Label::Unassigned));
        assert!(sim.points().iter().all(|p| !p.core && p.neighbors.is_empty()));
        sim.run_to_completion();
        assert_eq!(labels(&sim), first);
    }

    #[test]
    fn test_kd_tree_matches_brute_force() {
        let brute = run(two_lines(), SimConfig::new(5.0, 4));
        let tree = run(
            two_lines(),
            SimConfig::new(5.0, 4).with_search(SearchStrategy::KdTree),
        );
        assert_eq!(brute.points(), tree.points());
    }

    #[test]
    fn test_set_config_applies_on_reset() {
        let mut sim = ClusterSimulator::new(tight_cluster_and_outlier(), SimConfig::new(10.0, 3));
        sim.reset();
        sim.advance();
        sim.set_config(SimConfig::new(10.0, 7));
        assert_eq!(sim.config().min_points, 3);
        sim.run_to_completion();
        assert_eq!(sim.points()[0].label, Label::Cluster(0));

        sim.reset();
        assert_eq!(sim.config().min_points, 7);
        sim.run_to_completion();
        assert!(sim.points().iter().all(|p| p.label == Label::Noise));
    }

    #[test]
    fn test_set_points_drops_run() {
        let mut sim = run(two_lines(), SimConfig::new(5.0, 4));
        sim.set_points(tight_cluster_and_outlier());
        assert_eq!(sim.phase(), Phase::Idle);
        assert!(!sim.is_complete());
        assert_eq!(sim.points().len(), 6);
    }

    #[test]
    fn test_tags() {
        let mut sim = ClusterSimulator::new(tight_cluster_and_outlier(), SimConfig::new(10.0, 3));
        assert_eq!(sim.tag(0), Tag::Unvisited);

        sim.reset();
        assert_eq!(sim.tag(0), Tag::Processing);
        sim.advance();
        assert_eq!(sim.tag(0), Tag::Core);
        assert_eq!(sim.tag(1), Tag::Processing);

        // Finish core detection and expansion
        for _ in 0..8 {
            sim.advance();
        }
        assert_eq!(sim.phase(), Phase::BorderAssignment);
        assert_eq!(sim.tag(0), Tag::Cluster(0));
        assert_eq!(sim.tag(5), Tag::Unvisited);

        sim.run_to_completion();
        assert_eq!(sim.tag(4), Tag::Cluster(0));
        assert_eq!(sim.tag(5), Tag::Noise);
    }

    #[test]
    fn test_rescale() {
        use crate::cluster::Bounds;

        let mut sim = ClusterSimulator::new(
            points(&[(0.0, 0.0), (800.0, 430.0), (400.0, 215.0)]),
            SimConfig::default(),
        );
        sim.rescale(Bounds::canvas(800.0, 430.0), Bounds::canvas(400.0, 860.0));

        let xy: Vec<[f64; 2]> = sim.points().iter().map(Point::xy).collect();
        assert_eq!(xy, vec![[0.0, 0.0], [400.0, 860.0], [200.0, 430.0]]);
    }

    #[test]
    fn test_rescale_degenerate_bounds_is_noop() {
        use crate::cluster::Bounds;

        let mut sim = run(tight_cluster_and_outlier(), SimConfig::new(10.0, 3));
        let before = sim.points().to_vec();

        sim.rescale(Bounds::new(5.0, 0.0, 5.0, 430.0), Bounds::canvas(400.0, 860.0));
        sim.rescale(Bounds::canvas(800.0, 430.0), Bounds::canvas(0.0, 0.0));
        sim.rescale(Bounds::canvas(f64::NAN, 430.0), Bounds::canvas(400.0, 860.0));

        assert_eq!(sim.points(), &before[..]);
        assert!(sim.points().iter().all(|p| p.x.is_finite() && p.y.is_finite()));
    }

    #[test]
    fn test_debug_output() {
        let mut sim = ClusterSimulator::new(
            tight_cluster_and_outlier(),
            SimConfig::new(10.0, 3).with_search(SearchStrategy::KdTree),
        );
        assert!(format!("{:?}", sim).contains("phase: Idle"));

        sim.reset();
        let out = format!("{:?}", sim);
        assert!(out.starts_with("ClusterSimulator"));
        assert!(out.contains("phase: CoreDetection"));
        assert!(out.contains("KdTree(KDTree"));
    }

    fn prop_run_labels_everything(coords: Vec<(u8, u8)>, eps: u8, min_points: u8) -> TestResult {
        if eps == 0 || min_points == 0 {
            return TestResult::discard();
        }
        let pts: PointList = coords
            .iter()
            .map(|&(x, y)| Point::new(x as f64, y as f64))
            .collect();
        let config = SimConfig::new(eps as f64 / 4.0, (min_points % 8 + 1) as usize);

        let brute = run(pts.clone(), config);
        let tree = run(pts, config.with_search(SearchStrategy::KdTree));

        let all_labeled = brute.points().iter().all(|p| p.label.is_assigned());
        let core_consistent = brute
            .points()
            .iter()
            .all(|p| p.core == (p.neighbors.len() >= config.min_points));
        let cores_clustered = brute
            .points()
            .iter()
            .filter(|p| p.core)
            .all(|p| p.label.cluster_id().is_some());

        TestResult::from_bool(
            all_labeled && core_consistent && cores_clustered && brute.points() == tree.points(),
        )
    }

    #[test]
    fn test_prop_run_labels_everything() {
        quickcheck(prop_run_labels_everything as fn(Vec<(u8, u8)>, u8, u8) -> TestResult);
    }
}
