use super::config::SearchStrategy;
use super::distance::within;
use super::kdtree::KDTree;
use super::point::Point;

/// Neighbor search over a fixed point set
///
/// Every query returns indices in ascending order, whichever backend answers it,
/// so runs are reproducible regardless of the strategy.
#[derive(Debug)]
pub enum NeighborSearch {
    BruteForce,
    KdTree(KDTree),
}

impl NeighborSearch {
    /// Prepares the search backend for `points`
    pub fn new(strategy: SearchStrategy, points: &[Point]) -> Self {
        match strategy {
            SearchStrategy::BruteForce => NeighborSearch::BruteForce,
            SearchStrategy::KdTree => {
                let tree = KDTree::build(points);
                tracing::trace!(points = tree.len(), height = tree.height(), "built k-d tree");
                NeighborSearch::KdTree(tree)
            }
        }
    }

    /// Returns indices of all points within `eps` of `points[i]`, including `i` itself
    pub fn neighbors(&self, points: &[Point], i: usize, eps: f64) -> Vec<usize> {
        match self {
            NeighborSearch::BruteForce => region_query(points, &points[i], eps),
            NeighborSearch::KdTree(tree) => {
                let mut found = tree.in_range(points[i].xy(), eps, Vec::new());
                found.sort_unstable();
                found
            }
        }
    }
}

/// Simple O(N) way to find points in neighbourhood
///
/// Distance is compared inclusively: a point exactly `eps` away is a neighbor.
pub fn region_query(points: &[Point], p: &Point, eps: f64) -> Vec<usize> {
    points
        .iter()
        .enumerate()
        .filter(|(_, q)| within(q.xy(), p.xy(), eps))
        .map(|(i, _)| i)
        .collect()
}

/// Finds the core point nearest to `p`
///
/// Scans in point order and only replaces the best candidate on a strictly
/// smaller distance, so the first core point at the minimum distance wins.
/// Returns `(index, distance)`, or `None` if there are no core points.
pub fn nearest_core(points: &[Point], p: &Point) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (i, q) in points.iter().enumerate() {
        if !q.core {
            continue;
        }
        let d = q.dist(p);
        match best {
            Some((_, min)) if d >= min => {}
            _ => best = Some((i, d)),
        }
    }
    best
}
