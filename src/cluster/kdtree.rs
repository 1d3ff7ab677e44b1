//! 2-d tree over planar points, used as an optional spatial index for eps-range queries.
//!
//! Tree construction follows <https://godoc.org/code.google.com/p/eaburns/kdtree>
//! (New BSD License, Ethan Burns <burns.ethan@gmail.com>).

use super::distance::within;
use super::point::Point;

/// KD-Tree for range queries
///
/// Coordinates are copied out of the points at build time. Nodes hold only
/// indices into that coordinate list, which match indices into the source slice.
#[derive(Debug)]
pub struct KDTree {
    coords: Vec<[f64; 2]>,
    root: Option<Box<KDTreeNode>>,
}

/// A node in the K-D tree
#[derive(Debug)]
struct KDTreeNode {
    /// Index of the point associated with this node
    point_id: usize,
    /// Indices of points with the same coordinates as this node's point
    equal_ids: Vec<usize>,

    split: usize,
    left: Option<Box<KDTreeNode>>,
    right: Option<Box<KDTreeNode>>,
}

impl KDTree {
    /// Creates a new K-D tree built from the given points
    pub fn build(points: &[Point]) -> KDTree {
        let coords: Vec<[f64; 2]> = points.iter().map(Point::xy).collect();
        let root = if coords.is_empty() {
            None
        } else {
            build_tree(0, &pre_sort(&coords), &coords)
        };

        KDTree { coords, root }
    }

    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Finds indices of all points within distance `r` (inclusive) of `pt`
    ///
    /// The order of the result is unspecified. To avoid allocation, `nodes` can be
    /// pre-allocated and re-used across calls.
    pub fn in_range(&self, pt: [f64; 2], r: f64, mut nodes: Vec<usize>) -> Vec<usize> {
        if r < 0.0 {
            return nodes;
        }
        self.in_range_recursive(self.root.as_deref(), pt, r, &mut nodes);
        nodes
    }

    fn in_range_recursive(
        &self,
        t: Option<&KDTreeNode>,
        pt: [f64; 2],
        r: f64,
        nodes: &mut Vec<usize>,
    ) {
        let t = match t {
            None => return,
            Some(t) => t,
        };

        let node_pt = self.coords[t.point_id];
        let diff = pt[t.split] - node_pt[t.split];

        let (this_side, other_side) = if diff < 0.0 {
            (t.left.as_deref(), t.right.as_deref())
        } else {
            (t.right.as_deref(), t.left.as_deref())
        };

        self.in_range_recursive(this_side, pt, r, nodes);
        // The splitting line is farther than r: nothing on the other side can match
        if diff.abs() <= r {
            if within(node_pt, pt, r) {
                nodes.push(t.point_id);
                nodes.extend_from_slice(&t.equal_ids);
            }
            self.in_range_recursive(other_side, pt, r, nodes);
        }
    }

    /// Returns the height of the K-D tree
    pub fn height(&self) -> usize {
        self.root.as_ref().map_or(0, |r| r.height())
    }
}

impl KDTreeNode {
    fn height(&self) -> usize {
        let ht = self.left.as_ref().map_or(0, |l| l.height());
        let rht = self.right.as_ref().map_or(0, |r| r.height());
        ht.max(rht) + 1
    }
}

/// Builds a tree node by finding the median point and recursively building left and right subtrees
fn build_tree(
    depth: usize,
    nodes: &PreSorted,
    coords: &[[f64; 2]],
) -> Option<Box<KDTreeNode>> {
    let split = depth % 2;
    match nodes.cur[split].len() {
        0 => None,
        1 => Some(Box::new(KDTreeNode {
            point_id: nodes.cur[split][0],
            equal_ids: Vec::new(),
            split,
            left: None,
            right: None,
        })),
        _ => {
            let (med, equal, left, right) = nodes.split_med(split, coords);
            Some(Box::new(KDTreeNode {
                point_id: med,
                equal_ids: equal,
                split,
                left: build_tree(depth + 1, &left, coords),
                right: build_tree(depth + 1, &right, coords),
            }))
        }
    }
}

/// Point ids sorted on each dimension
struct PreSorted {
    cur: [Vec<usize>; 2],
}

fn pre_sort(coords: &[[f64; 2]]) -> PreSorted {
    let mut p = PreSorted {
        cur: [Vec::new(), Vec::new()],
    };
    for i in 0..2 {
        p.cur[i] = (0..coords.len()).collect();
        // Ties on dimension i are broken by the other dimension
        p.cur[i].sort_by(|&a, &b| {
            coords[a][i]
                .total_cmp(&coords[b][i])
                .then(coords[a][1 - i].total_cmp(&coords[b][1 - i]))
        });
    }
    p
}

impl PreSorted {
    /// Returns the median node on the split dimension, ids of nodes with coordinates
    /// equal to it, and two PreSorted sets (still sorted on each dimension) holding
    /// nodes less than and greater than or equal to the median value on `dim`.
    fn split_med(
        &self,
        dim: usize,
        coords: &[[f64; 2]],
    ) -> (usize, Vec<usize>, PreSorted, PreSorted) {
        let sorted = &self.cur[dim];
        let mut m = sorted.len() / 2;
        while m > 0 && coords[sorted[m - 1]][dim] == coords[sorted[m]][dim] {
            m -= 1;
        }
        let mut mh = m;
        while mh < sorted.len() - 1 && coords[sorted[mh + 1]] == coords[sorted[m]] {
            mh += 1;
        }
        let med = sorted[m];
        let equal = sorted[m + 1..=mh].to_vec();
        let pivot = coords[med][dim];

        let mut left = PreSorted {
            cur: [Vec::new(), Vec::new()],
        };
        left.cur[dim] = sorted[..m].to_vec();

        let mut right = PreSorted {
            cur: [Vec::new(), Vec::new()],
        };
        right.cur[dim] = sorted[mh + 1..].to_vec();

        let other = 1 - dim;
        left.cur[other] = Vec::with_capacity(self.cur[other].len());
        right.cur[other] = Vec::with_capacity(self.cur[other].len());

        for &n in &self.cur[other] {
            if n == med || equal.contains(&n) {
                continue;
            }
            if coords[n][dim] < pivot {
                left.cur[other].push(n);
            } else {
                right.cur[other].push(n);
            }
        }

        (med, equal, left, right)
    }
}
