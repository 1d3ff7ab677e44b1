#[cfg(test)]
mod tests {
    use crate::cluster::{GeneratorConfig, KDTree, Point, PointList, region_query};
    use crate::cluster::{Bounds, generate};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn sorted_in_range(tree: &KDTree, pt: &Point, eps: f64) -> Vec<usize> {
        let mut found = tree.in_range(pt.xy(), eps, Vec::new());
        found.sort();
        found
    }

    #[test]
    fn test_range_query_kdtree() {
        // Verify that KD-Tree & RangeQuery give the same results
        let mut rng = StdRng::seed_from_u64(7);
        let points = generate(
            150,
            Bounds::canvas(800.0, 430.0),
            &GeneratorConfig::default(),
            &mut rng,
        );
        let tree = KDTree::build(&points);
        assert_eq!(tree.len(), points.len());

        for eps in [0.0, 12.0, 40.0, 1000.0] {
            for pt in &points {
                assert_eq!(sorted_in_range(&tree, pt, eps), region_query(&points, pt, eps));
            }
        }
    }

    #[test]
    fn test_duplicates_and_edges() {
        let points: PointList = [
            (0.0, 0.0),
            (3.0, 4.0),
            (3.0, 4.0),
            (3.0, 4.0),
            (-3.0, -4.0),
            (6.0, 8.0),
            (0.0, 5.0),
        ]
        .iter()
        .map(|&(x, y)| Point::new(x, y))
        .collect();
        let tree = KDTree::build(&points);

        // Points exactly eps away are inside
        assert_eq!(sorted_in_range(&tree, &points[0], 5.0), vec![0, 1, 2, 3, 4, 6]);
        assert_eq!(sorted_in_range(&tree, &points[1], 0.0), vec![1, 2, 3]);
        assert_eq!(sorted_in_range(&tree, &points[0], -1.0), Vec::<usize>::new());
    }

    #[test]
    fn test_empty_tree() {
        let tree = KDTree::build(&[]);
        assert!(tree.is_empty());
        assert_eq!(tree.height(), 0);
        assert!(tree.in_range([0.0, 0.0], 10.0, Vec::new()).is_empty());
    }

    #[test]
    fn test_height_is_logarithmic() {
        let points: PointList = (0..64)
            .map(|i| Point::new((i % 8) as f64, (i / 8) as f64))
            .collect();
        let tree = KDTree::build(&points);
        assert!(tree.height() >= 7);
        assert!(tree.height() <= 16, "height {}", tree.height());
    }
}
