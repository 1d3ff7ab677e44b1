/// Calculates planar Euclidean distance between two points
pub fn euclidean(p1: [f64; 2], p2: [f64; 2]) -> f64 {
    sq_euclidean(p1, p2).sqrt()
}

/// Calculates squared Euclidean distance (without sqrt)
pub fn sq_euclidean(p1: [f64; 2], p2: [f64; 2]) -> f64 {
    let dx = p1[0] - p2[0];
    let dy = p1[1] - p2[1];
    dx * dx + dy * dy
}

/// Checks whether two points are within `eps` of each other (edge included)
pub fn within(p1: [f64; 2], p2: [f64; 2], eps: f64) -> bool {
    euclidean(p1, p2) <= eps
}
