//! Random point sets for the demo: two Gaussian blobs of different spread
//! placed side by side, with a minimum distance kept between any two points.

use std::f64::consts::PI;

use rand::Rng;
use tracing::debug;

use super::config::{BASE_HEIGHT, BASE_WIDTH, GeneratorConfig};
use super::point::{Bounds, Point, PointList};

/// Attempts to place a single candidate before giving up on it
const MAX_ATTEMPTS: usize = 100;
/// A blob stops growing after this many candidates in a row could not be placed
const MAX_CONSECUTIVE_FAILURES: usize = 50;

/// Horizontal blob centers as fractions of the usable width
const CENTER_FRACTIONS: [f64; 2] = [0.30, 0.60];
/// Blob standard deviations as fractions of the smaller usable side
const STD_FRACTIONS: [f64; 2] = [0.10, 0.16];

/// Generates up to `target` points in two blobs inside `bounds`
///
/// Points of the first blob precede points of the second, each in acceptance
/// order. Fewer than `target` points are returned when the blobs run out of room.
pub fn generate<R: Rng + ?Sized>(
    target: usize,
    bounds: Bounds,
    config: &GeneratorConfig,
    rng: &mut R,
) -> PointList {
    let margin = bounds.width().min(bounds.height()) * config.margin_ratio;
    let usable = bounds.inset(margin);

    let center_y = bounds.min_y + bounds.height() / 2.0;
    let spread = usable.width().min(usable.height());

    let first = first_blob_size(target, rng);
    let sizes = [first, target - first];

    let mut points = PointList::with_capacity(target);
    for blob in 0..2 {
        let center = [
            usable.min_x + usable.width() * CENTER_FRACTIONS[blob],
            center_y,
        ];
        let std = spread * STD_FRACTIONS[blob];

        let mut generated = 0;
        let mut consecutive_failures = 0;
        while generated < sizes[blob] && consecutive_failures < MAX_CONSECUTIVE_FAILURES {
            match place_point(center, std, &points, &usable, config.min_distance, rng) {
                Some(p) => {
                    points.push(p);
                    generated += 1;
                    consecutive_failures = 0;
                }
                None => consecutive_failures += 1,
            }
        }
    }

    if points.len() < target {
        debug!(
            generated = points.len(),
            requested = target,
            "point generation fell short due to space constraints"
        );
    }

    points
}

/// Caps the requested point count by the room the canvas offers
///
/// The cap is `requested * area_ratio * 1.2`, where `area_ratio` compares the
/// usable area of `bounds` with the reference canvas inset by 15% on each side.
pub fn adjusted_target(requested: usize, bounds: Bounds, config: &GeneratorConfig) -> usize {
    let margin = bounds.width().min(bounds.height()) * config.margin_ratio;
    let usable = bounds.inset(margin);
    let available = usable.width().max(0.0) * usable.height().max(0.0);
    let base = (BASE_WIDTH * 0.7) * (BASE_HEIGHT * 0.7);
    let cap = (requested as f64 * (available / base) * 1.2).floor() as usize;
    requested.min(cap)
}

/// Size of the first blob: uniform in `[5, target - 5)`, at least 5, or half
/// of the target when there are fewer than ten points to split
pub(super) fn first_blob_size<R: Rng + ?Sized>(target: usize, rng: &mut R) -> usize {
    if target < 10 {
        return target / 2;
    }
    5 + rng.random_range(0..(target - 10).max(1))
}

/// Draws candidates around `center` until one lands inside `area` without
/// crowding an accepted point
fn place_point<R: Rng + ?Sized>(
    center: [f64; 2],
    std: f64,
    accepted: &[Point],
    area: &Bounds,
    min_distance: f64,
    rng: &mut R,
) -> Option<Point> {
    for _ in 0..MAX_ATTEMPTS {
        let (z1, z2) = box_muller(rng);
        let x = center[0] + z1 * std;
        let y = center[1] + z2 * std;

        if area.contains(x, y) && !overlaps(x, y, accepted, min_distance) {
            return Some(Point::new(x, y));
        }
    }
    None
}

/// Pair of independent standard normal deviates from two uniform draws
fn box_muller<R: Rng + ?Sized>(rng: &mut R) -> (f64, f64) {
    // u1 in (0, 1] keeps the logarithm finite
    let u1: f64 = 1.0 - rng.random::<f64>();
    let u2: f64 = rng.random();
    let r = (-2.0 * u1.ln()).sqrt();
    let theta = 2.0 * PI * u2;
    (r * theta.cos(), r * theta.sin())
}

fn overlaps(x: f64, y: f64, accepted: &[Point], min_distance: f64) -> bool {
    let candidate = Point::new(x, y);
    accepted.iter().any(|p| p.dist(&candidate) < min_distance)
}
