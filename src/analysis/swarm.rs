// Best-effort jitter for a beeswarm-style scatter.
//
// Points are placed in input order. Each starts at x = 0 and moves right in
// fixed steps until it no longer sits within its own radius of an already
// placed point on both axes. This is quadratic and makes no packing guarantee;
// it only keeps bubbles from stacking exactly on top of each other.

use serde::Serialize;

pub const X_STEP: f64 = 0.2;
/// Bubble sizes are in display units; collisions are checked at 1/100 of that.
pub const SIZE_SCALE: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SwarmPoint {
    pub x: f64,
    pub y: f64,
}

/// Places `(y, size)` pairs and returns their positions in the same order.
/// A point with a non-finite size is placed at x = 0 without collision checks.
pub fn swarm_layout(points: &[(f64, f64)]) -> Vec<SwarmPoint> {
    let mut placed: Vec<SwarmPoint> = Vec::with_capacity(points.len());

    for &(y, size) in points {
        let radius = size / SIZE_SCALE;
        let mut x = 0.0;
        if radius.is_finite() {
            while placed
                .iter()
                .any(|p| (p.y - y).abs() < radius && (p.x - x).abs() < radius)
            {
                x += X_STEP;
            }
        }
        placed.push(SwarmPoint { x, y });
    }

    placed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distant_points_stay_on_the_axis() {
        let layout = swarm_layout(&[(10.0, 20.0), (50.0, 20.0)]);
        assert_eq!(layout[0], SwarmPoint { x: 0.0, y: 10.0 });
        assert_eq!(layout[1], SwarmPoint { x: 0.0, y: 50.0 });
    }

    #[test]
    fn colliding_point_is_pushed_right() {
        let layout = swarm_layout(&[(10.0, 30.0), (10.1, 30.0)]);
        assert_eq!(layout[0].x, 0.0);
        // radius 0.3: x = 0.2 still collides, 0.4 clears
        assert!((layout[1].x - 0.4).abs() < 1e-9);
    }

    #[test]
    fn no_point_overlaps_an_earlier_one() {
        let input: Vec<(f64, f64)> = (0..25).map(|i| (5.0 + (i % 3) as f64 * 0.1, 40.0)).collect();
        let layout = swarm_layout(&input);
        for (i, point) in layout.iter().enumerate() {
            let radius = input[i].1 / SIZE_SCALE;
            for earlier in &layout[..i] {
                let overlaps = (earlier.y - point.y).abs() < radius && (earlier.x - point.x).abs() < radius;
                assert!(!overlaps, "point {i} overlaps {earlier:?}");
            }
        }
    }

    #[test]
    fn zero_size_points_never_move() {
        let layout = swarm_layout(&[(1.0, 0.0), (1.0, 0.0)]);
        assert!(layout.iter().all(|p| p.x == 0.0));
    }
}
