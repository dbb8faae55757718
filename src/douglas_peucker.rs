use serde::{Deserialize, Serialize};

/// A 2-D point. Serialized as a two element array `[x, y]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Point { x, y }
    }
}

impl From<Point> for (f64, f64) {
    fn from(p: Point) -> Self {
        (p.x, p.y)
    }
}

/// Euclidean distance between two points.
pub fn distance(p1: Point, p2: Point) -> f64 {
    ((p2.x - p1.x).powi(2) + (p2.y - p1.y).powi(2)).sqrt()
}

/// Distance from `point` to the infinite line through `a` and `b`.
///
/// When `a` and `b` coincide the line collapses to a point and the
/// plain euclidean distance to `a` is returned.
pub fn perpendicular_distance(point: Point, a: Point, b: Point) -> f64 {
    if a == b {
        return distance(point, a);
    }
    let numerator = ((b.x - a.x) * (a.y - point.y) - (a.x - point.x) * (b.y - a.y)).abs();
    numerator / distance(a, b)
}

/// Indices of the points kept by the Ramer-Douglas-Peucker reduction,
/// in ascending order.
///
/// The divide and conquer runs off an explicit stack of index ranges so
/// long polylines cannot exhaust the call stack. Every popped range marks
/// its two endpoints; a range is split at its farthest interior point when
/// that point deviates from the chord by more than `epsilon`.
pub fn simplify_indices(points: &[Point], epsilon: f64) -> Vec<usize> {
    if points.len() < 2 {
        return (0..points.len()).collect();
    }

    let mut mask = vec![false; points.len()];
    let mut stack: Vec<(usize, usize)> = vec![(0, points.len() - 1)];

    while let Some((start, end)) = stack.pop() {
        if end > start + 1 {
            let mut max_distance = 0.0;
            let mut max_index = start;

            for i in start + 1..end {
                let d = perpendicular_distance(points[i], points[start], points[end]);
                if d > max_distance {
                    max_distance = d;
                    max_index = i;
                }
            }

            // max_index stays at start when nothing beat 0.0, which only
            // matters for a negative epsilon on a colinear range
            if max_distance > epsilon && max_index > start {
                stack.push((start, max_index));
                stack.push((max_index, end));
            }
        }

        mask[start] = true;
        mask[end] = true;
    }

    mask.iter()
        .enumerate()
        .filter_map(|(i, &keep)| if keep { Some(i) } else { None })
        .collect()
}

/// Simplify a polyline, keeping first and last point and original order.
pub fn simplify(points: &[Point], epsilon: f64) -> Vec<Point> {
    simplify_indices(points, epsilon)
        .into_iter()
        .map(|i| points[i])
        .collect()
}
