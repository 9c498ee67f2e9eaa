//! Cubic to quadratic Bézier approximation.
//!
//! TrueType outlines only know quadratic curves, so every cubic segment is
//! replaced by a chain of quadratics that stays within an error bound.
//!
//! ## Approach
//!
//! 1. Split the cubic at its inflection points so every piece bends one way.
//! 2. For each piece try `k = 1..=8` equal-parameter sub-segments. Each
//!    sub-segment becomes one quadratic whose control point is the
//!    intersection of the cubic's tangents at the sub-segment ends.
//! 3. Accept the first `k` whose chain passes a symmetric sampled distance
//!    check against the cubic (cubic samples vs. quadratic polyline and
//!    quadratic samples vs. cubic polyline).

use crate::geometry::{solve_quadratic, Point};

/// Largest number of quadratics per inflection-free piece.
const MAX_SEGMENTS: usize = 8;
/// Samples per curve in the distance check, endpoints included.
const SAMPLES: usize = 10;
/// Tangent cross products below this are treated as parallel.
const PARALLEL_EPSILON: f64 = 1e-8;

/// Approximate the cubic `p1, c1, c2, p2` with quadratics.
///
/// Returns a flat point list `[p1, ctrl, on, ctrl, on, ..., p2]`: the start
/// point followed by (control, end) pairs, one pair per quadratic.
pub fn cubic_to_quad(p1: Point, c1: Point, c2: Point, p2: Point, error_bound: f64) -> Vec<Point> {
    let inflections = solve_inflections(p1, c1, c2, p2);
    if inflections.is_empty() {
        return approximate_piece(p1, c1, c2, p2, error_bound);
    }

    let mut result: Vec<Point> = Vec::new();
    let mut curve = [p1, c1, c2, p2];
    let mut prev_t = 0.0;

    for &t in &inflections {
        // rescale t into the remaining curve's parameter range
        let local_t = (t - prev_t) / (1.0 - prev_t);
        let (head, tail) = subdivide_cubic(curve, local_t);
        let quads = approximate_piece(head[0], head[1], head[2], head[3], error_bound);
        // the last point is the next piece's first
        result.extend_from_slice(&quads[..quads.len() - 1]);
        curve = tail;
        prev_t = t;
    }

    result.extend(approximate_piece(curve[0], curve[1], curve[2], curve[3], error_bound));
    result
}

/// Power-basis coefficients: `a·t³ + b·t² + c·t + d`.
struct PowerCubic {
    a: Point,
    b: Point,
    c: Point,
    d: Point,
}

impl PowerCubic {
    fn new(p1: Point, c1: Point, c2: Point, p2: Point) -> Self {
        Self {
            a: (p2 - p1) + (c1 - c2) * 3.0,
            b: (p1 + c2) * 3.0 - c1 * 6.0,
            c: (c1 - p1) * 3.0,
            d: p1,
        }
    }

    fn point(&self, t: f64) -> Point {
        ((self.a * t + self.b) * t + self.c) * t + self.d
    }

    fn derivative(&self, t: f64) -> Point {
        (self.a * (3.0 * t) + self.b * 2.0) * t + self.c
    }
}

fn quad_point(p1: Point, c: Point, p2: Point, t: f64) -> Point {
    let mt = 1.0 - t;
    p1 * (mt * mt) + c * (2.0 * mt * t) + p2 * (t * t)
}

/// Inflection parameters strictly inside `(0, 1)`, ascending.
fn solve_inflections(p1: Point, c1: Point, c2: Point, p2: Point) -> Vec<f64> {
    let (x1, y1, x2, y2, x3, y3, x4, y4) = (p1.x, p1.y, c1.x, c1.y, c2.x, c2.y, p2.x, p2.y);
    let p = -(x4 * (y1 - 2.0 * y2 + y3)) + x3 * (2.0 * y1 - 3.0 * y2 + y4)
        + x1 * (y2 - 2.0 * y3 + y4)
        - x2 * (y1 - 3.0 * y3 + 2.0 * y4);
    let q = x4 * (y1 - y2) + 3.0 * x3 * (-y1 + y2) + x2 * (2.0 * y1 - 3.0 * y3 + y4)
        - x1 * (2.0 * y2 - 3.0 * y3 + y4);
    let r = x3 * (y1 - y2) + x1 * (y2 - y3) + x2 * (-y1 + y3);

    let mut roots: Vec<f64> = solve_quadratic(p, q, r)
        .into_iter()
        .filter(|t| *t > 1e-8 && *t < 1.0 - 1e-8)
        .collect();
    roots.sort_by(f64::total_cmp);
    roots.dedup();
    roots
}

/// De Casteljau split of a cubic at `t`.
fn subdivide_cubic(curve: [Point; 4], t: f64) -> ([Point; 4], [Point; 4]) {
    let [p1, c1, c2, p2] = curve;
    let b = p1.lerp(c1, t);
    let s = c1.lerp(c2, t);
    let f = c2.lerp(p2, t);
    let c = b.lerp(s, t);
    let e = s.lerp(f, t);
    let d = c.lerp(e, t);
    ([p1, b, c, d], [d, e, f, p2])
}

/// Single quadratic for the cubic between `t1` and `t2`, using the tangent
/// intersection as control point.
fn fit_segment(cubic: &PowerCubic, t1: f64, t2: f64) -> [Point; 3] {
    let f1 = cubic.point(t1);
    let f2 = cubic.point(t2);
    let f1_ = cubic.derivative(t1);
    let f2_ = cubic.derivative(t2);

    let det = -f1_.x * f2_.y + f2_.x * f1_.y;
    if det.abs() < PARALLEL_EPSILON {
        // straight line segment
        return [f1, f1.midpoint(f2), f2];
    }
    let cx = (f1_.x * (f2.y * f2_.x - f2.x * f2_.y) + f2_.x * (f1.x * f1_.y - f1.y * f1_.x)) / det;
    let cy = (f1_.y * (f2.y * f2_.x - f2.x * f2_.y) + f2_.y * (f1.x * f1_.y - f1.y * f1_.x)) / det;
    [f1, Point::new(cx, cy), f2]
}

fn approximate_piece(p1: Point, c1: Point, c2: Point, p2: Point, error_bound: f64) -> Vec<Point> {
    let cubic = PowerCubic::new(p1, c1, c2, p2);
    let mut approximation: Vec<[Point; 3]> = Vec::new();

    for count in 1..=MAX_SEGMENTS {
        approximation = (0..count)
            .map(|i| {
                let t1 = i as f64 / count as f64;
                let t2 = (i + 1) as f64 / count as f64;
                fit_segment(&cubic, t1, t2)
            })
            .collect();

        if count == 1 {
            let ctrl = approximation[0][1];
            // concave control point for a convex curve, or vice versa
            if (ctrl - p1).dot(c1 - p1) < 0.0 || (ctrl - p2).dot(c2 - p2) < 0.0 {
                continue;
            }
        }
        if is_approximation_close(&cubic, &approximation, error_bound) {
            break;
        }
    }

    let mut points = Vec::with_capacity(approximation.len() * 2 + 1);
    points.push(p1);
    for [_, ctrl, end] in &approximation {
        points.push(*ctrl);
        points.push(*end);
    }
    // pin the exact end point; the power basis may drift by an ulp
    if let Some(last) = points.last_mut() {
        *last = p2;
    }
    points
}

/// Check every quadratic of the chain against its slice of the cubic.
fn is_approximation_close(cubic: &PowerCubic, quads: &[[Point; 3]], error_bound: f64) -> bool {
    let dt = 1.0 / quads.len() as f64;
    quads.iter().enumerate().all(|(i, &[p1, c, p2])| {
        is_segment_close(cubic, i as f64 * dt, (i + 1) as f64 * dt, p1, c, p2, error_bound)
    })
}

/// Symmetric sampled distance test between the cubic on `[tmin, tmax]`
/// and the quadratic `p1, c, p2`.
///
/// Both curves are sampled and flattened into polylines; every interior
/// sample of one curve must lie within `error_bound` of the other's
/// polyline. Checking only one direction passes trivially for nearly
/// degenerate curves.
fn is_segment_close(
    cubic: &PowerCubic,
    tmin: f64,
    tmax: f64,
    p1: Point,
    c: Point,
    p2: Point,
    error_bound: f64,
) -> bool {
    let cubic_points: Vec<Point> = (0..=SAMPLES)
        .map(|i| cubic.point(tmin + (tmax - tmin) * i as f64 / SAMPLES as f64))
        .collect();
    let quad_points: Vec<Point> = (0..=SAMPLES)
        .map(|i| quad_point(p1, c, p2, i as f64 / SAMPLES as f64))
        .collect();

    let bound_sq = error_bound * error_bound;
    within_bound(&cubic_points, &quad_points, bound_sq)
        && within_bound(&quad_points, &cubic_points, bound_sq)
}

fn within_bound(samples: &[Point], polyline: &[Point], bound_sq: f64) -> bool {
    samples[1..samples.len() - 1].iter().all(|&p| {
        polyline
            .windows(2)
            .map(|w| distance_to_segment_sq(p, w[0], w[1]))
            .fold(f64::INFINITY, f64::min)
            <= bound_sq
    })
}

fn distance_to_segment_sq(p: Point, a: Point, b: Point) -> f64 {
    let ab = b - a;
    let len_sq = ab.length_sq();
    let t = if len_sq == 0.0 {
        0.0
    } else {
        (p - a).dot(ab) / len_sq
    };
    let closest = if t <= 0.0 {
        a
    } else if t >= 1.0 {
        b
    } else {
        a + ab * t
    };
    p.distance_sq(closest)
}
