//! Contour construction and cleanup.
//!
//! A normalized [`Path`] is walked into closed point sequences, each point
//! tagged on-curve or off-curve. The raw sequences are then cleaned up in
//! a fixed order: collinear points are dropped (twice), on-curve points
//! that TrueType would imply anyway are dropped, coordinates are rounded
//! to font units and the explicit closing point is removed.

use super::cubic2quad::cubic_to_quad;
use crate::geometry::Point;
use crate::svg::{Path, PathCommand};

/// Tolerance for dropping nearly collinear points, in font units.
pub const SIMPLIFY_ACCURACY: f64 = 0.3;
/// Tolerance for dropping implied on-curve points, in font units.
pub const INTERPOLATE_ACCURACY: f64 = 1.1;

/// A point of an unrounded contour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContourPoint {
    pub point: Point,
    pub on_curve: bool,
}

impl ContourPoint {
    fn on(point: Point) -> Self {
        Self {
            point,
            on_curve: true,
        }
    }

    fn off(point: Point) -> Self {
        Self {
            point,
            on_curve: false,
        }
    }
}

/// A point in integer font units. Depending on context `x`/`y` are either
/// absolute coordinates or deltas from the previous point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OutlinePoint {
    pub x: i32,
    pub y: i32,
    pub on_curve: bool,
}

/// A closed sequence of points; the last point connects back to the first.
pub type Contour = Vec<OutlinePoint>;

/// Run the whole contour pipeline on a normalized path.
///
/// The result holds absolute integer coordinates; see [`to_relative`] for
/// the delta form written into `glyf`.
pub fn build_contours(path: &Path, error_bound: f64) -> Vec<Contour> {
    let mut contours = path_to_contours(path, error_bound);
    simplify(&mut contours, SIMPLIFY_ACCURACY);
    simplify(&mut contours, SIMPLIFY_ACCURACY);
    let contours = interpolate(&contours, INTERPOLATE_ACCURACY);

    contours
        .iter()
        .map(|contour| {
            let mut rounded: Contour = contour.iter().map(round_point).collect();
            remove_closing_point(&mut rounded);
            rounded
        })
        .collect()
}

/// Walk path commands into raw contours, one per subpath.
///
/// Lines and quadratic segments map directly; cubic segments go through
/// the quadratic approximation. A drawing command right after a close
/// starts a new contour at the closed subpath's start point.
pub fn path_to_contours(path: &Path, error_bound: f64) -> Vec<Vec<ContourPoint>> {
    let mut contours: Vec<Vec<ContourPoint>> = Vec::new();
    let mut current = Point::ZERO;
    let mut start = Point::ZERO;
    let mut closed = true;

    for cmd in &path.commands {
        if closed && !matches!(cmd, PathCommand::MoveTo(_) | PathCommand::ClosePath) {
            contours.push(vec![ContourPoint::on(start)]);
            closed = false;
        }

        match *cmd {
            PathCommand::MoveTo(p) => {
                contours.push(vec![ContourPoint::on(p)]);
                current = p;
                start = p;
                closed = false;
            }
            PathCommand::LineTo(p) => {
                push(&mut contours, ContourPoint::on(p));
                current = p;
            }
            PathCommand::QuadTo(c, p) => {
                push(&mut contours, ContourPoint::off(c));
                push(&mut contours, ContourPoint::on(p));
                current = p;
            }
            PathCommand::CubicTo(c1, c2, p) => {
                let chain = cubic_to_quad(current, c1, c2, p, error_bound);
                for pair in chain[1..].chunks_exact(2) {
                    push(&mut contours, ContourPoint::off(pair[0]));
                    push(&mut contours, ContourPoint::on(pair[1]));
                }
                current = p;
            }
            PathCommand::ClosePath => {
                current = start;
                closed = true;
            }
        }
    }
    contours
}

fn push(contours: &mut [Vec<ContourPoint>], point: ContourPoint) {
    if let Some(contour) = contours.last_mut() {
        contour.push(point);
    }
}

/// Drop points lying on the straight line between two on-curve
/// neighbours. Walks backwards so removals do not shift unvisited points;
/// the first two and the last point of a contour are never removed.
pub fn simplify(contours: &mut [Vec<ContourPoint>], accuracy: f64) {
    for contour in contours.iter_mut() {
        let mut i = contour.len().saturating_sub(2);
        while i > 1 {
            let prev = contour[i - 1];
            let next = contour[i + 1];
            if prev.on_curve
                && next.on_curve
                && is_in_line(prev.point, contour[i].point, next.point, accuracy)
            {
                contour.remove(i);
            }
            i -= 1;
        }
    }
}

/// Is `m` within `accuracy` of the segment `p1..p2`, and between its ends?
fn is_in_line(p1: Point, m: Point, p2: Point, accuracy: f64) -> bool {
    let a = p1.distance_sq(m);
    let b = p2.distance_sq(m);
    let c = p1.distance_sq(p2);

    if a > b + c || b > a + c || c == 0.0 {
        return false;
    }
    let distance = ((p1 - m).cross(p2 - m)).abs() / c.sqrt();
    distance < accuracy
}

/// Drop on-curve points that sit on the midpoint of their two off-curve
/// neighbours, where TrueType implies a point anyway.
pub fn interpolate(contours: &[Vec<ContourPoint>], accuracy: f64) -> Vec<Vec<ContourPoint>> {
    contours
        .iter()
        .map(|contour| {
            let last = contour.len().saturating_sub(1);
            contour
                .iter()
                .enumerate()
                .filter(|&(i, node)| {
                    if i == 0 || i == last || !node.on_curve {
                        return true;
                    }
                    let prev = contour[i - 1];
                    let next = contour[i + 1];
                    if prev.on_curve || next.on_curve {
                        return true;
                    }
                    prev.point.midpoint(next.point).distance(node.point) >= accuracy
                })
                .map(|(_, node)| *node)
                .collect()
        })
        .collect()
}

/// Round half up, so `-0.5` becomes `0` and `0.5` becomes `1`.
fn round_point(p: &ContourPoint) -> OutlinePoint {
    OutlinePoint {
        x: (p.point.x + 0.5).floor() as i32,
        y: (p.point.y + 0.5).floor() as i32,
        on_curve: p.on_curve,
    }
}

fn remove_closing_point(contour: &mut Contour) {
    if contour.len() > 1 {
        let first = contour[0];
        if let Some(last) = contour.last() {
            if last.x == first.x && last.y == first.y {
                contour.pop();
            }
        }
    }
}

/// Convert absolute contours to deltas.
///
/// The cursor runs across contour boundaries: the first point of a contour
/// is relative to the last point of the previous one, starting from the
/// origin.
pub fn to_relative(contours: &[Contour]) -> Vec<Contour> {
    let (mut px, mut py) = (0, 0);
    contours
        .iter()
        .map(|contour| {
            contour
                .iter()
                .map(|p| {
                    let delta = OutlinePoint {
                        x: p.x - px,
                        y: p.y - py,
                        on_curve: p.on_curve,
                    };
                    px = p.x;
                    py = p.y;
                    delta
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::svg::parse_path_data;

    fn contours_of(d: &str) -> Vec<Contour> {
        build_contours(&parse_path_data(d).unwrap(), 0.3)
    }

    fn pt(x: f64, y: f64, on_curve: bool) -> ContourPoint {
        ContourPoint {
            point: Point::new(x, y),
            on_curve,
        }
    }

    #[test]
    fn test_rectangle_has_four_on_curve_points() {
        let contours = contours_of("M10 10 H100 V60 H10 Z");
        assert_eq!(contours.len(), 1);
        assert_eq!(contours[0].len(), 4);
        assert!(contours[0].iter().all(|p| p.on_curve));
    }

    #[test]
    fn test_explicit_closing_point_is_removed() {
        let contours = contours_of("M0 0 L50 0 L50 50 L0 50 L0 0 Z");
        assert_eq!(contours[0].len(), 4);
        assert_eq!((contours[0][3].x, contours[0][3].y), (0, 50));
    }

    #[test]
    fn test_collinear_points_are_removed() {
        // extra points along the bottom and right edges
        let contours = contours_of("M0 0 L40 0 L60 0 L100 0 L100 50 L100 100 L0 100 Z");
        let points: Vec<(i32, i32)> = contours[0].iter().map(|p| (p.x, p.y)).collect();
        // the second point is never a candidate
        assert_eq!(points, vec![(0, 0), (40, 0), (100, 0), (100, 100), (0, 100)]);
    }

    #[test]
    fn test_flat_quadratic_control_is_removed() {
        let contours = contours_of("M0 0 L10 0 Q50 0 100 0 L100 100 L0 100 Z");
        assert!(contours[0].iter().all(|p| p.on_curve));
    }

    #[test]
    fn test_quadratic_keeps_control_point() {
        let contours = contours_of("M0 0 Q50 80 100 0 Z");
        assert_eq!(contours[0].len(), 3);
        assert!(!contours[0][1].on_curve);
        assert_eq!((contours[0][1].x, contours[0][1].y), (50, 80));
    }

    #[test]
    fn test_circle_has_off_curve_points() {
        let contours = contours_of("M0 50 A50 50 0 1 0 100 50 A50 50 0 1 0 0 50 Z");
        assert_eq!(contours.len(), 1);
        let off = contours[0].iter().filter(|p| !p.on_curve).count();
        assert!(off >= 4);
        for p in &contours[0] {
            assert!((-1..=101).contains(&p.x) && (-1..=101).contains(&p.y));
        }
    }

    #[test]
    fn test_implied_midpoint_is_interpolated() {
        let raw = vec![vec![
            pt(0.0, 0.0, true),
            pt(10.0, 10.0, false),
            pt(20.0, 10.0, true),
            pt(30.0, 10.0, false),
            pt(40.0, 0.0, true),
        ]];
        let out = interpolate(&raw, INTERPOLATE_ACCURACY);
        assert_eq!(out[0].len(), 4);
        assert!(out[0].iter().all(|p| p.point != Point::new(20.0, 10.0)));

        let off_center = vec![vec![
            pt(0.0, 0.0, true),
            pt(10.0, 10.0, false),
            pt(20.0, 14.0, true),
            pt(30.0, 10.0, false),
            pt(40.0, 0.0, true),
        ]];
        assert_eq!(interpolate(&off_center, INTERPOLATE_ACCURACY)[0].len(), 5);
    }

    #[test]
    fn test_subpaths_become_contours() {
        let contours = contours_of("M0 0 H10 V10 H0 Z M20 20 H30 V30 H20 Z");
        assert_eq!(contours.len(), 2);
        assert_eq!((contours[1][0].x, contours[1][0].y), (20, 20));
    }

    #[test]
    fn test_drawing_after_close_restarts_at_subpath_start() {
        let path = parse_path_data("M5 5 H15 V15 Z L5 30 H-10 Z").unwrap();
        let contours = path_to_contours(&path, 0.3);
        assert_eq!(contours.len(), 2);
        assert_eq!(contours[1][0].point, Point::new(5.0, 5.0));
    }

    #[test]
    fn test_rounding_is_half_up() {
        assert_eq!(round_point(&pt(-0.5, 0.5, true)), OutlinePoint { x: 0, y: 1, on_curve: true });
        assert_eq!(round_point(&pt(-1.6, 2.4, false)), OutlinePoint { x: -2, y: 2, on_curve: false });
    }

    #[test]
    fn test_relative_cursor_spans_contours() {
        let contours = contours_of("M10 10 H20 V20 Z M30 30 H40 V40 Z");
        let rel = to_relative(&contours);
        assert_eq!((rel[0][0].x, rel[0][0].y), (10, 10));
        assert_eq!((rel[0][1].x, rel[0][1].y), (10, 0));
        // from (20, 20), the last point of the first contour
        assert_eq!((rel[1][0].x, rel[1][0].y), (10, 10));
    }
}
