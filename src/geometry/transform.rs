//! Affine transforms and the SVG `transform` attribute grammar.

use super::Point;

/// A 2D affine matrix in SVG order:
///
/// ```text
/// | a c e |
/// | b d f |
/// | 0 0 1 |
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub fn translate(tx: f64, ty: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    pub fn scale(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Rotation by `degrees`, counter-clockwise in a y-up system
    /// (clockwise on screen in SVG's y-down system).
    pub fn rotate(degrees: f64) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self::new(cos, sin, -sin, cos, 0.0, 0.0)
    }

    pub fn skew_x(degrees: f64) -> Self {
        Self::new(1.0, 0.0, degrees.to_radians().tan(), 1.0, 0.0, 0.0)
    }

    pub fn skew_y(degrees: f64) -> Self {
        Self::new(1.0, degrees.to_radians().tan(), 0.0, 1.0, 0.0, 0.0)
    }

    /// Matrix product `self × other`: the result applies `other` first,
    /// then `self`.
    pub fn then_apply(&self, other: &Transform) -> Transform {
        Transform {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            e: self.a * other.e + self.c * other.f + self.e,
            f: self.b * other.e + self.d * other.f + self.f,
        }
    }

    pub fn apply(&self, p: Point) -> Point {
        Point::new(
            self.a * p.x + self.c * p.y + self.e,
            self.b * p.x + self.d * p.y + self.f,
        )
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

/// Parse an SVG `transform` attribute such as
/// `"translate(10 20) rotate(45, 12, 12) scale(2)"`.
///
/// Entries compose left to right, so the rightmost entry is applied to the
/// geometry first. Malformed entries are logged and skipped; the remaining
/// entries still apply.
pub fn parse_transform_list(s: &str) -> Transform {
    let mut result = Transform::IDENTITY;
    let mut rest = s.trim();

    while !rest.is_empty() {
        rest = rest.trim_start_matches(|c: char| c.is_whitespace() || c == ',');
        if rest.is_empty() {
            break;
        }
        let Some(open) = rest.find('(') else {
            log::warn!("ignoring malformed transform {:?}", rest);
            break;
        };
        let Some(close) = rest[open..].find(')').map(|i| open + i) else {
            log::warn!("ignoring unterminated transform {:?}", rest);
            break;
        };

        let name = rest[..open].trim();
        let args: Option<Vec<f64>> = rest[open + 1..close]
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|p| !p.is_empty())
            .map(|p| p.parse::<f64>().ok())
            .collect();

        match args.and_then(|args| transform_from_parts(name, &args)) {
            Some(t) => result = result.then_apply(&t),
            None => log::warn!("ignoring unsupported transform {:?}", &rest[..=close]),
        }
        rest = &rest[close + 1..];
    }

    result
}

fn transform_from_parts(name: &str, args: &[f64]) -> Option<Transform> {
    let t = match (name, args) {
        ("matrix", &[a, b, c, d, e, f]) => Transform::new(a, b, c, d, e, f),
        ("translate", &[tx]) => Transform::translate(tx, 0.0),
        ("translate", &[tx, ty]) => Transform::translate(tx, ty),
        ("scale", &[s]) => Transform::scale(s, s),
        ("scale", &[sx, sy]) => Transform::scale(sx, sy),
        ("rotate", &[deg]) => Transform::rotate(deg),
        ("rotate", &[deg, cx, cy]) => Transform::translate(cx, cy)
            .then_apply(&Transform::rotate(deg))
            .then_apply(&Transform::translate(-cx, -cy)),
        ("skewX", &[deg]) => Transform::skew_x(deg),
        ("skewY", &[deg]) => Transform::skew_y(deg),
        _ => return None,
    };
    Some(t)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_point(p: Point, x: f64, y: f64) {
        assert!(
            (p.x - x).abs() < 1e-9 && (p.y - y).abs() < 1e-9,
            "expected ({x}, {y}), got ({}, {})",
            p.x,
            p.y
        );
    }

    #[test]
    fn test_translate_then_scale_order() {
        // scale applies first, then translate
        let t = parse_transform_list("translate(10, 20) scale(2)");
        assert_point(t.apply(Point::new(1.0, 1.0)), 12.0, 22.0);
    }

    #[test]
    fn test_rotate_about_center() {
        let t = parse_transform_list("rotate(90 10 10)");
        assert_point(t.apply(Point::new(20.0, 10.0)), 10.0, 20.0);
    }

    #[test]
    fn test_matrix_and_skew() {
        let t = parse_transform_list("matrix(1 0 0 1 5 6)");
        assert_point(t.apply(Point::new(0.0, 0.0)), 5.0, 6.0);

        let t = parse_transform_list("skewX(45)");
        assert_point(t.apply(Point::new(0.0, 10.0)), 10.0, 10.0);
    }

    #[test]
    fn test_malformed_entries_are_skipped() {
        let t = parse_transform_list("wobble(3) translate(1,1) scale(a)");
        assert_point(t.apply(Point::new(0.0, 0.0)), 1.0, 1.0);
        assert!(parse_transform_list("").is_identity());
    }

    #[test]
    fn test_composition_is_outer_times_inner() {
        let outer = Transform::translate(100.0, 0.0);
        let inner = Transform::scale(2.0, 2.0);
        let total = outer.then_apply(&inner);
        assert_point(total.apply(Point::new(1.0, 1.0)), 102.0, 2.0);
    }
}
