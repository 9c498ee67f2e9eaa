//! Elliptical arc to cubic Bézier conversion.
//!
//! Follows the endpoint-to-centre conversion from the SVG implementation
//! notes (appendix F.6.5), then emits one cubic per quarter turn or less.

use crate::geometry::Point;
use std::f64::consts::{FRAC_PI_2, PI};

/// Convert an SVG arc from `from` to `to` into cubic segments
/// `[ctrl1, ctrl2, end]`.
///
/// Returns `None` when the arc degenerates to a straight line (a zero
/// radius) and `Some(vec![])` when the endpoints coincide, in which case
/// the arc is omitted entirely.
pub fn arc_to_cubics(
    from: Point,
    rx: f64,
    ry: f64,
    x_axis_rotation: f64,
    large_arc: bool,
    sweep: bool,
    to: Point,
) -> Option<Vec<[Point; 3]>> {
    if from == to {
        return Some(vec![]);
    }
    let mut rx = rx.abs();
    let mut ry = ry.abs();
    if rx == 0.0 || ry == 0.0 {
        return None;
    }

    let (sin_phi, cos_phi) = x_axis_rotation.to_radians().sin_cos();

    // Step 1: move to the midpoint frame
    let dx2 = (from.x - to.x) / 2.0;
    let dy2 = (from.y - to.y) / 2.0;
    let x1p = cos_phi * dx2 + sin_phi * dy2;
    let y1p = -sin_phi * dx2 + cos_phi * dy2;

    // Out-of-range radii are scaled up just enough to reach
    let lambda = (x1p * x1p) / (rx * rx) + (y1p * y1p) / (ry * ry);
    if lambda > 1.0 {
        let s = lambda.sqrt();
        rx *= s;
        ry *= s;
    }

    // Step 2: centre in the rotated frame
    let rx2 = rx * rx;
    let ry2 = ry * ry;
    let num = rx2 * ry2 - rx2 * y1p * y1p - ry2 * x1p * x1p;
    let den = rx2 * y1p * y1p + ry2 * x1p * x1p;
    let coef = if den == 0.0 { 0.0 } else { (num / den).max(0.0).sqrt() };
    let sign = if large_arc == sweep { -1.0 } else { 1.0 };
    let cxp = sign * coef * (rx * y1p / ry);
    let cyp = sign * coef * (-ry * x1p / rx);

    // Step 3: centre in user space
    let cx = cos_phi * cxp - sin_phi * cyp + (from.x + to.x) / 2.0;
    let cy = sin_phi * cxp + cos_phi * cyp + (from.y + to.y) / 2.0;

    // Step 4: start angle and sweep
    let u = Point::new((x1p - cxp) / rx, (y1p - cyp) / ry);
    let v = Point::new((-x1p - cxp) / rx, (-y1p - cyp) / ry);
    let theta1 = angle_between(Point::new(1.0, 0.0), u);
    let mut delta_theta = angle_between(u, v);
    if !sweep && delta_theta > 0.0 {
        delta_theta -= 2.0 * PI;
    } else if sweep && delta_theta < 0.0 {
        delta_theta += 2.0 * PI;
    }

    let segments = ((delta_theta.abs() / FRAC_PI_2).ceil() as usize).max(1);
    let step = delta_theta / segments as f64;
    let k = 4.0 / 3.0 * (step / 4.0).tan();

    let map = |x: f64, y: f64| {
        Point::new(
            cx + rx * cos_phi * x - ry * sin_phi * y,
            cy + rx * sin_phi * x + ry * cos_phi * y,
        )
    };

    let mut curves = Vec::with_capacity(segments);
    for i in 0..segments {
        let a1 = theta1 + step * i as f64;
        let a2 = a1 + step;
        let (s1, c1) = a1.sin_cos();
        let (s2, c2) = a2.sin_cos();

        let ctrl1 = map(c1 - k * s1, s1 + k * c1);
        let ctrl2 = map(c2 + k * s2, s2 - k * c2);
        let end = if i + 1 == segments { to } else { map(c2, s2) };
        curves.push([ctrl1, ctrl2, end]);
    }
    Some(curves)
}

fn angle_between(u: Point, v: Point) -> f64 {
    u.cross(v).atan2(u.dot(v))
}
