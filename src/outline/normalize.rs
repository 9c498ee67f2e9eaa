//! Path normalization: from SVG document space into the font's canvas.
//!
//! Order of operations for each icon:
//!
//! 1. element transforms (already composed per shape by the SVG parser)
//! 2. root viewBox to canvas mapping (uniform, centred)
//! 3. bounding-box driven scale to the shape size
//! 4. vertical flip (SVG is y-down, fonts are y-up)
//! 5. centring in the canvas box plus the tuning offsets

use crate::config::{IconSize, Tuning};
use crate::geometry::{Point, Transform};
use crate::svg::{Path, SvgOutline, ViewBox};

/// The fixed box every icon is fitted into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Canvas {
    /// Width and height of the canvas in font units.
    pub size: f64,
    /// Target length of an icon's fitted side.
    pub shape_size: f64,
    /// Font-space y of the canvas bottom edge.
    pub baseline_offset: f64,
}

impl Canvas {
    pub fn new(size: f64, shape_size: f64, baseline_offset: f64) -> Self {
        Self {
            size,
            shape_size,
            baseline_offset,
        }
    }
}

/// Produce one absolute path in font coordinates for an icon.
///
/// An icon without drawable geometry yields an empty path.
pub fn normalize(outline: &SvgOutline, tuning: &Tuning, canvas: &Canvas) -> Path {
    let mut path = Path::default();
    for shape in &outline.shapes {
        let mut p = shape.path.clone();
        p.transform(&shape.transform);
        path.extend(p);
    }

    if let Some(vb) = outline.effective_view_box() {
        path.transform(&view_box_transform(&vb, canvas.size));
    }

    let Some(bounds) = path.bounds() else {
        return path;
    };

    let longest = bounds.width().max(bounds.height());
    let shortest = bounds.width().min(bounds.height());
    let contain = if longest > 0.0 {
        canvas.shape_size / longest
    } else {
        1.0
    };
    let scale = match tuning.size {
        IconSize::Contain => contain,
        IconSize::Cover if shortest > 0.0 => canvas.shape_size / shortest,
        IconSize::Cover => contain,
        IconSize::Scale(m) => contain * m,
    };

    let center = bounds.center();
    let target = Point::new(
        canvas.size / 2.0 + tuning.x * canvas.size,
        canvas.baseline_offset + canvas.size / 2.0 - tuning.y * canvas.size,
    );

    let placement = Transform::translate(target.x, target.y)
        .then_apply(&Transform::scale(scale, -scale))
        .then_apply(&Transform::translate(-center.x, -center.y));
    path.transform(&placement);

    log::debug!(
        "normalized {}x{} outline with scale {:.4}",
        bounds.width(),
        bounds.height(),
        scale
    );
    path
}

/// Uniform `xMidYMid meet` mapping of a viewBox onto a square canvas.
fn view_box_transform(vb: &ViewBox, size: f64) -> Transform {
    let s = (size / vb.width).min(size / vb.height);
    let tx = -vb.min_x * s + (size - vb.width * s) / 2.0;
    let ty = -vb.min_y * s + (size - vb.height * s) / 2.0;
    Transform::translate(tx, ty).then_apply(&Transform::scale(s, s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::svg::parse_svg;

    fn canvas() -> Canvas {
        Canvas::new(512.0, 480.0, 0.0)
    }

    #[test]
    fn test_view_box_mapping_fits_shape_size() {
        let outline =
            parse_svg(r#"<svg viewBox="0 0 24 24"><rect x="2" y="2" width="20" height="20"/></svg>"#)
                .unwrap();
        let path = normalize(&outline, &Tuning::default(), &canvas());
        let b = path.bounds().unwrap();
        assert!((b.min_x - 16.0).abs() < 1e-6);
        assert!((b.max_x - 496.0).abs() < 1e-6);
        assert!((b.min_y - 16.0).abs() < 1e-6);
        assert!((b.max_y - 496.0).abs() < 1e-6);
    }

    #[test]
    fn test_y_is_flipped() {
        // a triangle pointing down in SVG points up after normalization
        let outline = SvgOutline::from_path_data("M0 0 L10 0 L5 10 Z").unwrap();
        let path = normalize(&outline, &Tuning::default(), &canvas());
        match path.commands[2] {
            crate::svg::PathCommand::LineTo(p) => assert!((p.y - 16.0).abs() < 1e-6),
            ref other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_contain_and_cover() {
        let outline = SvgOutline::from_path_data("M0 0 H20 V10 H0 Z").unwrap();

        let contained = normalize(&outline, &Tuning::default(), &canvas());
        let b = contained.bounds().unwrap();
        assert!((b.width() - 480.0).abs() < 1e-6);
        assert!((b.height() - 240.0).abs() < 1e-6);

        let tuning = Tuning {
            size: IconSize::Cover,
            ..Default::default()
        };
        let covered = normalize(&outline, &tuning, &canvas());
        let b = covered.bounds().unwrap();
        assert!((b.height() - 480.0).abs() < 1e-6);
        assert!((b.width() - 960.0).abs() < 1e-6);
    }

    #[test]
    fn test_scale_and_offsets() {
        let outline = SvgOutline::from_path_data("M0 0 H10 V10 H0 Z").unwrap();
        let tuning = Tuning {
            x: 0.25,
            y: 0.25,
            size: IconSize::Scale(0.5),
        };
        let path = normalize(&outline, &tuning, &canvas());
        let b = path.bounds().unwrap();
        assert!((b.width() - 240.0).abs() < 1e-6);
        // moved right by 128, down (font: lower) by 128
        assert!((b.center().x - 384.0).abs() < 1e-6);
        assert!((b.center().y - 128.0).abs() < 1e-6);
    }

    #[test]
    fn test_descent_shifts_canvas_box() {
        let outline = SvgOutline::from_path_data("M0 0 H10 V10 H0 Z").unwrap();
        let path = normalize(
            &outline,
            &Tuning::default(),
            &Canvas::new(512.0, 480.0, -64.0),
        );
        assert!((path.bounds().unwrap().center().y - 192.0).abs() < 1e-6);
    }

    #[test]
    fn test_empty_outline() {
        let path = normalize(&SvgOutline::default(), &Tuning::default(), &canvas());
        assert!(path.is_empty());
    }
}
