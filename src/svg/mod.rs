//! # SVG Parser
//!
//! Parses an icon SVG document into outline geometry.
//! Supports: path, rect, circle, ellipse, line, polyline, polygon, g (group).
//! Path commands: the full SVG set, lowered to M, L, Q, C, Z (see [`path`]).
//!
//! Basic shapes are synthesized as equivalent path strings and go through
//! the same path parser. Each shape keeps its composed `transform` so the
//! normalizer can apply it together with the root viewBox mapping.

pub mod arc;
pub mod path;

pub use path::{parse_path_data, Path, PathCommand};

use crate::error::Result;
use crate::geometry::transform::parse_transform_list;
use crate::geometry::Transform;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// A parsed SVG viewBox.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBox {
    pub min_x: f64,
    pub min_y: f64,
    pub width: f64,
    pub height: f64,
}

/// One drawable element: its path in element-local coordinates plus the
/// transform composed from every enclosing group down to the element.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgShape {
    pub transform: Transform,
    pub path: Path,
}

/// The geometry of one icon document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SvgOutline {
    pub view_box: Option<ViewBox>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub shapes: Vec<SvgShape>,
}

impl SvgOutline {
    /// Wrap bare path data (no document, no transforms).
    pub fn from_path_data(d: &str) -> Result<Self> {
        Ok(SvgOutline {
            shapes: vec![SvgShape {
                transform: Transform::IDENTITY,
                path: parse_path_data(d)?,
            }],
            ..Default::default()
        })
    }

    /// The viewBox to map from, falling back to `0 0 width height`.
    pub fn effective_view_box(&self) -> Option<ViewBox> {
        self.view_box.or_else(|| match (self.width, self.height) {
            (Some(width), Some(height)) if width > 0.0 && height > 0.0 => Some(ViewBox {
                min_x: 0.0,
                min_y: 0.0,
                width,
                height,
            }),
            _ => None,
        })
    }
}

/// Parse a viewBox string like "0 0 100 100" or "0,0,24,24".
///
/// Returns `None` for anything that is not four numbers with a positive
/// width and height.
pub fn parse_view_box(s: &str) -> Option<ViewBox> {
    let parts: Vec<f64> = s
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|p| !p.is_empty())
        .map(|p| p.parse::<f64>().ok())
        .collect::<Option<Vec<f64>>>()?;
    match parts.as_slice() {
        &[min_x, min_y, width, height] if width > 0.0 && height > 0.0 => Some(ViewBox {
            min_x,
            min_y,
            width,
            height,
        }),
        _ => None,
    }
}

/// Elements whose subtree never contributes geometry and needs no warning.
const SILENT_TAGS: &[&str] = &[
    "defs",
    "title",
    "desc",
    "metadata",
    "style",
    "clipPath",
    "mask",
    "symbol",
    "pattern",
    "marker",
    "linearGradient",
    "radialGradient",
    "filter",
];

const CONTAINER_TAGS: &[&str] = &["svg", "g", "a"];

/// Parser stack entry, one per open element.
struct Frame {
    transform: Transform,
    /// Nothing inside this element is drawn.
    skip: bool,
}

/// Parse SVG XML content into outline geometry.
///
/// Unsupported elements are logged and skipped; malformed path data is
/// fatal.
pub fn parse_svg(content: &str) -> Result<SvgOutline> {
    let mut outline = SvgOutline::default();
    let mut reader = Reader::from_str(content);
    let mut stack: Vec<Frame> = vec![Frame {
        transform: Transform::IDENTITY,
        skip: false,
    }];
    let mut seen_root = false;

    loop {
        let (e, is_start) = match reader.read_event()? {
            Event::Start(e) => (e, true),
            Event::Empty(e) => (e, false),
            Event::End(_) => {
                if stack.len() > 1 {
                    stack.pop();
                }
                continue;
            }
            Event::Eof => break,
            _ => continue,
        };

        let tag_name = String::from_utf8_lossy(e.name().as_ref()).to_string();
        let parent_skip = stack.last().map_or(false, |f| f.skip);
        let parent_transform = stack.last().map_or(Transform::IDENTITY, |f| f.transform);

        let hidden = get_attr(&e, "display").as_deref() == Some("none");
        let transform = match get_attr(&e, "transform") {
            Some(t) => parent_transform.then_apply(&parse_transform_list(&t)),
            None => parent_transform,
        };

        let mut skip = parent_skip || hidden;
        if !skip {
            if tag_name == "svg" && !seen_root {
                seen_root = true;
                read_root_attributes(&e, &mut outline);
            } else if CONTAINER_TAGS.contains(&tag_name.as_str()) {
                // children are drawn with the composed transform
            } else if let Some(path) = shape_path(&e, &tag_name)? {
                if !path.is_empty() {
                    outline.shapes.push(SvgShape { transform, path });
                }
            } else if SILENT_TAGS.contains(&tag_name.as_str()) || tag_name.contains(':') {
                skip = true;
            } else {
                log::warn!("skipping unsupported SVG element <{}>", tag_name);
                skip = true;
            }
        }

        if is_start {
            stack.push(Frame { transform, skip });
        }
    }

    Ok(outline)
}

fn read_root_attributes(e: &BytesStart<'_>, outline: &mut SvgOutline) {
    if let Some(vb) = get_attr(e, "viewBox") {
        outline.view_box = parse_view_box(&vb);
        if outline.view_box.is_none() {
            log::warn!("ignoring malformed viewBox {:?}", vb);
        }
    }
    outline.width = get_attr(e, "width").and_then(|s| parse_length(&s));
    outline.height = get_attr(e, "height").and_then(|s| parse_length(&s));
}

/// Build the path for a drawable element, or `None` if the tag is not a
/// shape.
fn shape_path(e: &BytesStart<'_>, tag_name: &str) -> Result<Option<Path>> {
    let d = match tag_name {
        "path" => get_attr(e, "d").unwrap_or_default(),
        "rect" => {
            let x = get_attr_f64(e, "x").unwrap_or(0.0);
            let y = get_attr_f64(e, "y").unwrap_or(0.0);
            let w = get_attr_f64(e, "width").unwrap_or(0.0);
            let h = get_attr_f64(e, "height").unwrap_or(0.0);
            let rx = get_attr_f64(e, "rx");
            let ry = get_attr_f64(e, "ry");
            rect_path_data(x, y, w, h, rx, ry)
        }
        "circle" => {
            let cx = get_attr_f64(e, "cx").unwrap_or(0.0);
            let cy = get_attr_f64(e, "cy").unwrap_or(0.0);
            let r = get_attr_f64(e, "r").unwrap_or(0.0);
            ellipse_path_data(cx, cy, r, r)
        }
        "ellipse" => {
            let cx = get_attr_f64(e, "cx").unwrap_or(0.0);
            let cy = get_attr_f64(e, "cy").unwrap_or(0.0);
            let rx = get_attr_f64(e, "rx").unwrap_or(0.0);
            let ry = get_attr_f64(e, "ry").unwrap_or(0.0);
            ellipse_path_data(cx, cy, rx, ry)
        }
        "line" => {
            let x1 = get_attr_f64(e, "x1").unwrap_or(0.0);
            let y1 = get_attr_f64(e, "y1").unwrap_or(0.0);
            let x2 = get_attr_f64(e, "x2").unwrap_or(0.0);
            let y2 = get_attr_f64(e, "y2").unwrap_or(0.0);
            format!("M{x1} {y1}L{x2} {y2}")
        }
        "polyline" | "polygon" => {
            let points = parse_points(&get_attr(e, "points").unwrap_or_default());
            points_path_data(&points, tag_name == "polygon")
        }
        _ => return Ok(None),
    };
    parse_path_data(&d).map(Some)
}

fn rect_path_data(x: f64, y: f64, w: f64, h: f64, rx: Option<f64>, ry: Option<f64>) -> String {
    if w <= 0.0 || h <= 0.0 {
        return String::new();
    }
    // a missing radius mirrors the other one
    let (rx, ry) = match (rx, ry) {
        (Some(rx), Some(ry)) => (rx, ry),
        (Some(r), None) | (None, Some(r)) => (r, r),
        (None, None) => (0.0, 0.0),
    };
    let rx = rx.clamp(0.0, w / 2.0);
    let ry = ry.clamp(0.0, h / 2.0);

    if rx == 0.0 || ry == 0.0 {
        return format!("M{x} {y}H{}V{}H{x}Z", x + w, y + h);
    }
    format!(
        "M{} {y}H{}A{rx} {ry} 0 0 1 {} {}V{}A{rx} {ry} 0 0 1 {} {}H{}A{rx} {ry} 0 0 1 {x} {}V{}A{rx} {ry} 0 0 1 {} {y}Z",
        x + rx,
        x + w - rx,
        x + w,
        y + ry,
        y + h - ry,
        x + w - rx,
        y + h,
        x + rx,
        y + h - ry,
        y + ry,
        x + rx,
    )
}

fn ellipse_path_data(cx: f64, cy: f64, rx: f64, ry: f64) -> String {
    if rx <= 0.0 || ry <= 0.0 {
        return String::new();
    }
    format!(
        "M{} {cy}A{rx} {ry} 0 1 0 {} {cy}A{rx} {ry} 0 1 0 {} {cy}Z",
        cx - rx,
        cx + rx,
        cx - rx,
    )
}

fn points_path_data(points: &[(f64, f64)], close: bool) -> String {
    let mut d = String::new();
    for (i, (x, y)) in points.iter().enumerate() {
        d.push(if i == 0 { 'M' } else { 'L' });
        d.push_str(&format!("{x} {y}"));
    }
    if close && !d.is_empty() {
        d.push('Z');
    }
    d
}

/// Parse SVG points attribute (e.g., "10,20 30,40").
fn parse_points(s: &str) -> Vec<(f64, f64)> {
    let nums: Vec<f64> = s
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse::<f64>().ok())
        .collect();

    nums.chunks(2)
        .filter(|c| c.len() == 2)
        .map(|c| (c[0], c[1]))
        .collect()
}

/// Parse a length attribute, accepting a `px` suffix. Relative units
/// (`%`, `em`) carry no absolute size and yield `None`.
fn parse_length(s: &str) -> Option<f64> {
    parse_number(s).filter(|v| *v > 0.0)
}

fn parse_number(s: &str) -> Option<f64> {
    let s = s.trim();
    s.strip_suffix("px").unwrap_or(s).parse::<f64>().ok()
}

/// Helper to get an attribute value from a quick-xml BytesStart.
fn get_attr(e: &BytesStart<'_>, name: &str) -> Option<String> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == name.as_bytes() {
            return String::from_utf8(attr.value.to_vec()).ok();
        }
    }
    None
}

fn get_attr_f64(e: &BytesStart<'_>, name: &str) -> Option<f64> {
    get_attr(e, name).and_then(|s| parse_number(&s))
}
