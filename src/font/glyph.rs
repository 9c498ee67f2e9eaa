//! A single glyph: one icon's contours plus its encoded point data.
//!
//! All derived data (bounding box, deltas, flags, byte size) is computed
//! once in [`Glyph::new`], which also enforces the signed 16-bit range
//! TrueType requires for coordinates.

use crate::error::{IconforgeError, Result};
use crate::outline::contour::{to_relative, Contour};

const FLAG_ON_CURVE: u8 = 0x01;
const FLAG_X_SHORT: u8 = 0x02;
const FLAG_Y_SHORT: u8 = 0x04;
const FLAG_REPEAT: u8 = 0x08;
/// With `X_SHORT`: positive. Without: x equals the previous x.
const FLAG_X_SAME_OR_POSITIVE: u8 = 0x10;
const FLAG_Y_SAME_OR_POSITIVE: u8 = 0x20;

/// Fixed glyf header (10 bytes) plus the instruction length field.
const GLYPH_HEADER_SIZE: usize = 12;

#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    pub id: u16,
    pub name: String,
    /// `None` for `.notdef`.
    pub codepoint: Option<u32>,
    /// Absolute coordinates in font units.
    pub contours: Vec<Contour>,
    /// Advance width.
    pub width: u16,
    pub height: u16,
    pub x_min: i16,
    pub x_max: i16,
    pub y_min: i16,
    pub y_max: i16,
    /// Contours as deltas from the running cursor.
    pub deltas: Vec<Contour>,
    /// Run-length compacted flag bytes.
    pub flags: Vec<u8>,
}

impl Glyph {
    /// Build a glyph, rejecting coordinates TrueType cannot store.
    pub fn new(
        id: u16,
        name: impl Into<String>,
        codepoint: Option<u32>,
        contours: Vec<Contour>,
        width: u16,
        height: u16,
    ) -> Result<Self> {
        let name = name.into();
        let (x_min, x_max, y_min, y_max) = bounding_box(&contours);
        let x_min = check_range(&name, "xMin", x_min)?;
        let x_max = check_range(&name, "xMax", x_max)?;
        let y_min = check_range(&name, "yMin", y_min)?;
        let y_max = check_range(&name, "yMax", y_max)?;

        let deltas = to_relative(&contours);
        for p in deltas.iter().flatten() {
            check_range(&name, "dx", p.x as i64)?;
            check_range(&name, "dy", p.y as i64)?;
        }
        let flags = compact_flags(&deltas.iter().flatten().map(point_flag).collect::<Vec<_>>());

        Ok(Self {
            id,
            name,
            codepoint,
            contours,
            width,
            height,
            x_min,
            x_max,
            y_min,
            y_max,
            deltas,
            flags,
        })
    }

    /// The `.notdef` glyph: no outline, a full-canvas advance.
    pub fn notdef(width: u16, height: u16) -> Self {
        Self {
            id: 0,
            name: ".notdef".to_string(),
            codepoint: None,
            contours: Vec::new(),
            width,
            height,
            x_min: 0,
            x_max: 0,
            y_min: 0,
            y_max: 0,
            deltas: Vec::new(),
            flags: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.contours.is_empty()
    }

    pub fn point_count(&self) -> usize {
        self.contours.iter().map(Vec::len).sum()
    }

    /// Left side bearing.
    pub fn lsb(&self) -> i16 {
        self.x_min
    }

    /// Right side bearing.
    pub fn rsb(&self) -> i32 {
        self.width as i32 - self.x_max as i32
    }

    /// Length of this glyph's glyf entry, padded to 4 bytes. Empty glyphs
    /// take no space at all.
    pub fn size_bytes(&self) -> usize {
        if self.is_empty() {
            return 0;
        }
        let coords: usize = self
            .deltas
            .iter()
            .flatten()
            .map(|p| coord_size(p.x) + coord_size(p.y))
            .sum();
        let size = GLYPH_HEADER_SIZE + 2 * self.contours.len() + self.flags.len() + coords;
        (size + 3) & !3
    }
}

fn bounding_box(contours: &[Contour]) -> (i64, i64, i64, i64) {
    let mut points = contours.iter().flatten();
    let Some(first) = points.next() else {
        return (0, 0, 0, 0);
    };
    points.fold(
        (first.x as i64, first.x as i64, first.y as i64, first.y as i64),
        |(x_min, x_max, y_min, y_max), p| {
            (
                x_min.min(p.x as i64),
                x_max.max(p.x as i64),
                y_min.min(p.y as i64),
                y_max.max(p.y as i64),
            )
        },
    )
}

fn check_range(glyph: &str, field: &'static str, value: i64) -> Result<i16> {
    i16::try_from(value).map_err(|_| IconforgeError::CoordinateOutOfRange {
        glyph: glyph.to_string(),
        field,
        value,
    })
}

/// Bytes a delta takes in the coordinate arrays.
pub(crate) fn coord_size(delta: i32) -> usize {
    match delta {
        0 => 0,
        -255..=255 => 1,
        _ => 2,
    }
}

fn point_flag(p: &crate::outline::OutlinePoint) -> u8 {
    let mut flag = if p.on_curve { FLAG_ON_CURVE } else { 0 };
    flag |= match p.x {
        0 => FLAG_X_SAME_OR_POSITIVE,
        1..=255 => FLAG_X_SHORT | FLAG_X_SAME_OR_POSITIVE,
        -255..=-1 => FLAG_X_SHORT,
        _ => 0,
    };
    flag |= match p.y {
        0 => FLAG_Y_SAME_OR_POSITIVE,
        1..=255 => FLAG_Y_SHORT | FLAG_Y_SAME_OR_POSITIVE,
        -255..=-1 => FLAG_Y_SHORT,
        _ => 0,
    };
    flag
}

/// Collapse runs of equal flags into `[flag | REPEAT, count]`. A run
/// repeats at most 255 times before a new run starts.
fn compact_flags(flags: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(flags.len());
    let mut i = 0;
    while i < flags.len() {
        let flag = flags[i];
        let mut repeat = 0;
        while repeat < 255 && flags.get(i + 1 + repeat) == Some(&flag) {
            repeat += 1;
        }
        if repeat > 0 {
            out.push(flag | FLAG_REPEAT);
            out.push(repeat as u8);
        } else {
            out.push(flag);
        }
        i += 1 + repeat;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::OutlinePoint;

    fn on(x: i32, y: i32) -> OutlinePoint {
        OutlinePoint { x, y, on_curve: true }
    }

    fn square(min: i32, max: i32) -> Vec<Contour> {
        vec![vec![on(min, min), on(max, min), on(max, max), on(min, max)]]
    }

    #[test]
    fn test_bounding_box_and_bearings() {
        let glyph = Glyph::new(1, "box", Some(0xEA01), square(16, 496), 512, 512).unwrap();
        assert_eq!((glyph.x_min, glyph.x_max, glyph.y_min, glyph.y_max), (16, 496, 16, 496));
        assert_eq!(glyph.lsb(), 16);
        assert_eq!(glyph.rsb(), 16);
        assert_eq!(glyph.point_count(), 4);
    }

    #[test]
    fn test_out_of_range_names_field() {
        let contours = vec![vec![on(0, 0), on(40000, 0), on(0, 10)]];
        let err = Glyph::new(3, "huge", None, contours, 512, 512).unwrap_err();
        match err {
            IconforgeError::CoordinateOutOfRange { glyph, field, value } => {
                assert_eq!(glyph, "huge");
                assert_eq!(field, "xMax");
                assert_eq!(value, 40000);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_delta_out_of_range() {
        let contours = vec![vec![on(-30000, 0), on(30000, 0), on(0, 10)]];
        let err = Glyph::new(3, "wide", None, contours, 512, 512).unwrap_err();
        assert!(matches!(err, IconforgeError::CoordinateOutOfRange { field: "dx", .. }));
    }

    #[test]
    fn test_flags_for_square() {
        // deltas: (16,16) (480,0) (0,480) (-480,0)
        let glyph = Glyph::new(1, "box", None, square(16, 496), 512, 512).unwrap();
        assert_eq!(
            glyph.flags,
            vec![
                FLAG_ON_CURVE | FLAG_X_SHORT | FLAG_X_SAME_OR_POSITIVE | FLAG_Y_SHORT | FLAG_Y_SAME_OR_POSITIVE,
                FLAG_ON_CURVE | FLAG_Y_SAME_OR_POSITIVE,
                FLAG_ON_CURVE | FLAG_X_SAME_OR_POSITIVE,
                FLAG_ON_CURVE | FLAG_Y_SAME_OR_POSITIVE,
            ]
        );
        // 12 + 2 + 4 flags + x(1 + 2 + 0 + 2) + y(1 + 0 + 2 + 0) = 26 -> 28
        assert_eq!(glyph.size_bytes(), 28);
    }

    #[test]
    fn test_compact_flags_runs() {
        assert_eq!(compact_flags(&[1, 1, 1, 2]), vec![9, 2, 2]);
        assert_eq!(compact_flags(&[1, 2, 1]), vec![1, 2, 1]);

        let long = vec![0x31u8; 300];
        // 1 + 255 repeats, then 1 + 43 repeats
        assert_eq!(compact_flags(&long), vec![0x39, 255, 0x39, 43]);
    }

    #[test]
    fn test_negative_short_and_long_flags() {
        let p = OutlinePoint { x: -10, y: 300, on_curve: false };
        assert_eq!(point_flag(&p), FLAG_X_SHORT);
        assert_eq!(coord_size(-10), 1);
        assert_eq!(coord_size(300), 2);
        assert_eq!(coord_size(0), 0);
    }

    #[test]
    fn test_notdef_is_empty() {
        let notdef = Glyph::notdef(512, 512);
        assert!(notdef.is_empty());
        assert_eq!(notdef.size_bytes(), 0);
        assert_eq!(notdef.id, 0);
    }
}
