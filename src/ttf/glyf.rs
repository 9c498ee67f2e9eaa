//! `glyf`: simple glyph outlines.
//!
//! Every glyph owns a slot whose length matches [`Glyph::size_bytes`], so
//! the offsets written to `loca` line up. Deduplicated glyphs are written
//! with their canonical glyph's bytes, encoded only once.

use super::writer::ByteWriter;
use crate::font::glyph::coord_size;
use crate::font::{Font, Glyph};
use std::collections::HashMap;

pub fn encode(font: &Font) -> Vec<u8> {
    let mut w = ByteWriter::with_capacity(font.glyf_size());
    let mut encoded: HashMap<u16, Vec<u8>> = HashMap::new();

    for glyph in &font.glyphs {
        if glyph.is_empty() {
            continue;
        }
        let canonical = font.canonical_id(glyph.id);
        let bytes = encoded.entry(canonical).or_insert_with(|| {
            let source = font.glyphs.get(canonical as usize).unwrap_or(glyph);
            encode_glyph(source)
        });
        w.bytes(bytes);
    }
    w.into_inner()
}

/// One glyph record, padded to 4 bytes. Empty glyphs encode to nothing.
pub fn encode_glyph(glyph: &Glyph) -> Vec<u8> {
    if glyph.is_empty() {
        return Vec::new();
    }
    let mut w = ByteWriter::with_capacity(glyph.size_bytes());
    w.i16(glyph.contours.len() as i16)
        .i16(glyph.x_min)
        .i16(glyph.y_min)
        .i16(glyph.x_max)
        .i16(glyph.y_max);

    let mut end_point = 0usize;
    for contour in &glyph.contours {
        end_point += contour.len();
        w.u16((end_point - 1) as u16);
    }
    w.u16(0); // instructionLength
    w.bytes(&glyph.flags);

    let points = || glyph.deltas.iter().flatten();
    for p in points() {
        write_coord(&mut w, p.x);
    }
    for p in points() {
        write_coord(&mut w, p.y);
    }
    w.align4();
    w.into_inner()
}

/// Short coordinates are stored as magnitudes; the flag carries the sign.
fn write_coord(w: &mut ByteWriter, delta: i32) {
    match coord_size(delta) {
        0 => {}
        1 => {
            w.u8(delta.unsigned_abs() as u8);
        }
        _ => {
            w.i16(delta as i16);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FontConfig;
    use crate::outline::OutlinePoint;
    use crate::ttf::writer::read_u16;

    fn on(x: i32, y: i32) -> OutlinePoint {
        OutlinePoint { x, y, on_curve: true }
    }

    fn square(id: u16, min: i32, max: i32) -> Glyph {
        let contours = vec![vec![on(min, min), on(max, min), on(max, max), on(min, max)]];
        Glyph::new(id, format!("sq{id}"), Some(0xEA00 + id as u32), contours, 512, 512).unwrap()
    }

    #[test]
    fn test_glyph_record() {
        let glyph = square(1, 16, 496);
        let data = encode_glyph(&glyph);
        assert_eq!(data.len(), glyph.size_bytes());
        assert_eq!(read_u16(&data, 0), 1); // numberOfContours
        assert_eq!(read_u16(&data, 2), 16); // xMin
        assert_eq!(read_u16(&data, 8), 496); // yMax
        assert_eq!(read_u16(&data, 10), 3); // endPtsOfContours[0]
        assert_eq!(read_u16(&data, 12), 0); // instructionLength
        // flags, then x: 16 (short), 480 (long), -480 (long)
        assert_eq!(data[18], 16);
        assert_eq!(read_u16(&data, 19), 480);
        assert_eq!(read_u16(&data, 21) as i16, -480);
        // y: 16 (short), 480 (long)
        assert_eq!(data[23], 16);
        assert_eq!(read_u16(&data, 24), 480);
        assert_eq!(&data[26..], &[0, 0]);
    }

    #[test]
    fn test_duplicates_share_bytes() {
        let glyphs = vec![Glyph::notdef(512, 512), square(1, 0, 100), square(2, 10, 50), square(3, 0, 100)];
        let font = Font::new(&FontConfig::default(), glyphs, 0);
        assert_eq!(font.canonical_id(3), 1);

        let data = encode(&font);
        assert_eq!(data.len(), font.glyf_size());
        let first = encode_glyph(&font.glyphs[1]);
        assert_eq!(&data[data.len() - first.len()..], first.as_slice());
    }

    #[test]
    fn test_dedupe_does_not_change_bytes() {
        let glyphs = vec![Glyph::notdef(512, 512), square(1, 0, 100), square(2, 0, 100)];
        let shared = Font::new(&FontConfig::default(), glyphs.clone(), 0);
        let config = FontConfig {
            dedupe: false,
            ..Default::default()
        };
        let separate = Font::new(&config, glyphs, 0);
        assert_eq!(shared.canonical.len(), 1);
        assert!(separate.canonical.is_empty());
        assert_eq!(encode(&shared), encode(&separate));
    }

    #[test]
    fn test_empty_font_has_no_outline_bytes() {
        let font = Font::new(&FontConfig::default(), vec![Glyph::notdef(512, 512)], 0);
        assert!(encode(&font).is_empty());
    }
}
