//! `OS/2`: OS/2 and Windows metrics, version 4.

use super::writer::ByteWriter;
use crate::font::Font;

/// Generic symbol profile: Latin text family, book weight, no further
/// classification.
const PANOSE: [u8; 10] = [2, 0, 5, 3, 0, 0, 0, 0, 0, 0];
/// Basic Latin (bit 0) and Private Use Area (bit 60).
const UNICODE_RANGE: [u32; 4] = [1, 0x1000_0000, 0, 0];
/// USE_TYPO_METRICS | WWS.
const FS_SELECTION: u16 = 0x00C0;
/// Latin 1 code page.
const CODE_PAGE_RANGE: [u32; 2] = [1, 0];

pub fn encode(font: &Font) -> Vec<u8> {
    let line_gap = font.line_gap();
    let first_char = font.first_codepoint().unwrap_or(0).min(0xFFFF) as u16;
    let last_char = font.last_codepoint().unwrap_or(0).min(0xFFFF) as u16;
    let break_char = if font.codepoints.contains_key(&0x20) { 0x20 } else { 0 };

    // clipping region must cover both the outlines and the line box
    let win_ascent = (font.y_max() as i32).max(font.ascent as i32 + line_gap as i32);
    let win_descent = -(font.y_min() as i32).min(font.descent as i32);

    let mut w = ByteWriter::with_capacity(96);
    w.u16(4) // version
        .i16(font.avg_width())
        .u16(font.weight_class)
        .u16(font.width_class)
        .u16(0) // fsType: installable
        .i16(font.y_subscript_x_size())
        .i16(font.y_subscript_y_size())
        .i16(font.y_subscript_x_offset())
        .i16(font.y_subscript_y_offset())
        .i16(font.y_superscript_x_size())
        .i16(font.y_superscript_y_size())
        .i16(font.y_superscript_x_offset())
        .i16(font.y_superscript_y_offset())
        .i16(font.y_strikeout_size())
        .i16(font.y_strikeout_position())
        .i16(0) // sFamilyClass
        .bytes(&PANOSE);
    for range in UNICODE_RANGE {
        w.u32(range);
    }
    w.tag(&font.vendor)
        .u16(FS_SELECTION)
        .u16(first_char)
        .u16(last_char)
        .i16(font.ascent) // sTypoAscender
        .i16(font.descent) // sTypoDescender
        .i16(line_gap) // sTypoLineGap
        .u16(win_ascent.clamp(0, u16::MAX as i32) as u16)
        .u16(win_descent.clamp(0, u16::MAX as i32) as u16);
    for range in CODE_PAGE_RANGE {
        w.u32(range);
    }
    w.i16(font.x_height())
        .i16(font.cap_height())
        .u16(0) // usDefaultChar
        .u16(break_char)
        .u16(0); // usMaxContext
    w.into_inner()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FontConfig;
    use crate::font::Glyph;
    use crate::outline::OutlinePoint;
    use crate::ttf::writer::{read_u16, read_u32};

    fn on(x: i32, y: i32) -> OutlinePoint {
        OutlinePoint { x, y, on_curve: true }
    }

    fn font_with(y_min: i32, y_max: i32, cp: u32) -> Font {
        let contour = vec![on(0, y_min), on(100, y_min), on(100, y_max), on(0, y_max)];
        let glyphs = vec![
            Glyph::notdef(512, 512),
            Glyph::new(1, "g", Some(cp), vec![contour], 512, 512).unwrap(),
        ];
        Font::new(&FontConfig::default(), glyphs, 0)
    }

    #[test]
    fn test_layout() {
        let data = encode(&font_with(0, 400, 0xEA01));
        assert_eq!(data.len(), 96);
        assert_eq!(read_u16(&data, 0), 4);
        assert_eq!(read_u16(&data, 4), 400); // usWeightClass
        assert_eq!(&data[32..42], &PANOSE);
        assert_eq!(read_u32(&data, 46), 0x1000_0000);
        assert_eq!(&data[58..62], b"PfEd");
        assert_eq!(read_u16(&data, 62), FS_SELECTION);
        assert_eq!(read_u16(&data, 64), 0xEA01);
        assert_eq!(read_u16(&data, 66), 0xEA01);
        assert_eq!(read_u16(&data, 94), 0); // usMaxContext
    }

    #[test]
    fn test_win_metrics_cover_outlines() {
        // ascent 512 + line gap 46 beats yMax 400; yMin -100 beats descent 0
        let data = encode(&font_with(-100, 400, 0xEA01));
        assert_eq!(read_u16(&data, 74), 558);
        assert_eq!(read_u16(&data, 76), 100);

        let data = encode(&font_with(0, 600, 0xEA01));
        assert_eq!(read_u16(&data, 74), 600);
        assert_eq!(read_u16(&data, 76), 0);
    }

    #[test]
    fn test_break_char() {
        let data = encode(&font_with(0, 10, 0x20));
        assert_eq!(read_u16(&data, 92), 0x20);
        let data = encode(&font_with(0, 10, 0x1F600));
        assert_eq!(read_u16(&data, 66), 0xFFFF);
        assert_eq!(read_u16(&data, 92), 0);
    }
}
