//! `hhea`: horizontal header.

use super::writer::ByteWriter;
use crate::font::Font;

pub fn encode(font: &Font) -> Vec<u8> {
    let mut w = ByteWriter::with_capacity(36);
    w.u32(0x0001_0000) // version
        .i16(font.ascent)
        .i16(font.descent)
        .i16(font.line_gap())
        .u16(font.max_width()) // advanceWidthMax
        .i16(font.min_lsb())
        .i16(font.min_rsb())
        .i16(font.max_extent())
        .i16(1) // caretSlopeRise
        .i16(0) // caretSlopeRun
        .i16(0) // caretOffset
        .i16(0)
        .i16(0)
        .i16(0)
        .i16(0) // reserved
        .i16(0) // metricDataFormat
        .u16(font.glyphs.len() as u16); // numberOfHMetrics
    w.into_inner()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FontConfig;
    use crate::font::Glyph;
    use crate::ttf::writer::read_u16;

    #[test]
    fn test_layout() {
        let config = FontConfig {
            descent: -64,
            ..Default::default()
        };
        let font = Font::new(&config, vec![Glyph::notdef(512, 512)], 0);
        let data = encode(&font);
        assert_eq!(data.len(), 36);
        assert_eq!(read_u16(&data, 4) as i16, 448);
        assert_eq!(read_u16(&data, 6) as i16, -64);
        assert_eq!(read_u16(&data, 8) as i16, 46);
        assert_eq!(read_u16(&data, 10), 512);
        assert_eq!(read_u16(&data, 18), 1);
        assert_eq!(read_u16(&data, 34), 1);
    }
}
