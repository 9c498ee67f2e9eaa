//! `loca`: glyph offsets into `glyf`.

use super::writer::ByteWriter;
use crate::font::Font;

/// glyf sizes from this length on need 32-bit offsets.
pub const LONG_OFFSET_THRESHOLD: usize = 0x20000;

/// `0` for short (offset / 2 as u16), `1` for long offsets.
pub fn index_to_loc_format(font: &Font) -> i16 {
    loc_format_for(font.glyf_size())
}

pub(crate) fn loc_format_for(glyf_size: usize) -> i16 {
    if glyf_size < LONG_OFFSET_THRESHOLD {
        0
    } else {
        1
    }
}

/// Cumulative offsets, one per glyph plus the end offset.
pub fn offsets(font: &Font) -> Vec<u32> {
    let mut offsets = Vec::with_capacity(font.glyphs.len() + 1);
    let mut offset = 0u32;
    offsets.push(offset);
    for glyph in &font.glyphs {
        offset += glyph.size_bytes() as u32;
        offsets.push(offset);
    }
    offsets
}

pub fn encode(font: &Font) -> Vec<u8> {
    build(&offsets(font), index_to_loc_format(font))
}

fn build(offsets: &[u32], format: i16) -> Vec<u8> {
    let mut w = ByteWriter::new();
    for &offset in offsets {
        if format == 0 {
            // glyph sizes are multiples of 4, so offset / 2 is exact
            w.u16((offset / 2) as u16);
        } else {
            w.u32(offset);
        }
    }
    w.into_inner()
}
