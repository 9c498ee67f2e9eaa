//! `hmtx`: one long horizontal metric per glyph.

use super::writer::ByteWriter;
use crate::font::Font;

pub fn encode(font: &Font) -> Vec<u8> {
    let mut w = ByteWriter::with_capacity(font.glyphs.len() * 4);
    for glyph in &font.glyphs {
        w.u16(glyph.width).i16(glyph.lsb());
    }
    w.into_inner()
}
