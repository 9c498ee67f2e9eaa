//! `post`: PostScript information, version 2.0 with glyph names.

use super::writer::ByteWriter;
use crate::error::{IconforgeError, Result};
use crate::font::Font;

/// Index of the first custom name; 0..258 are the standard Macintosh names.
pub const FIRST_CUSTOM_INDEX: u16 = 258;

/// Most glyph names a version 2 table can index.
pub const MAX_CUSTOM_NAMES: usize = (u16::MAX - FIRST_CUSTOM_INDEX) as usize + 1;

pub fn encode(font: &Font) -> Result<Vec<u8>> {
    let mut w = ByteWriter::new();
    w.u32(0x0002_0000) // version
        .u32(0) // italicAngle
        .i16(font.underline_position())
        .i16(font.underline_thickness())
        .u32(0) // isFixedPitch
        .u32(0) // minMemType42
        .u32(0) // maxMemType42
        .u32(0) // minMemType1
        .u32(0) // maxMemType1
        .u16(font.glyphs.len() as u16);

    let mut names: Vec<Vec<u8>> = Vec::new();
    for glyph in &font.glyphs {
        if glyph.id == 0 || glyph.codepoint.is_none() {
            // .notdef
            w.u16(0);
        } else {
            let index = u16::try_from(FIRST_CUSTOM_INDEX as usize + names.len())
                .map_err(|_| IconforgeError::TooManyGlyphs(font.glyphs.len()))?;
            w.u16(index);
            names.push(pascal_string(&glyph.name));
        }
    }
    for name in &names {
        w.bytes(name);
    }
    Ok(w.into_inner())
}

/// Length-prefixed ASCII; other characters become `_`.
fn pascal_string(name: &str) -> Vec<u8> {
    let bytes: Vec<u8> = name
        .chars()
        .map(|c| if c.is_ascii() { c as u8 } else { b'_' })
        .take(255)
        .collect();
    let mut out = Vec::with_capacity(bytes.len() + 1);
    out.push(bytes.len() as u8);
    out.extend(bytes);
    out
}
