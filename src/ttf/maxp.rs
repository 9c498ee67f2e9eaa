//! `maxp`: maximum profile, version 1.0.
//!
//! Only `numGlyphs`, `maxPoints` and `maxContours` depend on the font. The
//! hinting limits are fixed values above what common rasterizers expect,
//! since the glyphs carry no instructions.

use super::writer::ByteWriter;
use crate::font::Font;

pub fn encode(font: &Font) -> Vec<u8> {
    let mut w = ByteWriter::with_capacity(32);
    w.u32(0x0001_0000) // version
        .u16(font.glyphs.len() as u16) // numGlyphs
        .u16(font.max_points())
        .u16(font.max_contours())
        .u16(0) // maxCompositePoints
        .u16(0) // maxCompositeContours
        .u16(2) // maxZones
        .u16(0) // maxTwilightPoints
        .u16(10) // maxStorage
        .u16(10) // maxFunctionDefs
        .u16(0) // maxInstructionDefs
        .u16(255) // maxStackElements
        .u16(0) // maxSizeOfInstructions
        .u16(0) // maxComponentElements
        .u16(0); // maxComponentDepth
    w.into_inner()
}
