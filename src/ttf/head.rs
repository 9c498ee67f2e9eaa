//! `head`: font header.

use super::loca;
use super::writer::ByteWriter;
use crate::font::Font;

pub const MAGIC_NUMBER: u32 = 0x5F0F_3CF5;
/// Byte offset of `checkSumAdjustment` inside the table.
pub const CHECKSUM_ADJUSTMENT_OFFSET: usize = 8;

/// Baseline at y=0, lsb at x=0, integer ppem scaling.
const FLAGS: u16 = 0x000B;

pub fn encode(font: &Font) -> Vec<u8> {
    let mut w = ByteWriter::with_capacity(54);
    w.u32(0x0001_0000) // version
        .i32(font_revision(&font.version))
        .u32(0) // checkSumAdjustment, patched by the assembler
        .u32(MAGIC_NUMBER)
        .u16(FLAGS)
        .u16(font.units_per_em)
        .i64(font.created) // created
        .i64(font.created) // modified
        .i16(font.x_min())
        .i16(font.y_min())
        .i16(font.x_max())
        .i16(font.y_max())
        .u16(0) // macStyle
        .u16(8) // lowestRecPPEM
        .i16(2) // fontDirectionHint
        .i16(loca::index_to_loc_format(font))
        .i16(0); // glyphDataFormat
    w.into_inner()
}

/// 16.16 fixed revision from a version string such as "1.2" or "2.0.1".
/// Only the leading `major.minor` number is used.
fn font_revision(version: &str) -> i32 {
    let numeric: String = version
        .trim()
        .chars()
        .scan(false, |seen_dot, c| match c {
            '0'..='9' => Some(c),
            '.' if !*seen_dot => {
                *seen_dot = true;
                Some(c)
            }
            _ => None,
        })
        .collect();
    let value: f64 = numeric.trim_end_matches('.').parse().unwrap_or(1.0);
    (value * 65536.0).round() as i32
}
