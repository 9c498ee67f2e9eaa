//! `cmap`: character to glyph mapping.
//!
//! Three subtables are written once each and shared between encoding
//! records:
//!
//! | platform / encoding          | subtable  |
//! |------------------------------|-----------|
//! | Unicode BMP (0, 3)           | format 4  |
//! | Unicode full (0, 4)          | format 12 |
//! | Macintosh Roman (1, 0)       | format 0  |
//! | Windows BMP (3, 1)           | format 4  |
//! | Windows full (3, 10)         | format 12 |

use super::writer::{search_params, ByteWriter};
use crate::font::Font;
use std::collections::BTreeMap;

#[derive(Clone, Copy)]
enum Subtable {
    Format0,
    Format4,
    Format12,
}

const ENCODING_RECORDS: [(u16, u16, Subtable); 5] = [
    (0, 3, Subtable::Format4),
    (0, 4, Subtable::Format12),
    (1, 0, Subtable::Format0),
    (3, 1, Subtable::Format4),
    (3, 10, Subtable::Format12),
];

pub fn encode(font: &Font) -> Vec<u8> {
    let format0 = encode_format0(&font.codepoints);
    let format4 = encode_format4(&font.codepoints);
    let format12 = encode_format12(&font.codepoints);

    let header_len = 4 + ENCODING_RECORDS.len() * 8;
    let offset0 = header_len;
    let offset4 = offset0 + format0.len();
    let offset12 = offset4 + format4.len();

    let mut w = ByteWriter::with_capacity(offset12 + format12.len());
    w.u16(0) // version
        .u16(ENCODING_RECORDS.len() as u16); // numTables
    for (platform, encoding, subtable) in ENCODING_RECORDS {
        let offset = match subtable {
            Subtable::Format0 => offset0,
            Subtable::Format4 => offset4,
            Subtable::Format12 => offset12,
        };
        w.u16(platform).u16(encoding).u32(offset as u32);
    }
    w.bytes(&format0).bytes(&format4).bytes(&format12);
    w.into_inner()
}

/// Byte encoding table: the first 256 codepoints, glyph ids below 256.
fn encode_format0(codepoints: &BTreeMap<u32, u16>) -> Vec<u8> {
    let mut glyph_ids = [0u8; 256];
    for (&cp, &gid) in codepoints.range(..256) {
        if let Ok(id) = u8::try_from(gid) {
            glyph_ids[cp as usize] = id;
        }
    }
    let mut w = ByteWriter::with_capacity(262);
    w.u16(0) // format
        .u16(262) // length
        .u16(0) // language
        .bytes(&glyph_ids);
    w.into_inner()
}

/// The format 4 length field and `idRangeOffset`s are 16-bit.
const MAX_FORMAT4_LEN: usize = u16::MAX as usize;
/// Header, reservedPad and the closing 0xFFFF segment.
const FORMAT4_FIXED_LEN: usize = 16 + 8;

/// Contiguous BMP runs `(start, end, glyph ids)`.
///
/// Codepoints past what fits in a format 4 subtable are left out; format 12
/// still maps them.
fn bmp_segments(codepoints: &BTreeMap<u32, u16>) -> Vec<(u16, u16, Vec<u16>)> {
    let mut segments: Vec<(u16, u16, Vec<u16>)> = Vec::new();
    let mut length = FORMAT4_FIXED_LEN;
    for (&cp, &gid) in codepoints.range(..0xFFFF) {
        let cp = cp as u16;
        let extends = segments.last().is_some_and(|last| cp == last.1 + 1);
        // a glyph id entry, plus the segment arrays for a new segment
        let cost = if extends { 2 } else { 2 + 8 };
        if length + cost > MAX_FORMAT4_LEN {
            log::warn!(
                "cmap format 4 is full at U+{:04X}; later BMP codepoints are only in format 12",
                cp
            );
            break;
        }
        length += cost;
        if extends {
            if let Some(last) = segments.last_mut() {
                last.1 = cp;
                last.2.push(gid);
            }
        } else {
            segments.push((cp, cp, vec![gid]));
        }
    }
    segments
}

/// Segment mapping to delta values. Every segment addresses its glyphs
/// through `idRangeOffset` into a shared glyph id array; the closing
/// 0xFFFF segment maps to glyph 0.
fn encode_format4(codepoints: &BTreeMap<u32, u16>) -> Vec<u8> {
    let segments = bmp_segments(codepoints);
    let seg_count = segments.len() + 1;
    let (search_range, entry_selector, range_shift) = search_params(seg_count as u16, 2);

    let mut id_range_offsets = Vec::with_capacity(seg_count);
    let mut glyph_id_array: Vec<u16> = Vec::new();
    for (i, (_, _, gids)) in segments.iter().enumerate() {
        // from this idRangeOffset entry to the segment's first array slot
        id_range_offsets.push((2 * (seg_count - i) + 2 * glyph_id_array.len()) as u16);
        glyph_id_array.extend_from_slice(gids);
    }
    id_range_offsets.push(0);

    let length = 16 + seg_count * 8 + glyph_id_array.len() * 2;
    let mut w = ByteWriter::with_capacity(length);
    w.u16(4) // format
        .u16(length as u16)
        .u16(0) // language
        .u16((seg_count * 2) as u16) // segCountX2
        .u16(search_range)
        .u16(entry_selector)
        .u16(range_shift);
    for (_, end, _) in &segments {
        w.u16(*end);
    }
    w.u16(0xFFFF);
    w.u16(0); // reservedPad
    for (start, _, _) in &segments {
        w.u16(*start);
    }
    w.u16(0xFFFF);
    for _ in &segments {
        w.i16(0); // idDelta
    }
    w.i16(1);
    for offset in &id_range_offsets {
        w.u16(*offset);
    }
    for gid in &glyph_id_array {
        w.u16(*gid);
    }
    w.into_inner()
}

/// Runs contiguous in both codepoint and glyph id.
fn sequential_groups(codepoints: &BTreeMap<u32, u16>) -> Vec<(u32, u32, u32)> {
    let mut groups: Vec<(u32, u32, u32)> = Vec::new();
    for (&cp, &gid) in codepoints {
        if let Some(last) = groups.last_mut() {
            let expected_gid = last.2 + (last.1 - last.0) + 1;
            if cp == last.1 + 1 && gid as u32 == expected_gid {
                last.1 = cp;
                continue;
            }
        }
        groups.push((cp, cp, gid as u32));
    }
    groups
}

/// Segmented coverage over the full Unicode range.
fn encode_format12(codepoints: &BTreeMap<u32, u16>) -> Vec<u8> {
    let groups = sequential_groups(codepoints);
    let length = 16 + groups.len() * 12;
    let mut w = ByteWriter::with_capacity(length);
    w.u16(12) // format
        .u16(0) // reserved
        .u32(length as u32)
        .u32(0) // language
        .u32(groups.len() as u32);
    for (start, end, gid) in groups {
        w.u32(start).u32(end).u32(gid);
    }
    w.into_inner()
}
