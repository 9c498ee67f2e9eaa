//! # TrueType Writer
//!
//! Encodes a [`Font`] into a complete SFNT buffer.
//!
//! ## Approach
//!
//! 1. Encode every table independently from the finished font
//! 2. Lay table bodies out in the recommended order, each padded to 4 bytes
//! 3. Write the offset table and a tag-sorted directory with checksums of
//!    the unpadded table bytes
//! 4. Patch `head.checkSumAdjustment` so the whole file sums to `0xB1B0AFBA`

pub mod cmap;
pub mod glyf;
pub mod gsub;
pub mod head;
pub mod hhea;
pub mod hmtx;
pub mod loca;
pub mod maxp;
pub mod name;
pub mod os2;
pub mod post;
pub mod writer;

use crate::error::{IconforgeError, Result};
use crate::font::Font;
use writer::{calc_checksum, search_params, write_u32, ByteWriter};

const SFNT_VERSION: u32 = 0x0001_0000;
const CHECKSUM_MAGIC: u32 = 0xB1B0_AFBA;
const OFFSET_TABLE_LEN: usize = 12;
const TABLE_RECORD_LEN: usize = 16;

/// One encoded table and its place in the file.
#[derive(Debug, Clone)]
pub struct TtfTable {
    pub tag: [u8; 4],
    /// Position in the body layout; ties keep insertion order.
    pub order: u8,
    pub bytes: Vec<u8>,
    /// Over the unpadded bytes.
    pub checksum: u32,
    pub offset: u32,
    pub length: u32,
    pub padded_length: u32,
}

impl TtfTable {
    fn new(tag: &[u8; 4], order: u8, bytes: Vec<u8>) -> Self {
        let length = bytes.len() as u32;
        Self {
            tag: *tag,
            order,
            checksum: calc_checksum(&bytes),
            offset: 0,
            length,
            padded_length: (length + 3) & !3,
            bytes,
        }
    }
}

/// Encode all tables of `font`.
pub fn encode_tables(font: &Font) -> Result<Vec<TtfTable>> {
    if font.glyphs.is_empty() {
        return Err(IconforgeError::NoResultData);
    }
    Ok(vec![
        TtfTable::new(b"hhea", 1, hhea::encode(font)),
        TtfTable::new(b"head", 2, head::encode(font)),
        TtfTable::new(b"maxp", 3, maxp::encode(font)),
        TtfTable::new(b"OS/2", 4, os2::encode(font)),
        TtfTable::new(b"GSUB", 4, gsub::encode()),
        TtfTable::new(b"hmtx", 5, hmtx::encode(font)),
        TtfTable::new(b"cmap", 6, cmap::encode(font)),
        TtfTable::new(b"loca", 7, loca::encode(font)),
        TtfTable::new(b"glyf", 8, glyf::encode(font)),
        TtfTable::new(b"name", 9, name::encode(font)),
        TtfTable::new(b"post", 10, post::encode(font)?),
    ])
}

/// Encode `font` into a TrueType file.
pub fn build_ttf(font: &Font) -> Result<Vec<u8>> {
    let tables = encode_tables(font)?;
    Ok(assemble(tables))
}

/// Lay out, write and checksum the tables.
pub fn assemble(mut tables: Vec<TtfTable>) -> Vec<u8> {
    tables.sort_by_key(|t| t.order);

    let num_tables = tables.len();
    let mut offset = OFFSET_TABLE_LEN + num_tables * TABLE_RECORD_LEN;
    for table in &mut tables {
        table.offset = offset as u32;
        offset += table.padded_length as usize;
    }

    let (search_range, entry_selector, range_shift) = search_params(num_tables as u16, 16);
    let mut w = ByteWriter::with_capacity(offset);
    w.u32(SFNT_VERSION)
        .u16(num_tables as u16)
        .u16(search_range)
        .u16(entry_selector)
        .u16(range_shift);

    let mut directory: Vec<&TtfTable> = tables.iter().collect();
    directory.sort_by_key(|t| t.tag);
    for table in &directory {
        w.tag(&table.tag)
            .u32(table.checksum)
            .u32(table.offset)
            .u32(table.length);
    }

    for table in &tables {
        w.bytes(&table.bytes).align4();
    }

    let mut output = w.into_inner();
    if let Some(head) = tables.iter().find(|t| &t.tag == b"head") {
        let adjustment = CHECKSUM_MAGIC.wrapping_sub(calc_checksum(&output));
        write_u32(
            &mut output,
            head.offset as usize + head::CHECKSUM_ADJUSTMENT_OFFSET,
            adjustment,
        );
    }

    log::debug!("assembled {} tables into {} bytes", num_tables, output.len());
    output
}
