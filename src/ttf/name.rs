//! `name`: naming table, format 0.
//!
//! Every name is stored twice: as UTF-8 bytes under Macintosh (1, 0, 0) and
//! as UTF-16BE under Windows Unicode BMP (3, 1, 0x409).

use super::writer::ByteWriter;
use crate::font::Font;

pub const COPYRIGHT: u16 = 0;
pub const FAMILY: u16 = 1;
pub const SUBFAMILY: u16 = 2;
pub const UNIQUE_ID: u16 = 3;
pub const FULL_NAME: u16 = 4;
pub const VERSION: u16 = 5;
pub const POSTSCRIPT_NAME: u16 = 6;
pub const DESCRIPTION: u16 = 10;
pub const VENDOR_URL: u16 = 11;

const MAX_POSTSCRIPT_LEN: usize = 62;

struct NameRecord {
    platform_id: u16,
    encoding_id: u16,
    language_id: u16,
    name_id: u16,
    data: Vec<u8>,
}

/// The `(name id, value)` pairs written for a font.
pub fn font_names(font: &Font) -> Vec<(u16, String)> {
    let mut names = Vec::new();
    if let Some(copyright) = &font.copyright {
        names.push((COPYRIGHT, copyright.clone()));
    }
    names.push((FAMILY, font.family_name.clone()));
    names.push((SUBFAMILY, font.subfamily_name.clone()));
    names.push((UNIQUE_ID, format!("{}:{}", font.family_name, font.version)));
    names.push((FULL_NAME, font.full_name.clone()));
    names.push((VERSION, format!("Version {}", font.version)));
    names.push((POSTSCRIPT_NAME, postscript_name(&font.full_name)));
    if let Some(description) = &font.description {
        names.push((DESCRIPTION, description.clone()));
    }
    if let Some(url) = &font.url {
        names.push((VENDOR_URL, url.clone()));
    }
    names
}

/// Printable ASCII without whitespace or `()[]<>%/{}`, at most 62 bytes.
pub fn postscript_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_graphic() && !"()[]<>%/{}".contains(*c))
        .take(MAX_POSTSCRIPT_LEN)
        .collect()
}

pub fn encode(font: &Font) -> Vec<u8> {
    let mut records: Vec<NameRecord> = Vec::new();
    for (name_id, value) in font_names(font) {
        records.push(NameRecord {
            platform_id: 1,
            encoding_id: 0,
            language_id: 0,
            name_id,
            data: value.as_bytes().to_vec(),
        });
        records.push(NameRecord {
            platform_id: 3,
            encoding_id: 1,
            language_id: 0x409,
            name_id,
            data: value.encode_utf16().flat_map(|c| c.to_be_bytes()).collect(),
        });
    }
    records.sort_by_key(|r| (r.platform_id, r.encoding_id, r.language_id, r.name_id));

    let string_offset = 6 + 12 * records.len();
    let mut w = ByteWriter::new();
    w.u16(0) // format
        .u16(records.len() as u16) // count
        .u16(string_offset as u16);

    let mut offset = 0usize;
    for record in &records {
        w.u16(record.platform_id)
            .u16(record.encoding_id)
            .u16(record.language_id)
            .u16(record.name_id)
            .u16(record.data.len() as u16) // length
            .u16(offset as u16);
        offset += record.data.len();
    }
    for record in &records {
        w.bytes(&record.data);
    }
    w.into_inner()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FontConfig;
    use crate::font::Glyph;
    use crate::ttf::writer::read_u16;

    fn font(config: FontConfig) -> Font {
        Font::new(&config, vec![Glyph::notdef(512, 512)], 0)
    }

    /// `(platform, name id) -> bytes`, in table order.
    fn records(data: &[u8]) -> Vec<(u16, u16, Vec<u8>)> {
        let count = read_u16(data, 2) as usize;
        let storage = read_u16(data, 4) as usize;
        (0..count)
            .map(|i| {
                let base = 6 + i * 12;
                let len = read_u16(data, base + 8) as usize;
                let off = storage + read_u16(data, base + 10) as usize;
                (read_u16(data, base), read_u16(data, base + 6), data[off..off + len].to_vec())
            })
            .collect()
    }

    #[test]
    fn test_default_names() {
        let names = font_names(&font(FontConfig::default()));
        let ids: Vec<u16> = names.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(names[2].1, "iconfont:1.0");
        assert_eq!(names[4].1, "Version 1.0");
    }

    #[test]
    fn test_records_sorted_and_paired() {
        let config = FontConfig {
            font_name: "Icöns".to_string(),
            copyright: Some("(c) Someone".to_string()),
            url: Some("https://example.com".to_string()),
            ..Default::default()
        };
        let data = encode(&font(config));
        let recs = records(&data);
        assert_eq!(recs.len(), 16);
        assert!(recs[..8].iter().all(|r| r.0 == 1));
        assert!(recs[8..].iter().all(|r| r.0 == 3));
        assert_eq!(recs[0].1, COPYRIGHT);
        assert_eq!(recs[7].1, VENDOR_URL);

        for (mac, win) in recs[..8].iter().zip(&recs[8..]) {
            assert_eq!(mac.1, win.1);
            let utf8 = String::from_utf8(mac.2.clone()).unwrap();
            let units: Vec<u16> = win.2.chunks(2).map(|c| u16::from_be_bytes([c[0], c[1]])).collect();
            assert_eq!(String::from_utf16(&units).unwrap(), utf8);
        }
    }

    #[test]
    fn test_postscript_name() {
        assert_eq!(postscript_name("My Icons (Bold) 100%"), "MyIconsBold100");
        assert_eq!(postscript_name(&"x".repeat(80)).len(), 62);
        assert_eq!(postscript_name("Icöns"), "Icns");
    }
}
