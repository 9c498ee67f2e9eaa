//! `GSUB`: a fixed, empty glyph substitution table.
//!
//! Registers the `DFLT` and `latn` scripts with one `liga` feature pointing
//! at a ligature lookup that has no ligature sets. Some renderers only
//! enable ligature processing for fonts that declare the feature.

use super::writer::ByteWriter;

const HEADER_LEN: u16 = 10;
const SCRIPT_LIST_LEN: u16 = 2 + 2 * 6 + 2 * SCRIPT_LEN;
/// Script table (4 bytes) followed by its default LangSys (8 bytes).
const SCRIPT_LEN: u16 = 12;
const FEATURE_LIST_LEN: u16 = 2 + 6 + 6;

pub fn encode() -> Vec<u8> {
    let script_list = HEADER_LEN;
    let feature_list = script_list + SCRIPT_LIST_LEN;
    let lookup_list = feature_list + FEATURE_LIST_LEN;

    let mut w = ByteWriter::new();
    w.u16(1) // majorVersion
        .u16(0) // minorVersion
        .u16(script_list)
        .u16(feature_list)
        .u16(lookup_list);

    // ScriptList
    w.u16(2); // scriptCount
    let first_script = 2 + 2 * 6;
    for (i, tag) in [b"DFLT", b"latn"].into_iter().enumerate() {
        w.tag(tag).u16(first_script + i as u16 * SCRIPT_LEN);
    }
    for _ in 0..2 {
        w.u16(4) // defaultLangSysOffset
            .u16(0); // langSysCount
        w.u16(0) // lookupOrderOffset
            .u16(0xFFFF) // requiredFeatureIndex
            .u16(1) // featureIndexCount
            .u16(0); // featureIndices[0]
    }

    // FeatureList
    w.u16(1) // featureCount
        .tag(b"liga")
        .u16(8); // featureOffset
    w.u16(0) // featureParamsOffset
        .u16(1) // lookupIndexCount
        .u16(0); // lookupListIndices[0]

    // LookupList
    w.u16(1) // lookupCount
        .u16(4); // lookupOffsets[0]
    w.u16(4) // lookupType: ligature substitution
        .u16(0) // lookupFlag
        .u16(1) // subTableCount
        .u16(8); // subtableOffsets[0]
    w.u16(1) // substFormat
        .u16(6) // coverageOffset
        .u16(0); // ligatureSetCount
    w.u16(1) // coverageFormat
        .u16(0); // glyphCount

    w.into_inner()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ttf::writer::read_u16;

    #[test]
    fn test_offsets_resolve() {
        let data = encode();
        assert_eq!(data.len(), 84);

        let script_list = read_u16(&data, 4) as usize;
        assert_eq!(read_u16(&data, script_list), 2);
        assert_eq!(&data[script_list + 2..script_list + 6], b"DFLT");
        let latn = script_list + read_u16(&data, script_list + 12) as usize;
        let lang_sys = latn + read_u16(&data, latn) as usize;
        assert_eq!(read_u16(&data, lang_sys + 2), 0xFFFF);

        let feature_list = read_u16(&data, 6) as usize;
        assert_eq!(&data[feature_list + 2..feature_list + 6], b"liga");

        let lookup_list = read_u16(&data, 8) as usize;
        let lookup = lookup_list + read_u16(&data, lookup_list + 2) as usize;
        assert_eq!(read_u16(&data, lookup), 4);
        let subtable = lookup + read_u16(&data, lookup + 6) as usize;
        let coverage = subtable + read_u16(&data, subtable + 2) as usize;
        assert_eq!(read_u16(&data, coverage), 1);
        assert_eq!(coverage + 4, data.len());
    }
}
