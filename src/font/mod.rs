//! # Font Model
//!
//! The whole-font view every table encoder reads from: the ordered glyph
//! list, the codepoint map, the dedup redirect table and the font-wide
//! metrics. A [`Font`] is assembled once after all glyphs exist and is
//! never mutated afterwards.
//!
//! Metrics that can be tuned from [`MetricOverrides`] are exposed as
//! accessors returning the override when set and a value derived from
//! `ascent - descent` otherwise.

pub mod glyph;

pub use glyph::Glyph;

use crate::config::{FontConfig, MetricOverrides};
use std::collections::{BTreeMap, HashMap};

/// Seconds between 1904-01-01 (the SFNT epoch) and 1970-01-01.
const SFNT_EPOCH_OFFSET: i64 = 2_082_844_800;

pub struct Font {
    pub family_name: String,
    pub subfamily_name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub copyright: Option<String>,
    pub url: Option<String>,
    pub version: String,
    pub vendor: [u8; 4],

    pub units_per_em: u16,
    pub ascent: i16,
    pub descent: i16,
    pub weight_class: u16,
    pub width_class: u16,
    /// Creation and modification time, seconds since 1904-01-01.
    pub created: i64,

    /// Indexed by glyph id; `glyphs[0]` is `.notdef`.
    pub glyphs: Vec<Glyph>,
    /// Codepoint to glyph id. The first glyph claiming a codepoint wins.
    pub codepoints: BTreeMap<u32, u16>,
    /// Duplicate glyph id to the id of the glyph whose outline it shares.
    pub canonical: BTreeMap<u16, u16>,
    pub overrides: MetricOverrides,
}

impl Font {
    /// Assemble the font from its glyphs. `glyphs` must be in id order
    /// starting with `.notdef`.
    pub fn new(config: &FontConfig, glyphs: Vec<Glyph>, unix_time: u64) -> Self {
        let mut codepoints = BTreeMap::new();
        for glyph in &glyphs {
            let Some(cp) = glyph.codepoint else { continue };
            if let Some(&owner) = codepoints.get(&cp) {
                log::warn!(
                    "codepoint U+{:04X} of glyph \"{}\" already mapped to glyph {}, skipping",
                    cp,
                    glyph.name,
                    owner
                );
                continue;
            }
            codepoints.insert(cp, glyph.id);
        }

        let canonical = if config.dedupe {
            find_duplicates(&glyphs)
        } else {
            BTreeMap::new()
        };

        Self {
            family_name: config.font_name.clone(),
            subfamily_name: config.subfamily_name.clone(),
            full_name: config.full_name().to_string(),
            description: config.description.clone(),
            copyright: config.copyright.clone(),
            url: config.url.clone(),
            version: config.version.clone(),
            vendor: vendor_tag(&config.vendor),
            units_per_em: config.units_per_em,
            ascent: config.ascent(),
            descent: config.descent,
            weight_class: config.weight_class,
            width_class: config.width_class,
            created: unix_time as i64 + SFNT_EPOCH_OFFSET,
            glyphs,
            codepoints,
            canonical,
            overrides: config.metrics,
        }
    }

    /// The glyph whose outline glyph `id` is written with.
    pub fn canonical_id(&self, id: u16) -> u16 {
        self.canonical.get(&id).copied().unwrap_or(id)
    }

    fn outlined(&self) -> impl Iterator<Item = &Glyph> {
        self.glyphs.iter().filter(|g| !g.is_empty())
    }

    // ── Bounding box ──

    pub fn x_min(&self) -> i16 {
        self.outlined().map(|g| g.x_min).min().unwrap_or(0)
    }

    pub fn x_max(&self) -> i16 {
        self.outlined().map(|g| g.x_max).max().unwrap_or(0)
    }

    pub fn y_min(&self) -> i16 {
        self.outlined().map(|g| g.y_min).min().unwrap_or(0)
    }

    pub fn y_max(&self) -> i16 {
        self.outlined().map(|g| g.y_max).max().unwrap_or(0)
    }

    // ── Horizontal metrics ──

    pub fn avg_width(&self) -> i16 {
        if self.glyphs.is_empty() {
            return 0;
        }
        let total: u64 = self.glyphs.iter().map(|g| g.width as u64).sum();
        round(total as f64 / self.glyphs.len() as f64)
    }

    pub fn max_width(&self) -> u16 {
        self.glyphs.iter().map(|g| g.width).max().unwrap_or(0)
    }

    pub fn min_lsb(&self) -> i16 {
        self.outlined().map(|g| g.lsb()).min().unwrap_or(0)
    }

    pub fn min_rsb(&self) -> i16 {
        let rsb = self.outlined().map(|g| g.rsb()).min().unwrap_or(0);
        rsb.clamp(i16::MIN as i32, i16::MAX as i32) as i16
    }

    /// Largest `lsb + (xMax - xMin)`, which is just the largest `xMax`.
    pub fn max_extent(&self) -> i16 {
        self.outlined().map(|g| g.x_max).max().unwrap_or(0)
    }

    // ── Profile ──

    pub fn max_points(&self) -> u16 {
        let max = self.glyphs.iter().map(Glyph::point_count).max().unwrap_or(0);
        max.min(u16::MAX as usize) as u16
    }

    pub fn max_contours(&self) -> u16 {
        let max = self.glyphs.iter().map(|g| g.contours.len()).max().unwrap_or(0);
        max.min(u16::MAX as usize) as u16
    }

    pub fn first_codepoint(&self) -> Option<u32> {
        self.codepoints.keys().next().copied()
    }

    pub fn last_codepoint(&self) -> Option<u32> {
        self.codepoints.keys().next_back().copied()
    }

    /// Total glyf length, every glyph in its own slot.
    pub fn glyf_size(&self) -> usize {
        self.glyphs.iter().map(Glyph::size_bytes).sum()
    }

    // ── Tunable metrics ──

    fn span(&self) -> f64 {
        self.ascent as f64 - self.descent as f64
    }

    fn span_fraction(&self, value: Option<i16>, fraction: f64) -> i16 {
        value.unwrap_or_else(|| round(self.span() * fraction))
    }

    pub fn line_gap(&self) -> i16 {
        self.span_fraction(self.overrides.line_gap, 0.09)
    }

    pub fn underline_position(&self) -> i16 {
        self.span_fraction(self.overrides.underline_position, -0.1)
    }

    pub fn underline_thickness(&self) -> i16 {
        self.span_fraction(self.overrides.underline_thickness, 0.05)
    }

    fn script_x_size(&self, value: Option<i16>) -> i16 {
        value.unwrap_or_else(|| round(self.units_per_em as f64 * 0.6347))
    }

    pub fn y_subscript_x_size(&self) -> i16 {
        self.script_x_size(self.overrides.y_subscript_x_size)
    }

    pub fn y_subscript_y_size(&self) -> i16 {
        self.span_fraction(self.overrides.y_subscript_y_size, 0.7)
    }

    pub fn y_subscript_x_offset(&self) -> i16 {
        self.overrides.y_subscript_x_offset.unwrap_or(0)
    }

    pub fn y_subscript_y_offset(&self) -> i16 {
        self.span_fraction(self.overrides.y_subscript_y_offset, 0.14)
    }

    pub fn y_superscript_x_size(&self) -> i16 {
        self.script_x_size(self.overrides.y_superscript_x_size)
    }

    pub fn y_superscript_y_size(&self) -> i16 {
        self.span_fraction(self.overrides.y_superscript_y_size, 0.7)
    }

    pub fn y_superscript_x_offset(&self) -> i16 {
        self.overrides.y_superscript_x_offset.unwrap_or(0)
    }

    pub fn y_superscript_y_offset(&self) -> i16 {
        self.span_fraction(self.overrides.y_superscript_y_offset, 0.48)
    }

    pub fn y_strikeout_size(&self) -> i16 {
        self.span_fraction(self.overrides.y_strikeout_size, 0.049)
    }

    pub fn y_strikeout_position(&self) -> i16 {
        self.span_fraction(self.overrides.y_strikeout_position, 0.258)
    }

    pub fn x_height(&self) -> i16 {
        self.overrides.x_height.unwrap_or(0)
    }

    pub fn cap_height(&self) -> i16 {
        self.overrides.cap_height.unwrap_or(0)
    }
}

/// Round half up and saturate to `i16`.
pub(crate) fn round(value: f64) -> i16 {
    (value + 0.5)
        .floor()
        .clamp(i16::MIN as f64, i16::MAX as f64) as i16
}

/// Four bytes, space padded or truncated.
fn vendor_tag(vendor: &str) -> [u8; 4] {
    let mut tag = [b' '; 4];
    for (slot, byte) in tag.iter_mut().zip(vendor.bytes().filter(u8::is_ascii)) {
        *slot = byte;
    }
    tag
}

/// Map every glyph whose contours and advance match an earlier glyph to
/// that earlier glyph. `.notdef` and empty glyphs never take part.
fn find_duplicates(glyphs: &[Glyph]) -> BTreeMap<u16, u16> {
    let mut first_seen: HashMap<(&[crate::outline::Contour], u16), u16> = HashMap::new();
    let mut canonical = BTreeMap::new();
    for glyph in glyphs.iter().filter(|g| g.id != 0 && !g.is_empty()) {
        let key = (glyph.contours.as_slice(), glyph.width);
        match first_seen.get(&key) {
            Some(&original) => {
                log::debug!("glyph \"{}\" shares its outline with glyph {}", glyph.name, original);
                canonical.insert(glyph.id, original);
            }
            None => {
                first_seen.insert(key, glyph.id);
            }
        }
    }
    canonical
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::OutlinePoint;

    fn on(x: i32, y: i32) -> OutlinePoint {
        OutlinePoint { x, y, on_curve: true }
    }

    fn glyph(id: u16, cp: u32, min: i32, max: i32) -> Glyph {
        let contours = vec![vec![on(min, min), on(max, min), on(max, max), on(min, max)]];
        Glyph::new(id, format!("g{id}"), Some(cp), contours, 512, 512).unwrap()
    }

    fn font(glyphs: Vec<Glyph>) -> Font {
        let mut all = vec![Glyph::notdef(512, 512)];
        all.extend(glyphs);
        Font::new(&FontConfig::default(), all, 0)
    }

    #[test]
    fn test_metrics_ignore_empty_glyphs() {
        let f = font(vec![glyph(1, 0xEA01, 16, 496), glyph(2, 0xEA02, 100, 300)]);
        assert_eq!(f.x_min(), 16);
        assert_eq!(f.y_max(), 496);
        assert_eq!(f.min_lsb(), 16);
        assert_eq!(f.min_rsb(), 16);
        assert_eq!(f.max_extent(), 496);
        assert_eq!(f.avg_width(), 512);
        assert_eq!(f.max_points(), 4);
        assert_eq!(f.max_contours(), 1);
    }

    #[test]
    fn test_empty_font_metrics() {
        let f = font(vec![]);
        assert_eq!((f.x_min(), f.x_max(), f.y_min(), f.y_max()), (0, 0, 0, 0));
        assert_eq!(f.avg_width(), 512);
        assert_eq!(f.first_codepoint(), None);
        assert_eq!(f.glyf_size(), 0);
    }

    #[test]
    fn test_derived_and_overridden_metrics() {
        let mut config = FontConfig::default();
        let f = Font::new(&config, vec![Glyph::notdef(512, 512)], 0);
        assert_eq!(f.line_gap(), 46);
        assert_eq!(f.underline_position(), -51);
        assert_eq!(f.underline_thickness(), 26);
        assert_eq!(f.y_subscript_x_size(), 325);
        assert_eq!(f.y_superscript_y_offset(), 246);
        assert_eq!(f.y_strikeout_position(), 132);

        config.metrics.line_gap = Some(0);
        config.metrics.y_strikeout_size = Some(20);
        let f = Font::new(&config, vec![Glyph::notdef(512, 512)], 0);
        assert_eq!(f.line_gap(), 0);
        assert_eq!(f.y_strikeout_size(), 20);
    }

    #[test]
    fn test_first_codepoint_wins() {
        let f = font(vec![glyph(1, 0xEA01, 0, 10), glyph(2, 0xEA01, 0, 20)]);
        assert_eq!(f.codepoints.len(), 1);
        assert_eq!(f.codepoints[&0xEA01], 1);
    }

    #[test]
    fn test_duplicates_redirect_to_first() {
        let f = font(vec![
            glyph(1, 0xEA01, 0, 10),
            glyph(2, 0xEA02, 0, 20),
            glyph(3, 0xEA03, 0, 10),
        ]);
        assert_eq!(f.canonical.len(), 1);
        assert_eq!(f.canonical_id(3), 1);
        assert_eq!(f.canonical_id(2), 2);
    }

    #[test]
    fn test_dedupe_can_be_disabled() {
        let config = FontConfig {
            dedupe: false,
            ..Default::default()
        };
        let glyphs = vec![Glyph::notdef(512, 512), glyph(1, 0xEA01, 0, 10), glyph(2, 0xEA02, 0, 10)];
        assert!(Font::new(&config, glyphs, 0).canonical.is_empty());
    }

    #[test]
    fn test_vendor_tag_padding() {
        assert_eq!(&vendor_tag("ab"), b"ab  ");
        assert_eq!(&vendor_tag("toolong"), b"tool");
    }

    #[test]
    fn test_timestamp_epoch() {
        let f = Font::new(&FontConfig::default(), vec![Glyph::notdef(512, 512)], 1);
        assert_eq!(f.created, 2_082_844_801);
    }
}
