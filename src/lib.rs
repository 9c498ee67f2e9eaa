//! # Iconforge
//!
//! An SVG icon font compiler.
//!
//! Every icon is an SVG document. Iconforge fits each one into a fixed
//! square canvas, converts its cubic outlines to the quadratic curves
//! TrueType understands, and writes a complete `.ttf` file with one glyph
//! per icon mapped into the Private Use Area.
//!
//! ## Architecture
//!
//! ```text
//! Input (SVG documents + FontConfig, or a JSON manifest)
//!       ↓
//!   [svg]      Parse documents into paths and transforms
//!       ↓
//!   [outline]  Normalize, cubic → quadratic, contour cleanup
//!       ↓
//!   [font]     Glyphs, codepoints, dedup, font-wide metrics
//!       ↓
//!   [ttf]      Encode tables, assemble SFNT with checksums
//! ```
//!
//! The build is two-phase: all glyphs are built first, then every table is
//! encoded from the finished font. Any fatal error aborts the whole build.

pub mod config;
pub mod error;
pub mod font;
pub mod geometry;
pub mod outline;
pub mod svg;
pub mod ttf;

#[cfg(feature = "wasm")]
pub mod wasm;

use config::{FontConfig, Tuning};
use error::{IconforgeError, Result};
use font::{Font, Glyph};
use outline::{build_contours, normalize, Canvas};
use serde::{Deserialize, Serialize};
use svg::SvgOutline;

const MAX_CODEPOINT: u32 = 0x10FFFF;

/// One icon to compile.
#[derive(Debug, Clone)]
pub struct IconSource {
    /// Glyph name, also the key into [`FontConfig::tuning`].
    pub name: String,
    /// Position in the icon set; the codepoint is `startCodepoint + index`.
    pub index: u32,
    pub outline: SvgOutline,
    /// Takes precedence over the config's tuning entry for this name.
    pub tuning: Option<Tuning>,
}

impl IconSource {
    /// Parse an SVG document into an icon.
    pub fn from_svg(name: impl Into<String>, index: u32, svg: &str) -> Result<Self> {
        Ok(Self {
            name: name.into(),
            index,
            outline: svg::parse_svg(svg)?,
            tuning: None,
        })
    }
}

/// Where an icon ended up in the font.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GlyphInfo {
    pub name: String,
    pub codepoint: u32,
    pub id: u16,
}

/// A compiled font plus the glyph table CSS/HTML generators need.
#[derive(Debug, Clone)]
pub struct FontBuild {
    pub ttf: Vec<u8>,
    pub glyphs: Vec<GlyphInfo>,
}

/// Compile icons into a TrueType font.
///
/// Glyph ids follow the order of `icons`, starting at 1 after `.notdef`.
pub fn build_font(icons: &[IconSource], config: &FontConfig) -> Result<FontBuild> {
    if icons.len() > ttf::post::MAX_CUSTOM_NAMES {
        return Err(IconforgeError::TooManyGlyphs(icons.len()));
    }

    let size = config.units_per_em;
    let canvas = Canvas::new(config.canvas_size(), config.shape_size(), config.descent as f64);
    let error_bound = config.error_bound();

    let mut glyphs = Vec::with_capacity(icons.len() + 1);
    glyphs.push(Glyph::notdef(size, size));
    let mut info = Vec::with_capacity(icons.len());

    for (i, icon) in icons.iter().enumerate() {
        let id = (i + 1) as u16;
        let codepoint = config
            .start_codepoint
            .checked_add(icon.index)
            .filter(|cp| *cp <= MAX_CODEPOINT)
            .ok_or_else(|| IconforgeError::CodepointOutOfRange {
                glyph: icon.name.clone(),
                start: config.start_codepoint,
                index: icon.index,
            })?;
        let tuning = icon
            .tuning
            .or_else(|| config.tuning.get(&icon.name).copied())
            .unwrap_or_default();

        let path = normalize(&icon.outline, &tuning, &canvas);
        if !path.is_finite() {
            return Err(IconforgeError::NonFiniteCoordinate(icon.name.clone()));
        }
        let contours = build_contours(&path, error_bound);
        let glyph = Glyph::new(id, icon.name.as_str(), Some(codepoint), contours, size, size)?;
        log::debug!(
            "glyph {} \"{}\" U+{:04X}: {} contours, {} points, {} bytes",
            id,
            glyph.name,
            codepoint,
            glyph.contours.len(),
            glyph.point_count(),
            glyph.size_bytes()
        );

        info.push(GlyphInfo {
            name: icon.name.clone(),
            codepoint,
            id,
        });
        glyphs.push(glyph);
    }

    let timestamp = config.timestamp.unwrap_or_else(unix_now);
    let font = Font::new(config, glyphs, timestamp);
    let ttf = ttf::build_ttf(&font)?;
    log::info!(
        "built \"{}\": {} glyphs, {} shared outlines, {} bytes",
        font.family_name,
        font.glyphs.len(),
        font.canonical.len(),
        ttf.len()
    );

    Ok(FontBuild { ttf, glyphs: info })
}

/// A JSON build description: configuration plus the icon list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub config: FontConfig,
    #[serde(default)]
    pub icons: Vec<ManifestIcon>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestIcon {
    pub name: String,
    /// Inline SVG document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub svg: Option<String>,
    /// SVG file, relative to the manifest. Only the CLI reads files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tuning: Option<Tuning>,
}

impl Manifest {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse every icon's SVG, indexing icons in manifest order.
    pub fn icon_sources(&self) -> Result<Vec<IconSource>> {
        self.icons
            .iter()
            .enumerate()
            .map(|(index, icon)| {
                let svg = icon
                    .svg
                    .as_deref()
                    .ok_or_else(|| IconforgeError::MissingIconSource(icon.name.clone()))?;
                let mut source = IconSource::from_svg(icon.name.as_str(), index as u32, svg)?;
                source.tuning = icon.tuning;
                Ok(source)
            })
            .collect()
    }

    pub fn build(&self) -> Result<FontBuild> {
        build_font(&self.icon_sources()?, &self.config)
    }
}

/// Compile a JSON manifest with inline SVG content.
pub fn build_font_json(json: &str) -> Result<FontBuild> {
    Manifest::from_json(json)?.build()
}

#[cfg(not(target_arch = "wasm32"))]
fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// No clock without a JS binding; set `timestamp` explicitly for wasm builds.
#[cfg(target_arch = "wasm32")]
fn unix_now() -> u64 {
    0
}
