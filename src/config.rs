//! # Font Configuration
//!
//! Everything the compiler needs to know besides the icons themselves.
//! The configuration is plain data: it is deserialized from JSON by the
//! CLI (or built in code) and handed to [`crate::build_font`]. Every field
//! has a default so an empty `{}` is a valid configuration.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Font-wide settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FontConfig {
    /// Family name (name ID 1).
    pub font_name: String,
    /// Subfamily name (name ID 2).
    pub subfamily_name: String,
    /// Full name (name ID 4). Defaults to the family name.
    pub full_name: Option<String>,
    pub description: Option<String>,
    pub copyright: Option<String>,
    /// Vendor URL (name ID 11).
    pub url: Option<String>,
    /// Version string without the "Version " prefix, e.g. "1.0".
    pub version: String,
    /// Four-character OS/2 vendor tag.
    pub vendor: String,

    /// Size of the canonical canvas and the em square.
    pub units_per_em: u16,
    /// Defaults to `units_per_em + descent`.
    pub ascent: Option<i16>,
    pub descent: i16,
    /// Fraction of the canvas an icon's longer side is scaled to.
    pub shape_ratio: f64,
    /// Codepoint assigned to the icon with index 0.
    pub start_codepoint: u32,
    /// Maximum distance between a cubic and its quadratic approximation.
    /// When unset, 0.3 units for canvases over 500 units, otherwise
    /// 0.06% of the canvas.
    pub error_bound: Option<f64>,

    pub weight_class: u16,
    pub width_class: u16,
    /// Detect glyphs with identical contours and width, and encode each
    /// shared outline once. Every glyph still owns a full `glyf` slot so
    /// `loca` stays monotonic; the font is byte-for-byte the same size
    /// either way.
    pub dedupe: bool,
    /// Creation/modification time in Unix seconds; now when unset.
    pub timestamp: Option<u64>,

    /// Per-icon tuning by icon name.
    pub tuning: HashMap<String, Tuning>,
    pub metrics: MetricOverrides,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            font_name: "iconfont".to_string(),
            subfamily_name: "Regular".to_string(),
            full_name: None,
            description: None,
            copyright: None,
            url: None,
            version: "1.0".to_string(),
            vendor: "PfEd".to_string(),
            units_per_em: 512,
            ascent: None,
            descent: 0,
            shape_ratio: 0.9375,
            start_codepoint: 0xEA01,
            error_bound: None,
            weight_class: 400,
            width_class: 5,
            dedupe: true,
            timestamp: None,
            tuning: HashMap::new(),
            metrics: MetricOverrides::default(),
        }
    }
}

impl FontConfig {
    pub fn ascent(&self) -> i16 {
        self.ascent
            .unwrap_or_else(|| (self.units_per_em as i32 + self.descent as i32).clamp(0, i16::MAX as i32) as i16)
    }

    pub fn canvas_size(&self) -> f64 {
        self.units_per_em as f64
    }

    pub fn shape_size(&self) -> f64 {
        self.canvas_size() * self.shape_ratio
    }

    pub fn error_bound(&self) -> f64 {
        self.error_bound.unwrap_or_else(|| {
            let size = self.canvas_size();
            if size > 500.0 {
                0.3
            } else {
                size * 0.0006
            }
        })
    }

    pub fn full_name(&self) -> &str {
        self.full_name.as_deref().unwrap_or(&self.font_name)
    }
}

/// Per-icon placement adjustments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Horizontal offset as a fraction of the canvas, positive to the right.
    pub x: f64,
    /// Vertical offset as a fraction of the canvas, positive downwards.
    pub y: f64,
    pub size: IconSize,
}

/// How an icon's bounding box is fitted into the shape size.
///
/// In JSON this is either a number (the multiplier) or one of the keywords
/// `"cover"` and `"contain"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawIconSize", into = "RawIconSize")]
pub enum IconSize {
    /// Multiplier applied on top of the `contain` fit.
    Scale(f64),
    /// Fit the shorter side.
    Cover,
    /// Fit the longer side.
    #[default]
    Contain,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
enum RawIconSize {
    Scale(f64),
    Keyword(SizeKeyword),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum SizeKeyword {
    Cover,
    Contain,
}

impl From<RawIconSize> for IconSize {
    fn from(raw: RawIconSize) -> Self {
        match raw {
            RawIconSize::Scale(s) => IconSize::Scale(s),
            RawIconSize::Keyword(SizeKeyword::Cover) => IconSize::Cover,
            RawIconSize::Keyword(SizeKeyword::Contain) => IconSize::Contain,
        }
    }
}

impl From<IconSize> for RawIconSize {
    fn from(size: IconSize) -> Self {
        match size {
            IconSize::Scale(s) => RawIconSize::Scale(s),
            IconSize::Cover => RawIconSize::Keyword(SizeKeyword::Cover),
            IconSize::Contain => RawIconSize::Keyword(SizeKeyword::Contain),
        }
    }
}

/// Explicit values for metrics that are otherwise derived from
/// `ascent - descent`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MetricOverrides {
    pub line_gap: Option<i16>,
    pub underline_position: Option<i16>,
    pub underline_thickness: Option<i16>,
    pub y_subscript_x_size: Option<i16>,
    pub y_subscript_y_size: Option<i16>,
    pub y_subscript_x_offset: Option<i16>,
    pub y_subscript_y_offset: Option<i16>,
    pub y_superscript_x_size: Option<i16>,
    pub y_superscript_y_size: Option<i16>,
    pub y_superscript_x_offset: Option<i16>,
    pub y_superscript_y_offset: Option<i16>,
    pub y_strikeout_size: Option<i16>,
    pub y_strikeout_position: Option<i16>,
    pub x_height: Option<i16>,
    pub cap_height: Option<i16>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_uses_defaults() {
        let config: FontConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.units_per_em, 512);
        assert_eq!(config.start_codepoint, 0xEA01);
        assert_eq!(config.ascent(), 512);
        assert!((config.shape_size() - 480.0).abs() < 1e-9);
        assert!((config.error_bound() - 0.3).abs() < 1e-12);
        assert_eq!(config.full_name(), "iconfont");
    }

    #[test]
    fn test_small_canvas_uses_relative_error_bound() {
        let config = FontConfig {
            units_per_em: 100,
            ..Default::default()
        };
        assert!((config.error_bound() - 0.06).abs() < 1e-12);
    }

    #[test]
    fn test_tuning_size_forms() {
        let tuning: HashMap<String, Tuning> = serde_json::from_str(
            r#"{ "a": { "size": 1.5 }, "b": { "size": "cover", "x": 0.1 }, "c": { "y": -0.2 } }"#,
        )
        .unwrap();
        assert_eq!(tuning["a"].size, IconSize::Scale(1.5));
        assert_eq!(tuning["b"].size, IconSize::Cover);
        assert_eq!(tuning["b"].x, 0.1);
        assert_eq!(tuning["c"].size, IconSize::Contain);
    }

    #[test]
    fn test_camel_case_fields() {
        let config: FontConfig = serde_json::from_str(
            r#"{ "fontName": "glyphs", "unitsPerEm": 1024, "descent": -128, "metrics": { "lineGap": 0 } }"#,
        )
        .unwrap();
        assert_eq!(config.font_name, "glyphs");
        assert_eq!(config.ascent(), 896);
        assert_eq!(config.metrics.line_gap, Some(0));
    }
}
