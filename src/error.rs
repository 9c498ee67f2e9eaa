//! Structured error types for the icon font compiler.
//!
//! Every fatal condition aborts the whole build: no partial font is ever
//! returned. Recoverable problems (unknown SVG tags, bad viewBox values)
//! never reach this type; they are logged and skipped where they occur.

use thiserror::Error;

/// The unified error type returned by all public iconforge API functions.
#[derive(Debug, Error)]
pub enum IconforgeError {
    /// A glyph coordinate does not fit the signed 16-bit TrueType range.
    #[error(
        "{field} value for glyph \"{glyph}\" is out of bounds (actual {value}, expected -32768..32767)"
    )]
    CoordinateOutOfRange {
        glyph: String,
        field: &'static str,
        value: i64,
    },

    /// A path command letter outside the SVG path grammar.
    #[error("Unsupported command type '{0}'")]
    UnsupportedCommand(char),

    /// Path data that could not be tokenized into numbers and commands.
    #[error("Invalid path data at {position}: {message}")]
    InvalidPathData { position: usize, message: String },

    /// The icon document is not well-formed XML.
    #[error("Failed to parse SVG: {0}")]
    Svg(#[from] quick_xml::Error),

    /// A table encoder was handed a font without any glyphs.
    #[error("no result data")]
    NoResultData,

    /// Glyph ids and `post` name indices are 16-bit.
    #[error("Too many icons: {0} (at most 65278 named glyphs fit in a font)")]
    TooManyGlyphs(usize),

    /// `startCodepoint + index` is not a Unicode scalar range value.
    #[error("Codepoint for icon \"{glyph}\" is out of range (start U+{start:04X}, index {index})")]
    CodepointOutOfRange {
        glyph: String,
        start: u32,
        index: u32,
    },

    /// An outline coordinate overflowed to infinity or NaN.
    #[error("Glyph \"{0}\" has a coordinate that is not a finite number")]
    NonFiniteCoordinate(String),

    /// A manifest icon without inline `svg` content reached the library.
    /// File paths are resolved by the CLI before building.
    #[error("Icon \"{0}\" has no SVG content")]
    MissingIconSource(String),

    /// JSON configuration or manifest failed to deserialize.
    #[error("Failed to parse configuration: {source}{}", hint_suffix(.hint))]
    Config {
        source: serde_json::Error,
        hint: String,
    },
}

pub type Result<T> = std::result::Result<T, IconforgeError>;

fn hint_suffix(hint: &str) -> String {
    if hint.is_empty() {
        String::new()
    } else {
        format!("\n  Hint: {}", hint)
    }
}

impl From<serde_json::Error> for IconforgeError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "Check for trailing commas, missing quotes, or unescaped characters.".to_string()
            }
            serde_json::error::Category::Data => {
                "The JSON is valid but doesn't match the manifest schema. Check field names and types.".to_string()
            }
            serde_json::error::Category::Eof => {
                "Unexpected end of input. Is the JSON truncated?".to_string()
            }
            serde_json::error::Category::Io => String::new(),
        };
        IconforgeError::Config { source: e, hint }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_message_names_glyph_and_field() {
        let err = IconforgeError::CoordinateOutOfRange {
            glyph: "huge".to_string(),
            field: "xMax",
            value: 40000,
        };
        let msg = err.to_string();
        assert!(msg.contains("xMax"));
        assert!(msg.contains("\"huge\""));
        assert!(msg.contains("40000"));
    }

    #[test]
    fn test_config_error_carries_hint() {
        let err: IconforgeError = serde_json::from_str::<serde_json::Value>("{\"a\": 1,}")
            .unwrap_err()
            .into();
        assert!(err.to_string().contains("Hint: Check for trailing commas"));
    }
}
