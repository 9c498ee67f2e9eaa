//! # Outline Pipeline
//!
//! Turns parsed SVG geometry into TrueType-ready contours:
//!
//! - [`normalize`]: document space to font units (transforms, viewBox, fit, flip)
//! - [`cubic2quad`]: cubic Bézier segments to quadratic chains
//! - [`contour`]: on/off-curve point sequences, simplification, rounding

pub mod contour;
pub mod cubic2quad;
pub mod normalize;

pub use contour::{build_contours, Contour, OutlinePoint};
pub use normalize::{normalize, Canvas};
