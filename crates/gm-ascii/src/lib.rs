//! ASCII conversion engine for glyphmap.
//!
//! Converts luminance grids to newline-delimited glyph text, sequentially
//! or by parallel row chunks, and to color-styled HTML.

pub mod html;
pub mod luminance;
pub mod parallel;
