//! Configuration, types, and shared structures for glyphmap.
//!
//! This crate contains the palette lookup, the luminance/color grids,
//! the conversion configuration and the error type shared across the
//! glyphmap workspace.

pub mod charset;
pub mod config;
pub mod error;
pub mod frame;
