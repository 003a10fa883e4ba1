//! Image preparation for glyphmap: decode, grayscale, blur, area resize.

pub mod filter;
pub mod image;
pub mod resize;
