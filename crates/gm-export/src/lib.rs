//! Output writers for glyphmap (plain text and chunked HTML).

pub mod writer;
