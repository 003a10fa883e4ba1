//! Orchestration for glyphmap: image preparation, render path selection,
//! timing, and the console report.

pub mod convert;
pub mod report;
