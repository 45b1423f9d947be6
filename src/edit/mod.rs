//! Line-by-line processing of files for wildrep.
//!
//! This module handles:
//! - Pre-filtering lines on the pattern's fixed part
//! - Collecting matches or rewriting lines
//! - Writing rewritten files back with their line endings intact

pub mod processor;

pub use processor::{FileReport, LineChange, LineMatch, process_file, process_text};
