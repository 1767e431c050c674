//! Segment file naming
//!
//! Callers may name segments explicitly; rotated segments get a generated
//! timestamp name. The final segment is renamed next to its source file.

use std::path::{Path, PathBuf};

use chrono::Local;

/// Prefix for generated segment file names
const SEGMENT_PREFIX: &str = "Rec";

/// Extension for generated segment file names
const SEGMENT_EXTENSION: &str = "flac";

/// Generate a timestamp-based segment file name, e.g. `Rec_20260823_141503.flac`.
pub fn generate_segment_file_name() -> String {
    format!(
        "{}_{}.{}",
        SEGMENT_PREFIX,
        Local::now().format("%Y%m%d_%H%M%S"),
        SEGMENT_EXTENSION
    )
}

/// Resolve the destination path for a finalized segment: the requested name
/// placed in the same directory as the source file.
pub fn final_segment_path(source: &Path, final_file_name: &str) -> PathBuf {
    match source.parent() {
        Some(parent) => parent.join(final_file_name),
        None => PathBuf::from(final_file_name),
    }
}
