//! Shared utility functions for CLI commands

use sha2::{Digest, Sha256};
use std::path::Path;

/// Format a byte size as a human-readable string
#[must_use]
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Hex-encoded SHA-256 of a file's contents
pub fn file_sha256(path: &Path) -> std::io::Result<String> {
    let content = std::fs::read(path)?;
    Ok(format!("{:x}", Sha256::digest(&content)))
}

/// Whether `candidate` would be created inside `dir`
///
/// Both paths are resolved through their closest existing ancestor, so the
/// candidate file itself does not need to exist yet.
pub fn is_inside(candidate: &Path, dir: &Path) -> bool {
    let Ok(dir) = dir.canonicalize() else {
        return false;
    };
    let parent = match candidate.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    parent
        .canonicalize()
        .map(|parent| parent.starts_with(&dir))
        .unwrap_or(false)
}
