//! Indexed output slot assignment.

use std::path::Path;

use crate::error::{CoreResult, Failure};

/// Compute the next free index for files named `{prefix}{N}{ext}` in
/// `output_dir`: `max(existing indices) + 1`, or 1 when none match.
///
/// A missing directory is a Configuration failure. A directory that
/// exists but cannot be scanned logs a warning and yields index 1.
pub fn next_index(output_dir: &Path, prefix: &str, ext: &str) -> CoreResult<u32> {
    if !output_dir.is_dir() {
        return Err(Failure::configuration(format!(
            "output directory does not exist: {}",
            output_dir.display()
        )));
    }

    let entries = match std::fs::read_dir(output_dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(
                dir = %output_dir.display(),
                error = %e,
                "could not scan output directory; defaulting to index 1"
            );
            return Ok(1);
        }
    };

    let mut highest = 0u32;
    for entry in entries.flatten() {
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        let Some(middle) = name
            .strip_prefix(prefix)
            .and_then(|rest| rest.strip_suffix(ext))
        else {
            continue;
        };
        // Only a purely numeric middle segment counts as an index slot.
        if !middle.is_empty() && middle.chars().all(|c| c.is_ascii_digit()) {
            if let Ok(index) = middle.parse::<u32>() {
                highest = highest.max(index);
            }
        }
    }

    Ok(highest + 1)
}
