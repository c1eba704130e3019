use std::path::{Path, PathBuf};

use super::HELPDESK_DIR;
use crate::error::{HelpdeskError, Result};

/// Find the project root by walking up from `start` (or the current
/// directory) to the first directory containing `.helpdesk`
pub fn find_project_root(start: Option<&str>) -> Result<PathBuf> {
    let start = match start {
        Some(dir) => PathBuf::from(dir),
        None => std::env::current_dir()?,
    };

    let mut current: &Path = &start;
    loop {
        if current.join(HELPDESK_DIR).is_dir() {
            return Ok(current.to_path_buf());
        }
        match current.parent() {
            Some(parent) => current = parent,
            None => return Err(HelpdeskError::ProjectNotInitialized),
        }
    }
}

/// Truncate `text` to `max` characters, adding an ellipsis when cut
#[must_use]
pub fn truncate(text: &str, max: usize) -> String {
    let single_line = text.replace('\n', " ");
    if single_line.chars().count() <= max {
        return single_line;
    }
    let cut: String = single_line.chars().take(max.saturating_sub(1)).collect();
    format!("{cut}…")
}
