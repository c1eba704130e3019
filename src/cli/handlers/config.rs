//! Handler for `config show`

use super::common::load_config;
use crate::cli::OutputFormatter;
use crate::error::{HelpdeskError, Result};

/// Print the effective configuration, or one dotted key of it
pub fn handle_config_show(
    key: Option<&str>,
    project_dir: Option<&str>,
    output: &OutputFormatter,
) -> Result<()> {
    let config = load_config(project_dir)?;
    let mut value = serde_yaml::to_value(&config)?;

    if let Some(key) = key {
        for part in key.split('.') {
            value = value
                .get(part)
                .cloned()
                .ok_or_else(|| HelpdeskError::Config(format!("unknown configuration key '{key}'")))?;
        }
    }

    if output.is_json() {
        output.print_json(&value)?;
    } else {
        let text = serde_yaml::to_string(&value)?;
        output.info(text.trim_end());
    }
    Ok(())
}
