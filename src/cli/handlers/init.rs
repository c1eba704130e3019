//! Handler for the `init` command

use std::path::PathBuf;

use super::common::is_initialized;
use crate::cli::{HELPDESK_DIR, OutputFormatter};
use crate::config::{CONFIG_FILE, Config};
use crate::error::{HelpdeskError, Result};
use crate::storage::FileStorage;

/// Create `.helpdesk/` with a default configuration and an empty ticket store
///
/// An existing configuration is kept unless `force` is set; tickets are never
/// touched.
pub async fn handle_init(
    name: Option<&str>,
    force: bool,
    project_dir: Option<&str>,
    output: &OutputFormatter,
) -> Result<()> {
    let project_root = match project_dir {
        Some(dir) => PathBuf::from(dir),
        None => std::env::current_dir()?,
    };
    let helpdesk_dir = project_root.join(HELPDESK_DIR);
    let config_path = helpdesk_dir.join(CONFIG_FILE);

    if is_initialized(&project_root) && config_path.exists() && !force {
        return Err(HelpdeskError::custom(format!(
            "Help desk already initialized at {}",
            helpdesk_dir.display()
        )));
    }

    let storage = FileStorage::new(&helpdesk_dir);
    storage.ensure_directories().await?;

    let mut config = Config::default();
    if let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) {
        config.project.name = name.to_string();
    }
    config.save(&helpdesk_dir).await?;
    tracing::debug!(path = %helpdesk_dir.display(), "help desk initialized");

    if output.is_json() {
        output.print_json(&serde_json::json!({
            "status": "success",
            "project": config.project.name,
            "path": helpdesk_dir,
        }))?;
    } else {
        output.success(&format!(
            "Initialized help desk '{}' in {}",
            config.project.name,
            helpdesk_dir.display()
        ));
        output.info("Next: run `helpdesk login` to create your profile");
    }
    Ok(())
}
