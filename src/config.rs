//! Configuration
//!
//! Values are layered: built-in defaults, then `.helpdesk/config.yaml`, then
//! `HELPDESK__SECTION__KEY` environment variables, e.g.
//! `HELPDESK__LIFECYCLE__CLOSURE_THRESHOLD=1d`.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::ValidationRules;
use crate::core::duration::serde_compact;
use crate::error::{HelpdeskError, Result};

/// Name of the configuration file inside the help-desk directory
pub const CONFIG_FILE: &str = "config.yaml";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "HELPDESK";

/// Longest accepted closure threshold, 100 years
pub const MAX_CLOSURE_THRESHOLD_DAYS: i64 = 365 * 100;

/// Root configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub project: ProjectConfig,
    pub lifecycle: LifecycleConfig,
    pub validation: ValidationRules,
    pub identity: IdentityConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub name: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: "Help Desk".to_string(),
        }
    }
}

/// Ticket lifecycle tunables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecycleConfig {
    /// How long a resolution stays reopenable before the sweep closes it
    #[serde(with = "serde_compact")]
    pub closure_threshold: Duration,

    /// Cadence of the closure sweep
    #[serde(with = "serde_compact")]
    pub sweep_interval: Duration,

    /// Prefix of human-readable ticket references
    pub ticket_id_prefix: String,

    /// Attempts per transition when concurrent writers collide
    pub max_transition_attempts: u32,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            closure_threshold: Duration::days(3),
            sweep_interval: Duration::seconds(60),
            ticket_id_prefix: "HID".to_string(),
            max_transition_attempts: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct IdentityConfig {
    /// Profile file; defaults to the user config directory
    pub profile_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration for the help-desk directory `helpdesk_dir`
    pub fn load(helpdesk_dir: &Path) -> Result<Self> {
        Self::build(Some(helpdesk_dir.join(CONFIG_FILE)))
    }

    /// Load from `helpdesk_dir` when a project exists, otherwise from
    /// defaults and the environment only
    pub fn load_or_default(helpdesk_dir: Option<&Path>) -> Result<Self> {
        Self::build(helpdesk_dir.map(|dir| dir.join(CONFIG_FILE)))
    }

    fn build(file: Option<PathBuf>) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(file) = file {
            builder = builder.add_source(config::File::from(file).required(false));
        }
        let config: Self = builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Write this configuration to `helpdesk_dir/config.yaml`
    pub async fn save(&self, helpdesk_dir: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        tokio::fs::write(helpdesk_dir.join(CONFIG_FILE), content).await?;
        Ok(())
    }

    /// Reject values that would break the lifecycle
    pub fn validate(&self) -> Result<()> {
        if self.lifecycle.closure_threshold <= Duration::zero() {
            return Err(HelpdeskError::Config(
                "lifecycle.closure_threshold must be positive".to_string(),
            ));
        }
        if self.lifecycle.closure_threshold > Duration::days(MAX_CLOSURE_THRESHOLD_DAYS) {
            return Err(HelpdeskError::Config(format!(
                "lifecycle.closure_threshold must be at most {MAX_CLOSURE_THRESHOLD_DAYS}d"
            )));
        }
        if self.lifecycle.sweep_interval <= Duration::zero() {
            return Err(HelpdeskError::Config(
                "lifecycle.sweep_interval must be positive".to_string(),
            ));
        }
        if self.lifecycle.max_transition_attempts == 0 {
            return Err(HelpdeskError::Config(
                "lifecycle.max_transition_attempts must be at least 1".to_string(),
            ));
        }
        let rules = &self.validation;
        if rules.description_min_chars > rules.description_max_chars {
            return Err(HelpdeskError::Config(format!(
                "validation.description_min_chars ({}) exceeds description_max_chars ({})",
                rules.description_min_chars, rules.description_max_chars
            )));
        }
        Ok(())
    }

    /// Resolved profile path: configured, else the user config directory
    pub fn profile_path(&self) -> Result<PathBuf> {
        self.identity
            .profile_path
            .clone()
            .or_else(crate::identity::default_profile_path)
            .ok_or_else(|| {
                HelpdeskError::Config(
                    "cannot determine a profile location; set identity.profile_path".to_string(),
                )
            })
    }
}
