//! Local sign-in profile stored as YAML

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

use super::{Identity, IdentityProvider};
use crate::error::{HelpdeskError, Result};

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
});

/// Check an email address has the `local@domain.tld` shape
pub fn validate_email(email: &str) -> Result<()> {
    if EMAIL_RE.is_match(email.trim()) {
        Ok(())
    } else {
        Err(HelpdeskError::validation(
            "email",
            "Please enter a valid email address",
        ))
    }
}

/// Default profile location in the user's config directory
#[must_use]
pub fn default_profile_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "helpdesk").map(|dirs| dirs.config_dir().join("profile.yaml"))
}

/// A signed-in user profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub uid: String,
    pub account_id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub created_at: DateTime<Utc>,
}

impl Profile {
    /// New profile with a fresh uid and a `UID<epoch-millis>` account id
    pub fn create(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        let name = name.into().trim().to_string();
        let email = email.into().trim().to_string();
        if name.is_empty() {
            return Err(HelpdeskError::validation("name", "Please enter your name"));
        }
        validate_email(&email)?;

        Ok(Self {
            uid: Uuid::new_v4().to_string(),
            account_id: format!("UID{}", now.timestamp_millis()),
            name,
            email,
            phone: phone.map(|p| p.trim().to_string()).unwrap_or_default(),
            created_at: now,
        })
    }

    #[must_use]
    pub fn identity(&self) -> Identity {
        Identity {
            uid: self.uid.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            account_id: Some(self.account_id.clone()).filter(|id| !id.is_empty()),
        }
    }
}

/// Identity provider backed by a profile file
#[derive(Debug, Clone)]
pub struct ProfileIdentity {
    path: PathBuf,
}

impl ProfileIdentity {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored profile, if any
    pub async fn load(&self) -> Result<Option<Profile>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => Ok(Some(serde_yaml::from_str(&content)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Persist `profile` as the signed-in user
    pub async fn save(&self, profile: &Profile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, serde_yaml::to_string(profile)?).await?;
        debug!(path = %self.path.display(), uid = %profile.uid, "profile saved");
        Ok(())
    }

    /// Remove the stored profile; returns whether one existed
    pub async fn clear(&self) -> Result<bool> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl IdentityProvider for ProfileIdentity {
    async fn current_user(&self) -> Result<Option<Identity>> {
        Ok(self.load().await?.map(|profile| profile.identity()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    #[test]
    fn test_email_validation() {
        assert!(validate_email("traveller@example.com").is_ok());
        assert!(validate_email("no-at-sign.example.com").is_err());
        assert!(validate_email("two@@example.com").is_err());
        assert!(validate_email("missing@tld").is_err());
    }

    #[test]
    fn test_profile_account_id_format() {
        let now = Utc.timestamp_millis_opt(1_718_000_123_456).unwrap();
        let profile = Profile::create("Asha Rao", "asha@example.com", None, now).unwrap();
        assert_eq!(profile.account_id, "UID1718000123456");
        assert!(Uuid::parse_str(&profile.uid).is_ok());
        assert!(profile.phone.is_empty());

        assert!(Profile::create("  ", "asha@example.com", None, now).is_err());
    }

    #[tokio::test]
    async fn test_profile_round_trip() {
        let dir = TempDir::new().unwrap();
        let provider = ProfileIdentity::new(dir.path().join("nested").join("profile.yaml"));
        assert!(provider.current_user().await.unwrap().is_none());

        let profile = Profile::create(
            "Asha Rao",
            "asha@example.com",
            Some("+91 98765 43210".to_string()),
            Utc::now(),
        )
        .unwrap();
        provider.save(&profile).await.unwrap();

        let identity = provider.current_user().await.unwrap().unwrap();
        assert_eq!(identity.uid, profile.uid);
        assert_eq!(identity.phone, "+91 98765 43210");
        assert_eq!(identity.account_id.as_deref(), Some(profile.account_id.as_str()));

        assert!(provider.clear().await.unwrap());
        assert!(!provider.clear().await.unwrap());
        assert!(provider.current_user().await.unwrap().is_none());
    }
}
