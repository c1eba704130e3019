//! Identity of the acting user
//!
//! The lifecycle manager only asks for the current user when a ticket is
//! created, to stamp its owner snapshot.

mod profile;

pub use profile::{Profile, ProfileIdentity, default_profile_path, validate_email};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::Owner;
use crate::error::Result;

/// The signed-in user as reported by an identity provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Stable identifier
    pub uid: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Secondary human-readable account identifier, if the user has one
    pub account_id: Option<String>,
}

impl Identity {
    /// Snapshot used as a ticket owner
    #[must_use]
    pub fn to_owner(&self) -> Owner {
        Owner {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            uid: self.uid.clone(),
            account_id: self.account_id.clone().unwrap_or_default(),
        }
    }
}

/// Supplies the current user
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// The signed-in user, or `None` when nobody is signed in
    async fn current_user(&self) -> Result<Option<Identity>>;
}

/// Provider that always reports the same identity
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity {
    identity: Option<Identity>,
}

impl StaticIdentity {
    #[must_use]
    pub const fn signed_in(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
        }
    }

    #[must_use]
    pub const fn anonymous() -> Self {
        Self { identity: None }
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentity {
    async fn current_user(&self) -> Result<Option<Identity>> {
        Ok(self.identity.clone())
    }
}
