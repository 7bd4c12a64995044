//! Who may see what.
//!
//! Admins read across every user. Everyone else is confined to their own
//! user record and to records hanging off their own businesses. Records
//! outside a caller's scope are reported as missing rather than forbidden.

use tracing::warn;

use super::errors::{ServiceError, ServiceResult};
use super::models::User;

/// Row filter derived from the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    All,
    Owner(String),
}

impl Scope {
    pub fn for_user(user: &User) -> Self {
        if user.admin {
            Scope::All
        } else {
            Scope::Owner(user.id.clone())
        }
    }

    /// Owning user id to filter on, `None` for unrestricted
    pub fn owner_id(&self) -> Option<&str> {
        match self {
            Scope::All => None,
            Scope::Owner(id) => Some(id.as_str()),
        }
    }
}

pub struct UserPolicy;

impl UserPolicy {
    pub fn authorize_index(current: &User) -> ServiceResult<()> {
        if current.admin {
            Ok(())
        } else {
            warn!("User {} is not allowed to list users", current.id);
            Err(ServiceError::Forbidden("Only admins can list users".to_string()))
        }
    }

    pub fn authorize_show(current: &User, target_id: &str) -> ServiceResult<()> {
        if current.admin || current.id == target_id {
            Ok(())
        } else {
            warn!("User {} asked for user {}", current.id, target_id);
            Err(ServiceError::NotFound(format!("User {}", target_id)))
        }
    }
}
