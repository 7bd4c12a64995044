use tracing::{info, warn};

use super::errors::{ServiceError, ServiceResult};
use super::models::User;
use super::policy::UserPolicy;
use crate::storage::{DbConnection, UserRepository};

/// Service for reading user accounts
#[derive(Clone)]
pub struct UserService {
    user_repository: UserRepository,
}

impl UserService {
    pub fn new(db: DbConnection) -> Self {
        Self {
            user_repository: UserRepository::new(db),
        }
    }

    /// List every user. Admins only.
    pub async fn list_users(&self, current: &User) -> ServiceResult<Vec<User>> {
        UserPolicy::authorize_index(current)?;
        let users = self.user_repository.list_users().await?;
        info!("Listed {} users for admin {}", users.len(), current.id);
        Ok(users)
    }

    /// Get one user, visible to admins and to the user themself
    pub async fn get_user(&self, current: &User, user_id: &str) -> ServiceResult<User> {
        UserPolicy::authorize_show(current, user_id)?;
        self.user_repository
            .get_user(user_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("User {}", user_id)))
    }

    /// Load the account behind an authenticated request. Deactivated
    /// accounts are treated as unknown.
    pub async fn find_active_user(&self, user_id: &str) -> ServiceResult<Option<User>> {
        match self.user_repository.get_user(user_id).await? {
            Some(user) if user.active => Ok(Some(user)),
            Some(user) => {
                warn!("Rejected inactive user {}", user.id);
                Ok(None)
            }
            None => Ok(None),
        }
    }
}
