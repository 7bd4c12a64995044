use chrono::Utc;
use tracing::{info, warn};

use super::commands::business::{CreateBusinessCommand, UpdateBusinessCommand};
use super::errors::{validation, ServiceError, ServiceResult};
use super::models::{generate_id, Business, User};
use super::policy::Scope;
use crate::storage::{BusinessRepository, DbConnection, UserRepository};
use shared::Jurisdiction;

const MAX_NAME_LENGTH: usize = 255;

/// Service for managing a user's childcare businesses
#[derive(Clone)]
pub struct BusinessService {
    business_repository: BusinessRepository,
    user_repository: UserRepository,
}

impl BusinessService {
    pub fn new(db: DbConnection) -> Self {
        Self {
            business_repository: BusinessRepository::new(db.clone()),
            user_repository: UserRepository::new(db),
        }
    }

    pub async fn list_businesses(&self, current: &User) -> ServiceResult<Vec<Business>> {
        let scope = Scope::for_user(current);
        let businesses = self.business_repository.list_businesses(scope.owner_id()).await?;
        info!("Found {} businesses for user {}", businesses.len(), current.id);
        Ok(businesses)
    }

    pub async fn get_business(&self, current: &User, business_id: &str) -> ServiceResult<Business> {
        let scope = Scope::for_user(current);
        match self.business_repository.get_business(business_id, scope.owner_id()).await? {
            Some(business) => Ok(business),
            None => {
                warn!("Business {} not visible to user {}", business_id, current.id);
                Err(ServiceError::NotFound(format!("Business {}", business_id)))
            }
        }
    }

    /// Create a business. Only admins may create one on someone else's behalf.
    pub async fn create_business(&self, current: &User, command: CreateBusinessCommand) -> ServiceResult<Business> {
        let owner_id = match command.user_id {
            Some(user_id) if current.admin => user_id,
            _ => current.id.clone(),
        };
        if self.user_repository.get_user(&owner_id).await?.is_none() {
            return validation(format!("User {} does not exist", owner_id));
        }

        let name = validate_name(&command.name)?;
        validate_nebraska_only(command.state, command.qris_rating.is_some(), command.accredited.is_some())?;

        let now = Utc::now();
        let business = Business {
            id: generate_id(),
            user_id: owner_id,
            name,
            license_type: command.license_type,
            state: command.state,
            zipcode: command.zipcode,
            county: command.county,
            active: true,
            qris_rating: command.qris_rating,
            accredited: command.accredited,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        };

        self.business_repository.store_business(&business).await?;
        info!("Created business {} ({}) for user {}", business.name, business.id, business.user_id);
        Ok(business)
    }

    pub async fn update_business(
        &self,
        current: &User,
        business_id: &str,
        command: UpdateBusinessCommand,
    ) -> ServiceResult<Business> {
        let mut business = self.get_business(current, business_id).await?;

        if let Some(name) = command.name {
            business.name = validate_name(&name)?;
        }
        if let Some(license_type) = command.license_type {
            business.license_type = license_type;
        }
        if let Some(zipcode) = command.zipcode {
            business.zipcode = Some(zipcode);
        }
        if let Some(county) = command.county {
            business.county = Some(county);
        }
        if let Some(active) = command.active {
            business.active = active;
        }
        if let Some(qris_rating) = command.qris_rating {
            business.qris_rating = Some(qris_rating);
        }
        if let Some(accredited) = command.accredited {
            business.accredited = Some(accredited);
        }
        validate_nebraska_only(business.state, business.qris_rating.is_some(), business.accredited.is_some())?;

        business.updated_at = Utc::now();
        self.business_repository.update_business(&business).await?;
        info!("Updated business {}", business.id);
        Ok(business)
    }

    /// Soft-delete a business together with its children and their approvals
    pub async fn delete_business(&self, current: &User, business_id: &str) -> ServiceResult<()> {
        let business = self.get_business(current, business_id).await?;
        let today = Utc::now().date_naive();
        self.business_repository.soft_delete_business(&business.id, today).await?;
        info!("Deleted business {}", business.id);
        Ok(())
    }
}

fn validate_name(name: &str) -> ServiceResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return validation("Business name cannot be empty");
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return validation(format!("Business name cannot exceed {} characters", MAX_NAME_LENGTH));
    }
    Ok(name.to_string())
}

/// QRIS ratings and accreditation only exist in Nebraska
fn validate_nebraska_only(state: Jurisdiction, has_qris_rating: bool, has_accredited: bool) -> ServiceResult<()> {
    if state != Jurisdiction::Nebraska && (has_qris_rating || has_accredited) {
        return validation("QRIS rating and accreditation only apply to Nebraska businesses");
    }
    Ok(())
}
