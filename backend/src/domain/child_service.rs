use chrono::{NaiveDate, Utc};
use tracing::{info, warn};

use super::commands::child::{CaseSource, CreateChildCommand, NewApproval, UpdateChildCommand};
use super::date_service::first_day_of_month;
use super::errors::{validation, ServiceError, ServiceResult};
use super::models::{
    generate_id, ApprovalWithCase, Business, Case, Child, ChildApproval, IllinoisApprovalAmount,
    NebraskaApprovalAmount, RateRef, User,
};
use super::policy::Scope;
use crate::storage::{
    is_unique_violation, BusinessRepository, CaseRepository, ChildApprovalRepository, ChildRepository, DbConnection,
    NewChildApproval, RateRepository,
};
use shared::Jurisdiction;

const MAX_NAME_LENGTH: usize = 255;

/// A child with every live approval and its case
#[derive(Debug, Clone, PartialEq)]
pub struct ChildWithCases {
    pub child: Child,
    pub approvals: Vec<ApprovalWithCase>,
}

/// Service for enrolling children and attaching them to subsidy cases
#[derive(Clone)]
pub struct ChildService {
    child_repository: ChildRepository,
    child_approval_repository: ChildApprovalRepository,
    business_repository: BusinessRepository,
    case_repository: CaseRepository,
    rate_repository: RateRepository,
}

impl ChildService {
    pub fn new(db: DbConnection) -> Self {
        Self {
            child_repository: ChildRepository::new(db.clone()),
            child_approval_repository: ChildApprovalRepository::new(db.clone()),
            business_repository: BusinessRepository::new(db.clone()),
            case_repository: CaseRepository::new(db.clone()),
            rate_repository: RateRepository::new(db),
        }
    }

    pub async fn list_children(&self, current: &User) -> ServiceResult<Vec<ChildWithCases>> {
        let scope = Scope::for_user(current);
        let children = self.child_repository.list_children(scope.owner_id()).await?;

        let mut result = Vec::with_capacity(children.len());
        for child in children {
            let approvals = self.child_approval_repository.list_for_child(&child.id).await?;
            result.push(ChildWithCases { child, approvals });
        }
        info!("Found {} children for user {}", result.len(), current.id);
        Ok(result)
    }

    pub async fn get_child(&self, current: &User, child_id: &str) -> ServiceResult<ChildWithCases> {
        let child = self.find_visible_child(current, child_id).await?;
        let approvals = self.child_approval_repository.list_for_child(&child.id).await?;
        Ok(ChildWithCases { child, approvals })
    }

    /// Enroll a child at one of the caller's businesses, creating or
    /// attaching cases for each approval in one transaction
    pub async fn create_child(&self, current: &User, command: CreateChildCommand) -> ServiceResult<ChildWithCases> {
        info!("Creating child {} at business {}", command.full_name.trim(), command.business_id);
        let scope = Scope::for_user(current);

        let business = match self
            .business_repository
            .get_business(&command.business_id, scope.owner_id())
            .await?
        {
            Some(business) => business,
            None => return validation(format!("Business {} does not exist", command.business_id)),
        };

        let full_name = validate_full_name(&command.full_name)?;
        validate_date_of_birth(command.date_of_birth)?;

        if self
            .child_repository
            .duplicate_exists(&business.id, &full_name, command.date_of_birth, None)
            .await?
        {
            return validation(format!(
                "{} born {} is already enrolled at {}",
                full_name, command.date_of_birth, business.name
            ));
        }

        let now = Utc::now();
        let child = Child {
            id: generate_id(),
            business_id: business.id.clone(),
            full_name,
            date_of_birth: command.date_of_birth,
            dhs_id: command.dhs_id,
            active: true,
            last_active_date: None,
            inactive_reason: None,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        };

        let mut approvals = Vec::with_capacity(command.approvals.len());
        for approval in command.approvals {
            approvals.push(self.build_approval(&scope, &business, &child, approval).await?);
        }

        // A concurrent enrollment can still win the race past the check above
        if let Err(err) = self.child_repository.store_child_with_approvals(&child, &approvals).await {
            if is_unique_violation(&err) {
                return validation(format!(
                    "{} born {} is already enrolled at {}",
                    child.full_name, child.date_of_birth, business.name
                ));
            }
            return Err(err.into());
        }
        info!("Created child {} with {} approvals", child.id, approvals.len());

        let approvals = self.child_approval_repository.list_for_child(&child.id).await?;
        Ok(ChildWithCases { child, approvals })
    }

    pub async fn update_child(
        &self,
        current: &User,
        child_id: &str,
        command: UpdateChildCommand,
    ) -> ServiceResult<ChildWithCases> {
        let mut child = self.find_visible_child(current, child_id).await?;

        if let Some(full_name) = command.full_name {
            child.full_name = validate_full_name(&full_name)?;
        }
        if let Some(date_of_birth) = command.date_of_birth {
            validate_date_of_birth(date_of_birth)?;
            child.date_of_birth = date_of_birth;
        }
        if let Some(dhs_id) = command.dhs_id {
            child.dhs_id = Some(dhs_id);
        }
        if let Some(active) = command.active {
            child.active = active;
            if active {
                child.last_active_date = None;
                child.inactive_reason = None;
            }
        }
        if let Some(last_active_date) = command.last_active_date {
            child.last_active_date = Some(last_active_date);
        }
        if let Some(inactive_reason) = command.inactive_reason {
            child.inactive_reason = Some(inactive_reason);
        }

        if self
            .child_repository
            .duplicate_exists(&child.business_id, &child.full_name, child.date_of_birth, Some(&child.id))
            .await?
        {
            return validation(format!("{} is already enrolled at this business", child.full_name));
        }

        child.updated_at = Utc::now();
        if let Err(err) = self.child_repository.update_child(&child).await {
            if is_unique_violation(&err) {
                return validation(format!("{} is already enrolled at this business", child.full_name));
            }
            return Err(err.into());
        }
        info!("Updated child {}", child.id);

        let approvals = self.child_approval_repository.list_for_child(&child.id).await?;
        Ok(ChildWithCases { child, approvals })
    }

    pub async fn delete_child(&self, current: &User, child_id: &str) -> ServiceResult<()> {
        let child = self.find_visible_child(current, child_id).await?;
        self.child_repository
            .soft_delete_child(&child.id, Utc::now().date_naive())
            .await?;
        info!("Deleted child {}", child.id);
        Ok(())
    }

    async fn find_visible_child(&self, current: &User, child_id: &str) -> ServiceResult<Child> {
        let scope = Scope::for_user(current);
        match self.child_repository.get_child(child_id, scope.owner_id()).await? {
            Some(child) => Ok(child),
            None => {
                warn!("Child {} not visible to user {}", child_id, current.id);
                Err(ServiceError::NotFound(format!("Child {}", child_id)))
            }
        }
    }

    async fn build_approval(
        &self,
        scope: &Scope,
        business: &Business,
        child: &Child,
        approval: NewApproval,
    ) -> ServiceResult<NewChildApproval> {
        let now = child.created_at;

        let (case_id, new_case) = match approval.case {
            CaseSource::Existing(case_id) => {
                // Attaching to an existing case is how siblings share one
                let case = self
                    .case_repository
                    .get_visible_case(&case_id, scope.owner_id())
                    .await?
                    .ok_or_else(|| ServiceError::Validation(format!("Case {} does not exist", case_id)))?;
                (case.id, None)
            }
            CaseSource::New(new_case) => {
                if let Some(expires_on) = new_case.expires_on {
                    if expires_on < new_case.effective_on {
                        return validation("Case cannot expire before it takes effect");
                    }
                }
                if new_case.copay_cents.map_or(false, |cents| cents < 0) {
                    return validation("Copay cannot be negative");
                }
                let case = Case {
                    id: generate_id(),
                    case_number: new_case.case_number,
                    copay_cents: new_case.copay_cents,
                    copay_frequency: new_case.copay_frequency,
                    effective_on: new_case.effective_on,
                    expires_on: new_case.expires_on,
                    deleted_at: None,
                    created_at: now,
                    updated_at: now,
                };
                (case.id.clone(), Some(case))
            }
        };

        let details = approval.details;
        if let Some(rate) = &details.rate {
            self.validate_rate(business.state, rate).await?;
        }
        if [details.authorized_weekly_hours, details.hours]
            .iter()
            .flatten()
            .any(|hours| *hours < 0.0)
            || details.full_days.map_or(false, |days| days < 0)
        {
            return validation("Approved hours and days cannot be negative");
        }

        let child_approval = ChildApproval {
            id: generate_id(),
            child_id: child.id.clone(),
            case_id,
            rate: details.rate,
            authorized_weekly_hours: details.authorized_weekly_hours,
            full_days: details.full_days,
            hours: details.hours,
            enrolled_in_school: details.enrolled_in_school,
            special_needs_rate: details.special_needs_rate,
            special_needs_daily_rate: details.special_needs_daily_rate,
            special_needs_hourly_rate: details.special_needs_hourly_rate,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        };

        if !approval.illinois_amounts.is_empty() && business.state != Jurisdiction::Illinois {
            return validation("Illinois approval amounts require an Illinois business");
        }
        if !approval.nebraska_amounts.is_empty() && business.state != Jurisdiction::Nebraska {
            return validation("Nebraska approval amounts require a Nebraska business");
        }

        let mut illinois_amounts = Vec::with_capacity(approval.illinois_amounts.len());
        for amount in approval.illinois_amounts {
            if amount.part_days_approved_per_week < 0 || amount.full_days_approved_per_week < 0 {
                return validation("Approved days per week cannot be negative");
            }
            illinois_amounts.push(IllinoisApprovalAmount {
                id: generate_id(),
                child_approval_id: child_approval.id.clone(),
                month: first_day_of_month(amount.month),
                part_days_approved_per_week: amount.part_days_approved_per_week,
                full_days_approved_per_week: amount.full_days_approved_per_week,
            });
        }

        let mut nebraska_amounts = Vec::with_capacity(approval.nebraska_amounts.len());
        for amount in approval.nebraska_amounts {
            if amount.expires_on < amount.effective_on {
                return validation("Approval amount cannot expire before it takes effect");
            }
            nebraska_amounts.push(NebraskaApprovalAmount {
                id: generate_id(),
                child_approval_id: child_approval.id.clone(),
                effective_on: amount.effective_on,
                expires_on: amount.expires_on,
                family_fee: amount.family_fee,
                allocated_family_fee: amount.allocated_family_fee,
            });
        }

        Ok(NewChildApproval {
            new_case,
            approval: child_approval,
            illinois_amounts,
            nebraska_amounts,
        })
    }

    /// The rate must exist and belong to the business's jurisdiction
    async fn validate_rate(&self, state: Jurisdiction, rate: &RateRef) -> ServiceResult<()> {
        let matches_state = matches!(
            (state, rate),
            (Jurisdiction::Illinois, RateRef::Illinois(_)) | (Jurisdiction::Nebraska, RateRef::Nebraska(_))
        );
        if !matches_state {
            return validation(format!("{} cannot be used in {}", rate.rate_type(), state.code()));
        }
        if self.rate_repository.get_rate(rate).await?.is_none() {
            return validation(format!("{} {} does not exist", rate.rate_type(), rate.id()));
        }
        Ok(())
    }
}

fn validate_full_name(full_name: &str) -> ServiceResult<String> {
    let full_name = full_name.trim();
    if full_name.is_empty() {
        return validation("Child name cannot be empty");
    }
    if full_name.chars().count() > MAX_NAME_LENGTH {
        return validation(format!("Child name cannot exceed {} characters", MAX_NAME_LENGTH));
    }
    Ok(full_name.to_string())
}

fn validate_date_of_birth(date_of_birth: NaiveDate) -> ServiceResult<()> {
    if date_of_birth > Utc::now().date_naive() {
        return validation("Date of birth cannot be in the future");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::commands::child::{ApprovalDetails, NewCase, NewIllinoisAmount};
    use crate::test_utils::TestFixtures;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn new_case_approval(effective_on: &str, expires_on: Option<&str>) -> NewApproval {
        NewApproval {
            case: CaseSource::New(NewCase {
                case_number: Some("1234567A".to_string()),
                effective_on: d(effective_on),
                expires_on: expires_on.map(d),
                copay_cents: Some(1000),
                copay_frequency: None,
            }),
            details: ApprovalDetails::default(),
            illinois_amounts: vec![NewIllinoisAmount {
                month: d(effective_on),
                part_days_approved_per_week: 2,
                full_days_approved_per_week: 3,
            }],
            nebraska_amounts: vec![],
        }
    }

    fn create_command(business: &Business, full_name: &str, approvals: Vec<NewApproval>) -> CreateChildCommand {
        CreateChildCommand {
            business_id: business.id.clone(),
            full_name: full_name.to_string(),
            date_of_birth: d("2018-04-02"),
            dhs_id: None,
            approvals,
        }
    }

    #[tokio::test]
    async fn test_create_child_with_new_case() {
        let fixtures = TestFixtures::new().await;
        let owner = fixtures.create_user("Grace", false).await;
        let business = fixtures.create_business(&owner, Jurisdiction::Illinois).await;
        let service = ChildService::new(fixtures.db.clone());

        let created = service
            .create_child(
                &owner,
                create_command(&business, "Hedy Lamarr", vec![new_case_approval("2021-01-01", Some("2021-12-31"))]),
            )
            .await
            .expect("Create failed");

        assert_eq!(created.child.full_name, "Hedy Lamarr");
        assert_eq!(created.approvals.len(), 1);
        assert_eq!(created.approvals[0].case.case_number.as_deref(), Some("1234567A"));
    }

    #[tokio::test]
    async fn test_siblings_share_an_existing_case() {
        let fixtures = TestFixtures::new().await;
        let owner = fixtures.create_user("Grace", false).await;
        let other = fixtures.create_user("Katherine", false).await;
        let business = fixtures.create_business(&owner, Jurisdiction::Illinois).await;
        let other_business = fixtures.create_business(&other, Jurisdiction::Illinois).await;
        let service = ChildService::new(fixtures.db.clone());

        let first = service
            .create_child(
                &owner,
                create_command(&business, "Hedy Lamarr", vec![new_case_approval("2021-01-01", None)]),
            )
            .await
            .expect("Create failed");
        let case_id = first.approvals[0].case.id.clone();

        let attach = |case_id: String| NewApproval {
            case: CaseSource::Existing(case_id),
            details: ApprovalDetails::default(),
            illinois_amounts: vec![],
            nebraska_amounts: vec![],
        };

        let sibling = service
            .create_child(&owner, create_command(&business, "Anthony Loder", vec![attach(case_id.clone())]))
            .await
            .expect("Sibling create failed");
        assert_eq!(sibling.approvals[0].case.id, case_id);

        // A different provider cannot attach to the case
        let result = service
            .create_child(&other, create_command(&other_business, "Someone Else", vec![attach(case_id)]))
            .await;
        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_child_rejects_invalid_input() {
        let fixtures = TestFixtures::new().await;
        let owner = fixtures.create_user("Grace", false).await;
        let other = fixtures.create_user("Katherine", false).await;
        let business = fixtures.create_business(&owner, Jurisdiction::Illinois).await;
        let service = ChildService::new(fixtures.db.clone());

        let blank = create_command(&business, "  ", vec![]);
        assert!(matches!(service.create_child(&owner, blank).await, Err(ServiceError::Validation(_))));

        let mut future = create_command(&business, "Hedy Lamarr", vec![]);
        future.date_of_birth = Utc::now().date_naive() + chrono::Duration::days(30);
        assert!(matches!(service.create_child(&owner, future).await, Err(ServiceError::Validation(_))));

        let backwards = create_command(&business, "Hedy Lamarr", vec![new_case_approval("2021-06-01", Some("2021-01-01"))]);
        assert!(matches!(service.create_child(&owner, backwards).await, Err(ServiceError::Validation(_))));

        let not_theirs = create_command(&business, "Hedy Lamarr", vec![]);
        assert!(matches!(service.create_child(&other, not_theirs).await, Err(ServiceError::Validation(_))));

        let mut wrong_rate = new_case_approval("2021-01-01", None);
        wrong_rate.details.rate = Some(RateRef::Nebraska(generate_id()));
        let cmd = create_command(&business, "Hedy Lamarr", vec![wrong_rate]);
        assert!(matches!(service.create_child(&owner, cmd).await, Err(ServiceError::Validation(_))));

        let mut missing_rate = new_case_approval("2021-01-01", None);
        missing_rate.details.rate = Some(RateRef::Illinois(generate_id()));
        let cmd = create_command(&business, "Hedy Lamarr", vec![missing_rate]);
        assert!(matches!(service.create_child(&owner, cmd).await, Err(ServiceError::Validation(_))));

        // Nothing was written by the failed attempts
        assert!(service.list_children(&owner).await.expect("List failed").is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_child_is_rejected() {
        let fixtures = TestFixtures::new().await;
        let owner = fixtures.create_user("Grace", false).await;
        let business = fixtures.create_business(&owner, Jurisdiction::Illinois).await;
        let service = ChildService::new(fixtures.db.clone());

        service
            .create_child(&owner, create_command(&business, "Hedy Lamarr", vec![]))
            .await
            .expect("Create failed");
        let again = service
            .create_child(&owner, create_command(&business, "Hedy Lamarr", vec![]))
            .await;
        assert!(matches!(again, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn test_concurrent_enrollments_of_the_same_child_keep_one() {
        let fixtures = TestFixtures::new().await;
        let owner = fixtures.create_user("Grace", false).await;
        let business = fixtures.create_business(&owner, Jurisdiction::Illinois).await;
        let service = ChildService::new(fixtures.db.clone());

        let (first, second) = tokio::join!(
            service.create_child(&owner, create_command(&business, "Hedy Lamarr", vec![])),
            service.create_child(&owner, create_command(&business, "Hedy Lamarr", vec![])),
        );

        let outcomes = [first, second];
        assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(outcomes.iter().any(|r| matches!(r, Err(ServiceError::Validation(_)))));
        assert_eq!(service.list_children(&owner).await.expect("List failed").len(), 1);
    }

    #[tokio::test]
    async fn test_deleted_child_can_be_enrolled_again() {
        let fixtures = TestFixtures::new().await;
        let owner = fixtures.create_user("Grace", false).await;
        let business = fixtures.create_business(&owner, Jurisdiction::Illinois).await;
        let service = ChildService::new(fixtures.db.clone());

        let first = service
            .create_child(&owner, create_command(&business, "Hedy Lamarr", vec![]))
            .await
            .expect("Create failed");
        service.delete_child(&owner, &first.child.id).await.expect("Delete failed");

        service
            .create_child(&owner, create_command(&business, "Hedy Lamarr", vec![]))
            .await
            .expect("Re-enrollment failed");
    }

    #[tokio::test]
    async fn test_update_and_delete_child_respect_scope() {
        let fixtures = TestFixtures::new().await;
        let owner = fixtures.create_user("Grace", false).await;
        let other = fixtures.create_user("Katherine", false).await;
        let business = fixtures.create_business(&owner, Jurisdiction::Illinois).await;
        let child = fixtures.create_child(&business, "Hedy Lamarr").await;
        let service = ChildService::new(fixtures.db.clone());

        let deactivate = UpdateChildCommand {
            active: Some(false),
            inactive_reason: Some("moved".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            service.update_child(&other, &child.id, deactivate.clone()).await,
            Err(ServiceError::NotFound(_))
        ));

        let updated = service.update_child(&owner, &child.id, deactivate).await.expect("Update failed");
        assert!(!updated.child.active);
        assert_eq!(updated.child.inactive_reason.as_deref(), Some("moved"));
        assert_eq!(updated.approvals.len(), 1);

        assert!(matches!(service.delete_child(&other, &child.id).await, Err(ServiceError::NotFound(_))));
        service.delete_child(&owner, &child.id).await.expect("Delete failed");
        assert!(matches!(service.get_child(&owner, &child.id).await, Err(ServiceError::NotFound(_))));
    }
}
