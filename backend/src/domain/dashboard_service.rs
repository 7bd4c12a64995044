//! The provider dashboard: one row per child approval whose case is in
//! effect on the requested date, with month-to-date usage.

use chrono::{NaiveDate, Utc};
use tracing::info;

use super::errors::ServiceResult;
use super::models::{ApprovalWithCase, Business, Child, Rate, User};
use super::usage::{illinois_usage, nebraska_usage, CaseUsage};
use crate::storage::{
    ApprovalAmountRepository, AttendanceRepository, BusinessRepository, ChildApprovalRepository, ChildRepository,
    DbConnection, RateRepository, UserRepository,
};
use shared::Jurisdiction;

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardCase {
    pub child: Child,
    pub approval: ApprovalWithCase,
    pub usage: CaseUsage,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardBusiness {
    pub business: Business,
    pub cases: Vec<DashboardCase>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardUser {
    pub user: User,
    pub businesses: Vec<DashboardBusiness>,
}

#[derive(Clone)]
pub struct DashboardService {
    user_repository: UserRepository,
    business_repository: BusinessRepository,
    child_repository: ChildRepository,
    child_approval_repository: ChildApprovalRepository,
    approval_amount_repository: ApprovalAmountRepository,
    attendance_repository: AttendanceRepository,
    rate_repository: RateRepository,
}

impl DashboardService {
    pub fn new(db: DbConnection) -> Self {
        Self {
            user_repository: UserRepository::new(db.clone()),
            business_repository: BusinessRepository::new(db.clone()),
            child_repository: ChildRepository::new(db.clone()),
            child_approval_repository: ChildApprovalRepository::new(db.clone()),
            approval_amount_repository: ApprovalAmountRepository::new(db.clone()),
            attendance_repository: AttendanceRepository::new(db.clone()),
            rate_repository: RateRepository::new(db),
        }
    }

    /// Build the dashboard as of `filter_date`, or today when none is given.
    ///
    /// Admins see every user that owns a business; everyone else sees only
    /// themself.
    pub async fn case_list_for_dashboard(
        &self,
        current: &User,
        filter_date: Option<NaiveDate>,
    ) -> ServiceResult<Vec<DashboardUser>> {
        let as_of = filter_date.unwrap_or_else(|| Utc::now().date_naive());
        info!("Building dashboard for user {} as of {}", current.id, as_of);

        let users = if current.admin {
            self.user_repository.list_users_with_businesses().await?
        } else {
            vec![current.clone()]
        };

        let mut dashboard = Vec::with_capacity(users.len());
        for user in users {
            let businesses = self.business_repository.list_businesses(Some(&user.id)).await?;
            let mut rows = Vec::with_capacity(businesses.len());
            for business in businesses {
                let cases = self.cases_for_business(&business, as_of).await?;
                rows.push(DashboardBusiness { business, cases });
            }
            dashboard.push(DashboardUser { user, businesses: rows });
        }

        let case_count: usize = dashboard
            .iter()
            .flat_map(|u| u.businesses.iter())
            .map(|b| b.cases.len())
            .sum();
        info!("Dashboard has {} users and {} cases", dashboard.len(), case_count);
        Ok(dashboard)
    }

    async fn cases_for_business(&self, business: &Business, as_of: NaiveDate) -> ServiceResult<Vec<DashboardCase>> {
        let mut cases = Vec::new();
        for child in self.child_repository.list_children_for_business(&business.id).await? {
            let approvals = self.child_approval_repository.list_for_child(&child.id).await?;
            for approval in approvals.into_iter().filter(|a| a.covers(as_of)) {
                let usage = self.usage_for(business.state, &approval, as_of).await?;
                cases.push(DashboardCase {
                    child: child.clone(),
                    approval,
                    usage,
                });
            }
        }
        Ok(cases)
    }

    async fn usage_for(
        &self,
        state: Jurisdiction,
        approval: &ApprovalWithCase,
        as_of: NaiveDate,
    ) -> ServiceResult<CaseUsage> {
        let attendances = self
            .attendance_repository
            .list_for_approval(&approval.approval.id)
            .await?;
        let rate = match &approval.approval.rate {
            Some(rate) => self.rate_repository.get_rate(rate).await?,
            None => None,
        };

        let usage = match state {
            Jurisdiction::Illinois => {
                let amount = self
                    .approval_amount_repository
                    .illinois_for_month(&approval.approval.id, as_of)
                    .await?;
                let rate = match &rate {
                    Some(Rate::Illinois(rate)) => Some(rate),
                    _ => None,
                };
                illinois_usage(approval, amount.as_ref(), rate, &attendances, as_of)
            }
            Jurisdiction::Nebraska => {
                let amounts = self
                    .approval_amount_repository
                    .nebraska_for_approval(&approval.approval.id)
                    .await?;
                let rate = match &rate {
                    Some(Rate::Nebraska(rate)) => Some(rate),
                    _ => None,
                };
                nebraska_usage(approval, &amounts, rate, &attendances, as_of)
            }
        };
        Ok(usage)
    }
}
