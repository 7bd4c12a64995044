use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{Case, RateRef};

/// An individual child on a family's case, carrying the authorized hours and
/// the rate the provider is paid at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildApproval {
    pub id: String,
    pub child_id: String,
    pub case_id: String,
    pub rate: Option<RateRef>,
    pub authorized_weekly_hours: Option<f64>,
    pub full_days: Option<i64>,
    pub hours: Option<f64>,
    pub enrolled_in_school: Option<bool>,
    pub special_needs_rate: Option<bool>,
    pub special_needs_daily_rate: Option<f64>,
    pub special_needs_hourly_rate: Option<f64>,
    pub deleted_at: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A child approval joined with the case it belongs to
#[derive(Debug, Clone, PartialEq)]
pub struct ApprovalWithCase {
    pub approval: ChildApproval,
    pub case: Case,
}

impl ApprovalWithCase {
    pub fn effective_on(&self) -> NaiveDate {
        self.case.effective_on
    }

    pub fn expires_on(&self) -> Option<NaiveDate> {
        self.case.expires_on
    }

    pub fn covers(&self, date: NaiveDate) -> bool {
        self.case.covers(date)
    }

    pub fn has_special_needs_rate(&self) -> bool {
        self.approval.special_needs_rate.unwrap_or(false)
    }
}
