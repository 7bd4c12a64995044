//! Per-jurisdiction breakdowns of what a child approval authorizes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Illinois approves a number of part and full days per week, month by month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IllinoisApprovalAmount {
    pub id: String,
    pub child_approval_id: String,
    /// Always the first day of the month
    pub month: NaiveDate,
    pub part_days_approved_per_week: i64,
    pub full_days_approved_per_week: i64,
}

/// Nebraska sets a family fee for a date range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NebraskaApprovalAmount {
    pub id: String,
    pub child_approval_id: String,
    pub effective_on: NaiveDate,
    pub expires_on: NaiveDate,
    pub family_fee: f64,
    pub allocated_family_fee: Option<f64>,
}

impl NebraskaApprovalAmount {
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.effective_on <= date && date <= self.expires_on
    }
}
