use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use shared::CopayFrequency;

/// A time-bounded subsidy eligibility determination.
///
/// One case can cover several siblings; each child is linked through its own
/// `ChildApproval`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Case {
    pub id: String,
    pub case_number: Option<String>,
    pub copay_cents: Option<i64>,
    pub copay_frequency: Option<CopayFrequency>,
    pub effective_on: NaiveDate,
    /// `None` means the case has no end date
    pub expires_on: Option<NaiveDate>,
    pub deleted_at: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Case {
    /// Whether `date` falls inside the eligibility window. Both ends are inclusive.
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.effective_on <= date && self.expires_on.map_or(true, |expires| date <= expires)
    }
}
