use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use shared::AbsenceType;

/// A child's presence (or recorded absence) on one day, billed against a
/// child approval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attendance {
    pub id: String,
    pub child_approval_id: String,
    pub check_in: DateTime<Utc>,
    pub check_out: Option<DateTime<Utc>>,
    /// Seconds in care; zero for absences and open check-ins
    pub time_in_care: i64,
    pub absence: Option<AbsenceType>,
    pub deleted_at: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Attendance {
    /// Seconds between check in and check out, zero when there is no check out
    pub fn compute_time_in_care(check_in: DateTime<Utc>, check_out: Option<DateTime<Utc>>) -> i64 {
        check_out
            .map(|out| (out - check_in).num_seconds().max(0))
            .unwrap_or(0)
    }

    pub fn is_absence(&self) -> bool {
        self.absence.is_some()
    }

    pub fn check_in_date(&self) -> NaiveDate {
        self.check_in.date_naive()
    }
}
