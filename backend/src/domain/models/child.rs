use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A child enrolled at a business
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Child {
    pub id: String,
    pub business_id: String,
    pub full_name: String,
    pub date_of_birth: NaiveDate,
    pub dhs_id: Option<String>,
    pub active: bool,
    pub last_active_date: Option<NaiveDate>,
    pub inactive_reason: Option<String>,
    pub deleted_at: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
