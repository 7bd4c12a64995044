use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use shared::{Jurisdiction, LicenseType, QrisRating};

/// A childcare provider owned by a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Business {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub license_type: LicenseType,
    pub state: Jurisdiction,
    pub zipcode: Option<String>,
    pub county: Option<String>,
    pub active: bool,
    pub qris_rating: Option<QrisRating>,
    pub accredited: Option<bool>,
    pub deleted_at: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
