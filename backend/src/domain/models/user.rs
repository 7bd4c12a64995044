use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A person who signs in: either a provider running businesses or an admin
/// caseworker with read access across providers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub greeting_name: String,
    pub admin: bool,
    pub active: bool,
    pub language: String,
    pub phone_number: Option<String>,
    pub timezone: String,
    pub organization: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
