//! Subsidy rate tables and the polymorphic reference a child approval holds.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::LicenseType;

pub const ILLINOIS_RATE_TYPE: &str = "IllinoisRate";
pub const NEBRASKA_RATE_TYPE: &str = "NebraskaRate";

/// Which rate table a child approval points at, and the row in it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RateRef {
    Illinois(String),
    Nebraska(String),
}

impl RateRef {
    /// Rebuild from the `(rate_type, rate_id)` column pair.
    ///
    /// Both columns must be present or both absent.
    pub fn from_parts(rate_type: Option<&str>, rate_id: Option<&str>) -> Result<Option<Self>, String> {
        match (rate_type, rate_id) {
            (None, None) => Ok(None),
            (Some(ILLINOIS_RATE_TYPE), Some(id)) => Ok(Some(RateRef::Illinois(id.to_string()))),
            (Some(NEBRASKA_RATE_TYPE), Some(id)) => Ok(Some(RateRef::Nebraska(id.to_string()))),
            (Some(other), Some(_)) => Err(format!("Unknown rate type: {}", other)),
            _ => Err("rate_type and rate_id must be given together".to_string()),
        }
    }

    pub fn rate_type(&self) -> &'static str {
        match self {
            RateRef::Illinois(_) => ILLINOIS_RATE_TYPE,
            RateRef::Nebraska(_) => NEBRASKA_RATE_TYPE,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            RateRef::Illinois(id) | RateRef::Nebraska(id) => id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IllinoisRate {
    pub id: String,
    pub name: String,
    pub county: Option<String>,
    pub license_type: LicenseType,
    pub full_day_rate: f64,
    pub part_day_rate: f64,
    pub effective_on: NaiveDate,
    pub expires_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NebraskaRate {
    pub id: String,
    pub name: String,
    pub region: Option<String>,
    pub license_type: LicenseType,
    pub daily_rate: f64,
    pub hourly_rate: f64,
    pub accredited_rate: bool,
    pub effective_on: NaiveDate,
    pub expires_on: Option<NaiveDate>,
}

/// A resolved rate row
#[derive(Debug, Clone, PartialEq)]
pub enum Rate {
    Illinois(IllinoisRate),
    Nebraska(NebraskaRate),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_ref_round_trips_through_columns() {
        let r = RateRef::from_parts(Some("NebraskaRate"), Some("r-1")).unwrap().unwrap();
        assert_eq!(r, RateRef::Nebraska("r-1".to_string()));
        assert_eq!(r.rate_type(), NEBRASKA_RATE_TYPE);
        assert_eq!(r.id(), "r-1");
    }

    #[test]
    fn test_rate_ref_rejects_half_filled_or_unknown_columns() {
        assert_eq!(RateRef::from_parts(None, None).unwrap(), None);
        assert!(RateRef::from_parts(Some("IllinoisRate"), None).is_err());
        assert!(RateRef::from_parts(None, Some("r-1")).is_err());
        assert!(RateRef::from_parts(Some("TexasRate"), Some("r-1")).is_err());
    }
}
