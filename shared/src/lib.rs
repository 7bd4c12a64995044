use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Jurisdiction a business operates under. Serialized as the postal code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Jurisdiction {
    #[serde(rename = "IL")]
    Illinois,
    #[serde(rename = "NE")]
    Nebraska,
}

impl Jurisdiction {
    pub fn code(&self) -> &'static str {
        match self {
            Jurisdiction::Illinois => "IL",
            Jurisdiction::Nebraska => "NE",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "IL" => Some(Jurisdiction::Illinois),
            "NE" => Some(Jurisdiction::Nebraska),
            _ => None,
        }
    }
}

impl fmt::Display for Jurisdiction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LicenseType {
    LicensedCenter,
    LicensedFamilyHome,
    LicensedGroupHome,
    LicenseExemptHome,
    LicenseExemptCenter,
    FamilyChildCareHomeI,
    FamilyChildCareHomeIi,
}

impl LicenseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LicenseType::LicensedCenter => "licensed_center",
            LicenseType::LicensedFamilyHome => "licensed_family_home",
            LicenseType::LicensedGroupHome => "licensed_group_home",
            LicenseType::LicenseExemptHome => "license_exempt_home",
            LicenseType::LicenseExemptCenter => "license_exempt_center",
            LicenseType::FamilyChildCareHomeI => "family_child_care_home_i",
            LicenseType::FamilyChildCareHomeIi => "family_child_care_home_ii",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "licensed_center" => Some(LicenseType::LicensedCenter),
            "licensed_family_home" => Some(LicenseType::LicensedFamilyHome),
            "licensed_group_home" => Some(LicenseType::LicensedGroupHome),
            "license_exempt_home" => Some(LicenseType::LicenseExemptHome),
            "license_exempt_center" => Some(LicenseType::LicenseExemptCenter),
            "family_child_care_home_i" => Some(LicenseType::FamilyChildCareHomeI),
            "family_child_care_home_ii" => Some(LicenseType::FamilyChildCareHomeIi),
            _ => None,
        }
    }
}

/// Nebraska quality rating (QRIS step)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QrisRating {
    NotRated,
    StepOne,
    StepTwo,
    StepThree,
    StepFour,
    StepFive,
}

impl QrisRating {
    pub fn as_str(&self) -> &'static str {
        match self {
            QrisRating::NotRated => "not_rated",
            QrisRating::StepOne => "step_one",
            QrisRating::StepTwo => "step_two",
            QrisRating::StepThree => "step_three",
            QrisRating::StepFour => "step_four",
            QrisRating::StepFive => "step_five",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "not_rated" => Some(QrisRating::NotRated),
            "step_one" => Some(QrisRating::StepOne),
            "step_two" => Some(QrisRating::StepTwo),
            "step_three" => Some(QrisRating::StepThree),
            "step_four" => Some(QrisRating::StepFour),
            "step_five" => Some(QrisRating::StepFive),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CopayFrequency {
    Daily,
    Weekly,
    Monthly,
}

impl CopayFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            CopayFrequency::Daily => "daily",
            CopayFrequency::Weekly => "weekly",
            CopayFrequency::Monthly => "monthly",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "daily" => Some(CopayFrequency::Daily),
            "weekly" => Some(CopayFrequency::Weekly),
            "monthly" => Some(CopayFrequency::Monthly),
            _ => None,
        }
    }
}

/// Why a child was not in care on a recorded day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbsenceType {
    Absence,
    CovidAbsence,
}

impl AbsenceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AbsenceType::Absence => "absence",
            AbsenceType::CovidAbsence => "covid_absence",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "absence" => Some(AbsenceType::Absence),
            "covid_absence" => Some(AbsenceType::CovidAbsence),
            _ => None,
        }
    }
}

/// Error body returned by every failing endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

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
}

// ---------------------------------------------------------------------------
// Businesses
// ---------------------------------------------------------------------------

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
    /// Nebraska only
    pub qris_rating: Option<QrisRating>,
    /// Nebraska only
    pub accredited: Option<bool>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateBusinessRequest {
    /// Only honoured for admins; defaults to the caller
    #[serde(default)]
    pub user_id: Option<String>,
    pub name: String,
    pub license_type: LicenseType,
    pub state: Jurisdiction,
    #[serde(default)]
    pub zipcode: Option<String>,
    #[serde(default)]
    pub county: Option<String>,
    #[serde(default)]
    pub qris_rating: Option<QrisRating>,
    #[serde(default)]
    pub accredited: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UpdateBusinessRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub license_type: Option<LicenseType>,
    #[serde(default)]
    pub zipcode: Option<String>,
    #[serde(default)]
    pub county: Option<String>,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub qris_rating: Option<QrisRating>,
    #[serde(default)]
    pub accredited: Option<bool>,
}

// ---------------------------------------------------------------------------
// Children and their approvals
// ---------------------------------------------------------------------------

/// One eligibility case as seen from a child (case window + the child's approval details)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildCase {
    /// Child approval ID
    pub id: String,
    pub case_id: String,
    pub case_number: Option<String>,
    pub effective_on: NaiveDate,
    pub expires_on: Option<NaiveDate>,
    pub copay_cents: Option<i64>,
    pub copay_frequency: Option<CopayFrequency>,
    pub authorized_weekly_hours: Option<f64>,
    pub full_days: Option<i64>,
    pub hours: Option<f64>,
    pub enrolled_in_school: Option<bool>,
    pub special_needs_rate: Option<bool>,
    pub special_needs_daily_rate: Option<f64>,
    pub special_needs_hourly_rate: Option<f64>,
    pub rate_type: Option<String>,
    pub rate_id: Option<String>,
}

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
    pub cases: Vec<ChildCase>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IllinoisApprovalAmountAttributes {
    /// Any day in the month; normalised to the first of the month
    pub month: NaiveDate,
    pub part_days_approved_per_week: i64,
    pub full_days_approved_per_week: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NebraskaApprovalAmountAttributes {
    pub effective_on: NaiveDate,
    pub expires_on: NaiveDate,
    pub family_fee: f64,
    #[serde(default)]
    pub allocated_family_fee: Option<f64>,
}

/// Nested attributes for attaching a case to a child on create.
///
/// Either `case_id` names an existing case, or `effective_on` (with the
/// other case fields) describes a new one.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ApprovalAttributes {
    #[serde(default)]
    pub case_id: Option<String>,
    #[serde(default)]
    pub case_number: Option<String>,
    #[serde(default)]
    pub effective_on: Option<NaiveDate>,
    #[serde(default)]
    pub expires_on: Option<NaiveDate>,
    #[serde(default)]
    pub copay_cents: Option<i64>,
    #[serde(default)]
    pub copay_frequency: Option<CopayFrequency>,
    #[serde(default)]
    pub authorized_weekly_hours: Option<f64>,
    #[serde(default)]
    pub full_days: Option<i64>,
    #[serde(default)]
    pub hours: Option<f64>,
    #[serde(default)]
    pub enrolled_in_school: Option<bool>,
    #[serde(default)]
    pub special_needs_rate: Option<bool>,
    #[serde(default)]
    pub special_needs_daily_rate: Option<f64>,
    #[serde(default)]
    pub special_needs_hourly_rate: Option<f64>,
    /// "IllinoisRate" or "NebraskaRate"
    #[serde(default)]
    pub rate_type: Option<String>,
    #[serde(default)]
    pub rate_id: Option<String>,
    #[serde(default)]
    pub illinois_approval_amounts: Vec<IllinoisApprovalAmountAttributes>,
    #[serde(default)]
    pub nebraska_approval_amounts: Vec<NebraskaApprovalAmountAttributes>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateChildRequest {
    pub business_id: String,
    pub full_name: String,
    pub date_of_birth: NaiveDate,
    #[serde(default)]
    pub dhs_id: Option<String>,
    #[serde(default)]
    pub approvals: Vec<ApprovalAttributes>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UpdateChildRequest {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub dhs_id: Option<String>,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub last_active_date: Option<NaiveDate>,
    #[serde(default)]
    pub inactive_reason: Option<String>,
}

// ---------------------------------------------------------------------------
// Attendance
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attendance {
    pub id: String,
    pub child_approval_id: String,
    pub child_id: String,
    pub check_in: DateTime<Utc>,
    pub check_out: Option<DateTime<Utc>>,
    /// Seconds between check in and check out
    pub time_in_care: i64,
    pub absence: Option<AbsenceType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceBatchItem {
    pub child_id: String,
    pub check_in: DateTime<Utc>,
    #[serde(default)]
    pub check_out: Option<DateTime<Utc>>,
    #[serde(default)]
    pub absence: Option<AbsenceType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceBatchRequest {
    pub attendance_batch: Vec<AttendanceBatchItem>,
}

/// A batch item that could not be recorded, by its position in the request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceBatchError {
    pub index: usize,
    pub child_id: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AttendanceBatchMeta {
    pub errors: Vec<AttendanceBatchError>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceBatchResponse {
    pub attendances: Vec<Attendance>,
    pub meta: AttendanceBatchMeta,
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceRisk {
    NotEnoughInfo,
    OnTrack,
    AtRisk,
    ExceededLimit,
}

/// Approved / used / remaining whole days
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayUsage {
    pub approved: i64,
    pub used: i64,
    pub remaining: i64,
}

/// Approved / used / remaining hours
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourUsage {
    pub approved: f64,
    pub used: f64,
    pub remaining: f64,
}

/// Jurisdiction-specific part of a dashboard case, tagged by `state`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state")]
pub enum JurisdictionUsage {
    #[serde(rename = "IL")]
    Illinois {
        part_days: DayUsage,
        full_days: DayUsage,
    },
    #[serde(rename = "NE")]
    Nebraska {
        full_days: DayUsage,
        hours: HourUsage,
        family_fee: Option<f64>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseSummary {
    /// Child approval ID
    pub id: String,
    pub child_id: String,
    pub full_name: String,
    pub case_number: Option<String>,
    pub effective_on: NaiveDate,
    pub expires_on: Option<NaiveDate>,
    pub attendance_risk: AttendanceRisk,
    pub absences: i64,
    pub earned_revenue: Option<f64>,
    #[serde(flatten)]
    pub usage: JurisdictionUsage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardBusiness {
    pub id: String,
    pub name: String,
    pub state: Jurisdiction,
    pub license_type: LicenseType,
    pub cases: Vec<CaseSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardUser {
    pub id: String,
    pub greeting_name: String,
    pub businesses: Vec<DashboardBusiness>,
}
