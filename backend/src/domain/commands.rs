//! Domain-level command types.
//!
//! Services take these rather than the wire DTOs from `shared`; the REST
//! mappers do the translation.

pub mod business {
    use shared::{Jurisdiction, LicenseType, QrisRating};

    #[derive(Debug, Clone)]
    pub struct CreateBusinessCommand {
        pub user_id: Option<String>,
        pub name: String,
        pub license_type: LicenseType,
        pub state: Jurisdiction,
        pub zipcode: Option<String>,
        pub county: Option<String>,
        pub qris_rating: Option<QrisRating>,
        pub accredited: Option<bool>,
    }

    #[derive(Debug, Clone, Default)]
    pub struct UpdateBusinessCommand {
        pub name: Option<String>,
        pub license_type: Option<LicenseType>,
        pub zipcode: Option<String>,
        pub county: Option<String>,
        pub active: Option<bool>,
        pub qris_rating: Option<QrisRating>,
        pub accredited: Option<bool>,
    }
}

pub mod child {
    use chrono::NaiveDate;
    use shared::CopayFrequency;

    use crate::domain::models::RateRef;

    /// Fields for a case created alongside a child
    #[derive(Debug, Clone)]
    pub struct NewCase {
        pub case_number: Option<String>,
        pub effective_on: NaiveDate,
        pub expires_on: Option<NaiveDate>,
        pub copay_cents: Option<i64>,
        pub copay_frequency: Option<CopayFrequency>,
    }

    #[derive(Debug, Clone)]
    pub enum CaseSource {
        Existing(String),
        New(NewCase),
    }

    #[derive(Debug, Clone, Default)]
    pub struct ApprovalDetails {
        pub rate: Option<RateRef>,
        pub authorized_weekly_hours: Option<f64>,
        pub full_days: Option<i64>,
        pub hours: Option<f64>,
        pub enrolled_in_school: Option<bool>,
        pub special_needs_rate: Option<bool>,
        pub special_needs_daily_rate: Option<f64>,
        pub special_needs_hourly_rate: Option<f64>,
    }

    #[derive(Debug, Clone)]
    pub struct NewIllinoisAmount {
        pub month: NaiveDate,
        pub part_days_approved_per_week: i64,
        pub full_days_approved_per_week: i64,
    }

    #[derive(Debug, Clone)]
    pub struct NewNebraskaAmount {
        pub effective_on: NaiveDate,
        pub expires_on: NaiveDate,
        pub family_fee: f64,
        pub allocated_family_fee: Option<f64>,
    }

    #[derive(Debug, Clone)]
    pub struct NewApproval {
        pub case: CaseSource,
        pub details: ApprovalDetails,
        pub illinois_amounts: Vec<NewIllinoisAmount>,
        pub nebraska_amounts: Vec<NewNebraskaAmount>,
    }

    #[derive(Debug, Clone)]
    pub struct CreateChildCommand {
        pub business_id: String,
        pub full_name: String,
        pub date_of_birth: NaiveDate,
        pub dhs_id: Option<String>,
        pub approvals: Vec<NewApproval>,
    }

    #[derive(Debug, Clone, Default)]
    pub struct UpdateChildCommand {
        pub full_name: Option<String>,
        pub date_of_birth: Option<NaiveDate>,
        pub dhs_id: Option<String>,
        pub active: Option<bool>,
        pub last_active_date: Option<NaiveDate>,
        pub inactive_reason: Option<String>,
    }
}

pub mod attendance {
    use chrono::{DateTime, Utc};
    use shared::AbsenceType;

    use crate::domain::models::Attendance;

    #[derive(Debug, Clone)]
    pub struct RecordAttendanceCommand {
        pub child_id: String,
        pub check_in: DateTime<Utc>,
        pub check_out: Option<DateTime<Utc>>,
        pub absence: Option<AbsenceType>,
    }

    /// An attendance that was recorded, with the child it was recorded for
    #[derive(Debug, Clone)]
    pub struct RecordedAttendance {
        pub child_id: String,
        pub attendance: Attendance,
    }

    #[derive(Debug, Clone)]
    pub struct RejectedAttendance {
        pub index: usize,
        pub child_id: String,
        pub message: String,
    }

    #[derive(Debug, Clone, Default)]
    pub struct AttendanceBatchResult {
        pub recorded: Vec<RecordedAttendance>,
        pub rejected: Vec<RejectedAttendance>,
    }
}
