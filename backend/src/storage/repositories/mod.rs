pub mod approval_amount_repository;
pub mod attendance_repository;
pub mod business_repository;
pub mod case_repository;
pub mod child_approval_repository;
pub mod child_repository;
pub mod rate_repository;
pub mod user_repository;

pub use approval_amount_repository::ApprovalAmountRepository;
pub use attendance_repository::AttendanceRepository;
pub use business_repository::BusinessRepository;
pub use case_repository::CaseRepository;
pub use child_approval_repository::ChildApprovalRepository;
pub use child_repository::{ChildRepository, NewChildApproval};
pub use rate_repository::RateRepository;
pub use user_repository::UserRepository;

use anyhow::{anyhow, Result};

/// Parse a TEXT column holding one of our string-backed enums
pub(crate) fn parse_enum<T>(column: &str, value: &str, parse: fn(&str) -> Option<T>) -> Result<T> {
    parse(value).ok_or_else(|| anyhow!("Unexpected value {:?} in column {}", value, column))
}

/// Same as [`parse_enum`] for nullable columns
pub(crate) fn parse_optional_enum<T>(
    column: &str,
    value: Option<String>,
    parse: fn(&str) -> Option<T>,
) -> Result<Option<T>> {
    value.map(|v| parse_enum(column, &v, parse)).transpose()
}

/// Whether a repository error came from a UNIQUE constraint
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
        .map_or(false, |e| e.is_unique_violation())
}
