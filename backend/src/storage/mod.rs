//! # Storage Module
//!
//! SQLite persistence through sqlx. `DbConnection` owns the pool and schema;
//! each table gets a repository that maps rows to domain models.
//!
//! Reads never return soft-deleted rows (`deleted_at IS NOT NULL`). Reads
//! that take an `owner_id` only return rows whose business belongs to that
//! user; `None` means unrestricted (admin scope).

pub mod connection;
pub mod repositories;

pub use connection::DbConnection;
pub use repositories::{
    is_unique_violation, ApprovalAmountRepository, AttendanceRepository, BusinessRepository, CaseRepository,
    ChildApprovalRepository, ChildRepository, NewChildApproval, RateRepository, UserRepository,
};
