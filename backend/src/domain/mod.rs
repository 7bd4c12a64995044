//! # Domain Layer
//!
//! Business rules for subsidy case management: who may see which records,
//! how cases and approvals attach to children, and how attendances turn into
//! used days and hours on the dashboard.
//!
//! Services take command types from [`commands`], enforce [`policy`] scoping
//! and return domain [`models`]. Persistence is delegated to the repositories
//! in `crate::storage`.

pub mod attendance_service;
pub mod business_service;
pub mod child_service;
pub mod commands;
pub mod dashboard_service;
pub mod date_service;
pub mod errors;
pub mod models;
pub mod policy;
pub mod usage;
pub mod user_service;

pub use attendance_service::AttendanceService;
pub use business_service::BusinessService;
pub use child_service::{ChildService, ChildWithCases};
pub use dashboard_service::DashboardService;
pub use errors::{ServiceError, ServiceResult};
pub use user_service::UserService;
