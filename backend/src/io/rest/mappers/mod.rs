//! Conversions between the wire DTOs in `shared` and the domain layer.

pub mod attendance_mapper;
pub mod business_mapper;
pub mod child_mapper;
pub mod dashboard_mapper;
pub mod user_mapper;

pub use attendance_mapper::AttendanceMapper;
pub use business_mapper::BusinessMapper;
pub use child_mapper::ChildMapper;
pub use dashboard_mapper::DashboardMapper;
pub use user_mapper::UserMapper;
