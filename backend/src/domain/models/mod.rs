//! Domain models for the case-management backend.
//!
//! These mirror the persisted records one-to-one. Wire shapes live in the
//! `shared` crate and are produced by the mappers in `io::rest::mappers`.

pub mod approval_amount;
pub mod attendance;
pub mod business;
pub mod case;
pub mod child;
pub mod child_approval;
pub mod rate;
pub mod user;

pub use approval_amount::{IllinoisApprovalAmount, NebraskaApprovalAmount};
pub use attendance::Attendance;
pub use business::Business;
pub use case::Case;
pub use child::Child;
pub use child_approval::{ApprovalWithCase, ChildApproval};
pub use rate::{IllinoisRate, NebraskaRate, Rate, RateRef};
pub use user::User;

/// Every record is keyed by a random UUID
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
