//! # REST API Interface Layer
//!
//! JSON endpoints under `/api/v1`. This layer handles:
//! - bearer-token authentication of every request
//! - Accept-header version matching
//! - translating DTOs to domain commands and back
//! - converting domain errors to HTTP statuses
//!
//! Handlers stay thin; authorization and validation live in the domain.

pub mod api_version;
pub mod attendance_apis;
pub mod auth;
pub mod business_apis;
pub mod child_apis;
pub mod dashboard_apis;
pub mod error;
pub mod mappers;
pub mod user_apis;

use axum::{middleware, Router};

use crate::AppState;
use api_version::{require_version, ApiConstraint};

/// Every v1 route, hidden from requests that ask for another version
pub fn v1_routes(constraint: ApiConstraint) -> Router<AppState> {
    Router::new()
        .merge(user_apis::router())
        .merge(business_apis::router())
        .merge(child_apis::router())
        .merge(attendance_apis::router())
        .merge(dashboard_apis::router())
        .route_layer(middleware::from_fn_with_state(constraint, require_version))
}
