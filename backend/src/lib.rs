//! # PIE for Providers backend
//!
//! Case management for childcare providers who take subsidy payments.
//! Providers track the businesses they run, the children enrolled there,
//! the subsidy cases that cover each child, and daily attendance. The
//! dashboard turns attendance into month-to-date usage against what each
//! case authorizes.
//!
//! ## Architecture
//!
//! ```text
//! IO Layer (REST API, auth, versioning)
//!     ↓
//! Domain Layer (services, policy, usage rules)
//!     ↓
//! Storage Layer (sqlx repositories over SQLite)
//! ```

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

#[cfg(test)]
pub(crate) mod test_utils;

use anyhow::{Context, Result};
use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::domain::{AttendanceService, BusinessService, ChildService, DashboardService, UserService};
use crate::io::rest::api_version::ApiConstraint;
use crate::io::rest::auth::JwtService;
use crate::storage::DbConnection;

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub business_service: BusinessService,
    pub child_service: ChildService,
    pub attendance_service: AttendanceService,
    pub dashboard_service: DashboardService,
    pub jwt_service: JwtService,
    pub api_constraint: ApiConstraint,
    pub cors_origin: HeaderValue,
}

impl AppState {
    pub fn new(
        db: DbConnection,
        jwt_service: JwtService,
        api_constraint: ApiConstraint,
        cors_origin: HeaderValue,
    ) -> Self {
        Self {
            user_service: UserService::new(db.clone()),
            business_service: BusinessService::new(db.clone()),
            child_service: ChildService::new(db.clone()),
            attendance_service: AttendanceService::new(db.clone()),
            dashboard_service: DashboardService::new(db),
            jwt_service,
            api_constraint,
            cors_origin,
        }
    }
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: &Config) -> Result<AppState> {
    info!("Setting up database");
    let db = DbConnection::new(&config.database_url).await?;

    let cors_origin = HeaderValue::from_str(&config.cors_origin)
        .with_context(|| format!("CORS_ORIGIN is not a valid origin: {}", config.cors_origin))?;

    info!("Setting up application state");
    Ok(AppState::new(
        db,
        JwtService::new(&config.jwt_secret, config.jwt_issuer.clone()),
        ApiConstraint::new(1, config.api_default_version),
        cors_origin,
    ))
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router {
    // CORS setup to allow the web client to make requests
    let cors = CorsLayer::new()
        .allow_origin(app_state.cors_origin.clone())
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::ACCEPT, header::CONTENT_TYPE]);

    Router::new()
        .nest("/api/v1", io::rest::v1_routes(app_state.api_constraint))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}
