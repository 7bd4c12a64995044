//! # REST API for Users
//!
//! Users are provisioned by the sign-in service, so these endpoints only read.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::get,
    Router,
};
use tracing::info;

use super::auth::CurrentUser;
use super::error::ApiResult;
use super::mappers::UserMapper;
use crate::AppState;
use shared::User;

/// Create a router for user related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/:id", get(get_user))
        .route("/profile", get(get_profile))
}

/// List every user (admins only)
async fn list_users(State(state): State<AppState>, CurrentUser(current): CurrentUser) -> ApiResult<Json<Vec<User>>> {
    info!("GET /api/v1/users by {}", current.id);
    let users = state.user_service.list_users(&current).await?;
    Ok(Json(users.into_iter().map(UserMapper::to_dto).collect()))
}

async fn get_user(
    State(state): State<AppState>,
    CurrentUser(current): CurrentUser,
    Path(user_id): Path<String>,
) -> ApiResult<Json<User>> {
    info!("GET /api/v1/users/{} by {}", user_id, current.id);
    let user = state.user_service.get_user(&current, &user_id).await?;
    Ok(Json(UserMapper::to_dto(user)))
}

/// The signed-in user
async fn get_profile(CurrentUser(current): CurrentUser) -> Json<User> {
    info!("GET /api/v1/profile by {}", current.id);
    Json(UserMapper::to_dto(current))
}
