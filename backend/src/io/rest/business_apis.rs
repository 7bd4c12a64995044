//! # REST API for Businesses

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use tracing::info;

use super::auth::CurrentUser;
use super::error::ApiResult;
use super::mappers::BusinessMapper;
use crate::AppState;
use shared::{Business, CreateBusinessRequest, UpdateBusinessRequest};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/businesses", get(list_businesses).post(create_business))
        .route(
            "/businesses/:id",
            get(get_business)
                .put(update_business)
                .patch(update_business)
                .delete(delete_business),
        )
}

async fn list_businesses(
    State(state): State<AppState>,
    CurrentUser(current): CurrentUser,
) -> ApiResult<Json<Vec<Business>>> {
    info!("GET /api/v1/businesses by {}", current.id);
    let businesses = state.business_service.list_businesses(&current).await?;
    Ok(Json(businesses.into_iter().map(BusinessMapper::to_dto).collect()))
}

async fn create_business(
    State(state): State<AppState>,
    CurrentUser(current): CurrentUser,
    Json(request): Json<CreateBusinessRequest>,
) -> ApiResult<(StatusCode, Json<Business>)> {
    info!("POST /api/v1/businesses by {} - request: {:?}", current.id, request);
    let command = BusinessMapper::to_create_command(request);
    let business = state.business_service.create_business(&current, command).await?;
    Ok((StatusCode::CREATED, Json(BusinessMapper::to_dto(business))))
}

async fn get_business(
    State(state): State<AppState>,
    CurrentUser(current): CurrentUser,
    Path(business_id): Path<String>,
) -> ApiResult<Json<Business>> {
    info!("GET /api/v1/businesses/{} by {}", business_id, current.id);
    let business = state.business_service.get_business(&current, &business_id).await?;
    Ok(Json(BusinessMapper::to_dto(business)))
}

async fn update_business(
    State(state): State<AppState>,
    CurrentUser(current): CurrentUser,
    Path(business_id): Path<String>,
    Json(request): Json<UpdateBusinessRequest>,
) -> ApiResult<Json<Business>> {
    info!("PUT /api/v1/businesses/{} by {} - request: {:?}", business_id, current.id, request);
    let command = BusinessMapper::to_update_command(request);
    let business = state
        .business_service
        .update_business(&current, &business_id, command)
        .await?;
    Ok(Json(BusinessMapper::to_dto(business)))
}

async fn delete_business(
    State(state): State<AppState>,
    CurrentUser(current): CurrentUser,
    Path(business_id): Path<String>,
) -> ApiResult<StatusCode> {
    info!("DELETE /api/v1/businesses/{} by {}", business_id, current.id);
    state.business_service.delete_business(&current, &business_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
