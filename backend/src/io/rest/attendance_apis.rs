//! # REST API for Attendances

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use super::auth::CurrentUser;
use super::error::ApiResult;
use super::mappers::AttendanceMapper;
use crate::domain::date_service::parse_date;
use crate::AppState;
use shared::{Attendance, AttendanceBatchRequest, AttendanceBatchResponse};

/// `filter_date` is a `YYYY-MM-DD` date, today when absent
#[derive(Debug, Deserialize)]
pub struct FilterDateQuery {
    pub filter_date: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/attendances", get(list_attendances))
        .route("/attendance_batches", post(create_attendance_batch))
}

/// Attendances in the Sunday to Saturday week of `filter_date`
async fn list_attendances(
    State(state): State<AppState>,
    CurrentUser(current): CurrentUser,
    Query(query): Query<FilterDateQuery>,
) -> ApiResult<Json<Vec<Attendance>>> {
    info!("GET /api/v1/attendances by {} - query: {:?}", current.id, query);
    let date = match query.filter_date.as_deref() {
        Some(raw) => parse_date(raw)?,
        None => Utc::now().date_naive(),
    };
    let attendances = state.attendance_service.list_for_week(&current, date).await?;
    Ok(Json(attendances.into_iter().map(AttendanceMapper::to_dto).collect()))
}

/// Record attendances. Answers 202 with per-item errors under `meta`.
async fn create_attendance_batch(
    State(state): State<AppState>,
    CurrentUser(current): CurrentUser,
    Json(request): Json<AttendanceBatchRequest>,
) -> ApiResult<(StatusCode, Json<AttendanceBatchResponse>)> {
    info!(
        "POST /api/v1/attendance_batches by {} - {} items",
        current.id,
        request.attendance_batch.len()
    );
    let commands = AttendanceMapper::to_commands(request.attendance_batch);
    let result = state.attendance_service.record_batch(&current, commands).await?;
    Ok((StatusCode::ACCEPTED, Json(AttendanceMapper::to_batch_response(result))))
}
