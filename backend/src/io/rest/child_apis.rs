//! # REST API for Child Management
//!
//! Children are created together with their approvals. Each approval either
//! opens a new case or joins a sibling's existing one.

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
use super::mappers::ChildMapper;
use crate::AppState;
use shared::{Child, CreateChildRequest, UpdateChildRequest};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/children", get(list_children).post(create_child))
        .route(
            "/children/:id",
            get(get_child).put(update_child).patch(update_child).delete(delete_child),
        )
}

async fn list_children(State(state): State<AppState>, CurrentUser(current): CurrentUser) -> ApiResult<Json<Vec<Child>>> {
    info!("GET /api/v1/children by {}", current.id);
    let children = state.child_service.list_children(&current).await?;
    Ok(Json(children.into_iter().map(ChildMapper::to_dto).collect()))
}

async fn create_child(
    State(state): State<AppState>,
    CurrentUser(current): CurrentUser,
    Json(request): Json<CreateChildRequest>,
) -> ApiResult<(StatusCode, Json<Child>)> {
    info!("POST /api/v1/children by {} - request: {:?}", current.id, request);
    let command = ChildMapper::to_create_command(request)?;
    let child = state.child_service.create_child(&current, command).await?;
    Ok((StatusCode::CREATED, Json(ChildMapper::to_dto(child))))
}

async fn get_child(
    State(state): State<AppState>,
    CurrentUser(current): CurrentUser,
    Path(child_id): Path<String>,
) -> ApiResult<Json<Child>> {
    info!("GET /api/v1/children/{} by {}", child_id, current.id);
    let child = state.child_service.get_child(&current, &child_id).await?;
    Ok(Json(ChildMapper::to_dto(child)))
}

async fn update_child(
    State(state): State<AppState>,
    CurrentUser(current): CurrentUser,
    Path(child_id): Path<String>,
    Json(request): Json<UpdateChildRequest>,
) -> ApiResult<Json<Child>> {
    info!("PUT /api/v1/children/{} by {} - request: {:?}", child_id, current.id, request);
    let command = ChildMapper::to_update_command(request);
    let child = state.child_service.update_child(&current, &child_id, command).await?;
    Ok(Json(ChildMapper::to_dto(child)))
}

async fn delete_child(
    State(state): State<AppState>,
    CurrentUser(current): CurrentUser,
    Path(child_id): Path<String>,
) -> ApiResult<StatusCode> {
    info!("DELETE /api/v1/children/{} by {}", child_id, current.id);
    state.child_service.delete_child(&current, &child_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;
    use shared::Jurisdiction;

    use crate::test_utils::TestApp;

    #[tokio::test]
    async fn test_create_child_with_nested_approval() {
        let app = TestApp::new().await;
        let owner = app.fixtures.create_user("Grace", false).await;
        let business = app.fixtures.create_business(&owner, Jurisdiction::Illinois).await;
        let rate = app.fixtures.create_illinois_rate().await;

        let (status, body) = app
            .send(
                Method::POST,
                "/api/v1/children",
                Some(&owner),
                Some(json!({
                    "business_id": business.id,
                    "full_name": "Hedy Lamarr",
                    "date_of_birth": "2018-04-02",
                    "approvals": [{
                        "case_number": "1234567A",
                        "effective_on": "2021-01-01",
                        "expires_on": "2021-12-31",
                        "copay_cents": 10000,
                        "copay_frequency": "monthly",
                        "rate_type": "IllinoisRate",
                        "rate_id": rate.id,
                        "illinois_approval_amounts": [
                            { "month": "2021-01-15", "part_days_approved_per_week": 2, "full_days_approved_per_week": 3 }
                        ]
                    }]
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        assert_eq!(body["full_name"], "Hedy Lamarr");
        assert_eq!(body["cases"][0]["case_number"], "1234567A");
        assert_eq!(body["cases"][0]["rate_type"], "IllinoisRate");

        let (status, body) = app.get("/api/v1/children", Some(&owner)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().map(|c| c.len()), Some(1));
    }

    #[tokio::test]
    async fn test_child_validation_errors_are_unprocessable() {
        let app = TestApp::new().await;
        let owner = app.fixtures.create_user("Grace", false).await;
        let business = app.fixtures.create_business(&owner, Jurisdiction::Illinois).await;

        let (status, body) = app
            .send(
                Method::POST,
                "/api/v1/children",
                Some(&owner),
                Some(json!({
                    "business_id": business.id,
                    "full_name": "Hedy Lamarr",
                    "date_of_birth": "2018-04-02",
                    "approvals": [{ "case_number": "no dates" }]
                })),
            )
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_other_users_child_answers_not_found() {
        let app = TestApp::new().await;
        let owner = app.fixtures.create_user("Grace", false).await;
        let other = app.fixtures.create_user("Katherine", false).await;
        let admin = app.fixtures.create_user("Ada", true).await;
        let business = app.fixtures.create_business(&owner, Jurisdiction::Illinois).await;
        let child = app.fixtures.create_child(&business, "Hedy Lamarr").await;
        let uri = format!("/api/v1/children/{}", child.id);

        let (status, _) = app.get(&uri, Some(&other)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = app.send(Method::DELETE, &uri, Some(&other), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = app.get(&uri, Some(&admin)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], child.id.as_str());
    }

    #[tokio::test]
    async fn test_update_then_delete_child() {
        let app = TestApp::new().await;
        let owner = app.fixtures.create_user("Grace", false).await;
        let business = app.fixtures.create_business(&owner, Jurisdiction::Illinois).await;
        let child = app.fixtures.create_child(&business, "Hedy Lamarr").await;
        let uri = format!("/api/v1/children/{}", child.id);

        let (status, body) = app
            .send(Method::PATCH, &uri, Some(&owner), Some(json!({ "full_name": "Hedy Kiesler" })))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["full_name"], "Hedy Kiesler");

        let (status, _) = app.send(Method::DELETE, &uri, Some(&owner), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = app.get(&uri, Some(&owner)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
