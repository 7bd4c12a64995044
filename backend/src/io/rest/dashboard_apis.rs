//! # REST API for the provider dashboard

use axum::{
    extract::{Query, State},
    response::Json,
    routing::get,
    Router,
};
use tracing::info;

use super::attendance_apis::FilterDateQuery;
use super::auth::CurrentUser;
use super::error::ApiResult;
use super::mappers::DashboardMapper;
use crate::domain::date_service::parse_date;
use crate::AppState;
use shared::DashboardUser;

pub fn router() -> Router<AppState> {
    Router::new().route("/case_list_for_dashboard", get(case_list_for_dashboard))
}

async fn case_list_for_dashboard(
    State(state): State<AppState>,
    CurrentUser(current): CurrentUser,
    Query(query): Query<FilterDateQuery>,
) -> ApiResult<Json<Vec<DashboardUser>>> {
    info!("GET /api/v1/case_list_for_dashboard by {} - query: {:?}", current.id, query);
    let filter_date = query.filter_date.as_deref().map(parse_date).transpose()?;
    let dashboard = state
        .dashboard_service
        .case_list_for_dashboard(&current, filter_date)
        .await?;
    Ok(Json(DashboardMapper::to_dto(dashboard)))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::Value;
    use shared::Jurisdiction;

    use crate::test_utils::TestApp;

    fn case_count(body: &Value) -> usize {
        body.as_array()
            .into_iter()
            .flatten()
            .flat_map(|user| user["businesses"].as_array().into_iter().flatten())
            .map(|business| business["cases"].as_array().map_or(0, |cases| cases.len()))
            .sum()
    }

    #[tokio::test]
    async fn test_provider_sees_own_cases_in_effect() {
        let app = TestApp::new().await;
        let user = app.fixtures.create_user("Grace", false).await;
        app.fixtures.create_jurisdiction_caseload(&user, Jurisdiction::Illinois).await;

        let (status, body) = app.get("/api/v1/case_list_for_dashboard", Some(&user)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(case_count(&body), 2);
        assert_eq!(body[0]["businesses"][0]["cases"][0]["state"], "IL");
        assert!(body[0]["businesses"][0]["cases"][0]["part_days"]["approved"].is_number());

        let (status, body) = app
            .get("/api/v1/case_list_for_dashboard?filter_date=2017-12-12", Some(&user))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(case_count(&body), 0);
    }

    #[tokio::test]
    async fn test_admin_sees_all_providers() {
        let app = TestApp::new().await;
        let admin = app.fixtures.create_user("Ada", true).await;
        let illinois = app.fixtures.create_user("Grace", false).await;
        let nebraska = app.fixtures.create_user("Katherine", false).await;
        app.fixtures.create_jurisdiction_caseload(&illinois, Jurisdiction::Illinois).await;
        app.fixtures.create_jurisdiction_caseload(&nebraska, Jurisdiction::Nebraska).await;

        let (status, body) = app.get("/api/v1/case_list_for_dashboard", Some(&admin)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(case_count(&body), 4);
        assert_eq!(body[1]["businesses"][0]["cases"][0]["state"], "NE");
        assert!(body[1]["businesses"][0]["cases"][0]["hours"]["remaining"].is_number());
    }

    #[tokio::test]
    async fn test_bad_filter_date_is_unprocessable() {
        let app = TestApp::new().await;
        let user = app.fixtures.create_user("Grace", false).await;

        let (status, _) = app
            .get("/api/v1/case_list_for_dashboard?filter_date=2017-02-30", Some(&user))
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }
}
