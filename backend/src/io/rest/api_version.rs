//! Accept-header API versioning.
//!
//! Clients pick a version with `Accept: application/vnd.pieforproviders.v1+json`.
//! The configured default version also answers requests that name none.

use axum::{
    extract::{Request, State},
    http::{header::ACCEPT, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiConstraint {
    pub version: u32,
    pub default: bool,
}

impl ApiConstraint {
    pub fn new(version: u32, default_version: u32) -> Self {
        Self {
            version,
            default: version == default_version,
        }
    }

    pub fn media_type(&self) -> String {
        format!("application/vnd.pieforproviders.v{}+json", self.version)
    }

    /// The default version matches every request. Others need their media
    /// type in `Accept`.
    pub fn matches(&self, headers: &HeaderMap) -> bool {
        if self.default {
            return true;
        }
        let media_type = self.media_type();
        headers
            .get_all(ACCEPT)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .any(|value| value.contains(&media_type))
    }
}

/// Route layer that hides routes from requests for another version
pub async fn require_version(State(constraint): State<ApiConstraint>, request: Request, next: Next) -> Response {
    if constraint.matches(request.headers()) {
        next.run(request).await
    } else {
        StatusCode::NOT_FOUND.into_response()
    }
}
