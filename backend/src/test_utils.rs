//! Shared fixtures for tests: an in-memory database with helpers to create
//! users, businesses, children and cases, plus a router harness.

use axum::body::Body;
use axum::http::{header, HeaderValue, Method, Request, StatusCode};
use axum::Router;
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde_json::Value;
use tower::ServiceExt;

use crate::domain::date_service::first_day_of_month;
use crate::domain::models::{
    generate_id, ApprovalWithCase, Attendance, Business, Case, Child, ChildApproval, IllinoisApprovalAmount,
    IllinoisRate, NebraskaApprovalAmount, NebraskaRate, RateRef, User,
};
use crate::io::rest::api_version::ApiConstraint;
use crate::io::rest::auth::JwtService;
use crate::storage::{
    AttendanceRepository, BusinessRepository, ChildApprovalRepository, ChildRepository, DbConnection,
    NewChildApproval, RateRepository, UserRepository,
};
use crate::{create_router, AppState};
use shared::{CopayFrequency, Jurisdiction, LicenseType};

const TEST_JWT_SECRET: &str = "test-secret";
const TEST_JWT_ISSUER: &str = "pie-for-providers";

fn d(s: &str) -> NaiveDate {
    s.parse().expect("Invalid fixture date")
}

/// A user that is not stored anywhere
pub fn build_user(greeting_name: &str, admin: bool) -> User {
    let now = Utc::now();
    let id = generate_id();
    User {
        email: format!("{}-{}@example.com", greeting_name.to_lowercase(), id),
        id,
        full_name: format!("{} Tester", greeting_name),
        greeting_name: greeting_name.to_string(),
        admin,
        active: true,
        language: "en".to_string(),
        phone_number: Some("888-888-8888".to_string()),
        timezone: "Central Time (US & Canada)".to_string(),
        organization: Some("Society for the Promotion of Elephant Welfare".to_string()),
        created_at: now,
        updated_at: now,
    }
}

pub struct TestFixtures {
    pub db: DbConnection,
}

impl TestFixtures {
    pub async fn new() -> Self {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        Self { db }
    }

    pub async fn create_user(&self, greeting_name: &str, admin: bool) -> User {
        let user = build_user(greeting_name, admin);
        UserRepository::new(self.db.clone())
            .store_user(&user)
            .await
            .expect("Failed to store user");
        user
    }

    pub async fn create_inactive_user(&self, greeting_name: &str) -> User {
        let mut user = build_user(greeting_name, false);
        user.active = false;
        UserRepository::new(self.db.clone())
            .store_user(&user)
            .await
            .expect("Failed to store user");
        user
    }

    pub async fn create_business(&self, user: &User, state: Jurisdiction) -> Business {
        let now = Utc::now();
        let business = Business {
            id: generate_id(),
            user_id: user.id.clone(),
            name: format!("{} Child Care", user.greeting_name),
            license_type: match state {
                Jurisdiction::Illinois => LicenseType::LicensedFamilyHome,
                Jurisdiction::Nebraska => LicenseType::FamilyChildCareHomeI,
            },
            state,
            zipcode: Some("60606".to_string()),
            county: Some("Cook".to_string()),
            active: true,
            qris_rating: None,
            accredited: None,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        };
        BusinessRepository::new(self.db.clone())
            .store_business(&business)
            .await
            .expect("Failed to store business");
        business
    }

    pub async fn create_illinois_rate(&self) -> IllinoisRate {
        let rate = IllinoisRate {
            id: generate_id(),
            name: "Group 1A Family Home".to_string(),
            county: Some("Cook".to_string()),
            license_type: LicenseType::LicensedFamilyHome,
            full_day_rate: 36.23,
            part_day_rate: 18.12,
            effective_on: d("2019-01-01"),
            expires_on: None,
        };
        RateRepository::new(self.db.clone())
            .store_illinois_rate(&rate)
            .await
            .expect("Failed to store rate");
        rate
    }

    pub async fn create_nebraska_rate(&self) -> NebraskaRate {
        let rate = NebraskaRate {
            id: generate_id(),
            name: "Lancaster Family Home".to_string(),
            region: Some("LDDS".to_string()),
            license_type: LicenseType::FamilyChildCareHomeI,
            daily_rate: 32.0,
            hourly_rate: 5.75,
            accredited_rate: false,
            effective_on: d("2019-01-01"),
            expires_on: None,
        };
        RateRepository::new(self.db.clone())
            .store_nebraska_rate(&rate)
            .await
            .expect("Failed to store rate");
        rate
    }

    /// A child with one open-ended case starting 2021-01-01
    pub async fn create_child(&self, business: &Business, full_name: &str) -> Child {
        self.create_child_with_case(business, full_name, d("2021-01-01"), None).await
    }

    pub async fn create_child_with_case(
        &self,
        business: &Business,
        full_name: &str,
        effective_on: NaiveDate,
        expires_on: Option<NaiveDate>,
    ) -> Child {
        self.create_child_with_cases(business, full_name, &[(effective_on, expires_on)])
            .await
    }

    /// A child with one approval per `(effective_on, expires_on)` window.
    ///
    /// Each approval gets the jurisdiction's rate and an approval amount for
    /// the case's first month and for the current month.
    pub async fn create_child_with_cases(
        &self,
        business: &Business,
        full_name: &str,
        windows: &[(NaiveDate, Option<NaiveDate>)],
    ) -> Child {
        let now = Utc::now();
        let child = Child {
            id: generate_id(),
            business_id: business.id.clone(),
            full_name: full_name.to_string(),
            date_of_birth: d("2018-04-02"),
            dhs_id: None,
            active: true,
            last_active_date: None,
            inactive_reason: None,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        };

        let rate = match business.state {
            Jurisdiction::Illinois => RateRef::Illinois(self.create_illinois_rate().await.id),
            Jurisdiction::Nebraska => RateRef::Nebraska(self.create_nebraska_rate().await.id),
        };

        let approvals = windows
            .iter()
            .map(|&(effective_on, expires_on)| {
                self.build_approval(business.state, &child, rate.clone(), effective_on, expires_on)
            })
            .collect::<Vec<_>>();

        ChildRepository::new(self.db.clone())
            .store_child_with_approvals(&child, &approvals)
            .await
            .expect("Failed to store child");
        child
    }

    fn build_approval(
        &self,
        state: Jurisdiction,
        child: &Child,
        rate: RateRef,
        effective_on: NaiveDate,
        expires_on: Option<NaiveDate>,
    ) -> NewChildApproval {
        let now = Utc::now();
        let case = Case {
            id: generate_id(),
            case_number: Some(format!("{:08}", effective_on.num_days_from_ce())),
            copay_cents: Some(10000),
            copay_frequency: Some(CopayFrequency::Weekly),
            effective_on,
            expires_on,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        };
        let approval = ChildApproval {
            id: generate_id(),
            child_id: child.id.clone(),
            case_id: case.id.clone(),
            rate: Some(rate),
            authorized_weekly_hours: Some(30.0),
            full_days: Some(18),
            hours: None,
            enrolled_in_school: Some(false),
            special_needs_rate: Some(false),
            special_needs_daily_rate: None,
            special_needs_hourly_rate: None,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        };

        let mut months = vec![first_day_of_month(effective_on)];
        let this_month = first_day_of_month(now.date_naive());
        if !months.contains(&this_month) {
            months.push(this_month);
        }

        let (illinois_amounts, nebraska_amounts) = match state {
            Jurisdiction::Illinois => (
                months
                    .into_iter()
                    .map(|month| IllinoisApprovalAmount {
                        id: generate_id(),
                        child_approval_id: approval.id.clone(),
                        month,
                        part_days_approved_per_week: 2,
                        full_days_approved_per_week: 3,
                    })
                    .collect(),
                vec![],
            ),
            Jurisdiction::Nebraska => (
                vec![],
                vec![NebraskaApprovalAmount {
                    id: generate_id(),
                    child_approval_id: approval.id.clone(),
                    effective_on,
                    expires_on: expires_on.unwrap_or(effective_on + Duration::days(3650)),
                    family_fee: 80.0,
                    allocated_family_fee: Some(80.0),
                }],
            ),
        };

        NewChildApproval {
            new_case: Some(case),
            approval,
            illinois_amounts,
            nebraska_amounts,
        }
    }

    /// A business with two children, each with one expired case (2019) and
    /// one open-ended case starting 2020-01-01
    pub async fn create_jurisdiction_caseload(&self, user: &User, state: Jurisdiction) -> Business {
        let business = self.create_business(user, state).await;
        let windows = [
            (d("2019-01-01"), Some(d("2019-12-31"))),
            (d("2020-01-01"), None),
        ];
        for name in ["Marlee Matlin", "Nyle DiMarco"] {
            self.create_child_with_cases(&business, &format!("{} ({})", name, user.greeting_name), &windows)
                .await;
        }
        business
    }

    pub async fn approvals_for(&self, child: &Child) -> Vec<ApprovalWithCase> {
        ChildApprovalRepository::new(self.db.clone())
            .list_for_child(&child.id)
            .await
            .expect("Failed to list approvals")
    }

    pub async fn record_attendance(
        &self,
        child_approval_id: &str,
        check_in: DateTime<Utc>,
        check_out: Option<DateTime<Utc>>,
    ) -> Attendance {
        let attendance = Attendance {
            id: generate_id(),
            child_approval_id: child_approval_id.to_string(),
            check_in,
            check_out,
            time_in_care: Attendance::compute_time_in_care(check_in, check_out),
            absence: None,
            deleted_at: None,
            created_at: check_in,
            updated_at: check_in,
        };
        AttendanceRepository::new(self.db.clone())
            .store_attendance(&attendance)
            .await
            .expect("Failed to store attendance");
        attendance
    }
}

/// The full router over a fresh database
pub struct TestApp {
    pub fixtures: TestFixtures,
    state: AppState,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_constraint(ApiConstraint::new(1, 1)).await
    }

    pub async fn with_constraint(constraint: ApiConstraint) -> Self {
        let fixtures = TestFixtures::new().await;
        let state = AppState::new(
            fixtures.db.clone(),
            JwtService::new(TEST_JWT_SECRET, TEST_JWT_ISSUER.to_string()),
            constraint,
            HeaderValue::from_static("http://localhost:8080"),
        );
        Self { fixtures, state }
    }

    pub fn router(&self) -> Router {
        create_router(self.state.clone())
    }

    pub fn token_for(&self, user: &User) -> String {
        self.state.jwt_service.create_token(&user.id).expect("Failed to create token")
    }

    pub async fn get(&self, uri: &str, user: Option<&User>) -> (StatusCode, Value) {
        self.send(Method::GET, uri, user, None).await
    }

    pub async fn get_with_token(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .expect("Failed to build request");
        self.call(request).await
    }

    /// Send a request as `user` (unauthenticated when `None`) and decode the
    /// JSON body, `Value::Null` when empty
    pub async fn send(&self, method: Method, uri: &str, user: Option<&User>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", self.token_for(user)));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");
        self.call(request).await
    }

    async fn call(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router().oneshot(request).await.expect("Request failed");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, body)
    }
}
