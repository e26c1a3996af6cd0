use axum::http::StatusCode;
use axum_test::TestServer;
use chrono::Utc;
use sea_orm::{DatabaseBackend, DatabaseConnection, DbErr, MockDatabase};
use uuid::Uuid;

use grading_api::infra::storage::FsObjectStore;
use grading_api::router::build_router;
use grading_api::state::AppState;
use grading_api_schema::{identities, profiles};
use grading_testing::auth::MockSession;

use crate::helpers::{TEST_JWT_SECRET, student_id};

fn test_state(db: DatabaseConnection) -> AppState {
    AppState {
        db,
        jwt_secret: TEST_JWT_SECRET.to_owned(),
        cookie_domain: "example.com".to_owned(),
        public_base_url: "http://localhost:3115".to_owned(),
        store: FsObjectStore::new(std::env::temp_dir().join("grading-guard-tests")),
    }
}

fn server_with(db: DatabaseConnection) -> TestServer {
    TestServer::new(build_router(test_state(db))).unwrap()
}

fn identity_model(id: Uuid, confirmed: bool) -> identities::Model {
    identities::Model {
        id,
        email: "user@example.com".to_owned(),
        email_confirmed_at: confirmed.then(Utc::now),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn profile_model(id: Uuid, approved: bool) -> profiles::Model {
    profiles::Model {
        id,
        email: "user@example.com".to_owned(),
        full_name: "Test User".to_owned(),
        phone: None,
        role: 0,
        approved,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// Mock connection answering the guard's two lookups: the identity row, then
/// the profile row.
fn db_with(identity: Option<identities::Model>, profile: Option<profiles::Model>) -> DatabaseConnection {
    MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([identity.into_iter().collect::<Vec<_>>()])
        .append_query_results([profile.into_iter().collect::<Vec<_>>()])
        .into_connection()
}

async fn get_with_session(server: &TestServer, path: &str, session: &MockSession) -> axum_test::TestResponse {
    let mut request = server.get(path);
    for (name, value) in &session.headers() {
        request = request.add_header(name.clone(), value.clone());
    }
    request.await
}

fn location(response: &axum_test::TestResponse) -> String {
    response
        .headers()
        .get("location")
        .expect("redirect should carry a location header")
        .to_str()
        .unwrap()
        .to_owned()
}

// ── Anonymous ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_redirect_anonymous_dashboard_to_login() {
    let server = server_with(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
    let response = server.get("/dashboard").await;

    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn should_always_allow_root() {
    let server = server_with(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
    let response = server.get("/").await;

    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn should_allow_anonymous_login_page() {
    let server = server_with(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
    let response = server.get("/login").await;

    assert_eq!(response.status_code(), StatusCode::OK);
}

// ── Email-unconfirmed ────────────────────────────────────────────────────────

#[tokio::test]
async fn should_redirect_unconfirmed_identity_to_verify_email() {
    let id = student_id();
    let server = server_with(db_with(Some(identity_model(id, false)), None));
    let session = MockSession::new(id, "user@example.com", TEST_JWT_SECRET);

    let response = get_with_session(&server, "/dashboard", &session).await;

    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/verify-email");
}

#[tokio::test]
async fn should_let_unconfirmed_identity_stay_on_verify_email() {
    let id = student_id();
    let server = server_with(db_with(Some(identity_model(id, false)), None));
    let session = MockSession::new(id, "user@example.com", TEST_JWT_SECRET);

    let response = get_with_session(&server, "/verify-email", &session).await;

    assert_eq!(response.status_code(), StatusCode::OK);
}

// ── Pending approval ─────────────────────────────────────────────────────────

#[tokio::test]
async fn should_redirect_unapproved_profile_to_waiting_approval() {
    let id = student_id();
    let server = server_with(db_with(
        Some(identity_model(id, true)),
        Some(profile_model(id, false)),
    ));
    let session = MockSession::new(id, "user@example.com", TEST_JWT_SECRET);

    let response = get_with_session(&server, "/dashboard", &session).await;

    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/waiting-approval");
}

#[tokio::test]
async fn should_treat_missing_profile_as_pending_approval() {
    let id = student_id();
    let server = server_with(db_with(Some(identity_model(id, true)), None));
    let session = MockSession::new(id, "user@example.com", TEST_JWT_SECRET);

    let response = get_with_session(&server, "/dashboard", &session).await;

    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/waiting-approval");
}

// ── Active ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_let_active_user_reach_dashboard() {
    let id = student_id();
    let server = server_with(db_with(
        Some(identity_model(id, true)),
        Some(profile_model(id, true)),
    ));
    let session = MockSession::new(id, "user@example.com", TEST_JWT_SECRET);

    let response = get_with_session(&server, "/dashboard", &session).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["page"], "dashboard");
}

#[tokio::test]
async fn should_bounce_active_user_from_login_to_dashboard() {
    let id = student_id();
    let server = server_with(db_with(
        Some(identity_model(id, true)),
        Some(profile_model(id, true)),
    ));
    let session = MockSession::new(id, "user@example.com", TEST_JWT_SECRET);

    let response = get_with_session(&server, "/login", &session).await;

    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/dashboard");
}

// ── Fail-closed ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_fail_closed_to_login_when_guard_lookup_errors() {
    let id = student_id();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_errors([DbErr::Custom("connection refused".to_owned())])
        .into_connection();
    let server = server_with(db);
    let session = MockSession::new(id, "user@example.com", TEST_JWT_SECRET);

    let response = get_with_session(&server, "/dashboard", &session).await;

    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
}

// ── Garbage cookies degrade to anonymous ─────────────────────────────────────

#[tokio::test]
async fn should_treat_garbage_cookie_as_anonymous() {
    let server = server_with(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
    let response = server
        .get("/dashboard")
        .add_header(
            axum::http::header::COOKIE,
            axum::http::HeaderValue::from_static("grading_access_token=garbage"),
        )
        .await;

    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
}
