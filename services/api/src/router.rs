use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, patch, post, put},
};
use tower_http::trace::TraceLayer;

use grading_core::error::AppError;
use grading_core::health::{healthz, readyz};
use grading_core::middleware::request_id_layer;

use crate::guard;
use crate::handlers::{
    auth, course, element, evaluation, page, preference, schedule, submission, unit, user,
};
use crate::state::AppState;

/// Uploads stay under the validation cap with room for multipart framing;
/// the 5 MiB + 1 case must reach the handler's own 400, not a 413.
const UPLOAD_BODY_LIMIT: usize = 8 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    // Pages go through the redirect state machine; API routes below answer
    // 401/403 instead of redirecting.
    let pages = Router::new()
        .route("/", get(page::root))
        .route("/login", get(page::login))
        .route("/signup", get(page::signup))
        .route("/verify-email", get(page::verify_email))
        .route("/waiting-approval", get(page::waiting_approval))
        .route("/dashboard", get(page::dashboard))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            guard::route_guard,
        ));

    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .merge(pages)
        // Auth
        .route("/auth/check-email", post(auth::check_email))
        .route("/auth/signup", post(auth::signup))
        .route("/auth/verify-email", post(auth::verify_email))
        .route("/auth/code", post(auth::create_authcode))
        .route("/auth/token", post(auth::create_token))
        .route("/auth/token", patch(auth::refresh_token))
        .route("/auth/token", delete(auth::revoke_token))
        .route("/auth/me", get(auth::me))
        .route("/auth/create-profile", post(auth::create_profile))
        // Users
        .route("/users", get(user::list_users))
        .route("/users/@me", patch(user::update_me))
        .route("/users/{id}/approval", patch(user::set_approval))
        // Courses
        .route("/courses", post(course::create_course))
        .route("/courses", get(course::list_courses))
        .route("/courses/{id}", get(course::get_course))
        .route("/courses/{id}", patch(course::update_course))
        .route("/courses/{id}", delete(course::delete_course))
        .route(
            "/courses/{id}/teachers/{teacher_id}",
            put(course::assign_teacher),
        )
        .route(
            "/courses/{id}/teachers/{teacher_id}",
            delete(course::unassign_teacher),
        )
        .route(
            "/courses/{id}/students/{student_id}",
            put(course::enroll_student),
        )
        .route(
            "/courses/{id}/students/{student_id}",
            delete(course::unenroll_student),
        )
        // Competency units
        .route("/competency-units", post(unit::create_unit))
        .route("/competency-units", get(unit::list_units))
        .route("/competency-units/{id}", get(unit::get_unit))
        .route("/competency-units/{id}", patch(unit::update_unit))
        .route("/competency-units/{id}", delete(unit::delete_unit))
        // Competency elements
        .route("/competency-elements", post(element::create_element))
        .route("/competency-elements", get(element::list_elements))
        .route("/competency-elements/{id}", get(element::get_element))
        .route("/competency-elements/{id}", patch(element::update_element))
        .route("/competency-elements/{id}", delete(element::delete_element))
        // Evaluation schedules
        .route("/evaluation-schedules", post(schedule::create_schedule))
        .route("/evaluation-schedules", get(schedule::list_schedules))
        .route(
            "/evaluation-schedules/{id}",
            patch(schedule::set_schedule_status),
        )
        // Evaluations
        .route("/evaluations", post(evaluation::create_evaluation))
        .route("/evaluations", get(evaluation::list_evaluations))
        .route("/evaluations/check", get(evaluation::check_evaluation))
        .route("/evaluations/{id}", get(evaluation::get_evaluation))
        .route("/evaluations/{id}", patch(evaluation::update_evaluation))
        // Submissions
        .route(
            "/submissions/upload",
            post(submission::upload_submission)
                .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/submissions", get(submission::list_submissions))
        .route("/files/{*key}", get(submission::serve_file))
        // Preferences
        .route("/user/preferences", get(preference::get_preferences))
        .route("/user/preferences", post(preference::set_preferences))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}

async fn not_found() -> AppError {
    AppError::NotFound
}
