//! Page endpoints behind the route guard.
//!
//! The UI itself is rendered elsewhere; these handlers only anchor the
//! guard's navigation targets and answer with the page slug once the guard
//! lets the request through.

use axum::Json;
use serde_json::{Value, json};

fn page(slug: &str) -> Json<Value> {
    Json(json!({ "page": slug }))
}

pub async fn root() -> Json<Value> {
    page("root")
}

pub async fn login() -> Json<Value> {
    page("login")
}

pub async fn signup() -> Json<Value> {
    page("signup")
}

pub async fn verify_email() -> Json<Value> {
    page("verify-email")
}

pub async fn waiting_approval() -> Json<Value> {
    page("waiting-approval")
}

pub async fn dashboard() -> Json<Value> {
    page("dashboard")
}
