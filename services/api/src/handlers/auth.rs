use axum::{
    Json,
    extract::State,
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::IntoResponse,
};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};

use grading_auth_types::cookie::{
    GRADING_REFRESH_TOKEN, clear_cookies, set_access_token_cookie, set_refresh_token_cookie,
};
use grading_auth_types::session::RequireSession;
use grading_domain::role::Role;

use crate::domain::repository::IdentityRepository as _;
use crate::error::ApiError;
use crate::state::AppState;
use crate::usecase::authcode::{CreateAuthcodeInput, CreateAuthcodeUseCase};
use crate::usecase::profile::{
    CheckEmailUseCase, CreateProfileInput, CreateProfileUseCase, LoadProfileUseCase,
};
use crate::usecase::signup::{SignupInput, SignupUseCase};
use crate::usecase::token::{
    CreateTokenInput, CreateTokenUseCase, RefreshTokenUseCase, issue_access_token,
    issue_refresh_token,
};
use crate::usecase::verify_email::{VerifyEmailInput, VerifyEmailUseCase};

const X_GRADING_ACCESS_TOKEN_EXPIRES: &str = "x-grading-access-token-expires";

fn token_expires_header(exp: u64) -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static(X_GRADING_ACCESS_TOKEN_EXPIRES),
        HeaderValue::from_str(&exp.to_string()).unwrap(),
    )
}

// ── POST /auth/check-email ────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CheckEmailRequest {
    pub email: Option<String>,
}

#[derive(Serialize)]
pub struct CheckEmailResponse {
    pub exists: bool,
}

pub async fn check_email(
    State(state): State<AppState>,
    Json(body): Json<CheckEmailRequest>,
) -> Result<Json<CheckEmailResponse>, ApiError> {
    let email = body.email.ok_or(ApiError::InvalidEmail)?;
    let usecase = CheckEmailUseCase {
        identities: state.identity_repo(),
    };
    let exists = usecase.execute(&email).await?;
    Ok(Json(CheckEmailResponse { exists }))
}

// ── POST /auth/signup ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SignupRequest {
    pub email: String,
}

pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<SignupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let usecase = SignupUseCase {
        identities: state.identity_repo(),
        auth_codes: state.auth_code_repo(),
    };
    let identity = usecase.execute(SignupInput { email: body.email }).await?;

    // Session starts immediately; the email-confirmation gate keeps it on
    // the verify-email page until the code is redeemed.
    let (access_token, access_token_exp) =
        issue_access_token(identity.id, &identity.email, &state.jwt_secret)?;
    let refresh_token = issue_refresh_token(identity.id, &identity.email, &state.jwt_secret)?;

    let jar = set_access_token_cookie(jar, access_token, state.cookie_domain.clone());
    let jar = set_refresh_token_cookie(jar, refresh_token, state.cookie_domain.clone());

    let mut headers = HeaderMap::new();
    let (name, value) = token_expires_header(access_token_exp);
    headers.insert(name, value);

    Ok((StatusCode::CREATED, jar, headers))
}

// ── POST /auth/verify-email ───────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct VerifyEmailRequest {
    pub code: String,
}

pub async fn verify_email(
    RequireSession(session): RequireSession,
    State(state): State<AppState>,
    Json(body): Json<VerifyEmailRequest>,
) -> Result<StatusCode, ApiError> {
    let usecase = VerifyEmailUseCase {
        identities: state.identity_repo(),
        auth_codes: state.auth_code_repo(),
    };
    usecase
        .execute(session.identity_id, VerifyEmailInput { code: body.code })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── POST /auth/code ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateAuthcodeRequest {
    pub email: String,
}

pub async fn create_authcode(
    State(state): State<AppState>,
    Json(body): Json<CreateAuthcodeRequest>,
) -> Result<StatusCode, ApiError> {
    let usecase = CreateAuthcodeUseCase {
        identities: state.identity_repo(),
        auth_codes: state.auth_code_repo(),
    };
    usecase
        .execute(CreateAuthcodeInput { email: body.email })
        .await?;
    Ok(StatusCode::CREATED)
}

// ── POST /auth/token ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateTokenRequest {
    pub email: String,
    pub code: String,
}

pub async fn create_token(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<CreateTokenRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let usecase = CreateTokenUseCase {
        identities: state.identity_repo(),
        auth_codes: state.auth_code_repo(),
        jwt_secret: state.jwt_secret.clone(),
    };

    let out = usecase
        .execute(CreateTokenInput {
            email: body.email,
            code: body.code,
        })
        .await?;

    let jar = set_access_token_cookie(jar, out.access_token, state.cookie_domain.clone());
    let jar = set_refresh_token_cookie(jar, out.refresh_token, state.cookie_domain.clone());

    let mut headers = HeaderMap::new();
    let (name, value) = token_expires_header(out.access_token_exp);
    headers.insert(name, value);

    Ok((StatusCode::CREATED, jar, headers))
}

// ── PATCH /auth/token ─────────────────────────────────────────────────────────

pub async fn refresh_token(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, ApiError> {
    let refresh_value = jar
        .get(GRADING_REFRESH_TOKEN)
        .map(|c| c.value().to_owned())
        .ok_or(ApiError::InvalidRefreshToken)?;

    let usecase = RefreshTokenUseCase {
        identities: state.identity_repo(),
        jwt_secret: state.jwt_secret.clone(),
    };

    let out = usecase.execute(&refresh_value).await?;

    let jar = set_access_token_cookie(jar, out.access_token, state.cookie_domain.clone());
    let jar = set_refresh_token_cookie(jar, out.refresh_token, state.cookie_domain.clone());

    let mut headers = HeaderMap::new();
    let (name, value) = token_expires_header(out.access_token_exp);
    headers.insert(name, value);

    Ok((StatusCode::CREATED, jar, headers))
}

// ── DELETE /auth/token ────────────────────────────────────────────────────────

pub async fn revoke_token(
    _session: RequireSession,
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, ApiError> {
    let jar = clear_cookies(jar, state.cookie_domain.clone());
    Ok((StatusCode::NO_CONTENT, jar))
}

// ── GET /auth/me ──────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct ProfileBody {
    pub full_name: String,
    pub phone: Option<String>,
    pub role: Role,
    pub approved: bool,
}

#[derive(Serialize)]
pub struct MeBody {
    pub id: String,
    pub email: String,
    pub email_confirmed: bool,
    pub profile: Option<ProfileBody>,
}

#[derive(Serialize)]
pub struct MeResponse {
    pub user: MeBody,
}

pub async fn me(
    RequireSession(session): RequireSession,
    State(state): State<AppState>,
) -> Result<Json<MeResponse>, ApiError> {
    let identity = state
        .identity_repo()
        .find_by_id(session.identity_id)
        .await?
        .ok_or(ApiError::Unauthorized)?;

    // Decorative profile data fails open: a repository error reads as "no
    // profile yet" instead of blocking the badge.
    let usecase = LoadProfileUseCase {
        profiles: state.profile_repo(),
    };
    let profile = usecase.execute(session.identity_id).await;

    Ok(Json(MeResponse {
        user: MeBody {
            id: identity.id.to_string(),
            email: identity.email,
            email_confirmed: identity.email_confirmed_at.is_some(),
            profile: profile.map(|p| ProfileBody {
                full_name: p.full_name,
                phone: p.phone,
                role: p.role,
                approved: p.approved,
            }),
        },
    }))
}

// ── POST /auth/create-profile ─────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateProfileRequest {
    pub full_name: String,
    pub phone: Option<String>,
    pub role: Role,
}

#[derive(Serialize)]
pub struct ProfileResponse {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub role: Role,
    pub approved: bool,
    #[serde(serialize_with = "grading_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "grading_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<crate::domain::types::Profile> for ProfileResponse {
    fn from(p: crate::domain::types::Profile) -> Self {
        Self {
            id: p.id.to_string(),
            email: p.email,
            full_name: p.full_name,
            phone: p.phone,
            role: p.role,
            approved: p.approved,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

pub async fn create_profile(
    RequireSession(session): RequireSession,
    State(state): State<AppState>,
    Json(body): Json<CreateProfileRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let identity = state
        .identity_repo()
        .find_by_id(session.identity_id)
        .await?
        .ok_or(ApiError::Unauthorized)?;

    let usecase = CreateProfileUseCase {
        profiles: state.profile_repo(),
    };
    let (profile, created) = usecase
        .execute(
            &identity,
            CreateProfileInput {
                full_name: body.full_name,
                phone: body.phone,
                role: body.role,
            },
        )
        .await?;

    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(ProfileResponse::from(profile))))
}
