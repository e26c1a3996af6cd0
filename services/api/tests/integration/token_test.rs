use grading_api::domain::types::AuthCodeKind;
use grading_api::error::ApiError;
use grading_api::usecase::token::{
    CreateTokenInput, CreateTokenUseCase, RefreshTokenUseCase, issue_access_token,
    issue_refresh_token,
};
use grading_auth_types::token::{validate_access_token, validate_token};

use crate::helpers::{
    MockAuthCodeRepo, MockIdentityRepo, TEST_JWT_SECRET, student_id, test_auth_code, test_identity,
};

// ── issue / validate ─────────────────────────────────────────────────────────

#[tokio::test]
async fn should_issue_access_token_that_validates_successfully() {
    let identity = test_identity(student_id(), "student@example.com", true);
    let (token, exp) = issue_access_token(identity.id, &identity.email, TEST_JWT_SECRET).unwrap();

    assert!(!token.is_empty());
    assert!(exp > 0);

    let info = validate_access_token(&token, TEST_JWT_SECRET).unwrap();
    assert_eq!(info.identity_id, identity.id);
    assert_eq!(info.email, identity.email);
    assert_eq!(info.access_token_exp, exp);
}

#[tokio::test]
async fn should_reject_token_signed_with_wrong_secret() {
    let identity = test_identity(student_id(), "student@example.com", true);
    let (token, _) = issue_access_token(identity.id, &identity.email, TEST_JWT_SECRET).unwrap();

    assert!(validate_access_token(&token, "wrong-secret").is_err());
}

#[tokio::test]
async fn should_issue_refresh_token_that_validates_successfully() {
    let identity = test_identity(student_id(), "student@example.com", true);
    let token = issue_refresh_token(identity.id, &identity.email, TEST_JWT_SECRET).unwrap();

    let claims = validate_token(&token, TEST_JWT_SECRET).unwrap();
    assert_eq!(claims.sub, identity.id.to_string());
    assert_eq!(claims.email, identity.email);
}

// ── CreateTokenUseCase ───────────────────────────────────────────────────────

#[tokio::test]
async fn should_create_token_pair_with_valid_login_code() {
    let identity = test_identity(student_id(), "student@example.com", true);
    let code = test_auth_code(identity.id, AuthCodeKind::Login);
    let code_str = code.code.clone();

    let usecase = CreateTokenUseCase {
        identities: MockIdentityRepo::new(vec![identity.clone()]),
        auth_codes: MockAuthCodeRepo::new(vec![code], 1),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let output = usecase
        .execute(CreateTokenInput {
            email: identity.email.clone(),
            code: code_str,
        })
        .await
        .unwrap();

    assert_eq!(output.identity_id, identity.id);
    assert!(!output.access_token.is_empty());
    assert!(!output.refresh_token.is_empty());
    assert!(output.access_token_exp > 0);

    let info = validate_access_token(&output.access_token, TEST_JWT_SECRET).unwrap();
    assert_eq!(info.identity_id, identity.id);
}

#[tokio::test]
async fn should_mark_login_code_as_used_after_create_token() {
    let identity = test_identity(student_id(), "student@example.com", true);
    let code = test_auth_code(identity.id, AuthCodeKind::Login);
    let code_str = code.code.clone();
    let code_id = code.id;

    let mock_repo = MockAuthCodeRepo::new(vec![code], 1);
    let codes_handle = mock_repo.codes_handle();

    let usecase = CreateTokenUseCase {
        identities: MockIdentityRepo::new(vec![identity.clone()]),
        auth_codes: mock_repo,
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    usecase
        .execute(CreateTokenInput {
            email: identity.email.clone(),
            code: code_str,
        })
        .await
        .unwrap();

    let codes = codes_handle.lock().unwrap();
    let used_code = codes.iter().find(|c| c.id == code_id).unwrap();
    assert!(
        used_code.used_at.is_some(),
        "login code should be marked as used after token creation"
    );
}

#[tokio::test]
async fn should_reject_unknown_email_for_create_token() {
    let usecase = CreateTokenUseCase {
        identities: MockIdentityRepo::empty(),
        auth_codes: MockAuthCodeRepo::empty(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let result = usecase
        .execute(CreateTokenInput {
            email: "nobody@example.com".to_owned(),
            code: "ABCDEF123456".to_owned(),
        })
        .await;

    assert!(
        matches!(result, Err(ApiError::IdentityNotFound)),
        "expected IdentityNotFound, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_signup_code_used_as_login_code() {
    // A signup-confirm code must not open a login session.
    let identity = test_identity(student_id(), "student@example.com", false);
    let code = test_auth_code(identity.id, AuthCodeKind::SignupConfirm);
    let code_str = code.code.clone();

    let usecase = CreateTokenUseCase {
        identities: MockIdentityRepo::new(vec![identity.clone()]),
        auth_codes: MockAuthCodeRepo::new(vec![code], 1),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let result = usecase
        .execute(CreateTokenInput {
            email: identity.email.clone(),
            code: code_str,
        })
        .await;

    assert!(
        matches!(result, Err(ApiError::InvalidAuthcode)),
        "expected InvalidAuthcode, got {result:?}"
    );
}

// ── RefreshTokenUseCase ──────────────────────────────────────────────────────

#[tokio::test]
async fn should_refresh_token_pair_with_valid_refresh_jwt() {
    let identity = test_identity(student_id(), "student@example.com", true);
    let refresh = issue_refresh_token(identity.id, &identity.email, TEST_JWT_SECRET).unwrap();

    let usecase = RefreshTokenUseCase {
        identities: MockIdentityRepo::new(vec![identity.clone()]),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let output = usecase.execute(&refresh).await.unwrap();

    assert_eq!(output.identity_id, identity.id);
    assert!(!output.access_token.is_empty());
    assert!(!output.refresh_token.is_empty());

    let info = validate_access_token(&output.access_token, TEST_JWT_SECRET).unwrap();
    assert_eq!(info.identity_id, identity.id);
}

#[tokio::test]
async fn should_reject_garbage_refresh_jwt() {
    let identity = test_identity(student_id(), "student@example.com", true);

    let usecase = RefreshTokenUseCase {
        identities: MockIdentityRepo::new(vec![identity]),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let result = usecase.execute("not-a-valid-jwt").await;

    assert!(
        matches!(result, Err(ApiError::InvalidRefreshToken)),
        "expected InvalidRefreshToken, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_refresh_for_deleted_identity() {
    let identity = test_identity(student_id(), "student@example.com", true);
    let refresh = issue_refresh_token(identity.id, &identity.email, TEST_JWT_SECRET).unwrap();

    let usecase = RefreshTokenUseCase {
        identities: MockIdentityRepo::empty(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let result = usecase.execute(&refresh).await;

    assert!(
        matches!(result, Err(ApiError::InvalidRefreshToken)),
        "expected InvalidRefreshToken, got {result:?}"
    );
}
