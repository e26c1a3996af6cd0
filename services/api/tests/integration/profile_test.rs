use grading_api::error::ApiError;
use grading_api::usecase::profile::{
    CheckEmailUseCase, CreateProfileInput, CreateProfileUseCase, LoadProfileUseCase,
    SetApprovalUseCase, UpdateMeInput, UpdateMeUseCase,
};
use grading_api::usecase::signup::{SignupInput, SignupUseCase};
use grading_api::usecase::verify_email::{VerifyEmailInput, VerifyEmailUseCase};
use grading_domain::role::Role;

use crate::helpers::{
    MockAuthCodeRepo, MockIdentityRepo, MockProfileRepo, student_id, teacher_id, test_auth_code,
    test_identity, test_profile,
};
use grading_api::domain::types::AuthCodeKind;

fn create_input(role: Role) -> CreateProfileInput {
    CreateProfileInput {
        full_name: "Kim Jiwoo".to_owned(),
        phone: Some("010-1234-5678".to_owned()),
        role,
    }
}

// ── CreateProfile ────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_reject_self_service_admin_profile_with_403() {
    let identity = test_identity(student_id(), "student@example.com", true);
    let usecase = CreateProfileUseCase {
        profiles: MockProfileRepo::empty(),
    };

    let result = usecase.execute(&identity, create_input(Role::Admin)).await;

    assert!(
        matches!(result, Err(ApiError::AdminRoleReserved)),
        "expected AdminRoleReserved, got {result:?}"
    );
}

#[tokio::test]
async fn should_create_profile_unapproved_by_default() {
    let identity = test_identity(student_id(), "student@example.com", true);
    let usecase = CreateProfileUseCase {
        profiles: MockProfileRepo::empty(),
    };

    let (profile, created) = usecase
        .execute(&identity, create_input(Role::Student))
        .await
        .unwrap();

    assert!(created);
    assert_eq!(profile.id, identity.id);
    assert_eq!(profile.email, identity.email);
    assert_eq!(profile.role, Role::Student);
    assert!(!profile.approved, "self-service profiles start unapproved");
}

#[tokio::test]
async fn should_return_existing_profile_unchanged_on_second_create() {
    let identity = test_identity(student_id(), "student@example.com", true);
    let repo = MockProfileRepo::empty();
    let profiles_handle = repo.profiles_handle();
    let usecase = CreateProfileUseCase { profiles: repo };

    let (first, created_first) = usecase
        .execute(&identity, create_input(Role::Student))
        .await
        .unwrap();
    assert!(created_first);

    let mut second_input = create_input(Role::Teacher);
    second_input.full_name = "Someone Else".to_owned();
    let (second, created_second) = usecase.execute(&identity, second_input).await.unwrap();

    assert!(!created_second);
    assert_eq!(second.id, first.id);
    assert_eq!(second.full_name, first.full_name);
    assert_eq!(second.role, first.role);
    assert_eq!(
        profiles_handle.lock().unwrap().len(),
        1,
        "second call must not create another row"
    );
}

// ── CheckEmail ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_report_email_existence() {
    let identity = test_identity(student_id(), "student@example.com", true);
    let usecase = CheckEmailUseCase {
        identities: MockIdentityRepo::new(vec![identity]),
    };

    assert!(usecase.execute("student@example.com").await.unwrap());
    assert!(!usecase.execute("nobody@example.com").await.unwrap());
}

#[tokio::test]
async fn should_reject_malformed_email() {
    let usecase = CheckEmailUseCase {
        identities: MockIdentityRepo::empty(),
    };
    let result = usecase.execute("").await;
    assert!(
        matches!(result, Err(ApiError::InvalidEmail)),
        "expected InvalidEmail, got {result:?}"
    );
}

// ── LoadProfile (fail-open) ──────────────────────────────────────────────────

#[tokio::test]
async fn should_fail_open_to_none_when_profile_repo_errors() {
    let usecase = LoadProfileUseCase {
        profiles: MockProfileRepo::failing(),
    };
    assert!(usecase.execute(student_id()).await.is_none());
}

#[tokio::test]
async fn should_return_none_for_missing_profile_row() {
    let usecase = LoadProfileUseCase {
        profiles: MockProfileRepo::empty(),
    };
    assert!(usecase.execute(student_id()).await.is_none());
}

// ── UpdateMe ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_reject_empty_profile_update() {
    let usecase = UpdateMeUseCase {
        profiles: MockProfileRepo::new(vec![test_profile(student_id(), Role::Student, true)]),
    };
    let result = usecase
        .execute(
            student_id(),
            UpdateMeInput {
                full_name: None,
                phone: None,
            },
        )
        .await;
    assert!(
        matches!(result, Err(ApiError::MissingData)),
        "expected MissingData, got {result:?}"
    );
}

#[tokio::test]
async fn should_update_contact_fields_only() {
    let repo = MockProfileRepo::new(vec![test_profile(student_id(), Role::Student, true)]);
    let profiles_handle = repo.profiles_handle();
    let usecase = UpdateMeUseCase { profiles: repo };

    usecase
        .execute(
            student_id(),
            UpdateMeInput {
                full_name: Some("New Name".to_owned()),
                phone: None,
            },
        )
        .await
        .unwrap();

    let profiles = profiles_handle.lock().unwrap();
    let profile = profiles.iter().find(|p| p.id == student_id()).unwrap();
    assert_eq!(profile.full_name, "New Name");
    assert_eq!(profile.role, Role::Student);
    assert!(profile.approved, "update_me must not touch approval");
}

// ── SetApproval ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_toggle_approval() {
    let repo = MockProfileRepo::new(vec![test_profile(teacher_id(), Role::Teacher, false)]);
    let profiles_handle = repo.profiles_handle();
    let usecase = SetApprovalUseCase { profiles: repo };

    usecase.execute(teacher_id(), true).await.unwrap();

    let profiles = profiles_handle.lock().unwrap();
    assert!(profiles.iter().find(|p| p.id == teacher_id()).unwrap().approved);
}

#[tokio::test]
async fn should_return_not_found_for_approval_of_missing_profile() {
    let usecase = SetApprovalUseCase {
        profiles: MockProfileRepo::empty(),
    };
    let result = usecase.execute(teacher_id(), true).await;
    assert!(
        matches!(result, Err(ApiError::ProfileNotFound)),
        "expected ProfileNotFound, got {result:?}"
    );
}

// ── Signup + VerifyEmail ─────────────────────────────────────────────────────

#[tokio::test]
async fn should_signup_then_confirm_email_with_code() {
    let identities = MockIdentityRepo::empty();
    let identities_handle = std::sync::Arc::clone(&identities.identities);
    let auth_codes = MockAuthCodeRepo::empty();
    let codes_handle = auth_codes.codes_handle();

    let signup = SignupUseCase {
        identities,
        auth_codes,
    };
    let identity = signup
        .execute(SignupInput {
            email: "new@example.com".to_owned(),
        })
        .await
        .unwrap();
    assert!(identity.email_confirmed_at.is_none());

    let code = codes_handle.lock().unwrap().first().unwrap().clone();
    assert_eq!(code.kind, AuthCodeKind::SignupConfirm);

    let verify = VerifyEmailUseCase {
        identities: MockIdentityRepo {
            identities: std::sync::Arc::clone(&identities_handle),
            fail: false,
        },
        auth_codes: MockAuthCodeRepo {
            codes: std::sync::Arc::clone(&codes_handle),
            active_count: 1,
        },
    };
    verify
        .execute(identity.id, VerifyEmailInput { code: code.code })
        .await
        .unwrap();

    let identities = identities_handle.lock().unwrap();
    assert!(
        identities
            .iter()
            .find(|i| i.id == identity.id)
            .unwrap()
            .email_confirmed_at
            .is_some()
    );
}

#[tokio::test]
async fn should_reject_duplicate_signup_email() {
    let identity = test_identity(student_id(), "taken@example.com", true);
    let usecase = SignupUseCase {
        identities: MockIdentityRepo::new(vec![identity]),
        auth_codes: MockAuthCodeRepo::empty(),
    };
    let result = usecase
        .execute(SignupInput {
            email: "taken@example.com".to_owned(),
        })
        .await;
    assert!(
        matches!(result, Err(ApiError::EmailTaken)),
        "expected EmailTaken, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_expired_confirm_code() {
    let identity = test_identity(student_id(), "new@example.com", false);
    let mut code = test_auth_code(identity.id, AuthCodeKind::SignupConfirm);
    code.expires_at = chrono::Utc::now() - chrono::Duration::seconds(1);
    let code_str = code.code.clone();

    let usecase = VerifyEmailUseCase {
        identities: MockIdentityRepo::new(vec![identity.clone()]),
        auth_codes: MockAuthCodeRepo::new(vec![code], 1),
    };
    let result = usecase
        .execute(identity.id, VerifyEmailInput { code: code_str })
        .await;
    assert!(
        matches!(result, Err(ApiError::InvalidAuthcode)),
        "expected InvalidAuthcode, got {result:?}"
    );
}
