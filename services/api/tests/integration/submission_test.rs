use grading_api::domain::types::{MAX_UPLOAD_BYTES, ScheduleStatus};
use grading_api::error::ApiError;
use grading_api::infra::storage::sign_object_key;
use grading_api::usecase::submission::{
    ListSubmissionsUseCase, ServeFileUseCase, UploadSubmissionInput, UploadSubmissionUseCase,
};
use grading_domain::pagination::PageRequest;
use grading_domain::role::Role;

use crate::helpers::{
    MemoryObjectStore, MockScheduleRepo, MockSubmissionRepo, TEST_JWT_SECRET, active_ctx,
    other_teacher_id, schedule_id, student_id, teacher_id, test_schedule,
};

fn upload_usecase(
    status: ScheduleStatus,
) -> UploadSubmissionUseCase<MockSubmissionRepo, MockScheduleRepo, MemoryObjectStore> {
    UploadSubmissionUseCase {
        submissions: MockSubmissionRepo::empty(),
        schedules: MockScheduleRepo::new(vec![test_schedule(status)]),
        store: MemoryObjectStore::new(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
        public_base_url: "http://localhost:3115".to_owned(),
    }
}

fn upload_input(size: usize, content_type: &str) -> UploadSubmissionInput {
    UploadSubmissionInput {
        schedule_id: schedule_id(),
        filename: Some("evidence.png".to_owned()),
        content_type: content_type.to_owned(),
        bytes: vec![0u8; size],
    }
}

// ── Upload validation ────────────────────────────────────────────────────────

#[tokio::test]
async fn should_accept_upload_of_exactly_five_mebibytes() {
    let usecase = upload_usecase(ScheduleStatus::Open);
    let out = usecase
        .execute(
            &active_ctx(student_id(), Role::Student),
            upload_input(MAX_UPLOAD_BYTES, "image/png"),
        )
        .await
        .unwrap();

    assert_eq!(out.submission.size as usize, MAX_UPLOAD_BYTES);
    assert!(out.submission.object_key.starts_with(&student_id().to_string()));
    assert!(out.submission.object_key.ends_with(".png"));
    assert!(out.url.contains("/files/"));
    assert!(out.url.contains("token="));
}

#[tokio::test]
async fn should_reject_upload_one_byte_over_the_cap_with_400() {
    let usecase = upload_usecase(ScheduleStatus::Open);
    let result = usecase
        .execute(
            &active_ctx(student_id(), Role::Student),
            upload_input(MAX_UPLOAD_BYTES + 1, "image/png"),
        )
        .await;

    assert!(
        matches!(result, Err(ApiError::FileTooLarge)),
        "expected FileTooLarge, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_non_image_content_type_with_400() {
    let usecase = upload_usecase(ScheduleStatus::Open);
    let result = usecase
        .execute(
            &active_ctx(student_id(), Role::Student),
            upload_input(16, "application/pdf"),
        )
        .await;

    assert!(
        matches!(result, Err(ApiError::UnsupportedFileType)),
        "expected UnsupportedFileType, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_upload_to_closed_schedule() {
    let usecase = upload_usecase(ScheduleStatus::Closed);
    let result = usecase
        .execute(
            &active_ctx(student_id(), Role::Student),
            upload_input(16, "image/png"),
        )
        .await;

    assert!(
        matches!(result, Err(ApiError::Forbidden)),
        "expected Forbidden, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_teacher_upload() {
    let usecase = upload_usecase(ScheduleStatus::Open);
    let result = usecase
        .execute(
            &active_ctx(teacher_id(), Role::Teacher),
            upload_input(16, "image/png"),
        )
        .await;

    assert!(
        matches!(result, Err(ApiError::Forbidden)),
        "expected Forbidden, got {result:?}"
    );
}

#[tokio::test]
async fn should_store_object_before_recording_submission() {
    let usecase = upload_usecase(ScheduleStatus::Open);
    let store = usecase.store.clone();
    let submissions_handle = usecase.submissions.submissions_handle();

    let out = usecase
        .execute(
            &active_ctx(student_id(), Role::Student),
            upload_input(16, "image/png"),
        )
        .await
        .unwrap();

    let objects = store.objects.lock().unwrap();
    assert!(objects.contains_key(&out.submission.object_key));
    assert_eq!(submissions_handle.lock().unwrap().len(), 1);
}

// ── Listing ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_scope_student_listing_to_own_submissions() {
    let usecase = upload_usecase(ScheduleStatus::Open);
    usecase
        .execute(
            &active_ctx(student_id(), Role::Student),
            upload_input(16, "image/png"),
        )
        .await
        .unwrap();

    let list_usecase = ListSubmissionsUseCase {
        submissions: MockSubmissionRepo {
            submissions: usecase.submissions.submissions_handle(),
        },
    };

    let own = list_usecase
        .execute(
            &active_ctx(student_id(), Role::Student),
            None,
            PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(own.len(), 1);

    // A student cannot list someone else's submissions.
    let result = list_usecase
        .execute(
            &active_ctx(student_id(), Role::Student),
            Some(other_teacher_id()),
            PageRequest::default(),
        )
        .await;
    assert!(
        matches!(result, Err(ApiError::Forbidden)),
        "expected Forbidden, got {result:?}"
    );
}

// ── Signed URL serving ───────────────────────────────────────────────────────

#[tokio::test]
async fn should_serve_file_for_valid_token_and_reject_tampered_key() {
    let upload = upload_usecase(ScheduleStatus::Open);
    let out = upload
        .execute(
            &active_ctx(student_id(), Role::Student),
            upload_input(16, "image/png"),
        )
        .await
        .unwrap();

    let serve = ServeFileUseCase {
        submissions: MockSubmissionRepo {
            submissions: upload.submissions.submissions_handle(),
        },
        store: upload.store.clone(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let token = sign_object_key(&out.submission.object_key, TEST_JWT_SECRET).unwrap();
    let (bytes, content_type) = serve
        .execute(&out.submission.object_key, &token)
        .await
        .unwrap();
    assert_eq!(bytes.len(), 16);
    assert_eq!(content_type, "image/png");

    // Same token, different key: rejected.
    let result = serve.execute("someone-else/1.png", &token).await;
    assert!(
        matches!(result, Err(ApiError::Forbidden)),
        "expected Forbidden, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_garbage_token() {
    let serve = ServeFileUseCase {
        submissions: MockSubmissionRepo::empty(),
        store: MemoryObjectStore::new(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };
    let result = serve.execute("a/b.png", "garbage").await;
    assert!(
        matches!(result, Err(ApiError::Forbidden)),
        "expected Forbidden, got {result:?}"
    );
}
