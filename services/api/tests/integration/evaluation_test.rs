use chrono::Utc;
use uuid::Uuid;

use grading_api::domain::types::{Evaluation, EvaluationStatus};
use grading_api::error::ApiError;
use grading_api::usecase::evaluation::{
    CheckEvaluationUseCase, CreateEvaluationInput, CreateEvaluationUseCase, GetEvaluationUseCase,
    ListEvaluationsUseCase, UpdateEvaluationInput, UpdateEvaluationUseCase,
};
use grading_domain::pagination::PageRequest;
use grading_domain::role::Role;

use crate::helpers::{
    MockCourseRepo, MockEvaluationRepo, MockSubmissionRepo, MockUnitRepo, active_ctx, admin_id,
    course_id, other_teacher_id, student_id, teacher_id, test_course, test_unit, unit_id,
};
use grading_api::domain::repository::EvaluationFilter;

fn test_evaluation(teacher: Uuid, student: Uuid, status: EvaluationStatus) -> Evaluation {
    Evaluation {
        id: Uuid::new_v4(),
        student_id: student,
        teacher_id: teacher,
        unit_id: unit_id(),
        submission_id: None,
        status,
        score: 70,
        feedback: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn assigned_courses() -> MockCourseRepo {
    MockCourseRepo::new(vec![test_course()]).with_teacher(course_id(), teacher_id())
}

// ── CreateEvaluation ─────────────────────────────────────────────────────────

#[tokio::test]
async fn should_create_draft_evaluation_for_assigned_teacher() {
    let usecase = CreateEvaluationUseCase {
        evaluations: MockEvaluationRepo::empty(),
        units: MockUnitRepo::new(vec![test_unit()]),
        courses: assigned_courses(),
    };

    let evaluation = usecase
        .execute(
            &active_ctx(teacher_id(), Role::Teacher),
            CreateEvaluationInput {
                student_id: student_id(),
                unit_id: unit_id(),
                score: Some(85),
                feedback: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(evaluation.teacher_id, teacher_id());
    assert_eq!(evaluation.student_id, student_id());
    assert_eq!(evaluation.status, EvaluationStatus::Draft);
    assert_eq!(evaluation.score, 85);
}

#[tokio::test]
async fn should_reject_creation_in_unassigned_course_with_403() {
    let usecase = CreateEvaluationUseCase {
        evaluations: MockEvaluationRepo::empty(),
        units: MockUnitRepo::new(vec![test_unit()]),
        // No teacher link rows at all.
        courses: MockCourseRepo::new(vec![test_course()]),
    };

    let result = usecase
        .execute(
            &active_ctx(teacher_id(), Role::Teacher),
            CreateEvaluationInput {
                student_id: student_id(),
                unit_id: unit_id(),
                score: None,
                feedback: None,
            },
        )
        .await;

    assert!(
        matches!(result, Err(ApiError::Forbidden)),
        "expected Forbidden, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_duplicate_student_unit_pair_with_409() {
    let existing = test_evaluation(teacher_id(), student_id(), EvaluationStatus::Draft);
    let usecase = CreateEvaluationUseCase {
        evaluations: MockEvaluationRepo::new(vec![existing]),
        units: MockUnitRepo::new(vec![test_unit()]),
        courses: assigned_courses(),
    };

    let result = usecase
        .execute(
            &active_ctx(teacher_id(), Role::Teacher),
            CreateEvaluationInput {
                student_id: student_id(),
                unit_id: unit_id(),
                score: None,
                feedback: None,
            },
        )
        .await;

    assert!(
        matches!(result, Err(ApiError::EvaluationExists)),
        "expected EvaluationExists, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_student_creating_evaluation() {
    let usecase = CreateEvaluationUseCase {
        evaluations: MockEvaluationRepo::empty(),
        units: MockUnitRepo::new(vec![test_unit()]),
        courses: MockCourseRepo::new(vec![test_course()]).with_student(course_id(), student_id()),
    };

    let result = usecase
        .execute(
            &active_ctx(student_id(), Role::Student),
            CreateEvaluationInput {
                student_id: student_id(),
                unit_id: unit_id(),
                score: None,
                feedback: None,
            },
        )
        .await;

    assert!(
        matches!(result, Err(ApiError::Forbidden)),
        "expected Forbidden, got {result:?}"
    );
}

// ── UpdateEvaluation ─────────────────────────────────────────────────────────

#[tokio::test]
async fn should_reject_foreign_teacher_mutation_with_403() {
    let evaluation = test_evaluation(other_teacher_id(), student_id(), EvaluationStatus::Draft);
    let evaluation_id = evaluation.id;
    let usecase = UpdateEvaluationUseCase {
        evaluations: MockEvaluationRepo::new(vec![evaluation]),
        units: MockUnitRepo::new(vec![test_unit()]),
        // Both teachers are assigned to the course; ownership still wins.
        courses: assigned_courses().with_teacher(course_id(), other_teacher_id()),
        submissions: MockSubmissionRepo::empty(),
    };

    let result = usecase
        .execute(
            &active_ctx(teacher_id(), Role::Teacher),
            evaluation_id,
            UpdateEvaluationInput {
                status: None,
                score: Some(0),
                feedback: None,
                submission_id: None,
            },
        )
        .await;

    assert!(
        matches!(result, Err(ApiError::Forbidden)),
        "expected Forbidden, got {result:?}"
    );
}

#[tokio::test]
async fn should_allow_admin_to_mutate_any_evaluation() {
    let evaluation = test_evaluation(teacher_id(), student_id(), EvaluationStatus::Draft);
    let evaluation_id = evaluation.id;
    let usecase = UpdateEvaluationUseCase {
        evaluations: MockEvaluationRepo::new(vec![evaluation]),
        units: MockUnitRepo::new(vec![test_unit()]),
        courses: assigned_courses(),
        submissions: MockSubmissionRepo::empty(),
    };

    let updated = usecase
        .execute(
            &active_ctx(admin_id(), Role::Admin),
            evaluation_id,
            UpdateEvaluationInput {
                status: Some(EvaluationStatus::Submitted),
                score: Some(92),
                feedback: Some("good".to_owned()),
                submission_id: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.status, EvaluationStatus::Submitted);
    assert_eq!(updated.score, 92);
}

#[tokio::test]
async fn should_enforce_forward_only_status_transitions() {
    let evaluation = test_evaluation(teacher_id(), student_id(), EvaluationStatus::Draft);
    let evaluation_id = evaluation.id;
    let usecase = UpdateEvaluationUseCase {
        evaluations: MockEvaluationRepo::new(vec![evaluation]),
        units: MockUnitRepo::new(vec![test_unit()]),
        courses: assigned_courses(),
        submissions: MockSubmissionRepo::empty(),
    };

    // Draft cannot jump straight to confirmed.
    let result = usecase
        .execute(
            &active_ctx(teacher_id(), Role::Teacher),
            evaluation_id,
            UpdateEvaluationInput {
                status: Some(EvaluationStatus::Confirmed),
                score: None,
                feedback: None,
                submission_id: None,
            },
        )
        .await;

    assert!(
        matches!(result, Err(ApiError::InvalidStatusTransition)),
        "expected InvalidStatusTransition, got {result:?}"
    );
}

#[tokio::test]
async fn should_treat_confirmed_evaluation_as_immutable() {
    let evaluation = test_evaluation(teacher_id(), student_id(), EvaluationStatus::Confirmed);
    let evaluation_id = evaluation.id;
    let usecase = UpdateEvaluationUseCase {
        evaluations: MockEvaluationRepo::new(vec![evaluation]),
        units: MockUnitRepo::new(vec![test_unit()]),
        courses: assigned_courses(),
        submissions: MockSubmissionRepo::empty(),
    };

    let result = usecase
        .execute(
            &active_ctx(teacher_id(), Role::Teacher),
            evaluation_id,
            UpdateEvaluationInput {
                status: None,
                score: Some(100),
                feedback: None,
                submission_id: None,
            },
        )
        .await;

    assert!(
        matches!(result, Err(ApiError::InvalidStatusTransition)),
        "expected InvalidStatusTransition, got {result:?}"
    );
}

// ── GetEvaluation ────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_let_student_read_own_evaluation_only() {
    let own = test_evaluation(teacher_id(), student_id(), EvaluationStatus::Submitted);
    let foreign = test_evaluation(teacher_id(), other_teacher_id(), EvaluationStatus::Submitted);
    let own_id = own.id;
    let foreign_id = foreign.id;

    let usecase = GetEvaluationUseCase {
        evaluations: MockEvaluationRepo::new(vec![own, foreign]),
        units: MockUnitRepo::new(vec![test_unit()]),
        courses: MockCourseRepo::new(vec![test_course()]),
    };
    let ctx = active_ctx(student_id(), Role::Student);

    let read = usecase.execute(&ctx, own_id).await.unwrap();
    assert_eq!(read.student_id, student_id());

    // Rows outside the caller's scope read as absent, not forbidden.
    let result = usecase.execute(&ctx, foreign_id).await;
    assert!(
        matches!(result, Err(ApiError::EvaluationNotFound)),
        "expected EvaluationNotFound, got {result:?}"
    );
}

#[tokio::test]
async fn should_let_owner_teacher_read_without_course_link() {
    let own = test_evaluation(teacher_id(), student_id(), EvaluationStatus::Draft);
    let own_id = own.id;

    let usecase = GetEvaluationUseCase {
        evaluations: MockEvaluationRepo::new(vec![own]),
        units: MockUnitRepo::new(vec![test_unit()]),
        // Assignment was removed after the evaluation was written.
        courses: MockCourseRepo::new(vec![test_course()]),
    };

    let read = usecase
        .execute(&active_ctx(teacher_id(), Role::Teacher), own_id)
        .await
        .unwrap();
    assert_eq!(read.teacher_id, teacher_id());
}

// ── ListEvaluations ──────────────────────────────────────────────────────────

#[tokio::test]
async fn should_pin_non_admin_listing_to_own_rows() {
    let evaluations = vec![
        test_evaluation(teacher_id(), student_id(), EvaluationStatus::Draft),
        test_evaluation(other_teacher_id(), admin_id(), EvaluationStatus::Draft),
    ];
    let usecase = ListEvaluationsUseCase {
        evaluations: MockEvaluationRepo::new(evaluations),
    };

    // A teacher asking for another teacher's rows still gets their own.
    let listed = usecase
        .execute(
            &active_ctx(teacher_id(), Role::Teacher),
            EvaluationFilter {
                teacher_id: Some(other_teacher_id()),
                ..Default::default()
            },
            PageRequest::default(),
        )
        .await
        .unwrap();

    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].teacher_id, teacher_id());
}

// ── CheckEvaluation ──────────────────────────────────────────────────────────

#[tokio::test]
async fn should_report_existing_pair_via_check() {
    let evaluation = test_evaluation(teacher_id(), student_id(), EvaluationStatus::Draft);
    let usecase = CheckEvaluationUseCase {
        evaluations: MockEvaluationRepo::new(vec![evaluation]),
    };
    let ctx = active_ctx(teacher_id(), Role::Teacher);

    assert!(usecase.execute(&ctx, student_id(), unit_id()).await.unwrap());
    assert!(
        !usecase
            .execute(&ctx, other_teacher_id(), unit_id())
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn should_forbid_student_probing_another_students_pair() {
    let usecase = CheckEvaluationUseCase {
        evaluations: MockEvaluationRepo::empty(),
    };
    let result = usecase
        .execute(
            &active_ctx(student_id(), Role::Student),
            other_teacher_id(),
            unit_id(),
        )
        .await;
    assert!(
        matches!(result, Err(ApiError::Forbidden)),
        "expected Forbidden, got {result:?}"
    );
}
