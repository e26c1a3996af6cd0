use sea_orm::DatabaseConnection;

use grading_auth_types::session::JwtSecretProvider;

use crate::infra::db::{
    DbAuthCodeRepository, DbCompetencyElementRepository, DbCompetencyUnitRepository,
    DbCourseRepository, DbEvaluationRepository, DbIdentityRepository, DbPreferenceRepository,
    DbProfileRepository, DbScheduleRepository, DbSubmissionRepository,
};
use crate::infra::storage::FsObjectStore;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub jwt_secret: String,
    pub cookie_domain: String,
    pub public_base_url: String,
    pub store: FsObjectStore,
}

impl AppState {
    pub fn identity_repo(&self) -> DbIdentityRepository {
        DbIdentityRepository {
            db: self.db.clone(),
        }
    }

    pub fn profile_repo(&self) -> DbProfileRepository {
        DbProfileRepository {
            db: self.db.clone(),
        }
    }

    pub fn auth_code_repo(&self) -> DbAuthCodeRepository {
        DbAuthCodeRepository {
            db: self.db.clone(),
        }
    }

    pub fn course_repo(&self) -> DbCourseRepository {
        DbCourseRepository {
            db: self.db.clone(),
        }
    }

    pub fn unit_repo(&self) -> DbCompetencyUnitRepository {
        DbCompetencyUnitRepository {
            db: self.db.clone(),
        }
    }

    pub fn element_repo(&self) -> DbCompetencyElementRepository {
        DbCompetencyElementRepository {
            db: self.db.clone(),
        }
    }

    pub fn schedule_repo(&self) -> DbScheduleRepository {
        DbScheduleRepository {
            db: self.db.clone(),
        }
    }

    pub fn evaluation_repo(&self) -> DbEvaluationRepository {
        DbEvaluationRepository {
            db: self.db.clone(),
        }
    }

    pub fn submission_repo(&self) -> DbSubmissionRepository {
        DbSubmissionRepository {
            db: self.db.clone(),
        }
    }

    pub fn preference_repo(&self) -> DbPreferenceRepository {
        DbPreferenceRepository {
            db: self.db.clone(),
        }
    }

    pub fn object_store(&self) -> FsObjectStore {
        self.store.clone()
    }
}

impl JwtSecretProvider for AppState {
    fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }
}
