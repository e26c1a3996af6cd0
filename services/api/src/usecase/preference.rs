use uuid::Uuid;

use crate::domain::repository::PreferenceRepository;
use crate::domain::types::Theme;
use crate::error::ApiError;

pub struct GetPreferenceUseCase<P: PreferenceRepository> {
    pub preferences: P,
}

impl<P: PreferenceRepository> GetPreferenceUseCase<P> {
    /// Identities without a stored preference default to the system theme.
    pub async fn execute(&self, identity_id: Uuid) -> Result<Theme, ApiError> {
        Ok(self
            .preferences
            .get(identity_id)
            .await?
            .unwrap_or_default())
    }
}

pub struct SetPreferenceUseCase<P: PreferenceRepository> {
    pub preferences: P,
}

impl<P: PreferenceRepository> SetPreferenceUseCase<P> {
    pub async fn execute(&self, identity_id: Uuid, theme: Theme) -> Result<(), ApiError> {
        self.preferences.set(identity_id, theme).await
    }
}
