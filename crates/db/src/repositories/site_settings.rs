//! Site settings repository.

use std::sync::Arc;

use crate::entities::{SiteSettings, site_settings, site_settings::SITE_SETTINGS_ID};
use cinema_common::{AppError, AppResult};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

/// Repository for the site-wide settings singleton.
#[derive(Clone)]
pub struct SiteSettingsRepository {
    db: Arc<DatabaseConnection>,
}

impl SiteSettingsRepository {
    /// Create a new site settings repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Get the settings row, creating the default if it does not exist.
    pub async fn get_or_create(&self) -> AppResult<site_settings::Model> {
        if let Some(settings) = self.find().await? {
            return Ok(settings);
        }

        let model = site_settings::ActiveModel {
            id: Set(SITE_SETTINGS_ID.to_string()),
            site_name: Set("cinema".to_string()),
            description: Set(String::new()),
            logo_url: Set(None),
            instagram_url: Set(None),
            telegram_url: Set(None),
            twitter_url: Set(None),
            contact_email: Set(None),
            contact_phone: Set(None),
            updated_at: Set(None),
        };

        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find the settings row.
    pub async fn find(&self) -> AppResult<Option<site_settings::Model>> {
        SiteSettings::find()
            .filter(site_settings::Column::Id.eq(SITE_SETTINGS_ID))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update the settings row.
    pub async fn update(
        &self,
        model: site_settings::ActiveModel,
    ) -> AppResult<site_settings::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::test_site_settings;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_get_or_create_returns_existing() {
        let settings = test_site_settings();

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[settings.clone()]])
                .into_connection(),
        );

        let repo = SiteSettingsRepository::new(db);
        let result = repo.get_or_create().await.unwrap();

        assert_eq!(result.id, SITE_SETTINGS_ID);
        assert_eq!(result.site_name, "cinema");
    }

    #[tokio::test]
    async fn test_find_missing() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<site_settings::Model>::new()])
                .into_connection(),
        );

        let repo = SiteSettingsRepository::new(db);
        let result = repo.find().await.unwrap();

        assert!(result.is_none());
    }
}
