//! Site settings service.

use chrono::Utc;
use cinema_common::AppResult;
use cinema_db::{entities::site_settings, repositories::SiteSettingsRepository};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Input for updating the site settings.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateSiteSettingsInput {
    #[validate(length(min = 1, max = 256))]
    pub site_name: Option<String>,

    #[validate(length(max = 4096))]
    pub description: Option<String>,

    #[validate(url)]
    pub logo_url: Option<String>,

    #[validate(url)]
    pub instagram_url: Option<String>,

    #[validate(url)]
    pub telegram_url: Option<String>,

    #[validate(url)]
    pub twitter_url: Option<String>,

    #[validate(email)]
    pub contact_email: Option<String>,

    #[validate(length(min = 3, max = 32))]
    pub contact_phone: Option<String>,
}

/// Site settings service for business logic.
#[derive(Clone)]
pub struct SiteSettingsService {
    repo: SiteSettingsRepository,
}

impl SiteSettingsService {
    /// Create a new site settings service.
    #[must_use]
    pub const fn new(repo: SiteSettingsRepository) -> Self {
        Self { repo }
    }

    /// Get the settings, creating the default row on first access.
    pub async fn get(&self) -> AppResult<site_settings::Model> {
        self.repo.get_or_create().await
    }

    /// Update the settings singleton.
    pub async fn update(
        &self,
        input: UpdateSiteSettingsInput,
    ) -> AppResult<site_settings::Model> {
        input.validate()?;

        let current = self.repo.get_or_create().await?;

        let mut model = site_settings::ActiveModel {
            id: Set(current.id),
            updated_at: Set(Some(Utc::now().into())),
            ..Default::default()
        };

        if let Some(site_name) = input.site_name {
            model.site_name = Set(site_name);
        }
        if let Some(description) = input.description {
            model.description = Set(description);
        }
        if let Some(logo_url) = input.logo_url {
            model.logo_url = Set(Some(logo_url));
        }
        if let Some(instagram_url) = input.instagram_url {
            model.instagram_url = Set(Some(instagram_url));
        }
        if let Some(telegram_url) = input.telegram_url {
            model.telegram_url = Set(Some(telegram_url));
        }
        if let Some(twitter_url) = input.twitter_url {
            model.twitter_url = Set(Some(twitter_url));
        }
        if let Some(contact_email) = input.contact_email {
            model.contact_email = Set(Some(contact_email));
        }
        if let Some(contact_phone) = input.contact_phone {
            model.contact_phone = Set(Some(contact_phone));
        }

        self.repo.update(model).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use cinema_db::test_utils::test_site_settings;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_get_returns_singleton() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_site_settings()]])
            .into_connection();
        let svc = SiteSettingsService::new(SiteSettingsRepository::new(Arc::new(db)));

        let settings = svc.get().await.unwrap();
        assert_eq!(settings.id, site_settings::SITE_SETTINGS_ID);
    }

    #[tokio::test]
    async fn test_update_sets_social_and_contact_fields() {
        let mut updated = test_site_settings();
        updated.telegram_url = Some("https://t.me/cinema".to_string());
        updated.contact_email = Some("hello@example.com".to_string());

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_site_settings()], [updated]])
            .into_connection();
        let svc = SiteSettingsService::new(SiteSettingsRepository::new(Arc::new(db)));

        let input = UpdateSiteSettingsInput {
            telegram_url: Some("https://t.me/cinema".to_string()),
            contact_email: Some("hello@example.com".to_string()),
            ..UpdateSiteSettingsInput::default()
        };
        let settings = svc.update(input).await.unwrap();
        assert_eq!(settings.telegram_url.as_deref(), Some("https://t.me/cinema"));
        assert_eq!(settings.contact_email.as_deref(), Some("hello@example.com"));
    }

    #[tokio::test]
    async fn test_update_rejects_bad_contact_email() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let svc = SiteSettingsService::new(SiteSettingsRepository::new(Arc::new(db)));

        let input = UpdateSiteSettingsInput {
            contact_email: Some("not-an-email".to_string()),
            ..UpdateSiteSettingsInput::default()
        };
        let result = svc.update(input).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_update_rejects_empty_name() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let svc = SiteSettingsService::new(SiteSettingsRepository::new(Arc::new(db)));

        let input = UpdateSiteSettingsInput {
            site_name: Some(String::new()),
            ..UpdateSiteSettingsInput::default()
        };
        let result = svc.update(input).await;
        assert!(result.is_err());
    }
}
