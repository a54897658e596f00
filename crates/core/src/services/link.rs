//! Download link service.

use chrono::Utc;
use cinema_common::{AppError, AppResult, IdGenerator};
use cinema_db::{
    entities::{language, link},
    repositories::{FilmRepository, LanguageRepository, LinkQuery, LinkRepository},
};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A link with its audio languages resolved.
#[derive(Debug, Clone, Serialize)]
pub struct LinkWithLanguages {
    #[serde(flatten)]
    pub link: link::Model,
    pub languages: Vec<language::Model>,
}

/// Input for adding a download link to a film.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkInput {
    #[validate(url)]
    pub url: String,

    /// File size in megabytes.
    #[validate(range(min = 1))]
    pub size: i32,

    #[serde(default)]
    pub subtitle: Option<link::Subtitle>,

    #[serde(default)]
    pub quality: Option<link::Quality>,

    #[validate(range(min = 1))]
    pub season: Option<i16>,

    #[validate(range(min = 1))]
    pub episode: Option<i16>,

    #[serde(default)]
    pub language_ids: Vec<String>,
}

/// Input for updating a link. Absent fields are left untouched.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateLinkInput {
    #[validate(url)]
    pub url: Option<String>,

    #[validate(range(min = 1))]
    pub size: Option<i32>,

    pub subtitle: Option<link::Subtitle>,
    pub quality: Option<link::Quality>,

    #[validate(range(min = 1))]
    pub season: Option<i16>,

    #[validate(range(min = 1))]
    pub episode: Option<i16>,

    pub language_ids: Option<Vec<String>>,
}

/// Download link service for business logic.
#[derive(Clone)]
pub struct LinkService {
    link_repo: LinkRepository,
    film_repo: FilmRepository,
    language_repo: LanguageRepository,
    id_gen: IdGenerator,
}

impl LinkService {
    /// Create a new link service.
    #[must_use]
    pub fn new(
        link_repo: LinkRepository,
        film_repo: FilmRepository,
        language_repo: LanguageRepository,
    ) -> Self {
        Self {
            link_repo,
            film_repo,
            language_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Add a download link to a film.
    pub async fn create(&self, film_id: &str, input: CreateLinkInput) -> AppResult<link::Model> {
        input.validate()?;

        let film = self.film_repo.get_by_id(film_id).await?;
        if !film.is_serial && (input.season.is_some() || input.episode.is_some()) {
            return Err(AppError::invalid(
                "season",
                "season and episode only apply to serials",
            ));
        }

        let model = link::ActiveModel {
            id: Set(self.id_gen.generate()),
            url: Set(input.url),
            size: Set(input.size),
            subtitle: Set(input.subtitle.unwrap_or(link::Subtitle::None)),
            quality: Set(input.quality.unwrap_or(link::Quality::Q720p)),
            season: Set(input.season),
            episode: Set(input.episode),
            film_id: Set(film_id.to_string()),
            created_at: Set(Utc::now().into()),
        };

        let link = self.link_repo.create(model).await?;
        self.link_repo
            .replace_languages(&link.id, &input.language_ids)
            .await?;
        Ok(link)
    }

    /// Update a link.
    pub async fn update(&self, id: &str, input: UpdateLinkInput) -> AppResult<link::Model> {
        input.validate()?;

        let existing = self.link_repo.get_by_id(id).await?;

        let mut model = link::ActiveModel {
            id: Set(existing.id.clone()),
            ..Default::default()
        };

        if let Some(url) = input.url {
            model.url = Set(url);
        }
        if let Some(size) = input.size {
            model.size = Set(size);
        }
        if let Some(subtitle) = input.subtitle {
            model.subtitle = Set(subtitle);
        }
        if let Some(quality) = input.quality {
            model.quality = Set(quality);
        }
        if let Some(season) = input.season {
            model.season = Set(Some(season));
        }
        if let Some(episode) = input.episode {
            model.episode = Set(Some(episode));
        }

        let updated = self.link_repo.update(model).await?;

        if let Some(language_ids) = input.language_ids {
            self.link_repo.replace_languages(id, &language_ids).await?;
        }

        Ok(updated)
    }

    /// Delete a link.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.link_repo.get_by_id(id).await?;
        self.link_repo.delete(id).await
    }

    /// Get a link with its languages.
    pub async fn get(&self, id: &str) -> AppResult<LinkWithLanguages> {
        let link = self.link_repo.get_by_id(id).await?;
        let languages = self
            .language_repo
            .find_by_ids(&self.link_repo.language_ids(id).await?)
            .await?;
        Ok(LinkWithLanguages { link, languages })
    }

    /// Flat filtered listing across all films (staff operation).
    pub async fn list(
        &self,
        query: &LinkQuery,
        limit: u64,
        offset: u64,
    ) -> AppResult<(Vec<link::Model>, u64)> {
        let links = self.link_repo.list(query, limit, offset).await?;
        let total = self.link_repo.count(query).await?;
        Ok((links, total))
    }

    /// Links of a film with their languages.
    pub async fn list_for_film(&self, film_id: &str) -> AppResult<Vec<LinkWithLanguages>> {
        self.film_repo.get_by_id(film_id).await?;

        let links = self.link_repo.find_by_film(film_id).await?;
        let mut result = Vec::with_capacity(links.len());
        for link in links {
            let languages = self
                .language_repo
                .find_by_ids(&self.link_repo.language_ids(&link.id).await?)
                .await?;
            result.push(LinkWithLanguages { link, languages });
        }
        Ok(result)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use cinema_db::test_utils::{test_film, test_link};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn service(
        link_db: sea_orm::DatabaseConnection,
        film_db: sea_orm::DatabaseConnection,
    ) -> LinkService {
        LinkService::new(
            LinkRepository::new(Arc::new(link_db)),
            FilmRepository::new(Arc::new(film_db)),
            LanguageRepository::new(Arc::new(
                MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
            )),
        )
    }

    fn empty() -> sea_orm::DatabaseConnection {
        MockDatabase::new(DatabaseBackend::Postgres).into_connection()
    }

    fn create_input() -> CreateLinkInput {
        CreateLinkInput {
            url: "https://cdn.example.com/heat.mkv".to_string(),
            size: 1400,
            subtitle: None,
            quality: None,
            season: None,
            episode: None,
            language_ids: vec![],
        }
    }

    #[tokio::test]
    async fn test_create_episode_on_feature_film_fails() {
        let film_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_film("f1", "Heat")]])
            .into_connection();
        let svc = service(empty(), film_db);

        let mut input = create_input();
        input.season = Some(1);
        input.episode = Some(3);

        let result = svc.create("f1", input).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_invalid_url() {
        let svc = service(empty(), empty());

        let mut input = create_input();
        input.url = "not a url".to_string();

        let result = svc.create("f1", input).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_delete_missing_link() {
        let link_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<link::Model>::new()])
            .into_connection();
        let svc = service(link_db, empty());

        let result = svc.delete("missing").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_for_film() {
        let film_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_film("f1", "Heat")]])
            .into_connection();
        let link_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![test_link("l1", "f1")]])
            .append_query_results([Vec::<cinema_db::entities::link_language::Model>::new()])
            .into_connection();
        let svc = service(link_db, film_db);

        let result = svc.list_for_film("f1").await.unwrap();
        assert_eq!(result.len(), 1);
        assert!(result[0].languages.is_empty());
    }
}
