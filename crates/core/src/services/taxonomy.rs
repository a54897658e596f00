//! Services for the title-based taxonomy resources.
//!
//! The four resources share one shape, so the services are generated
//! from one macro, mirroring the repository layer.

use cinema_common::{AppError, AppResult, IdGenerator};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Input for creating or renaming a taxonomy entry.
#[derive(Debug, Deserialize, Validate)]
pub struct TaxonomyInput {
    #[validate(length(min = 1, max = 256))]
    pub title: String,
}

macro_rules! taxonomy_service {
    ($service:ident, $repo:ident, $module:ident) => {
        #[derive(Clone)]
        pub struct $service {
            repo: cinema_db::repositories::$repo,
            id_gen: IdGenerator,
        }

        impl $service {
            #[must_use]
            pub fn new(repo: cinema_db::repositories::$repo) -> Self {
                Self {
                    repo,
                    id_gen: IdGenerator::new(),
                }
            }

            /// Create an entry. Titles are unique.
            pub async fn create(
                &self,
                input: TaxonomyInput,
            ) -> AppResult<cinema_db::entities::$module::Model> {
                input.validate()?;

                if self.repo.find_by_title(&input.title).await?.is_some() {
                    return Err(AppError::Conflict(format!(
                        "{} already exists",
                        input.title
                    )));
                }

                let model = cinema_db::entities::$module::ActiveModel {
                    id: Set(self.id_gen.generate()),
                    title: Set(input.title),
                };
                self.repo.create(model).await
            }

            /// Rename an entry.
            pub async fn update(
                &self,
                id: &str,
                input: TaxonomyInput,
            ) -> AppResult<cinema_db::entities::$module::Model> {
                input.validate()?;

                self.repo.get_by_id(id).await?;

                if let Some(existing) = self.repo.find_by_title(&input.title).await? {
                    if existing.id != id {
                        return Err(AppError::Conflict(format!(
                            "{} already exists",
                            input.title
                        )));
                    }
                }

                let model = cinema_db::entities::$module::ActiveModel {
                    id: Set(id.to_string()),
                    title: Set(input.title),
                };
                self.repo.update(model).await
            }

            pub async fn delete(&self, id: &str) -> AppResult<()> {
                self.repo.get_by_id(id).await?;
                self.repo.delete(id).await
            }

            pub async fn get(&self, id: &str) -> AppResult<cinema_db::entities::$module::Model> {
                self.repo.get_by_id(id).await
            }

            pub async fn list(
                &self,
                search: Option<&str>,
                limit: u64,
                offset: u64,
            ) -> AppResult<Vec<cinema_db::entities::$module::Model>> {
                self.repo.list(search, limit, offset).await
            }
        }
    };
}

taxonomy_service!(GenreService, GenreRepository, genre);
taxonomy_service!(CollectionService, CollectionRepository, collection);
taxonomy_service!(CountryService, CountryRepository, country);
taxonomy_service!(LanguageService, LanguageRepository, language);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use cinema_db::entities::genre;
    use cinema_db::repositories::GenreRepository;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn service(db: sea_orm::DatabaseConnection) -> GenreService {
        GenreService::new(GenreRepository::new(Arc::new(db)))
    }

    #[tokio::test]
    async fn test_create_duplicate_title_conflicts() {
        let existing = genre::Model {
            id: "g1".to_string(),
            title: "Drama".to_string(),
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[existing]])
            .into_connection();
        let svc = service(db);

        let result = svc
            .create(TaxonomyInput {
                title: "Drama".to_string(),
            })
            .await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_create_empty_title_fails() {
        let svc = service(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let result = svc
            .create(TaxonomyInput {
                title: String::new(),
            })
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_keeps_own_title() {
        let existing = genre::Model {
            id: "g1".to_string(),
            title: "Drama".to_string(),
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[existing.clone()]])
            .append_query_results([[existing.clone()]])
            .append_query_results([[existing]])
            .into_connection();
        let svc = service(db);

        let result = svc
            .update(
                "g1",
                TaxonomyInput {
                    title: "Drama".to_string(),
                },
            )
            .await;
        assert!(result.is_ok());
    }
}
