//! Actor and director services.

use cinema_common::{AppError, AppResult, IdGenerator};
use cinema_db::{
    entities::{actor, director},
    repositories::{ActorRepository, DirectorRepository, FilmRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Input for creating or updating an actor or director.
#[derive(Debug, Deserialize, Validate)]
pub struct PersonInput {
    #[validate(length(min = 1, max = 256))]
    pub full_name: String,

    #[validate(length(min = 1, max = 256))]
    pub full_name_en: String,

    #[validate(url)]
    pub picture_url: Option<String>,
}

/// Actor service for business logic.
#[derive(Clone)]
pub struct ActorService {
    repo: ActorRepository,
    id_gen: IdGenerator,
}

impl ActorService {
    /// Create a new actor service.
    #[must_use]
    pub fn new(repo: ActorRepository) -> Self {
        Self {
            repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create an actor.
    pub async fn create(&self, input: PersonInput) -> AppResult<actor::Model> {
        input.validate()?;

        let model = actor::ActiveModel {
            id: Set(self.id_gen.generate()),
            full_name: Set(input.full_name),
            full_name_en: Set(input.full_name_en),
            picture_url: Set(input.picture_url),
        };
        self.repo.create(model).await
    }

    /// Update an actor.
    pub async fn update(&self, id: &str, input: PersonInput) -> AppResult<actor::Model> {
        input.validate()?;

        self.repo.get_by_id(id).await?;

        let model = actor::ActiveModel {
            id: Set(id.to_string()),
            full_name: Set(input.full_name),
            full_name_en: Set(input.full_name_en),
            picture_url: Set(input.picture_url),
        };
        self.repo.update(model).await
    }

    /// Delete an actor.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.repo.get_by_id(id).await?;
        self.repo.delete(id).await
    }

    /// Get an actor by ID.
    pub async fn get(&self, id: &str) -> AppResult<actor::Model> {
        self.repo.get_by_id(id).await
    }

    /// List actors.
    pub async fn list(
        &self,
        search: Option<&str>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<actor::Model>> {
        self.repo.list(search, limit, offset).await
    }
}

/// Director service for business logic.
#[derive(Clone)]
pub struct DirectorService {
    repo: DirectorRepository,
    film_repo: FilmRepository,
    id_gen: IdGenerator,
}

impl DirectorService {
    /// Create a new director service.
    #[must_use]
    pub fn new(repo: DirectorRepository, film_repo: FilmRepository) -> Self {
        Self {
            repo,
            film_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a director.
    pub async fn create(&self, input: PersonInput) -> AppResult<director::Model> {
        input.validate()?;

        let model = director::ActiveModel {
            id: Set(self.id_gen.generate()),
            full_name: Set(input.full_name),
            full_name_en: Set(input.full_name_en),
            picture_url: Set(input.picture_url),
        };
        self.repo.create(model).await
    }

    /// Update a director.
    pub async fn update(&self, id: &str, input: PersonInput) -> AppResult<director::Model> {
        input.validate()?;

        self.repo.get_by_id(id).await?;

        let model = director::ActiveModel {
            id: Set(id.to_string()),
            full_name: Set(input.full_name),
            full_name_en: Set(input.full_name_en),
            picture_url: Set(input.picture_url),
        };
        self.repo.update(model).await
    }

    /// Delete a director. Refused while any film still references them.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.repo.get_by_id(id).await?;

        let in_use = self.film_repo.count_by_director(id).await?;
        if in_use > 0 {
            return Err(AppError::Conflict(format!(
                "director {id} is referenced by {in_use} film(s)"
            )));
        }

        self.repo.delete(id).await
    }

    /// Get a director by ID.
    pub async fn get(&self, id: &str) -> AppResult<director::Model> {
        self.repo.get_by_id(id).await
    }

    /// List directors.
    pub async fn list(
        &self,
        search: Option<&str>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<director::Model>> {
        self.repo.list(search, limit, offset).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn test_director(id: &str, name: &str) -> director::Model {
        director::Model {
            id: id.to_string(),
            full_name: name.to_string(),
            full_name_en: name.to_string(),
            picture_url: None,
        }
    }

    #[tokio::test]
    async fn test_delete_director_in_use_conflicts() {
        let director_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_director("d1", "Michael Mann")]])
            .into_connection();
        let film_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[maplit::btreemap! {
                "num_items" => sea_orm::Value::BigInt(Some(2))
            }]])
            .into_connection();

        let svc = DirectorService::new(
            DirectorRepository::new(Arc::new(director_db)),
            FilmRepository::new(Arc::new(film_db)),
        );

        let result = svc.delete("d1").await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_create_actor_requires_name() {
        let svc = ActorService::new(ActorRepository::new(Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
        )));

        let result = svc
            .create(PersonInput {
                full_name: String::new(),
                full_name_en: "X".to_string(),
                picture_url: None,
            })
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
