//! Actor and director repositories.

use std::sync::Arc;

use crate::entities::{Actor, Director, actor, director};
use cinema_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};

/// Actor repository for database operations.
#[derive(Clone)]
pub struct ActorRepository {
    db: Arc<DatabaseConnection>,
}

impl ActorRepository {
    /// Create a new actor repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an actor by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<actor::Model>> {
        Actor::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find an actor by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<actor::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("actor {id} not found")))
    }

    /// Find actors by IDs.
    pub async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<actor::Model>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        Actor::find()
            .filter(actor::Column::Id.is_in(ids.to_vec()))
            .order_by_asc(actor::Column::FullName)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new actor.
    pub async fn create(&self, model: actor::ActiveModel) -> AppResult<actor::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update an actor.
    pub async fn update(&self, model: actor::ActiveModel) -> AppResult<actor::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete an actor. Join rows referencing them are removed by cascade.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        Actor::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// List actors ordered by name, optionally narrowed by a search term
    /// matched against both name forms (paginated).
    pub async fn list(
        &self,
        search: Option<&str>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<actor::Model>> {
        let mut query = Actor::find().order_by_asc(actor::Column::FullName);

        if let Some(term) = search {
            query = query.filter(
                Condition::any()
                    .add(actor::Column::FullName.contains(term))
                    .add(actor::Column::FullNameEn.contains(term)),
            );
        }

        query
            .limit(limit)
            .offset(offset)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count all actors.
    pub async fn count(&self) -> AppResult<u64> {
        Actor::find()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

/// Director repository for database operations.
#[derive(Clone)]
pub struct DirectorRepository {
    db: Arc<DatabaseConnection>,
}

impl DirectorRepository {
    /// Create a new director repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a director by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<director::Model>> {
        Director::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a director by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<director::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("director {id} not found")))
    }

    /// Create a new director.
    pub async fn create(&self, model: director::ActiveModel) -> AppResult<director::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a director.
    pub async fn update(&self, model: director::ActiveModel) -> AppResult<director::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a director. The caller must first verify no films reference them.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        Director::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// List directors ordered by name, optionally narrowed by a search term
    /// matched against both name forms (paginated).
    pub async fn list(
        &self,
        search: Option<&str>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<director::Model>> {
        let mut query = Director::find().order_by_asc(director::Column::FullName);

        if let Some(term) = search {
            query = query.filter(
                Condition::any()
                    .add(director::Column::FullName.contains(term))
                    .add(director::Column::FullNameEn.contains(term)),
            );
        }

        query
            .limit(limit)
            .offset(offset)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count all directors.
    pub async fn count(&self) -> AppResult<u64> {
        Director::find()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn test_director(id: &str, name: &str) -> director::Model {
        director::Model {
            id: id.to_string(),
            full_name: name.to_string(),
            full_name_en: name.to_string(),
            picture_url: None,
        }
    }

    #[tokio::test]
    async fn test_director_get_by_id_found() {
        let d = test_director("d1", "Akira Kurosawa");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[d]])
                .into_connection(),
        );

        let repo = DirectorRepository::new(db);
        let result = repo.get_by_id("d1").await.unwrap();

        assert_eq!(result.full_name, "Akira Kurosawa");
    }

    #[tokio::test]
    async fn test_actor_list_with_search() {
        let a = actor::Model {
            id: "a1".to_string(),
            full_name: "Toshiro Mifune".to_string(),
            full_name_en: "Toshiro Mifune".to_string(),
            picture_url: None,
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[a]])
                .into_connection(),
        );

        let repo = ActorRepository::new(db);
        let result = repo.list(Some("Mifune"), 20, 0).await.unwrap();

        assert_eq!(result.len(), 1);
    }
}
