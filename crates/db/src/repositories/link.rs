//! Download link repository.

use std::sync::Arc;

use crate::entities::{Link, LinkLanguage, link, link_language};
use cinema_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

/// Filters for the flat link listing. All fields are conjunctive.
#[derive(Debug, Clone, Default)]
pub struct LinkQuery {
    pub film_id: Option<String>,
    pub quality: Option<link::Quality>,
    pub subtitle: Option<link::Subtitle>,
    /// Minimum file size in megabytes.
    pub size_gte: Option<i32>,
    /// Maximum file size in megabytes.
    pub size_lte: Option<i32>,
}

/// Download link repository for database operations.
#[derive(Clone)]
pub struct LinkRepository {
    db: Arc<DatabaseConnection>,
}

impl LinkRepository {
    /// Create a new link repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a link by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<link::Model>> {
        Link::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a link by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<link::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("link {id} not found")))
    }

    /// Create a new link.
    pub async fn create(&self, model: link::ActiveModel) -> AppResult<link::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a link.
    pub async fn update(&self, model: link::ActiveModel) -> AppResult<link::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a link.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        Link::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Links of a film, ordered season then episode then quality.
    pub async fn find_by_film(&self, film_id: &str) -> AppResult<Vec<link::Model>> {
        Link::find()
            .filter(link::Column::FilmId.eq(film_id))
            .order_by_asc(link::Column::Season)
            .order_by_asc(link::Column::Episode)
            .order_by_asc(link::Column::Quality)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List links matching the query, newest first (paginated).
    pub async fn list(
        &self,
        query: &LinkQuery,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<link::Model>> {
        Link::find()
            .filter(Self::condition(query))
            .order_by_desc(link::Column::Id)
            .limit(limit)
            .offset(offset)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count links matching the query.
    pub async fn count(&self, query: &LinkQuery) -> AppResult<u64> {
        Link::find()
            .filter(Self::condition(query))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    fn condition(query: &LinkQuery) -> Condition {
        let mut condition = Condition::all();

        if let Some(film_id) = &query.film_id {
            condition = condition.add(link::Column::FilmId.eq(film_id));
        }
        if let Some(quality) = query.quality {
            condition = condition.add(link::Column::Quality.eq(quality));
        }
        if let Some(subtitle) = query.subtitle {
            condition = condition.add(link::Column::Subtitle.eq(subtitle));
        }
        if let Some(size_gte) = query.size_gte {
            condition = condition.add(link::Column::Size.gte(size_gte));
        }
        if let Some(size_lte) = query.size_lte {
            condition = condition.add(link::Column::Size.lte(size_lte));
        }

        condition
    }

    /// Replace the audio language set of a link.
    pub async fn replace_languages(&self, link_id: &str, language_ids: &[String]) -> AppResult<()> {
        LinkLanguage::delete_many()
            .filter(link_language::Column::LinkId.eq(link_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if !language_ids.is_empty() {
            let rows = language_ids
                .iter()
                .map(|language_id| link_language::ActiveModel {
                    link_id: Set(link_id.to_string()),
                    language_id: Set(language_id.clone()),
                });
            LinkLanguage::insert_many(rows)
                .exec(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }
        Ok(())
    }

    /// Language IDs joined to a link.
    pub async fn language_ids(&self, link_id: &str) -> AppResult<Vec<String>> {
        Ok(LinkLanguage::find()
            .filter(link_language::Column::LinkId.eq(link_id))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .into_iter()
            .map(|row| row.language_id)
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::test_link;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_find_by_film() {
        let l1 = test_link("l1", "f1");
        let l2 = test_link("l2", "f1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[l1, l2]])
                .into_connection(),
        );

        let repo = LinkRepository::new(db);
        let result = repo.find_by_film("f1").await.unwrap();

        assert_eq!(result.len(), 2);
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<link::Model>::new()])
                .into_connection(),
        );

        let repo = LinkRepository::new(db);
        let result = repo.get_by_id("missing").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
