//! Film repository.

use std::sync::Arc;

use crate::entities::{
    Film, FilmActor, FilmCollection, FilmCountry, FilmGenre, FilmLanguage, film, film_actor,
    film_collection, film_country, film_genre, film_language, link,
};
use cinema_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
    sea_query::{Expr, Query},
};

/// Sort order for film listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilmOrder {
    /// Newest first.
    #[default]
    CreatedDesc,
    CreatedAsc,
    UpdatedDesc,
    UpdatedAsc,
    RatingDesc,
    RatingAsc,
    VisitsDesc,
    VisitsAsc,
}

/// Filters for film listings. All fields are conjunctive.
#[derive(Debug, Clone, Default)]
pub struct FilmQuery {
    pub status: Option<film::FilmStatus>,
    pub year: Option<i16>,
    pub year_gte: Option<i16>,
    pub year_lt: Option<i16>,
    pub rating_gte: Option<f64>,
    pub rating_lt: Option<f64>,
    pub is_serial: Option<bool>,
    /// Films having at least one link with this subtitle variant.
    pub subtitle: Option<link::Subtitle>,
    pub director_id: Option<String>,
    pub genre_id: Option<String>,
    pub collection_id: Option<String>,
    pub actor_id: Option<String>,
    pub country_id: Option<String>,
    pub language_id: Option<String>,
    /// Case-insensitive substring match on title and English title.
    pub search: Option<String>,
    pub order: FilmOrder,
}

/// Film repository for database operations.
#[derive(Clone)]
pub struct FilmRepository {
    db: Arc<DatabaseConnection>,
}

impl FilmRepository {
    /// Create a new film repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a film by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<film::Model>> {
        Film::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a film by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<film::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::FilmNotFound(id.to_string()))
    }

    /// Create a new film.
    pub async fn create(&self, model: film::ActiveModel) -> AppResult<film::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a film.
    pub async fn update(&self, model: film::ActiveModel) -> AppResult<film::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a film. Links, comments, and join rows cascade.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        Film::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// List films matching the query (paginated).
    pub async fn list(
        &self,
        query: &FilmQuery,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<film::Model>> {
        let mut select = Film::find().filter(Self::condition(query));

        select = match query.order {
            FilmOrder::CreatedDesc => select.order_by_desc(film::Column::Id),
            FilmOrder::CreatedAsc => select.order_by_asc(film::Column::Id),
            FilmOrder::UpdatedDesc => select.order_by_desc(film::Column::UpdatedAt),
            FilmOrder::UpdatedAsc => select.order_by_asc(film::Column::UpdatedAt),
            FilmOrder::RatingDesc => select.order_by_desc(film::Column::ImdbRating),
            FilmOrder::RatingAsc => select.order_by_asc(film::Column::ImdbRating),
            FilmOrder::VisitsDesc => select.order_by_desc(film::Column::VisitCount),
            FilmOrder::VisitsAsc => select.order_by_asc(film::Column::VisitCount),
        };

        select
            .limit(limit)
            .offset(offset)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count films matching the query.
    pub async fn count(&self, query: &FilmQuery) -> AppResult<u64> {
        Film::find()
            .filter(Self::condition(query))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    fn condition(query: &FilmQuery) -> Condition {
        let mut condition = Condition::all();

        if let Some(status) = query.status {
            condition = condition.add(film::Column::Status.eq(status));
        }
        if let Some(year) = query.year {
            condition = condition.add(film::Column::Year.eq(year));
        }
        if let Some(year_gte) = query.year_gte {
            condition = condition.add(film::Column::Year.gte(year_gte));
        }
        if let Some(year_lt) = query.year_lt {
            condition = condition.add(film::Column::Year.lt(year_lt));
        }
        if let Some(rating_gte) = query.rating_gte {
            condition = condition.add(film::Column::ImdbRating.gte(rating_gte));
        }
        if let Some(rating_lt) = query.rating_lt {
            condition = condition.add(film::Column::ImdbRating.lt(rating_lt));
        }
        if let Some(is_serial) = query.is_serial {
            condition = condition.add(film::Column::IsSerial.eq(is_serial));
        }
        if let Some(subtitle) = query.subtitle {
            condition = condition.add(
                film::Column::Id.in_subquery(
                    Query::select()
                        .column(link::Column::FilmId)
                        .from(link::Entity)
                        .and_where(link::Column::Subtitle.eq(subtitle))
                        .to_owned(),
                ),
            );
        }
        if let Some(director_id) = &query.director_id {
            condition = condition.add(film::Column::DirectorId.eq(director_id));
        }
        if let Some(genre_id) = &query.genre_id {
            condition = condition.add(
                film::Column::Id.in_subquery(
                    Query::select()
                        .column(film_genre::Column::FilmId)
                        .from(film_genre::Entity)
                        .and_where(film_genre::Column::GenreId.eq(genre_id))
                        .to_owned(),
                ),
            );
        }
        if let Some(collection_id) = &query.collection_id {
            condition = condition.add(
                film::Column::Id.in_subquery(
                    Query::select()
                        .column(film_collection::Column::FilmId)
                        .from(film_collection::Entity)
                        .and_where(film_collection::Column::CollectionId.eq(collection_id))
                        .to_owned(),
                ),
            );
        }
        if let Some(actor_id) = &query.actor_id {
            condition = condition.add(
                film::Column::Id.in_subquery(
                    Query::select()
                        .column(film_actor::Column::FilmId)
                        .from(film_actor::Entity)
                        .and_where(film_actor::Column::ActorId.eq(actor_id))
                        .to_owned(),
                ),
            );
        }
        if let Some(country_id) = &query.country_id {
            condition = condition.add(
                film::Column::Id.in_subquery(
                    Query::select()
                        .column(film_country::Column::FilmId)
                        .from(film_country::Entity)
                        .and_where(film_country::Column::CountryId.eq(country_id))
                        .to_owned(),
                ),
            );
        }
        if let Some(language_id) = &query.language_id {
            condition = condition.add(
                film::Column::Id.in_subquery(
                    Query::select()
                        .column(film_language::Column::FilmId)
                        .from(film_language::Entity)
                        .and_where(film_language::Column::LanguageId.eq(language_id))
                        .to_owned(),
                ),
            );
        }
        if let Some(term) = &query.search {
            condition = condition.add(
                Condition::any()
                    .add(film::Column::Title.contains(term))
                    .add(film::Column::TitleEn.contains(term)),
            );
        }

        condition
    }

    /// Increment the visit counter atomically (single UPDATE query, no fetch).
    pub async fn increment_visit_count(&self, film_id: &str) -> AppResult<()> {
        Film::update_many()
            .col_expr(
                film::Column::VisitCount,
                Expr::col(film::Column::VisitCount).add(1),
            )
            .filter(film::Column::Id.eq(film_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Count films referencing a director.
    pub async fn count_by_director(&self, director_id: &str) -> AppResult<u64> {
        Film::find()
            .filter(film::Column::DirectorId.eq(director_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ==================== Joined Taxonomy ====================

    /// Replace the genre set of a film.
    pub async fn replace_genres(&self, film_id: &str, genre_ids: &[String]) -> AppResult<()> {
        FilmGenre::delete_many()
            .filter(film_genre::Column::FilmId.eq(film_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if !genre_ids.is_empty() {
            let rows = genre_ids.iter().map(|genre_id| film_genre::ActiveModel {
                film_id: Set(film_id.to_string()),
                genre_id: Set(genre_id.clone()),
            });
            FilmGenre::insert_many(rows)
                .exec(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }
        Ok(())
    }

    /// Replace the collection set of a film.
    pub async fn replace_collections(
        &self,
        film_id: &str,
        collection_ids: &[String],
    ) -> AppResult<()> {
        FilmCollection::delete_many()
            .filter(film_collection::Column::FilmId.eq(film_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if !collection_ids.is_empty() {
            let rows = collection_ids
                .iter()
                .map(|collection_id| film_collection::ActiveModel {
                    film_id: Set(film_id.to_string()),
                    collection_id: Set(collection_id.clone()),
                });
            FilmCollection::insert_many(rows)
                .exec(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }
        Ok(())
    }

    /// Replace the cast of a film.
    pub async fn replace_actors(&self, film_id: &str, actor_ids: &[String]) -> AppResult<()> {
        FilmActor::delete_many()
            .filter(film_actor::Column::FilmId.eq(film_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if !actor_ids.is_empty() {
            let rows = actor_ids.iter().map(|actor_id| film_actor::ActiveModel {
                film_id: Set(film_id.to_string()),
                actor_id: Set(actor_id.clone()),
            });
            FilmActor::insert_many(rows)
                .exec(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }
        Ok(())
    }

    /// Replace the country set of a film.
    pub async fn replace_countries(&self, film_id: &str, country_ids: &[String]) -> AppResult<()> {
        FilmCountry::delete_many()
            .filter(film_country::Column::FilmId.eq(film_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if !country_ids.is_empty() {
            let rows = country_ids
                .iter()
                .map(|country_id| film_country::ActiveModel {
                    film_id: Set(film_id.to_string()),
                    country_id: Set(country_id.clone()),
                });
            FilmCountry::insert_many(rows)
                .exec(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }
        Ok(())
    }

    /// Replace the language set of a film.
    pub async fn replace_languages(&self, film_id: &str, language_ids: &[String]) -> AppResult<()> {
        FilmLanguage::delete_many()
            .filter(film_language::Column::FilmId.eq(film_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if !language_ids.is_empty() {
            let rows = language_ids
                .iter()
                .map(|language_id| film_language::ActiveModel {
                    film_id: Set(film_id.to_string()),
                    language_id: Set(language_id.clone()),
                });
            FilmLanguage::insert_many(rows)
                .exec(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }
        Ok(())
    }

    /// Genre IDs joined to a film.
    pub async fn genre_ids(&self, film_id: &str) -> AppResult<Vec<String>> {
        Ok(FilmGenre::find()
            .filter(film_genre::Column::FilmId.eq(film_id))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .into_iter()
            .map(|row| row.genre_id)
            .collect())
    }

    /// Collection IDs joined to a film.
    pub async fn collection_ids(&self, film_id: &str) -> AppResult<Vec<String>> {
        Ok(FilmCollection::find()
            .filter(film_collection::Column::FilmId.eq(film_id))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .into_iter()
            .map(|row| row.collection_id)
            .collect())
    }

    /// Actor IDs joined to a film.
    pub async fn actor_ids(&self, film_id: &str) -> AppResult<Vec<String>> {
        Ok(FilmActor::find()
            .filter(film_actor::Column::FilmId.eq(film_id))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .into_iter()
            .map(|row| row.actor_id)
            .collect())
    }

    /// Country IDs joined to a film.
    pub async fn country_ids(&self, film_id: &str) -> AppResult<Vec<String>> {
        Ok(FilmCountry::find()
            .filter(film_country::Column::FilmId.eq(film_id))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .into_iter()
            .map(|row| row.country_id)
            .collect())
    }

    /// Language IDs joined to a film.
    pub async fn language_ids(&self, film_id: &str) -> AppResult<Vec<String>> {
        Ok(FilmLanguage::find()
            .filter(film_language::Column::FilmId.eq(film_id))
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
    use crate::test_utils::test_film;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    #[tokio::test]
    async fn test_find_by_id_found() {
        let film = test_film("f1", "Heat");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[film.clone()]])
                .into_connection(),
        );

        let repo = FilmRepository::new(db);
        let result = repo.find_by_id("f1").await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().title, "Heat");
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<film::Model>::new()])
                .into_connection(),
        );

        let repo = FilmRepository::new(db);
        let result = repo.get_by_id("missing").await;

        assert!(matches!(result, Err(AppError::FilmNotFound(_))));
    }

    #[tokio::test]
    async fn test_list_published() {
        let f1 = test_film("f1", "Heat");
        let f2 = test_film("f2", "Ran");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[f1, f2]])
                .into_connection(),
        );

        let repo = FilmRepository::new(db);
        let query = FilmQuery {
            status: Some(film::FilmStatus::Published),
            ..FilmQuery::default()
        };
        let result = repo.list(&query, 20, 0).await.unwrap();

        assert_eq!(result.len(), 2);
    }

    #[tokio::test]
    async fn test_list_with_genre_filter() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![test_film("f1", "Heat")]])
                .into_connection(),
        );

        let repo = FilmRepository::new(db);
        let query = FilmQuery {
            genre_id: Some("g1".to_string()),
            ..FilmQuery::default()
        };
        let result = repo.list(&query, 20, 0).await.unwrap();

        assert_eq!(result.len(), 1);
    }

    #[tokio::test]
    async fn test_increment_visit_count() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = FilmRepository::new(db);
        assert!(repo.increment_visit_count("f1").await.is_ok());
    }

    #[tokio::test]
    async fn test_replace_genres_empty_only_deletes() {
        // A single exec result satisfies the DELETE; no INSERT is issued.
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 2,
                }])
                .into_connection(),
        );

        let repo = FilmRepository::new(db);
        assert!(repo.replace_genres("f1", &[]).await.is_ok());
    }
}
