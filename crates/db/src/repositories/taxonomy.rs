//! Repositories for the title-based taxonomy entities.
//!
//! Genres, collections, countries, and languages share the same shape,
//! so their repositories are generated from one macro.

use std::sync::Arc;

use cinema_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};

macro_rules! taxonomy_repository {
    ($repo:ident, $module:ident, $entity:ident) => {
        #[derive(Clone)]
        pub struct $repo {
            db: Arc<DatabaseConnection>,
        }

        impl $repo {
            #[must_use]
            pub const fn new(db: Arc<DatabaseConnection>) -> Self {
                Self { db }
            }

            pub async fn find_by_id(
                &self,
                id: &str,
            ) -> AppResult<Option<crate::entities::$module::Model>> {
                crate::entities::$entity::find_by_id(id)
                    .one(self.db.as_ref())
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))
            }

            pub async fn get_by_id(&self, id: &str) -> AppResult<crate::entities::$module::Model> {
                self.find_by_id(id).await?.ok_or_else(|| {
                    AppError::NotFound(format!(
                        concat!(stringify!($module), " {} not found"),
                        id
                    ))
                })
            }

            pub async fn find_by_ids(
                &self,
                ids: &[String],
            ) -> AppResult<Vec<crate::entities::$module::Model>> {
                if ids.is_empty() {
                    return Ok(vec![]);
                }

                crate::entities::$entity::find()
                    .filter(crate::entities::$module::Column::Id.is_in(ids.to_vec()))
                    .order_by_asc(crate::entities::$module::Column::Title)
                    .all(self.db.as_ref())
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))
            }

            pub async fn find_by_title(
                &self,
                title: &str,
            ) -> AppResult<Option<crate::entities::$module::Model>> {
                crate::entities::$entity::find()
                    .filter(crate::entities::$module::Column::Title.eq(title))
                    .one(self.db.as_ref())
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))
            }

            pub async fn create(
                &self,
                model: crate::entities::$module::ActiveModel,
            ) -> AppResult<crate::entities::$module::Model> {
                model
                    .insert(self.db.as_ref())
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))
            }

            pub async fn update(
                &self,
                model: crate::entities::$module::ActiveModel,
            ) -> AppResult<crate::entities::$module::Model> {
                model
                    .update(self.db.as_ref())
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))
            }

            pub async fn delete(&self, id: &str) -> AppResult<()> {
                crate::entities::$entity::delete_by_id(id)
                    .exec(self.db.as_ref())
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
                Ok(())
            }

            /// List entries ordered by title (paginated), optionally
            /// narrowed to titles containing the search term.
            pub async fn list(
                &self,
                search: Option<&str>,
                limit: u64,
                offset: u64,
            ) -> AppResult<Vec<crate::entities::$module::Model>> {
                let mut query = crate::entities::$entity::find()
                    .order_by_asc(crate::entities::$module::Column::Title);

                if let Some(term) = search {
                    query =
                        query.filter(crate::entities::$module::Column::Title.contains(term));
                }

                query
                    .limit(limit)
                    .offset(offset)
                    .all(self.db.as_ref())
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))
            }

            pub async fn count(&self) -> AppResult<u64> {
                crate::entities::$entity::find()
                    .count(self.db.as_ref())
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))
            }
        }
    };
}

taxonomy_repository!(GenreRepository, genre, Genre);
taxonomy_repository!(CollectionRepository, collection, Collection);
taxonomy_repository!(CountryRepository, country, Country);
taxonomy_repository!(LanguageRepository, language, Language);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entities::genre;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn test_genre(id: &str, title: &str) -> genre::Model {
        genre::Model {
            id: id.to_string(),
            title: title.to_string(),
        }
    }

    #[tokio::test]
    async fn test_list_ordered_by_title() {
        let g1 = test_genre("g1", "Drama");
        let g2 = test_genre("g2", "Thriller");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[g1, g2]])
                .into_connection(),
        );

        let repo = GenreRepository::new(db);
        let result = repo.list(None, 20, 0).await.unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].title, "Drama");
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<genre::Model>::new()])
                .into_connection(),
        );

        let repo = GenreRepository::new(db);
        let result = repo.get_by_id("missing").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_find_by_title() {
        let g1 = test_genre("g1", "Drama");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[g1]])
                .into_connection(),
        );

        let repo = GenreRepository::new(db);
        let result = repo.find_by_title("Drama").await.unwrap();

        assert!(result.is_some());
    }
}
