//! Film service.

use std::sync::Arc;

use chrono::{Datelike, Utc};
use cinema_common::{AppError, AppResult, IdGenerator, VisitTracker};
use cinema_db::{
    entities::{actor, collection, country, director, film, genre, language},
    repositories::{
        ActorRepository, CollectionRepository, CountryRepository, DirectorRepository,
        FilmQuery, FilmRepository, GenreRepository, LanguageRepository,
    },
};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Films cannot predate the invention of the medium.
const MIN_YEAR: i16 = 1700;

/// A film together with its related people and taxonomy.
#[derive(Debug, Clone, Serialize)]
pub struct FilmDetail {
    #[serde(flatten)]
    pub film: film::Model,
    pub director: director::Model,
    pub genres: Vec<genre::Model>,
    pub collections: Vec<collection::Model>,
    pub actors: Vec<actor::Model>,
    pub countries: Vec<country::Model>,
    pub languages: Vec<language::Model>,
}

/// Input for creating a film.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateFilmInput {
    #[validate(length(min = 1, max = 256))]
    pub title: String,

    #[validate(length(min = 1, max = 256))]
    pub title_en: String,

    pub year: i16,

    #[validate(length(min = 1))]
    pub description: String,

    #[validate(url)]
    pub thumbnail_url: Option<String>,

    #[serde(default)]
    pub status: Option<film::FilmStatus>,

    #[validate(range(min = 0.0, max = 10.0))]
    pub imdb_rating: f64,

    #[validate(url)]
    pub imdb_link: String,

    #[validate(range(min = 1))]
    pub duration: Option<i16>,

    #[serde(default)]
    pub is_serial: bool,

    pub director_id: String,

    pub genre_ids: Vec<String>,

    #[serde(default)]
    pub collection_ids: Vec<String>,

    #[serde(default)]
    pub actor_ids: Vec<String>,

    pub country_ids: Vec<String>,

    #[serde(default)]
    pub language_ids: Vec<String>,
}

/// Input for updating a film. Absent fields are left untouched.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateFilmInput {
    #[validate(length(min = 1, max = 256))]
    pub title: Option<String>,

    #[validate(length(min = 1, max = 256))]
    pub title_en: Option<String>,

    pub year: Option<i16>,

    #[validate(length(min = 1))]
    pub description: Option<String>,

    #[validate(url)]
    pub thumbnail_url: Option<String>,

    pub status: Option<film::FilmStatus>,

    #[validate(range(min = 0.0, max = 10.0))]
    pub imdb_rating: Option<f64>,

    #[validate(url)]
    pub imdb_link: Option<String>,

    #[validate(range(min = 1))]
    pub duration: Option<i16>,

    pub is_serial: Option<bool>,

    pub director_id: Option<String>,

    pub genre_ids: Option<Vec<String>>,
    pub collection_ids: Option<Vec<String>>,
    pub actor_ids: Option<Vec<String>>,
    pub country_ids: Option<Vec<String>>,
    pub language_ids: Option<Vec<String>>,
}

/// Film service for business logic.
#[derive(Clone)]
pub struct FilmService {
    film_repo: FilmRepository,
    director_repo: DirectorRepository,
    genre_repo: GenreRepository,
    collection_repo: CollectionRepository,
    actor_repo: ActorRepository,
    country_repo: CountryRepository,
    language_repo: LanguageRepository,
    visit_tracker: Arc<dyn VisitTracker>,
    id_gen: IdGenerator,
}

impl FilmService {
    /// Create a new film service.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        film_repo: FilmRepository,
        director_repo: DirectorRepository,
        genre_repo: GenreRepository,
        collection_repo: CollectionRepository,
        actor_repo: ActorRepository,
        country_repo: CountryRepository,
        language_repo: LanguageRepository,
        visit_tracker: Arc<dyn VisitTracker>,
    ) -> Self {
        Self {
            film_repo,
            director_repo,
            genre_repo,
            collection_repo,
            actor_repo,
            country_repo,
            language_repo,
            visit_tracker,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a film with its taxonomy joins.
    pub async fn create(&self, user_id: &str, input: CreateFilmInput) -> AppResult<film::Model> {
        input.validate()?;
        validate_year(input.year)?;
        validate_taxonomy(&input.genre_ids, &input.country_ids)?;

        // Clean 404 instead of an FK violation.
        self.director_repo.get_by_id(&input.director_id).await?;

        let film_id = self.id_gen.generate();
        let model = film::ActiveModel {
            id: Set(film_id.clone()),
            title: Set(input.title),
            title_en: Set(input.title_en),
            year: Set(input.year),
            description: Set(input.description),
            thumbnail_url: Set(input.thumbnail_url),
            status: Set(input.status.unwrap_or(film::FilmStatus::Published)),
            imdb_rating: Set(input.imdb_rating),
            imdb_link: Set(input.imdb_link),
            duration: Set(input.duration),
            is_serial: Set(input.is_serial),
            visit_count: Set(0),
            user_id: Set(user_id.to_string()),
            director_id: Set(input.director_id),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        let film = self.film_repo.create(model).await?;

        self.film_repo
            .replace_genres(&film.id, &input.genre_ids)
            .await?;
        self.film_repo
            .replace_collections(&film.id, &input.collection_ids)
            .await?;
        self.film_repo
            .replace_actors(&film.id, &input.actor_ids)
            .await?;
        self.film_repo
            .replace_countries(&film.id, &input.country_ids)
            .await?;
        self.film_repo
            .replace_languages(&film.id, &input.language_ids)
            .await?;

        tracing::info!(film_id = %film.id, title = %film.title, "Film created");
        Ok(film)
    }

    /// Update a film.
    pub async fn update(&self, id: &str, input: UpdateFilmInput) -> AppResult<film::Model> {
        input.validate()?;
        if let Some(year) = input.year {
            validate_year(year)?;
        }
        if let Some(genre_ids) = &input.genre_ids {
            if genre_ids.is_empty() {
                return Err(AppError::invalid("genres", "at least one genre is required"));
            }
        }
        if let Some(country_ids) = &input.country_ids {
            if country_ids.is_empty() {
                return Err(AppError::invalid(
                    "countries",
                    "at least one country is required",
                ));
            }
        }

        let film = self.film_repo.get_by_id(id).await?;

        let mut model = film::ActiveModel {
            id: Set(film.id.clone()),
            updated_at: Set(Some(Utc::now().into())),
            ..Default::default()
        };

        if let Some(title) = input.title {
            model.title = Set(title);
        }
        if let Some(title_en) = input.title_en {
            model.title_en = Set(title_en);
        }
        if let Some(year) = input.year {
            model.year = Set(year);
        }
        if let Some(description) = input.description {
            model.description = Set(description);
        }
        if let Some(thumbnail_url) = input.thumbnail_url {
            model.thumbnail_url = Set(Some(thumbnail_url));
        }
        if let Some(status) = input.status {
            model.status = Set(status);
        }
        if let Some(imdb_rating) = input.imdb_rating {
            model.imdb_rating = Set(imdb_rating);
        }
        if let Some(imdb_link) = input.imdb_link {
            model.imdb_link = Set(imdb_link);
        }
        if let Some(duration) = input.duration {
            model.duration = Set(Some(duration));
        }
        if let Some(is_serial) = input.is_serial {
            model.is_serial = Set(is_serial);
        }
        if let Some(director_id) = input.director_id {
            self.director_repo.get_by_id(&director_id).await?;
            model.director_id = Set(director_id);
        }

        let updated = self.film_repo.update(model).await?;

        if let Some(genre_ids) = input.genre_ids {
            self.film_repo.replace_genres(id, &genre_ids).await?;
        }
        if let Some(collection_ids) = input.collection_ids {
            self.film_repo
                .replace_collections(id, &collection_ids)
                .await?;
        }
        if let Some(actor_ids) = input.actor_ids {
            self.film_repo.replace_actors(id, &actor_ids).await?;
        }
        if let Some(country_ids) = input.country_ids {
            self.film_repo.replace_countries(id, &country_ids).await?;
        }
        if let Some(language_ids) = input.language_ids {
            self.film_repo.replace_languages(id, &language_ids).await?;
        }

        Ok(updated)
    }

    /// Delete a film.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.film_repo.get_by_id(id).await?;
        self.film_repo.delete(id).await
    }

    /// List films. Non-staff viewers only see published films.
    pub async fn list(
        &self,
        mut query: FilmQuery,
        staff: bool,
        limit: u64,
        offset: u64,
    ) -> AppResult<(Vec<film::Model>, u64)> {
        if !staff {
            query.status = Some(film::FilmStatus::Published);
        }

        let films = self.film_repo.list(&query, limit, offset).await?;
        let total = self.film_repo.count(&query).await?;
        Ok((films, total))
    }

    /// Fetch a film with its full related graph, counting the visit.
    ///
    /// The counter only moves when the tracker has not seen this visitor
    /// on this film within the dedup window. Drafts stay hidden from
    /// non-staff viewers.
    pub async fn get_detail(
        &self,
        id: &str,
        visitor: Option<&str>,
        staff: bool,
    ) -> AppResult<FilmDetail> {
        let mut film = self.film_repo.get_by_id(id).await?;

        if film.status == film::FilmStatus::Draft && !staff {
            return Err(AppError::FilmNotFound(id.to_string()));
        }

        if let Some(visitor) = visitor {
            if self.visit_tracker.is_new_visit(visitor, id).await? {
                self.film_repo.increment_visit_count(id).await?;
                film.visit_count += 1;
            }
        }

        let director = self.director_repo.get_by_id(&film.director_id).await?;
        let genres = self
            .genre_repo
            .find_by_ids(&self.film_repo.genre_ids(id).await?)
            .await?;
        let collections = self
            .collection_repo
            .find_by_ids(&self.film_repo.collection_ids(id).await?)
            .await?;
        let actors = self
            .actor_repo
            .find_by_ids(&self.film_repo.actor_ids(id).await?)
            .await?;
        let countries = self
            .country_repo
            .find_by_ids(&self.film_repo.country_ids(id).await?)
            .await?;
        let languages = self
            .language_repo
            .find_by_ids(&self.film_repo.language_ids(id).await?)
            .await?;

        Ok(FilmDetail {
            film,
            director,
            genres,
            collections,
            actors,
            countries,
            languages,
        })
    }

    /// Fetch a film without touching the visit counter.
    pub async fn get(&self, id: &str, staff: bool) -> AppResult<film::Model> {
        let film = self.film_repo.get_by_id(id).await?;
        if film.status == film::FilmStatus::Draft && !staff {
            return Err(AppError::FilmNotFound(id.to_string()));
        }
        Ok(film)
    }
}

fn validate_year(year: i16) -> AppResult<()> {
    let current = i16::try_from(Utc::now().year()).unwrap_or(i16::MAX);
    if !(MIN_YEAR..=current).contains(&year) {
        return Err(AppError::invalid(
            "year",
            format!("year must be between {MIN_YEAR} and {current}"),
        ));
    }
    Ok(())
}

fn validate_taxonomy(genre_ids: &[String], country_ids: &[String]) -> AppResult<()> {
    if genre_ids.is_empty() {
        return Err(AppError::invalid("genres", "at least one genre is required"));
    }
    if country_ids.is_empty() {
        return Err(AppError::invalid(
            "countries",
            "at least one country is required",
        ));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use cinema_common::MemoryVisitTracker;
    use cinema_db::test_utils::test_film;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::time::Duration;

    fn empty_db() -> Arc<sea_orm::DatabaseConnection> {
        Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection())
    }

    fn service_with(
        film_db: Arc<sea_orm::DatabaseConnection>,
        director_db: Arc<sea_orm::DatabaseConnection>,
    ) -> FilmService {
        FilmService::new(
            FilmRepository::new(film_db),
            DirectorRepository::new(director_db),
            GenreRepository::new(empty_db()),
            CollectionRepository::new(empty_db()),
            ActorRepository::new(empty_db()),
            CountryRepository::new(empty_db()),
            LanguageRepository::new(empty_db()),
            Arc::new(MemoryVisitTracker::with_window(Duration::from_secs(86_400))),
        )
    }

    fn create_input() -> CreateFilmInput {
        CreateFilmInput {
            title: "Heat".to_string(),
            title_en: "Heat".to_string(),
            year: 1995,
            description: "Crime drama.".to_string(),
            thumbnail_url: None,
            status: None,
            imdb_rating: 8.3,
            imdb_link: "https://www.imdb.com/title/tt0113277/".to_string(),
            duration: Some(170),
            is_serial: false,
            director_id: "d1".to_string(),
            genre_ids: vec!["g1".to_string()],
            collection_ids: vec![],
            actor_ids: vec![],
            country_ids: vec!["c1".to_string()],
            language_ids: vec![],
        }
    }

    #[test]
    fn test_validate_year_bounds() {
        assert!(validate_year(1699).is_err());
        assert!(validate_year(1700).is_ok());
        assert!(validate_year(i16::try_from(Utc::now().year()).unwrap()).is_ok());
        assert!(validate_year(i16::MAX).is_err());
    }

    #[tokio::test]
    async fn test_create_requires_genre() {
        let svc = service_with(empty_db(), empty_db());

        let mut input = create_input();
        input.genre_ids.clear();

        let result = svc.create("u1", input).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_requires_country() {
        let svc = service_with(empty_db(), empty_db());

        let mut input = create_input();
        input.country_ids.clear();

        let result = svc.create("u1", input).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_rating_out_of_range() {
        let svc = service_with(empty_db(), empty_db());

        let mut input = create_input();
        input.imdb_rating = 10.5;

        let result = svc.create("u1", input).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_unknown_director() {
        let director_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<cinema_db::entities::director::Model>::new()])
                .into_connection(),
        );
        let svc = service_with(empty_db(), director_db);

        let result = svc.create("u1", create_input()).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_get_draft_hidden_from_public() {
        let mut film = test_film("f1", "Heat");
        film.status = film::FilmStatus::Draft;

        let film_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[film]])
                .into_connection(),
        );
        let svc = service_with(film_db, empty_db());

        let result = svc.get("f1", false).await;
        assert!(matches!(result, Err(AppError::FilmNotFound(_))));
    }

    #[tokio::test]
    async fn test_get_draft_visible_to_staff() {
        let mut film = test_film("f1", "Heat");
        film.status = film::FilmStatus::Draft;

        let film_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[film]])
                .into_connection(),
        );
        let svc = service_with(film_db, empty_db());

        let result = svc.get("f1", true).await.unwrap();
        assert_eq!(result.id, "f1");
    }

    #[tokio::test]
    async fn test_list_forces_published_for_public() {
        let film_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![test_film("f1", "Heat")]])
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(1))
                }]])
                .into_connection(),
        );
        let svc = service_with(film_db, empty_db());

        let (films, total) = svc.list(FilmQuery::default(), false, 20, 0).await.unwrap();
        assert_eq!(films.len(), 1);
        assert_eq!(total, 1);
    }

    #[tokio::test]
    async fn test_get_detail_counts_first_visit() {
        use cinema_db::entities::{
            film_actor, film_collection, film_country, film_genre, film_language,
        };

        let film_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![test_film("f1", "Heat")]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .append_query_results([Vec::<film_genre::Model>::new()])
                .append_query_results([Vec::<film_collection::Model>::new()])
                .append_query_results([Vec::<film_actor::Model>::new()])
                .append_query_results([Vec::<film_country::Model>::new()])
                .append_query_results([Vec::<film_language::Model>::new()])
                .into_connection(),
        );

        let director = cinema_db::entities::director::Model {
            id: "d1".to_string(),
            full_name: "Michael Mann".to_string(),
            full_name_en: "Michael Mann".to_string(),
            picture_url: None,
        };
        let director_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[director]])
                .into_connection(),
        );

        let svc = service_with(film_db, director_db);

        let detail = svc
            .get_detail("f1", Some("203.0.113.9"), false)
            .await
            .unwrap();

        assert_eq!(detail.film.visit_count, 1);
        assert_eq!(detail.director.full_name, "Michael Mann");
        assert!(detail.genres.is_empty());
    }

    #[tokio::test]
    async fn test_visit_dedup_within_window() {
        let tracker = MemoryVisitTracker::with_window(Duration::from_secs(86_400));

        assert!(tracker.is_new_visit("203.0.113.9", "f1").await.unwrap());
        assert!(!tracker.is_new_visit("203.0.113.9", "f1").await.unwrap());
        assert!(tracker.is_new_visit("198.51.100.7", "f1").await.unwrap());
    }
}
