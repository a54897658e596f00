//! cinema-rs server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use cinema_api::{AppState, app};
use cinema_common::{Config, RedisVisitTracker, RedisVoteRegistry, TokenManager};
use cinema_core::{
    ActorService, CollectionService, CommentService, CountryService, DirectorService, FilmService,
    GenreService, LanguageService, LinkService, SiteSettingsService, UserService,
};
use cinema_db::repositories::{
    ActorRepository, CollectionRepository, CommentRepository, CountryRepository,
    DirectorRepository, FilmRepository, GenreRepository, LanguageRepository, LinkRepository,
    SiteSettingsRepository, UserRepository,
};
use cinema_jobs::{JobExecutor, SchedulerConfig, run_scheduler};
use fred::interfaces::ClientLike;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Bridges the comment service into the job scheduler.
struct PurgeExecutor {
    comment_service: CommentService,
}

#[async_trait::async_trait]
impl JobExecutor for PurgeExecutor {
    async fn purge_rejected_comments(
        &self,
    ) -> Result<u64, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.comment_service.purge_rejected().await?)
    }
}

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[allow(clippy::expect_used)]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cinema=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting cinema-rs server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database and run migrations
    let db = cinema_db::init(&config).await?;
    info!("Connected to database");

    info!("Running database migrations...");
    cinema_db::migrate(&db).await?;
    info!("Migrations completed");

    // Connect to Redis for visit dedup and vote flags
    info!("Connecting to Redis...");
    let redis_config = fred::types::config::Config::from_url(&config.redis.url)
        .expect("Failed to parse Redis URL");
    let redis_client = fred::clients::Client::new(redis_config, None, None, None);
    redis_client.connect();
    redis_client
        .wait_for_connect()
        .await
        .expect("Failed to connect to Redis");
    let redis_client = Arc::new(redis_client);
    info!("Connected to Redis");

    let visit_tracker = Arc::new(RedisVisitTracker::with_window(
        Arc::clone(&redis_client),
        config.redis.prefix.clone(),
        config.visit_window(),
    ));
    let vote_registry = Arc::new(RedisVoteRegistry::new(
        Arc::clone(&redis_client),
        config.redis.prefix.clone(),
        config.session_ttl(),
    ));

    // Initialize repositories
    let db = Arc::new(db);
    let user_repo = UserRepository::new(Arc::clone(&db));
    let film_repo = FilmRepository::new(Arc::clone(&db));
    let comment_repo = CommentRepository::new(Arc::clone(&db));
    let link_repo = LinkRepository::new(Arc::clone(&db));
    let genre_repo = GenreRepository::new(Arc::clone(&db));
    let collection_repo = CollectionRepository::new(Arc::clone(&db));
    let country_repo = CountryRepository::new(Arc::clone(&db));
    let language_repo = LanguageRepository::new(Arc::clone(&db));
    let actor_repo = ActorRepository::new(Arc::clone(&db));
    let director_repo = DirectorRepository::new(Arc::clone(&db));
    let settings_repo = SiteSettingsRepository::new(Arc::clone(&db));

    // Initialize services
    let user_service = UserService::new(user_repo);
    let film_service = FilmService::new(
        film_repo.clone(),
        director_repo.clone(),
        genre_repo.clone(),
        collection_repo.clone(),
        actor_repo.clone(),
        country_repo.clone(),
        language_repo.clone(),
        visit_tracker,
    );
    let comment_service = CommentService::new(comment_repo, film_repo.clone(), vote_registry);
    let link_service = LinkService::new(link_repo, film_repo.clone(), language_repo.clone());
    let genre_service = GenreService::new(genre_repo);
    let collection_service = CollectionService::new(collection_repo);
    let country_service = CountryService::new(country_repo);
    let language_service = LanguageService::new(language_repo);
    let actor_service = ActorService::new(actor_repo);
    let director_service = DirectorService::new(director_repo, film_repo);
    let site_settings_service = SiteSettingsService::new(settings_repo);

    let token_manager = TokenManager::from_config(&config.auth);

    // Start the rejected-comment purge scheduler
    run_scheduler(
        SchedulerConfig {
            comment_purge_interval: config.comment_purge_interval(),
        },
        Arc::new(PurgeExecutor {
            comment_service: comment_service.clone(),
        }),
    )
    .await;
    info!("Started background job scheduler");

    // Create app state
    let state = AppState {
        user_service,
        film_service,
        comment_service,
        link_service,
        genre_service,
        collection_service,
        country_service,
        language_service,
        actor_service,
        director_service,
        site_settings_service,
        token_manager,
    };

    // Build router
    let router = app(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    // Start server
    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down cleanly");
    Ok(())
}
