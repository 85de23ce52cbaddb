pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Config, StoreBackend};
use crate::db::Database;
use crate::services::catalogue;
use crate::services::sessions::ReviewRegistry;
use crate::store::memory::MemoryStore;
use crate::store::{ProgressStore, SessionProvider, WordStore};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub words: Arc<dyn WordStore>,
    pub progress: Arc<dyn ProgressStore>,
    pub auth: Arc<dyn SessionProvider>,
    pub reviews: Arc<ReviewRegistry>,
}

impl AppState {
    /// State backed by a single store implementing every collaborator
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: WordStore + ProgressStore + SessionProvider + 'static,
    {
        Self {
            words: store.clone(),
            progress: store.clone(),
            auth: store,
            reviews: Arc::new(ReviewRegistry::new()),
        }
    }

    pub fn with_session_timeout(mut self, idle_timeout: Duration) -> Self {
        self.reviews = Arc::new(ReviewRegistry::with_idle_timeout(idle_timeout));
        self
    }
}

/// Periodically drop idle review sessions
fn spawn_session_reaper(reviews: Arc<ReviewRegistry>) {
    let period = reviews.idle_timeout().max(Duration::from_secs(60));
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            let dropped = reviews.prune_idle();
            if dropped > 0 {
                tracing::debug!("Dropped {} idle review sessions", dropped);
            }
        }
    });
}

/// Build the full router
pub fn router(state: AppState) -> Router {
    let protected_routes = Router::new()
        // Auth routes
        .route("/api/auth/me", get(routes::auth::me))
        .route("/api/auth/sign-out", post(routes::auth::sign_out))
        // Word routes
        .route(
            "/api/words",
            get(routes::words::list).post(routes::words::add),
        )
        .route("/api/words/seed", post(routes::words::seed))
        // Dashboard
        .route("/api/dashboard", get(routes::dashboard::stats))
        // Learn routes
        .route("/api/learn/sessions", post(routes::learn::start))
        .route("/api/learn/sessions/:id", get(routes::learn::show))
        .route(
            "/api/learn/sessions/:id/decision",
            post(routes::learn::decide),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            routes::auth::auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/api/auth/register", post(routes::auth::register))
        .route("/api/auth/sign-in", post(routes::auth::sign_in))
        .merge(protected_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let state = match (config.store, config.database_url.as_deref()) {
        (StoreBackend::Postgres, Some(database_url)) => {
            tracing::info!("Connecting to database...");
            let db = Database::connect(database_url, config.max_connections).await?;

            tracing::info!("Running migrations...");
            db.run_migrations().await?;

            AppState::from_store(Arc::new(db))
        }
        (StoreBackend::Postgres, None) => {
            anyhow::bail!("DATABASE_URL must be set");
        }
        (StoreBackend::Memory, _) => {
            tracing::warn!("Using in-memory store, data is lost on restart");
            AppState::from_store(Arc::new(MemoryStore::new()))
        }
    };

    let state = state.with_session_timeout(config.session_idle_timeout());
    spawn_session_reaper(state.reviews.clone());

    if config.seed_default_words {
        let defaults = catalogue::bundled_defaults()?;
        let inserted = catalogue::seed_default_words(state.words.as_ref(), &defaults).await?;
        tracing::info!("Seeded {} default words", inserted);
    }

    let app = router(state);
    let addr = config.addr();

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}
