mod config;
mod db;
mod errors;
mod feedback;
mod matching;
mod models;
mod routes;
mod state;
mod taxonomy;
mod workers;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::feedback::repository::{
    FeedbackRepository, InMemoryFeedbackRepository, PgFeedbackRepository,
};
use crate::matching::profiles::{PgProfileStore, ProfileStore, StaticProfileStore};
use crate::routes::build_router;
use crate::state::AppState;
use crate::taxonomy::TaxonomyStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on a missing profile source)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting TalentMatch API v{}", env!("CARGO_PKG_VERSION"));

    // Sector catalog
    let taxonomy = match &config.sectors_path {
        Some(path) => TaxonomyStore::from_json_file(path)
            .with_context(|| format!("Failed to load sector catalog {}", path.display()))?,
        None => TaxonomyStore::builtin()?,
    };
    info!("Sector catalog loaded ({} sectors)", taxonomy.list_sectors().len());

    // Profile and feedback stores: a profiles file wins over the database for
    // candidates; feedback goes to the database whenever one is configured.
    let pool = match &config.database_url {
        Some(url) => Some(create_pool(url).await?),
        None => None,
    };

    let profiles: Arc<dyn ProfileStore> = match (&config.profiles_path, &pool) {
        (Some(path), _) => {
            info!("Reading candidate profiles from {}", path.display());
            Arc::new(
                StaticProfileStore::from_json_file(path)
                    .with_context(|| format!("Failed to load profiles {}", path.display()))?,
            )
        }
        (None, Some(pool)) => Arc::new(PgProfileStore::new(pool.clone())),
        (None, None) => anyhow::bail!("No candidate profile source configured"),
    };

    let feedback_repository: Arc<dyn FeedbackRepository> = match &pool {
        Some(pool) => Arc::new(PgFeedbackRepository::new(pool.clone())),
        None => {
            warn!("No DATABASE_URL; feedback is kept in memory and lost on restart");
            Arc::new(InMemoryFeedbackRepository::new())
        }
    };

    // Build app state
    let state = AppState::build(config.clone(), taxonomy, profiles, feedback_repository)?;

    // First load. A failure here leaves the index empty and requests degraded
    // until the refresher succeeds.
    if let Err(e) = state.index.refresh().await {
        warn!(error = %e, "Initial candidate index load failed");
    }

    workers::spawn_index_refresher(Arc::clone(&state.index));
    workers::spawn_weight_adjuster(Arc::clone(&state.feedback), config.weight_adjust_interval);

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
