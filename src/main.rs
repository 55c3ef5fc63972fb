//! Incoherent - a voice guessing game
//!
//! The player hears a phrase of gibberish and guesses the real words hiding
//! in it. A small session state machine drives the game; sessions persist to
//! `SQLite` between visits.

mod answers;
mod api;
mod config;
mod db;
mod runtime;
mod state_machine;

use answers::{EmbeddedAnswers, FileAnswers};
use api::{create_router, AppState};
use config::SkillConfig;
use db::Database;
use runtime::{ConfiguredAnswers, SkillRuntime};
use std::net::SocketAddr;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "incoherent=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    let config = SkillConfig::from_env();

    // Ensure database directory exists
    if let Some(parent) = config.db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    tracing::info!(path = %config.db_path.display(), "Opening database");
    let db = Database::open(&config.db_path)?;

    let answers = match &config.pairings_path {
        Some(path) => {
            tracing::info!(path = %path.display(), "Using answer file");
            ConfiguredAnswers::File(FileAnswers::new(path))
        }
        None => ConfiguredAnswers::Bundled(EmbeddedAnswers),
    };

    let state = AppState::new(SkillRuntime::new(db, answers));
    let app = create_router(state).layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Incoherent skill listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
