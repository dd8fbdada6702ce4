//! cardforge-server — the HTTP face of cardforge.
//!
//! Exposes flashcard generation and per-user persistence over a small JSON
//! API, serves the static frontend when one is present, and wires the
//! process-wide analyzer/extractor pair into the generation pipeline.

use std::sync::Arc;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;

mod config;
mod controllers;
mod db;

use cardforge_core::pipeline::CardGenerator;
use config::Config;
use db::Database;

pub struct AppState {
    pub db: Database,
    pub generator: Arc<CardGenerator>,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("cardforge=info".parse().unwrap()),
        )
        .init();

    let config = Config::from_env();
    tracing::info!("cardforge-server v{}", env!("CARGO_PKG_VERSION"));

    let nlp_config = cardforge_nlp::load_config().unwrap_or_else(|e| {
        tracing::warn!("failed to load cardforge.toml, using defaults: {e:#}");
        cardforge_nlp::CardforgeConfig::default()
    });
    tracing::info!(extractor = ?nlp_config.extractor, "collaborators configured");
    let generator = Arc::new(cardforge_nlp::create_generator(&nlp_config));

    tracing::info!("initializing database at {}", config.database_url);
    let db = Database::open(&config.database_url).expect("failed to initialize database");

    let state = web::Data::new(AppState { db, generator });
    let static_dir = config.static_dir.clone();
    let port = config.port;

    tracing::info!("listening on 0.0.0.0:{port}");
    HttpServer::new(move || {
        let mut app = App::new()
            .wrap(Logger::default())
            .wrap(Cors::permissive())
            .app_data(state.clone())
            .configure(controllers::config_routes);
        if std::path::Path::new(&static_dir).is_dir() {
            app = app.service(Files::new("/", &static_dir).index_file("index.html"));
        }
        app
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
