pub mod application;
pub mod auth;
pub mod basket;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod schema;

use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use application::{InquiryService, QuoteService};
use auth::SessionKeys;
use handlers::ApiDoc;
use infrastructure::{DieselInquiryRepository, DieselQuoteRequestRepository};

pub use db::{create_pool, DbPool};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

pub type MigrationError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) -> Result<(), MigrationError> {
    let mut conn = pool.get()?;
    let applied = conn.run_pending_migrations(MIGRATIONS)?;
    if !applied.is_empty() {
        log::info!("Applied {} database migration(s)", applied.len());
    }
    Ok(())
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    pool: DbPool,
    keys: SessionKeys,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let quotes = web::Data::new(QuoteService::new(Arc::new(
        DieselQuoteRequestRepository::new(pool.clone()),
    )));
    let inquiries = web::Data::new(InquiryService::new(Arc::new(
        DieselInquiryRepository::new(pool),
    )));
    let keys = web::Data::new(keys);

    Ok(HttpServer::new(move || {
        App::new()
            .app_data(quotes.clone())
            .app_data(inquiries.clone())
            .app_data(keys.clone())
            .wrap(Logger::default())
            .configure(handlers::configure)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
