use dotenvy::dotenv;
use rental_quotes::auth::SessionKeys;
use rental_quotes::config::AppConfig;
use rental_quotes::{build_server, create_pool, run_migrations};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let pool = match create_pool(&config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to create database pool: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = run_migrations(&pool) {
        log::error!("Failed to run database migrations: {}", e);
        std::process::exit(1);
    }

    let keys = SessionKeys::new(config.session_secret.as_bytes(), config.session_ttl_minutes);

    log::info!("Starting server at http://{}:{}", config.host, config.port);
    log::info!(
        "API docs at http://{}:{}/swagger-ui/",
        config.host,
        config.port
    );

    build_server(pool, keys, &config.host, config.port)?.await
}
