//! Mints a staff session token from the configured `SESSION_SECRET`.
//!
//! Usage: `issue_admin_token <staff-id> [role]` (role defaults to `admin`).

use std::env;
use std::process::ExitCode;

use dotenvy::dotenv;
use rental_quotes::auth::{SessionKeys, ADMIN_ROLE};
use rental_quotes::config::AppConfig;

fn main() -> ExitCode {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("warn"));

    let mut args = env::args().skip(1);
    let Some(subject) = args.next() else {
        eprintln!("usage: issue_admin_token <staff-id> [role]");
        return ExitCode::from(2);
    };
    let role = args.next().unwrap_or_else(|| ADMIN_ROLE.to_string());

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let keys = SessionKeys::new(config.session_secret.as_bytes(), config.session_ttl_minutes);
    match keys.issue(&subject, &role) {
        Ok(token) => {
            log::info!(
                "Issued {} session for {} valid {} minutes",
                role,
                subject,
                config.session_ttl_minutes
            );
            println!("{}", token);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
