use std::env;

use anyhow::Context;

pub const DEFAULT_SESSION_COOKIE: &str = "shop_session";

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// Bearer token for the catalog/user admin endpoints; admin routes are closed when unset
    pub admin_token: Option<String>,
    /// Name of the cookie carrying the session token
    pub session_cookie_name: String,
    /// Add the `Secure` attribute to the session cookie
    pub session_cookie_secure: bool,
    /// Apply the bundled schema on startup
    pub run_migrations: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let port = match env::var("PORT") {
            Ok(p) => p.parse().context("PORT must be a valid port number")?,
            Err(_) => 8080,
        };

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port,
            admin_token: env::var("ADMIN_TOKEN").ok().filter(|t| !t.is_empty()),
            session_cookie_name: env::var("SESSION_COOKIE_NAME")
                .unwrap_or_else(|_| DEFAULT_SESSION_COOKIE.to_string()),
            session_cookie_secure: env::var("SESSION_COOKIE_SECURE")
                .map(|v| parse_flag(&v))
                .unwrap_or(false),
            run_migrations: env::var("RUN_MIGRATIONS")
                .map(|v| parse_flag(&v))
                .unwrap_or(true),
        })
    }

    /// Check if the admin endpoints are enabled
    pub fn admin_enabled(&self) -> bool {
        self.admin_token.is_some()
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
