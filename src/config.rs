//! Runtime configuration read from the environment.

use std::env;
use std::str::FromStr;

use crate::services::shop::SlugPolicy;

/// Settings shared by the HTTP server and the route handlers.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Path of the SQLite database file.
    pub database_url: String,
    pub address: String,
    pub port: u16,
    /// Key material for signing flash message cookies.
    pub secret: Option<String>,
    /// Directory served under `/media`.
    pub media_root: String,
    /// Whether the `/admin` pages are mounted.
    pub admin_enabled: bool,
    /// How product detail pages resolve duplicate slugs.
    pub slug_policy: SlugPolicy,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database_url: "app.db".to_string(),
            address: "127.0.0.1".to_string(),
            port: 8080,
            secret: None,
            media_root: "./media".to_string(),
            admin_enabled: false,
            slug_policy: SlugPolicy::FirstMatch,
        }
    }
}

impl ServerConfig {
    /// Build the configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let strict_slugs = parse_or("STRICT_PRODUCT_SLUGS", lookup("STRICT_PRODUCT_SLUGS"), false);

        Self {
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            address: lookup("ADDRESS").unwrap_or(defaults.address),
            port: parse_or("PORT", lookup("PORT"), defaults.port),
            secret: lookup("SECRET_KEY").filter(|value| !value.is_empty()),
            media_root: lookup("MEDIA_ROOT").unwrap_or(defaults.media_root),
            admin_enabled: parse_or("ADMIN_ENABLED", lookup("ADMIN_ENABLED"), defaults.admin_enabled),
            slug_policy: if strict_slugs {
                SlugPolicy::Unique
            } else {
                SlugPolicy::FirstMatch
            },
        }
    }
}

fn parse_or<T: FromStr>(key: &str, value: Option<String>, default: T) -> T {
    match value {
        None => default,
        Some(raw) => match raw.trim().parse::<T>() {
            Ok(parsed) => parsed,
            Err(_) => {
                log::warn!("Ignoring invalid value `{raw}` for {key}");
                default
            }
        },
    }
}
