use anyhow::{Context, Result};

use crate::models::kinds::{EntityKind, WireIdKeys};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
///
/// Not `Debug`: it carries the signing secret and the admin password.
#[derive(Clone)]
pub struct Config {
    pub mongo_uri: String,
    pub db_name: String,
    pub redis_url: String,
    pub generation_queue: String,
    pub delivery_queue: String,
    pub jwt_secret: String,
    /// Login is refused for everyone while unset.
    pub admin_password: Option<String>,
    pub wire_ids: WireIdKeys,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            mongo_uri: require_env("MONGO_HOST")?,
            db_name: env_or("DB_NAME", "cover_letter"),
            redis_url: redis_url(),
            generation_queue: env_or(
                "REDIS_QUEUE_GENERATE_COVER_LETTER_NAME",
                "cover_letter_generation_queue",
            ),
            delivery_queue: env_or("EMAILS_TO_SEND_QUEUE", "emails_to_send"),
            jwt_secret: require_env("JWT_SECRET")?,
            admin_password: optional_env("ADMIN_PASSWORD"),
            wire_ids: wire_ids(),
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Config {
            mongo_uri: "mongodb://localhost:27017".to_string(),
            db_name: "cover_letter_test".to_string(),
            redis_url: "redis://localhost:6379".to_string(),
            generation_queue: "cover_letter_generation_queue".to_string(),
            delivery_queue: "emails_to_send".to_string(),
            jwt_secret: "test-secret".to_string(),
            admin_password: Some("letmein".to_string()),
            wire_ids: WireIdKeys::default(),
            port: 0,
            rust_log: "debug".to_string(),
        }
    }
}

fn redis_url() -> String {
    optional_env("REDIS_URL").unwrap_or_else(|| {
        format!(
            "redis://{}:{}",
            env_or("REDIS_HOST", "localhost"),
            env_or("REDIS_PORT", "6379")
        )
    })
}

fn wire_ids() -> WireIdKeys {
    EntityKind::ALL.iter().fold(WireIdKeys::default(), |ids, kind| {
        match optional_env(&format!("WIRE_ID_KEY_{}", kind.env_suffix())) {
            Some(key) => ids.with_override(*kind, key),
            None => ids,
        }
    })
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Unset and blank are treated alike.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    optional_env(key).unwrap_or_else(|| default.to_string())
}
