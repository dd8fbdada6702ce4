//! Environment-based server configuration.

use std::env;

/// Environment variable names - single source of truth
pub mod env_vars {
    pub const PORT: &str = "PORT";
    pub const DATABASE_URL: &str = "DATABASE_URL";
    pub const STATIC_DIR: &str = "STATIC_DIR";
}

/// Default values
pub mod defaults {
    pub const PORT: u16 = 8080;
    pub const DATABASE_URL: &str = "./.db/cardforge.db";
    pub const STATIC_DIR: &str = "./frontend";
}

#[derive(Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub static_dir: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            port: env::var(env_vars::PORT)
                .unwrap_or_else(|_| defaults::PORT.to_string())
                .parse()
                .expect("PORT must be a valid number"),
            database_url: env::var(env_vars::DATABASE_URL)
                .unwrap_or_else(|_| defaults::DATABASE_URL.to_string()),
            static_dir: env::var(env_vars::STATIC_DIR)
                .unwrap_or_else(|_| defaults::STATIC_DIR.to_string()),
        }
    }
}
