use anyhow::{Context, Result};
use dotenvy::dotenv;
use sqlx::postgres::PgConnectOptions;
use std::env;

use crate::domains::jobs::activities::ingest::DEFAULT_START_PAGE;

/// Postgres connection parameters, each with a local-development default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5434,
            name: "jobs".to_string(),
            user: "jobs".to_string(),
            password: "jobs".to_string(),
        }
    }
}

impl DatabaseConfig {
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.name)
            .username(&self.user)
            .password(&self.password)
    }
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Adzuna credentials are passed through unchecked; the provider rejects bad ones.
    pub adzuna_app_id: String,
    pub adzuna_app_key: String,
    pub adzuna_country: String,
    pub adzuna_results_per_page: u32,
    pub start_page: u32,
    pub database: DatabaseConfig,
    pub openai_api_key: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let defaults = DatabaseConfig::default();

        Ok(Self {
            adzuna_app_id: env::var("ADZUNA_APP_ID").unwrap_or_default(),
            adzuna_app_key: env::var("ADZUNA_API_KEY").unwrap_or_default(),
            adzuna_country: env::var("ADZUNA_COUNTRY")
                .unwrap_or_else(|_| adzuna_client::DEFAULT_COUNTRY.to_string()),
            adzuna_results_per_page: env::var("ADZUNA_RESULTS_PER_PAGE")
                .unwrap_or_else(|_| adzuna_client::DEFAULT_RESULTS_PER_PAGE.to_string())
                .parse()
                .context("ADZUNA_RESULTS_PER_PAGE must be a valid number")?,
            start_page: env::var("ADZUNA_START_PAGE")
                .unwrap_or_else(|_| DEFAULT_START_PAGE.to_string())
                .parse()
                .context("ADZUNA_START_PAGE must be a valid number")?,
            database: DatabaseConfig {
                host: env::var("DB_HOST").unwrap_or(defaults.host),
                port: env::var("DB_PORT")
                    .unwrap_or_else(|_| defaults.port.to_string())
                    .parse()
                    .context("DB_PORT must be a valid number")?,
                name: env::var("DB_NAME").unwrap_or(defaults.name),
                user: env::var("DB_USER").unwrap_or(defaults.user),
                password: env::var("DB_PASSWORD").unwrap_or(defaults.password),
            },
            openai_api_key: env::var("OPENAI_API_KEY").ok(),
        })
    }

    /// Adzuna client configured for this run's market and page size.
    pub fn adzuna_client(&self) -> adzuna_client::AdzunaClient {
        adzuna_client::AdzunaClient::new(&self.adzuna_app_id, &self.adzuna_app_key)
            .with_country(&self.adzuna_country)
            .with_results_per_page(self.adzuna_results_per_page)
    }

    pub fn require_openai_api_key(&self) -> Result<&str> {
        self.openai_api_key
            .as_deref()
            .context("OPENAI_API_KEY must be set")
    }
}
