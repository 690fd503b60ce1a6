//! Application configuration
//!
//! This module provides centralized configuration management using the `config` crate.
//! Configuration can be loaded from environment variables and config files.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub notification: NotificationConfig,
    #[serde(default)]
    pub billing: BillingConfig,
}

/// HTTP server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Number of worker threads
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Comma separated list of allowed CORS origins
    #[serde(default = "default_cors_origins")]
    pub cors_origins: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_workers() -> usize {
    num_cpus::get()
}

fn default_cors_origins() -> String {
    "http://localhost:3000,http://127.0.0.1:3000".to_string()
}

/// Database configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Connection acquire timeout in seconds
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
}

fn default_max_connections() -> u32 {
    10
}

fn default_acquire_timeout() -> u64 {
    30
}

/// Email notification service configuration
#[derive(Debug, Deserialize, Clone)]
pub struct NotificationConfig {
    /// Endpoint accepting `{toEmail, body, subject}` JSON posts
    #[serde(default = "default_email_service_url")]
    pub email_service_url: String,

    /// Request timeout in milliseconds
    #[serde(default = "default_notification_timeout")]
    pub timeout_ms: u64,

    /// When false, bill notifications are skipped entirely
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_email_service_url() -> String {
    "http://localhost:9001/sendEmail".to_string()
}

fn default_notification_timeout() -> u64 {
    5000
}

fn default_true() -> bool {
    true
}

/// Billing-specific configuration
#[derive(Debug, Deserialize, Clone)]
pub struct BillingConfig {
    /// Floor given to meters created lazily for an unseen load capacity
    #[serde(default = "default_minimum_bill_amount")]
    pub default_minimum_bill_amount: i32,

    /// Seed the four default meters when the meter table is empty
    #[serde(default = "default_true")]
    pub seed_default_meters: bool,
}

fn default_minimum_bill_amount() -> i32 {
    1250
}

impl AppConfig {
    /// Load configuration from environment and optional config file
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = Config::builder()
            // Start with default values
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("server.workers", num_cpus::get() as i64)?
            .set_default("database.max_connections", 10)?
            .set_default("database.acquire_timeout_secs", 30)?
            .set_default("notification.email_service_url", default_email_service_url())?
            .set_default("notification.timeout_ms", 5000)?
            .set_default("notification.enabled", true)?
            .set_default("billing.default_minimum_bill_amount", 1250)?
            .set_default("billing.seed_default_meters", true)?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Load from environment variables with AMPERE_ prefix
            .add_source(
                Environment::with_prefix("AMPERE")
                    .separator("__")
                    .try_parsing(true),
            )
            // Conventional DATABASE_URL wins when present
            .set_override_option("database.url", env::var("DATABASE_URL").ok())?
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name(path))
            .add_source(Environment::with_prefix("AMPERE").separator("__"))
            .build()?;

        config.try_deserialize()
    }

    /// Get the server bind address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            email_service_url: default_email_service_url(),
            timeout_ms: default_notification_timeout(),
            enabled: true,
        }
    }
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            default_minimum_bill_amount: default_minimum_bill_amount(),
            seed_default_meters: true,
        }
    }
}
