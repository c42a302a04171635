//! Configuration management for the Flower Delivery Management Platform
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with FDM_ prefix

use chrono::FixedOffset;
use config::{ConfigError, Environment, File};
use serde::Deserialize;
use shared::DayBoundary;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Delivery intake configuration
    pub delivery: DeliveryConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DeliveryConfig {
    /// UTC offset in hours of the farm's local day, used to bucket
    /// deliveries into calendar days for duplicate detection
    pub utc_offset_hours: i32,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("FDM_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            // Ecuador mainland, UTC-5
            .set_default("delivery.utc_offset_hours", -5)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (FDM_ prefix)
            .add_source(
                Environment::with_prefix("FDM")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// The day-bucketing policy derived from the configured offset
    pub fn day_boundary(&self) -> Result<DayBoundary, ConfigError> {
        FixedOffset::east_opt(self.delivery.utc_offset_hours * 3600)
            .map(DayBoundary::new)
            .ok_or_else(|| {
                ConfigError::Message(format!(
                    "delivery.utc_offset_hours out of range: {}",
                    self.delivery.utc_offset_hours
                ))
            })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}
