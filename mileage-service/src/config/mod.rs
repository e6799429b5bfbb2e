//! Configuration module for mileage-service.

use service_core::config::{self as core_config, DatabaseSettings};
use service_core::error::AppError;
use std::env;

#[derive(Debug, Clone)]
pub struct MileageConfig {
    pub common: core_config::Config,
    pub service_name: String,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
    pub database: DatabaseSettings,
}

impl MileageConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;

        Ok(Self {
            common,
            service_name: env::var("SERVICE_NAME")
                .unwrap_or_else(|_| "mileage-service".to_string()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok(),
            database: DatabaseSettings::from_env("MILEAGE")?,
        })
    }
}
