//! Configuration module for contract-reconciler.

use service_core::config::DatabaseSettings;
use service_core::error::AppError;
use std::time::Duration;

const DEFAULT_MILEAGE_API_URL: &str = "http://localhost:8000";
const DEFAULT_MILEAGE_API_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone)]
pub struct ReconcilerConfig {
    pub service_name: String,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
    pub database: DatabaseSettings,
    pub mileage_api: MileageApiConfig,
    pub run_migrations: bool,
}

#[derive(Debug, Clone)]
pub struct MileageApiConfig {
    pub url: String,
    pub timeout: Duration,
}

impl ReconcilerConfig {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let timeout_secs = match lookup("MILEAGE_API_TIMEOUT_SECS") {
            Some(raw) => raw.parse::<u64>().map_err(|_| {
                AppError::ConfigError(anyhow::anyhow!(
                    "MILEAGE_API_TIMEOUT_SECS must be a whole number of seconds"
                ))
            })?,
            None => DEFAULT_MILEAGE_API_TIMEOUT_SECS,
        };

        Ok(Self {
            service_name: lookup("SERVICE_NAME")
                .unwrap_or_else(|| "contract-reconciler".to_string()),
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            otlp_endpoint: lookup("OTLP_ENDPOINT"),
            database: DatabaseSettings::from_lookup("RENTCAR", &lookup)?,
            mileage_api: MileageApiConfig {
                url: lookup("MILEAGE_API_URL")
                    .unwrap_or_else(|| DEFAULT_MILEAGE_API_URL.to_string()),
                timeout: Duration::from_secs(timeout_secs),
            },
            run_migrations: lookup("RUN_MIGRATIONS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(false),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let mut map: HashMap<String, String> = [
            ("POSTGRES_RENTCAR_USER", "rent"),
            ("POSTGRES_RENTCAR_PASSWORD", "pw"),
            ("POSTGRES_RENTCAR_DB", "rentcar"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        for (k, v) in pairs {
            map.insert(k.to_string(), v.to_string());
        }
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_the_database_is_set() {
        let config = ReconcilerConfig::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config.mileage_api.url, "http://localhost:8000");
        assert_eq!(config.mileage_api.timeout, Duration::from_secs(15));
        assert!(!config.run_migrations);
        assert_eq!(config.service_name, "contract-reconciler");
        assert_eq!(config.log_level, "info");
        assert!(config.otlp_endpoint.is_none());
        assert_eq!(config.database.name, "rentcar");
    }

    #[test]
    fn overrides_are_read() {
        let config = ReconcilerConfig::from_lookup(lookup_from(&[
            ("MILEAGE_API_URL", "http://mileage:9000"),
            ("MILEAGE_API_TIMEOUT_SECS", "3"),
            ("RUN_MIGRATIONS", "true"),
            ("OTLP_ENDPOINT", "http://otel:4317"),
        ]))
        .unwrap();

        assert_eq!(config.mileage_api.url, "http://mileage:9000");
        assert_eq!(config.mileage_api.timeout, Duration::from_secs(3));
        assert!(config.run_migrations);
        assert_eq!(config.otlp_endpoint.as_deref(), Some("http://otel:4317"));
    }

    #[test]
    fn rejects_non_numeric_timeout() {
        let result =
            ReconcilerConfig::from_lookup(lookup_from(&[("MILEAGE_API_TIMEOUT_SECS", "soon")]));

        assert!(matches!(result, Err(AppError::ConfigError(_))));
    }

    #[test]
    fn reads_only_the_rental_database_variables() {
        let result = ReconcilerConfig::from_lookup(|key: &str| {
            key.starts_with("POSTGRES_MILEAGE_")
                .then(|| "mileage".to_string())
        });

        let err = result.unwrap_err();
        assert!(err.to_string().contains("POSTGRES_RENTCAR_USER"));
    }
}
