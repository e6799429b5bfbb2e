//! Common test utilities for mileage-service integration tests.

use chrono::NaiveDate;
use mileage_service::config::MileageConfig;
use mileage_service::services::InMemoryMileageRepository;
use mileage_service::startup::Application;
use secrecy::Secret;
use service_core::config::{Config as CommonConfig, DatabaseSettings};
use std::sync::{Arc, Once};

static INIT: Once = Once::new();

/// Initialize tracing for tests (only once).
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("info,mileage_service=debug,sqlx=warn")
            .with_test_writer()
            .try_init()
            .ok();
    });
}

#[allow(dead_code)]
pub fn test_config(database: DatabaseSettings) -> MileageConfig {
    MileageConfig {
        common: CommonConfig { port: 0 },
        service_name: "mileage-service-test".to_string(),
        log_level: "debug".to_string(),
        otlp_endpoint: None,
        database,
    }
}

/// Settings that are never dialled; the in-memory repository stands in for PostgreSQL.
#[allow(dead_code)]
pub fn unused_database() -> DatabaseSettings {
    DatabaseSettings {
        host: "localhost".to_string(),
        port: 5432,
        user: "unused".to_string(),
        password: Secret::new("unused".to_string()),
        name: "unused".to_string(),
        max_connections: 1,
        min_connections: 0,
    }
}

#[allow(dead_code)]
pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[allow(dead_code)]
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub repository: Arc<InMemoryMileageRepository>,
    pub client: reqwest::Client,
}

#[allow(dead_code)]
impl TestApp {
    /// Spawn the service over an empty in-memory store.
    pub async fn spawn() -> Self {
        init_tracing();

        let repository = Arc::new(InMemoryMileageRepository::new());
        let app = Application::with_repository(test_config(unused_database()), repository.clone())
            .await
            .expect("Failed to build application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        let client = reqwest::Client::new();
        for _ in 0..50 {
            if client
                .get(format!("{}/health", address))
                .send()
                .await
                .is_ok()
            {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            repository,
            client,
        }
    }

    /// Spawn the service seeded with the reference data set.
    pub async fn spawn_seeded() -> Self {
        let app = Self::spawn().await;
        app.repository.insert(1, 100, day(2025, 1, 1)).await;
        app.repository.insert(2, 100, day(2025, 1, 1)).await;
        app.repository.insert(2, 150, day(2025, 1, 2)).await;
        app.repository.insert(3, 200, day(2025, 1, 3)).await;
        app
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{}", self.address, path))
            .send()
            .await
            .expect("Failed to execute request")
    }
}
