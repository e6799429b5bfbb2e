//! Workflow test infrastructure.
//!
//! Runs the mileage API in-process and points a reconciliation job at it over
//! real HTTP, so the two services only meet through the read API.

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use contract_reconciler::client::MileageClient;
use contract_reconciler::job::ReconciliationJob;
use contract_reconciler::services::InMemoryContractStore;
use mileage_service::config::MileageConfig;
use mileage_service::services::InMemoryMileageRepository;
use mileage_service::startup::Application;
use secrecy::Secret;
use service_core::config::{Config as CommonConfig, DatabaseSettings};
use std::sync::{Arc, Once};
use std::time::Duration;

static INIT: Once = Once::new();

/// Initialize tracing for tests (only once).
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("info,workflow_tests=debug,contract_reconciler=debug")
            .with_test_writer()
            .try_init()
            .ok();
    });
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid calendar date")
}

fn mileage_config() -> MileageConfig {
    MileageConfig {
        common: CommonConfig { port: 0 },
        service_name: "mileage-service-workflow".to_string(),
        log_level: "info".to_string(),
        otlp_endpoint: None,
        // Never dialled: the in-memory repository serves the API.
        database: DatabaseSettings {
            host: "localhost".to_string(),
            port: 5432,
            user: "unused".to_string(),
            password: Secret::new("unused".to_string()),
            name: "unused".to_string(),
            max_connections: 1,
            min_connections: 0,
        },
    }
}

/// Poll `health_url` until it answers 200 or `timeout` elapses.
pub async fn wait_for_health(client: &reqwest::Client, health_url: &str, timeout: Duration) -> Result<()> {
    let start = std::time::Instant::now();

    loop {
        if let Ok(resp) = client.get(health_url).send().await {
            if resp.status().is_success() {
                tracing::debug!(url = %health_url, "Service healthy");
                return Ok(());
            }
        }

        if start.elapsed() > timeout {
            return Err(anyhow!("{} not healthy after {:?}", health_url, timeout));
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}

/// A running mileage API plus an in-memory rental store.
pub struct WorkflowTestContext {
    pub mileage_url: String,
    pub mileage: Arc<InMemoryMileageRepository>,
    pub contracts: Arc<InMemoryContractStore>,
    pub http: reqwest::Client,
}

impl WorkflowTestContext {
    pub async fn new() -> Result<Self> {
        init_tracing();

        let mileage = Arc::new(InMemoryMileageRepository::new());
        let app = Application::with_repository(mileage_config(), mileage.clone())
            .await
            .map_err(|e| anyhow!("Failed to build mileage-service: {}", e))?;
        let mileage_url = format!("http://127.0.0.1:{}", app.port());

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        let http = reqwest::Client::new();
        wait_for_health(&http, &format!("{}/health", mileage_url), Duration::from_secs(5)).await?;

        Ok(Self {
            mileage_url,
            mileage,
            contracts: Arc::new(InMemoryContractStore::new()),
            http,
        })
    }

    /// A reconciliation job reading from this context's mileage API.
    pub fn job(&self) -> Result<ReconciliationJob> {
        let client = MileageClient::new(&self.mileage_url, Duration::from_secs(5))?;
        Ok(ReconciliationJob::new(client, self.contracts.clone()))
    }

    pub async fn record_mileage(&self, car_id: i32, daily_km: i32, date: NaiveDate) {
        self.mileage.insert(car_id, daily_km, date).await;
    }

    /// Open a contract for each car, all starting at zero kilometers.
    pub async fn open_contracts(&self, cars: &[i32]) {
        for car_id in cars {
            self.contracts
                .open_contract(1000 + car_id, *car_id, day(2025, 1, 1))
                .await;
        }
    }

    pub async fn km_used(&self, car_id: i32) -> Option<i32> {
        self.contracts.total_km_used(car_id).await
    }
}
