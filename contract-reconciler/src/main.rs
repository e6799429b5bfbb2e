//! Contract Reconciler entry point. Runs one reconciliation and exits.

use clap::Parser;
use contract_reconciler::cli::Cli;
use contract_reconciler::client::MileageClient;
use contract_reconciler::config::ReconcilerConfig;
use contract_reconciler::job::ReconciliationJob;
use contract_reconciler::services::Database;
use secrecy::ExposeSecret;
use service_core::observability::{init_tracing, shutdown_tracing};
use std::sync::Arc;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let cli = Cli::parse();

    let config = ReconcilerConfig::from_env().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::other(format!("Configuration error: {}", e))
    })?;

    init_tracing(
        &config.service_name,
        &config.log_level,
        config.otlp_endpoint.as_deref(),
    )
    .map_err(|e| {
        eprintln!("Failed to initialize tracing: {}", e);
        std::io::Error::other(e.to_string())
    })?;

    let date = cli.target_date();
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        date = %date,
        mileage_api = %config.mileage_api.url,
        db_host = %config.database.host,
        db_name = %config.database.name,
        "Starting reconciliation"
    );

    let result = run(&config, date).await;
    shutdown_tracing();

    result.map_err(|e| std::io::Error::other(e.to_string()))
}

async fn run(config: &ReconcilerConfig, date: chrono::NaiveDate) -> anyhow::Result<()> {
    let database = Database::new(
        config.database.connection_url().expose_secret(),
        config.database.max_connections,
        config.database.min_connections,
    )
    .await?;

    if config.run_migrations {
        database.run_migrations().await?;
    }

    let client = MileageClient::new(&config.mileage_api.url, config.mileage_api.timeout)?;
    let job = ReconciliationJob::new(client, Arc::new(database));

    match job.run(date).await {
        Ok(summary) => {
            if !summary.unmatched_cars.is_empty() {
                tracing::warn!(
                    unmatched_cars = ?summary.unmatched_cars,
                    "Some cars have no rental contract"
                );
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, date = %date, "Reconciliation failed");
            Err(e.into())
        }
    }
}
