//! PostgreSQL access to the rental store.

use crate::error::ReconcileError;
use crate::models::{ApplyOutcome, Contract, MileageRecord};
use crate::services::contracts::ContractStore;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::postgres::{PgConnection, PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database connection pool.
    #[instrument(skip(database_url), fields(service = "contract-reconciler"))]
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, ReconcileError> {
        info!(
            max_connections = max_connections,
            min_connections = min_connections,
            "Connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .connect(database_url)
            .await
            .map_err(|e| ReconcileError::Database(anyhow::anyhow!("Failed to connect: {}", e)))?;

        info!("PostgreSQL connection pool established");

        Ok(Self { pool })
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run database migrations.
    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> Result<(), ReconcileError> {
        info!("Running database migrations");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| ReconcileError::Database(anyhow::anyhow!("Migration failed: {}", e)))?;
        info!("Database migrations completed");
        Ok(())
    }

    #[instrument(skip(self), fields(car_id = car_id))]
    pub async fn contracts_for_car(&self, car_id: i32) -> Result<Vec<Contract>, ReconcileError> {
        sqlx::query_as::<_, Contract>(
            r#"
            SELECT id, customer_id, car_id, month_contract, total_km_used
            FROM contract
            WHERE car_id = $1
            ORDER BY id
            "#,
        )
        .bind(car_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ReconcileError::Database(anyhow::anyhow!("Failed to list contracts: {}", e)))
    }

    /// Insert a contract starting at zero kilometers.
    #[instrument(skip(self))]
    pub async fn create_contract(
        &self,
        customer_id: i32,
        car_id: i32,
        month_contract: NaiveDate,
    ) -> Result<Contract, ReconcileError> {
        sqlx::query_as::<_, Contract>(
            r#"
            INSERT INTO contract (customer_id, car_id, month_contract, total_km_used)
            VALUES ($1, $2, $3, 0)
            RETURNING id, customer_id, car_id, month_contract, total_km_used
            "#,
        )
        .bind(customer_id)
        .bind(car_id)
        .bind(month_contract)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| ReconcileError::Database(anyhow::anyhow!("Failed to create contract: {}", e)))
    }
}

async fn apply_records(
    conn: &mut PgConnection,
    records: &[MileageRecord],
) -> Result<ApplyOutcome, ReconcileError> {
    let mut outcome = ApplyOutcome::default();

    for record in records {
        let result = sqlx::query(
            r#"
            UPDATE contract
            SET total_km_used = total_km_used + $1
            WHERE car_id = $2
            "#,
        )
        .bind(record.daily_km)
        .bind(record.car_id)
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            ReconcileError::Database(anyhow::anyhow!(
                "Failed to update mileage for car_id {}: {}",
                record.car_id,
                e
            ))
        })?;

        let touched = result.rows_affected();
        if touched == 0 {
            warn!(car_id = record.car_id, "No contract for car, mileage not applied");
            outcome.unmatched_cars.push(record.car_id);
        } else {
            info!(
                car_id = record.car_id,
                daily_km = record.daily_km,
                contracts = touched,
                "Updated mileage for car"
            );
            outcome.records_applied += 1;
            outcome.contracts_updated += touched;
            outcome.km_applied += i64::from(record.daily_km);
        }
    }

    Ok(outcome)
}

#[async_trait]
impl ContractStore for Database {
    #[instrument(skip(self, records), fields(records = records.len()))]
    async fn apply_mileage(&self, records: &[MileageRecord]) -> Result<ApplyOutcome, ReconcileError> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            ReconcileError::Database(anyhow::anyhow!("Failed to begin transaction: {}", e))
        })?;

        match apply_records(&mut *tx, records).await {
            Ok(outcome) => {
                tx.commit().await.map_err(|e| {
                    ReconcileError::Database(anyhow::anyhow!("Failed to commit transaction: {}", e))
                })?;
                Ok(outcome)
            }
            Err(e) => {
                warn!(error = %e, "Rolling back contract updates");
                if let Err(rollback_err) = tx.rollback().await {
                    warn!(error = %rollback_err, "Rollback failed, connection discarded");
                }
                Err(e)
            }
        }
    }
}
