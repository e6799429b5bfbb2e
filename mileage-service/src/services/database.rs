//! PostgreSQL access to the mileage store.

use crate::models::DailyMileage;
use crate::services::metrics::DB_QUERY_DURATION;
use crate::services::repository::MileageRepository;
use async_trait::async_trait;
use chrono::NaiveDate;
use service_core::error::AppError;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{info, instrument};

const SELECT_COLUMNS: &str = "SELECT mileage_id, car_id, daily_km, recorded_at FROM daily_mileage";

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database connection pool.
    #[instrument(skip(database_url), fields(service = "mileage-service"))]
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, AppError> {
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
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to connect: {}", e)))?;

        info!("PostgreSQL connection pool established");

        Ok(Self { pool })
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run database migrations.
    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Migration failed: {}", e)))?;
        info!("Database migrations completed");
        Ok(())
    }
}

#[async_trait]
impl MileageRepository for Database {
    #[instrument(skip(self))]
    async fn find_all(&self) -> Result<Vec<DailyMileage>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["find_all"])
            .start_timer();

        let records = sqlx::query_as::<_, DailyMileage>(&format!(
            "{} ORDER BY recorded_at, car_id, mileage_id",
            SELECT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to list mileage records: {}", e))
        })?;

        timer.observe_duration();
        Ok(records)
    }

    #[instrument(skip(self), fields(car_id = car_id))]
    async fn find_by_car(&self, car_id: i32) -> Result<Vec<DailyMileage>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["find_by_car"])
            .start_timer();

        let records = sqlx::query_as::<_, DailyMileage>(&format!(
            "{} WHERE car_id = $1 ORDER BY recorded_at, mileage_id",
            SELECT_COLUMNS
        ))
        .bind(car_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to list mileage for car: {}", e))
        })?;

        timer.observe_duration();
        Ok(records)
    }

    #[instrument(skip(self), fields(car_id = car_id, recorded_at = %recorded_at))]
    async fn find_by_car_and_date(
        &self,
        car_id: i32,
        recorded_at: NaiveDate,
    ) -> Result<Option<DailyMileage>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["find_by_car_and_date"])
            .start_timer();

        let record = sqlx::query_as::<_, DailyMileage>(&format!(
            "{} WHERE car_id = $1 AND recorded_at = $2 ORDER BY mileage_id LIMIT 1",
            SELECT_COLUMNS
        ))
        .bind(car_id)
        .bind(recorded_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to get mileage record: {}", e))
        })?;

        timer.observe_duration();
        Ok(record)
    }

    #[instrument(skip(self), fields(recorded_at = %recorded_at))]
    async fn find_by_date(&self, recorded_at: NaiveDate) -> Result<Vec<DailyMileage>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["find_by_date"])
            .start_timer();

        let records = sqlx::query_as::<_, DailyMileage>(&format!(
            "{} WHERE recorded_at = $1 ORDER BY car_id, mileage_id",
            SELECT_COLUMNS
        ))
        .bind(recorded_at)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to list mileage for date: {}", e))
        })?;

        timer.observe_duration();
        Ok(records)
    }

    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<(), AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["health_check"])
            .start_timer();

        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Health check failed: {}", e)))?;

        timer.observe_duration();
        Ok(())
    }
}
