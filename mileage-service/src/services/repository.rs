//! Mileage store access.
//!
//! [`MileageRepository`] is the read seam over the `daily_mileage` table. The
//! PostgreSQL implementation lives in [`crate::services::database`]; the
//! in-memory one below backs tests and local runs without a database.

use crate::models::DailyMileage;
use async_trait::async_trait;
use chrono::NaiveDate;
use service_core::error::AppError;
use std::sync::atomic::{AtomicI32, Ordering};
use tokio::sync::RwLock;

#[async_trait]
pub trait MileageRepository: Send + Sync {
    /// Every record in the store.
    async fn find_all(&self) -> Result<Vec<DailyMileage>, AppError>;

    /// Every record for one car.
    async fn find_by_car(&self, car_id: i32) -> Result<Vec<DailyMileage>, AppError>;

    /// The first record (lowest `mileage_id`) for a car on a date.
    async fn find_by_car_and_date(
        &self,
        car_id: i32,
        recorded_at: NaiveDate,
    ) -> Result<Option<DailyMileage>, AppError>;

    /// Every record recorded on a date.
    async fn find_by_date(&self, recorded_at: NaiveDate) -> Result<Vec<DailyMileage>, AppError>;

    async fn health_check(&self) -> Result<(), AppError>;
}

/// Records kept in insertion order behind an async lock.
#[derive(Default)]
pub struct InMemoryMileageRepository {
    records: RwLock<Vec<DailyMileage>>,
    next_id: AtomicI32,
}

impl InMemoryMileageRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record, assigning the next `mileage_id`.
    pub async fn insert(&self, car_id: i32, daily_km: i32, recorded_at: NaiveDate) -> DailyMileage {
        let record = DailyMileage {
            mileage_id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            car_id,
            daily_km,
            recorded_at,
        };
        self.records.write().await.push(record.clone());
        record
    }

    async fn filtered<P>(&self, predicate: P) -> Vec<DailyMileage>
    where
        P: Fn(&DailyMileage) -> bool,
    {
        let mut matches: Vec<DailyMileage> = self
            .records
            .read()
            .await
            .iter()
            .filter(|r| predicate(*r))
            .cloned()
            .collect();
        matches.sort_by_key(|r| (r.recorded_at, r.car_id, r.mileage_id));
        matches
    }
}

#[async_trait]
impl MileageRepository for InMemoryMileageRepository {
    async fn find_all(&self) -> Result<Vec<DailyMileage>, AppError> {
        Ok(self.filtered(|_| true).await)
    }

    async fn find_by_car(&self, car_id: i32) -> Result<Vec<DailyMileage>, AppError> {
        Ok(self.filtered(|r| r.car_id == car_id).await)
    }

    async fn find_by_car_and_date(
        &self,
        car_id: i32,
        recorded_at: NaiveDate,
    ) -> Result<Option<DailyMileage>, AppError> {
        Ok(self
            .filtered(|r| r.car_id == car_id && r.recorded_at == recorded_at)
            .await
            .into_iter()
            .min_by_key(|r| r.mileage_id))
    }

    async fn find_by_date(&self, recorded_at: NaiveDate) -> Result<Vec<DailyMileage>, AppError> {
        Ok(self.filtered(|r| r.recorded_at == recorded_at).await)
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }
}
