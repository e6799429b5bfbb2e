//! Domain models for mileage-service.

use chrono::NaiveDate;
use sqlx::FromRow;

/// One observation of kilometers driven by a car on a given day.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct DailyMileage {
    pub mileage_id: i32,
    pub car_id: i32,
    pub daily_km: i32,
    pub recorded_at: NaiveDate,
}
