use crate::models::DailyMileage;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Wire form of a daily mileage record. `recorded_at` serializes as `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyMileageResponse {
    pub car_id: i32,
    pub daily_km: i32,
    pub recorded_at: NaiveDate,
}

impl From<DailyMileage> for DailyMileageResponse {
    fn from(record: DailyMileage) -> Self {
        Self {
            car_id: record.car_id,
            daily_km: record.daily_km,
            recorded_at: record.recorded_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct WelcomeResponse {
    pub message: &'static str,
}
