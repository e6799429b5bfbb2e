//! Read-only mileage lookups.
//!
//! An empty result is never returned as success: every lookup that finds
//! nothing yields [`AppError::NotFound`], which the HTTP layer maps to 404.

use crate::models::DailyMileage;
use crate::services::metrics::record_lookup;
use crate::services::repository::MileageRepository;
use chrono::NaiveDate;
use service_core::error::AppError;
use std::sync::Arc;

#[derive(Clone)]
pub struct MileageQueryService {
    repository: Arc<dyn MileageRepository>,
}

impl MileageQueryService {
    pub fn new(repository: Arc<dyn MileageRepository>) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &Arc<dyn MileageRepository> {
        &self.repository
    }

    pub async fn list_all(&self) -> Result<Vec<DailyMileage>, AppError> {
        let records = self.repository.find_all().await;
        non_empty("list_all", records, || {
            "No mileage records found".to_string()
        })
    }

    pub async fn list_by_car(&self, car_id: i32) -> Result<Vec<DailyMileage>, AppError> {
        let records = self.repository.find_by_car(car_id).await;
        non_empty("list_by_car", records, || {
            format!("No mileage records found for car_id {}", car_id)
        })
    }

    pub async fn get_by_car_and_date(
        &self,
        car_id: i32,
        recorded_at: NaiveDate,
    ) -> Result<DailyMileage, AppError> {
        match self.repository.find_by_car_and_date(car_id, recorded_at).await {
            Ok(Some(record)) => {
                record_lookup("get_by_car_and_date", "found");
                Ok(record)
            }
            Ok(None) => {
                record_lookup("get_by_car_and_date", "not_found");
                tracing::debug!(car_id, %recorded_at, "No mileage record for car on date");
                Err(AppError::not_found(format!(
                    "No mileage record found for car_id {} on {}",
                    car_id, recorded_at
                )))
            }
            Err(e) => {
                record_lookup("get_by_car_and_date", "error");
                Err(e)
            }
        }
    }

    pub async fn list_by_date(&self, recorded_at: NaiveDate) -> Result<Vec<DailyMileage>, AppError> {
        let records = self.repository.find_by_date(recorded_at).await;
        non_empty("list_by_date", records, || {
            format!("No mileage records found on {}", recorded_at)
        })
    }
}

fn non_empty<F>(
    operation: &str,
    records: Result<Vec<DailyMileage>, AppError>,
    not_found_message: F,
) -> Result<Vec<DailyMileage>, AppError>
where
    F: FnOnce() -> String,
{
    match records {
        Ok(records) if records.is_empty() => {
            record_lookup(operation, "not_found");
            let message = not_found_message();
            tracing::debug!(operation, %message, "Lookup returned no rows");
            Err(AppError::not_found(message))
        }
        Ok(records) => {
            record_lookup(operation, "found");
            Ok(records)
        }
        Err(e) => {
            record_lookup(operation, "error");
            Err(e)
        }
    }
}
