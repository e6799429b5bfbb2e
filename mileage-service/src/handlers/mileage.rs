//! Mileage lookup handlers.

use crate::dtos::DailyMileageResponse;
use crate::startup::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use chrono::NaiveDate;
use service_core::error::AppError;

fn to_responses(records: Vec<crate::models::DailyMileage>) -> Vec<DailyMileageResponse> {
    records.into_iter().map(DailyMileageResponse::from).collect()
}

/// `GET /mileage/`
pub async fn list_all_mileage(
    State(state): State<AppState>,
) -> Result<Json<Vec<DailyMileageResponse>>, AppError> {
    let records = state.query.list_all().await?;
    tracing::info!(count = records.len(), "Listed all mileage records");
    Ok(Json(to_responses(records)))
}

/// `GET /mileage/:car_id`
pub async fn list_mileage_by_car(
    State(state): State<AppState>,
    Path(car_id): Path<i32>,
) -> Result<Json<Vec<DailyMileageResponse>>, AppError> {
    let records = state.query.list_by_car(car_id).await?;
    tracing::info!(car_id, count = records.len(), "Listed mileage for car");
    Ok(Json(to_responses(records)))
}

/// `GET /mileage/:car_id/:recorded_at`
pub async fn get_mileage_by_car_and_date(
    State(state): State<AppState>,
    Path((car_id, recorded_at)): Path<(i32, NaiveDate)>,
) -> Result<Json<DailyMileageResponse>, AppError> {
    let record = state.query.get_by_car_and_date(car_id, recorded_at).await?;
    Ok(Json(DailyMileageResponse::from(record)))
}

/// `GET /mileage/date/:recorded_at`
pub async fn list_mileage_by_date(
    State(state): State<AppState>,
    Path(recorded_at): Path<NaiveDate>,
) -> Result<Json<Vec<DailyMileageResponse>>, AppError> {
    let records = state.query.list_by_date(recorded_at).await?;
    tracing::info!(%recorded_at, count = records.len(), "Listed mileage for date");
    Ok(Json(to_responses(records)))
}
