//! Domain models for contract-reconciler.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A daily mileage record as served by the mileage API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MileageRecord {
    pub car_id: i32,
    pub daily_km: i32,
    pub recorded_at: NaiveDate,
}

/// A monthly rental contract in the rental store.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Contract {
    pub id: i32,
    pub customer_id: i32,
    pub car_id: i32,
    pub month_contract: NaiveDate,
    pub total_km_used: i32,
}

/// What one transactional batch of additive updates changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyOutcome {
    /// Records that matched at least one contract.
    pub records_applied: usize,
    /// Contract rows touched, summed over all records.
    pub contracts_updated: u64,
    /// Kilometers of the applied records.
    pub km_applied: i64,
    /// Car ids (in record order) that had no contract.
    pub unmatched_cars: Vec<i32>,
}

/// Result of one reconciliation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub date: NaiveDate,
    pub records_fetched: usize,
    pub records_applied: usize,
    pub contracts_updated: u64,
    pub unmatched_cars: Vec<i32>,
    pub km_applied: i64,
}
