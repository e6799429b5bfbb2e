//! Rental contract store.
//!
//! [`ContractStore::apply_mileage`] is all-or-nothing: either every record in
//! the batch is added to its car's contracts, or none is.

use crate::error::ReconcileError;
use crate::models::{ApplyOutcome, Contract, MileageRecord};
use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::Mutex;

#[async_trait]
pub trait ContractStore: Send + Sync {
    /// Add each record's `daily_km` to `total_km_used` of every contract for
    /// its car, within a single unit of work.
    async fn apply_mileage(&self, records: &[MileageRecord]) -> Result<ApplyOutcome, ReconcileError>;
}

/// Contracts held in memory, with optional write-failure injection.
#[derive(Default)]
pub struct InMemoryContractStore {
    contracts: Mutex<Vec<Contract>>,
    fail_on_car: Option<i32>,
}

impl InMemoryContractStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make any write for `car_id` fail, to exercise rollback.
    pub fn failing_on_car(mut self, car_id: i32) -> Self {
        self.fail_on_car = Some(car_id);
        self
    }

    /// Open a contract for `car_id` starting at zero kilometers.
    pub async fn open_contract(&self, customer_id: i32, car_id: i32, month: NaiveDate) -> Contract {
        let mut contracts = self.contracts.lock().await;
        let next_id = contracts.iter().map(|c| c.id).max().unwrap_or(0).saturating_add(1);
        let contract = Contract {
            id: next_id,
            customer_id,
            car_id,
            month_contract: month,
            total_km_used: 0,
        };
        contracts.push(contract.clone());
        contract
    }

    /// Current `total_km_used` of the first contract for `car_id`.
    pub async fn total_km_used(&self, car_id: i32) -> Option<i32> {
        self.contracts
            .lock()
            .await
            .iter()
            .find(|c| c.car_id == car_id)
            .map(|c| c.total_km_used)
    }

    pub async fn contracts(&self) -> Vec<Contract> {
        self.contracts.lock().await.clone()
    }
}

#[async_trait]
impl ContractStore for InMemoryContractStore {
    async fn apply_mileage(&self, records: &[MileageRecord]) -> Result<ApplyOutcome, ReconcileError> {
        let mut contracts = self.contracts.lock().await;
        // Work on a copy; only a fully applied batch replaces the stored contracts.
        let mut working = contracts.clone();
        let mut outcome = ApplyOutcome::default();

        for record in records {
            if self.fail_on_car == Some(record.car_id) {
                tracing::error!(car_id = record.car_id, "Write failed, rolling back batch");
                return Err(ReconcileError::Database(anyhow::anyhow!(
                    "simulated write failure for car_id {}",
                    record.car_id
                )));
            }

            let mut touched = 0u64;
            for contract in working.iter_mut().filter(|c| c.car_id == record.car_id) {
                contract.total_km_used = contract
                    .total_km_used
                    .checked_add(record.daily_km)
                    .ok_or_else(|| {
                        ReconcileError::Database(anyhow::anyhow!(
                            "total_km_used overflow for contract {} (car_id {})",
                            contract.id,
                            record.car_id
                        ))
                    })?;
                touched += 1;
            }

            if touched == 0 {
                outcome.unmatched_cars.push(record.car_id);
            } else {
                outcome.records_applied += 1;
                outcome.contracts_updated += touched;
                outcome.km_applied += i64::from(record.daily_km);
            }
        }

        *contracts = working;
        Ok(outcome)
    }
}
