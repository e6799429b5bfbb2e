//! The daily reconciliation: pull one day's mileage, then apply it to contracts.
//!
//! Re-running for a date that was already applied adds the same kilometers
//! again; there is no applied-date marker.

use crate::client::MileageClient;
use crate::error::ReconcileError;
use crate::models::RunSummary;
use crate::services::ContractStore;
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

pub struct ReconciliationJob {
    client: MileageClient,
    store: Arc<dyn ContractStore>,
}

impl ReconciliationJob {
    pub fn new(client: MileageClient, store: Arc<dyn ContractStore>) -> Self {
        Self { client, store }
    }

    #[instrument(skip(self), fields(date = %date))]
    pub async fn run(&self, date: NaiveDate) -> Result<RunSummary, ReconcileError> {
        let records = match self.client.fetch_by_date(date).await {
            Ok(records) => records,
            Err(e) => {
                error!(error = %e, "Fetching mileage failed, no contracts updated");
                return Err(e);
            }
        };

        // Validate the whole batch before the first write.
        if let Some(bad) = records.iter().find(|r| r.daily_km < 0) {
            error!(car_id = bad.car_id, daily_km = bad.daily_km, "Rejecting batch");
            return Err(ReconcileError::InvalidRecord {
                car_id: bad.car_id,
                daily_km: bad.daily_km,
            });
        }
        for stray in records.iter().filter(|r| r.recorded_at != date) {
            warn!(
                car_id = stray.car_id,
                recorded_at = %stray.recorded_at,
                "Record dated outside the requested day"
            );
        }

        info!(count = records.len(), "Updating mileage records in the contract table");
        let outcome = self.store.apply_mileage(&records).await.map_err(|e| {
            error!(error = %e, "Applying mileage failed, batch rolled back");
            e
        })?;

        let summary = RunSummary {
            date,
            records_fetched: records.len(),
            records_applied: outcome.records_applied,
            contracts_updated: outcome.contracts_updated,
            km_applied: outcome.km_applied,
            unmatched_cars: outcome.unmatched_cars,
        };

        info!(
            records_fetched = summary.records_fetched,
            records_applied = summary.records_applied,
            contracts_updated = summary.contracts_updated,
            unmatched_cars = ?summary.unmatched_cars,
            km_applied = summary.km_applied,
            "Reconciliation complete"
        );

        Ok(summary)
    }
}
