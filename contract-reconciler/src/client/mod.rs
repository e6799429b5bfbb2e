//! HTTP client for the mileage API.

use crate::error::ReconcileError;
use crate::models::MileageRecord;
use chrono::NaiveDate;
use reqwest::{Client, StatusCode};
use service_core::observability::TracedClientExt;
use std::time::Duration;
use tracing::instrument;

#[derive(Clone)]
pub struct MileageClient {
    client: Client,
    base_url: String,
}

impl MileageClient {
    /// Create a client for `base_url`; every request is bounded by `timeout`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ReconcileError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch every mileage record for `date`.
    ///
    /// Any non-success status is an error; 404 (no records that day) is
    /// reported as [`ReconcileError::NoMileage`].
    #[instrument(skip(self), fields(date = %date))]
    pub async fn fetch_by_date(&self, date: NaiveDate) -> Result<Vec<MileageRecord>, ReconcileError> {
        let url = format!("{}/mileage/date/{}", self.base_url, date);

        let response = self.client.traced_get(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        tracing::debug!(status = %status, "Mileage API response");

        if status == StatusCode::NOT_FOUND {
            return Err(ReconcileError::NoMileage { date });
        }
        if !status.is_success() {
            return Err(ReconcileError::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        let records: Vec<MileageRecord> = serde_json::from_str(&body)?;
        tracing::info!(count = records.len(), "Fetched daily mileage records");
        Ok(records)
    }
}
