use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Mileage API returned {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    #[error("No mileage records for {date}")]
    NoMileage { date: NaiveDate },

    #[error("Failed to decode mileage records: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid mileage record for car_id {car_id}: daily_km {daily_km} is negative")]
    InvalidRecord { car_id: i32, daily_km: i32 },

    #[error("Database error: {0}")]
    Database(anyhow::Error),
}

impl ReconcileError {
    /// True for failures that happen before any contract is touched.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            Self::Http(_) | Self::UpstreamStatus { .. } | Self::NoMileage { .. } | Self::Decode(_)
        )
    }
}
