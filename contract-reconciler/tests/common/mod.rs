//! Common test utilities for contract-reconciler integration tests.

use chrono::NaiveDate;
use contract_reconciler::client::MileageClient;
use contract_reconciler::models::MileageRecord;
use serde_json::{json, Value};
use std::sync::Once;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

static INIT: Once = Once::new();

/// Initialize tracing for tests (only once).
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("info,contract_reconciler=debug,sqlx=warn")
            .with_test_writer()
            .try_init()
            .ok();
    });
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[allow(dead_code)]
pub fn record(car_id: i32, daily_km: i32, recorded_at: NaiveDate) -> MileageRecord {
    MileageRecord {
        car_id,
        daily_km,
        recorded_at,
    }
}

#[allow(dead_code)]
pub fn client_for(server: &MockServer) -> MileageClient {
    MileageClient::new(&server.uri(), Duration::from_secs(5)).expect("Failed to build client")
}

#[allow(dead_code)]
pub fn as_json(records: &[MileageRecord]) -> Value {
    json!(records)
}

/// Serve `records` as the mileage API's answer for `date`.
#[allow(dead_code)]
pub async fn serve_day(server: &MockServer, date: NaiveDate, records: &[MileageRecord]) {
    Mock::given(method("GET"))
        .and(path(format!("/mileage/date/{}", date)))
        .respond_with(ResponseTemplate::new(200).set_body_json(as_json(records)))
        .mount(server)
        .await;
}

/// Answer every request for `date` with `status` and a JSON error body.
#[allow(dead_code)]
pub async fn fail_day(server: &MockServer, date: NaiveDate, status: u16, message: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/mileage/date/{}", date)))
        .respond_with(ResponseTemplate::new(status).set_body_json(json!({ "error": message })))
        .mount(server)
        .await;
}
