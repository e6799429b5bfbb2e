//! Common test utilities for workflow integration tests.

use workflow_tests::{day, WorkflowTestContext};

/// Context seeded with the reference data set and a contract per car.
pub async fn setup() -> WorkflowTestContext {
    let ctx = WorkflowTestContext::new()
        .await
        .expect("Failed to create workflow test context");

    ctx.record_mileage(1, 100, day(2025, 1, 1)).await;
    ctx.record_mileage(2, 100, day(2025, 1, 1)).await;
    ctx.record_mileage(2, 150, day(2025, 1, 2)).await;
    ctx.open_contracts(&[1, 2, 3]).await;
    ctx
}
