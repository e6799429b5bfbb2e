//! PostgreSQL-backed contract store tests.
//!
//! Run with `TEST_RENTAL_DATABASE_URL=postgres://... cargo test -- --ignored`.

mod common;

use common::{day, record};
use contract_reconciler::error::ReconcileError;
use contract_reconciler::services::{ContractStore, Database};

async fn connect() -> Database {
    common::init_tracing();

    let url = std::env::var("TEST_RENTAL_DATABASE_URL")
        .expect("TEST_RENTAL_DATABASE_URL must be set to run PostgreSQL tests");
    let db = Database::new(&url, 2, 1)
        .await
        .expect("Failed to connect to test database");
    db.run_migrations().await.expect("Failed to run migrations");
    db
}

/// Insert a car (and the model and customer it needs) with one fresh contract.
/// Returns the new car id.
async fn car_with_contract(db: &Database, plate: &str) -> i32 {
    let model_id: i32 = sqlx::query_scalar(
        r#"
        INSERT INTO car_models (model_name, monthly_rental_rate, km_limit_per_month, cost_per_extra_km)
        VALUES ($1, 499.00, 1500, 0.25)
        ON CONFLICT (model_name) DO UPDATE SET model_name = EXCLUDED.model_name
        RETURNING id
        "#,
    )
    .bind("reconciler-test-model")
    .fetch_one(db.pool())
    .await
    .unwrap();

    let customer_id: i32 = sqlx::query_scalar(
        "INSERT INTO customer (full_name, email) VALUES ('Test Customer', 'test@example.com') RETURNING id",
    )
    .fetch_one(db.pool())
    .await
    .unwrap();

    let car_id: i32 =
        sqlx::query_scalar("INSERT INTO car (model_id, license_plate) VALUES ($1, $2) RETURNING id")
            .bind(model_id)
            .bind(plate)
            .fetch_one(db.pool())
            .await
            .unwrap();

    db.create_contract(customer_id, car_id, day(2031, 1, 1))
        .await
        .unwrap();
    car_id
}

async fn km_used(db: &Database, car_id: i32) -> i32 {
    db.contracts_for_car(car_id).await.unwrap()[0].total_km_used
}

#[tokio::test]
#[ignore = "requires TEST_RENTAL_DATABASE_URL"]
async fn apply_mileage_adds_to_contracts() {
    let db = connect().await;
    let car = car_with_contract(&db, "TEST-001").await;
    let date = day(2031, 1, 1);

    let outcome = db
        .apply_mileage(&[record(car, 120, date), record(car, 30, date)])
        .await
        .unwrap();

    assert_eq!(outcome.records_applied, 2);
    assert_eq!(outcome.km_applied, 150);
    assert_eq!(km_used(&db, car).await, 150);
}

#[tokio::test]
#[ignore = "requires TEST_RENTAL_DATABASE_URL"]
async fn apply_mileage_reports_cars_without_contracts() {
    let db = connect().await;
    let car = car_with_contract(&db, "TEST-002").await;
    let date = day(2031, 1, 1);

    let outcome = db
        .apply_mileage(&[record(car, 10, date), record(-1, 10, date)])
        .await
        .unwrap();

    assert_eq!(outcome.unmatched_cars, vec![-1]);
    assert_eq!(km_used(&db, car).await, 10);
}

#[tokio::test]
#[ignore = "requires TEST_RENTAL_DATABASE_URL"]
async fn failed_update_rolls_back_earlier_updates() {
    let db = connect().await;
    let first = car_with_contract(&db, "TEST-003").await;
    let second = car_with_contract(&db, "TEST-004").await;
    let date = day(2031, 1, 1);

    // Driving the second contract below zero violates its CHECK constraint.
    let result = db
        .apply_mileage(&[record(first, 100, date), record(second, -50, date)])
        .await;

    assert!(matches!(result, Err(ReconcileError::Database(_))));
    assert_eq!(km_used(&db, first).await, 0);
    assert_eq!(km_used(&db, second).await, 0);
}
