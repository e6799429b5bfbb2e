//! Services module for mileage-service.

pub mod database;
pub mod metrics;
pub mod query;
pub mod repository;

pub use database::Database;
pub use metrics::{get_metrics, init_metrics, record_lookup};
pub use query::MileageQueryService;
pub use repository::{InMemoryMileageRepository, MileageRepository};
