pub mod health;
pub mod mileage;

pub use health::{health_check, metrics_handler, readiness_check, root};
pub use mileage::{
    get_mileage_by_car_and_date, list_all_mileage, list_mileage_by_car, list_mileage_by_date,
};
