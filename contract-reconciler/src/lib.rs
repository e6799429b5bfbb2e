//! Contract Reconciler - applies a day's recorded mileage to rental contracts.

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod job;
pub mod models;
pub mod services;
