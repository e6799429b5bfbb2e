//! Services module for contract-reconciler.

pub mod contracts;
pub mod database;

pub use contracts::{ContractStore, InMemoryContractStore};
pub use database::Database;
