//! Mileage Service - Read API over daily per-car mileage records.

pub mod config;
pub mod dtos;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;
