//! Warehouses

pub mod errors;
pub mod models;
mod repository;
pub mod service;

pub use errors::WarehousesServiceError;
pub use service::*;
