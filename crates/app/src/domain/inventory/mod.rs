//! Inventory

pub mod alerts;
pub mod errors;
pub mod models;
mod repository;
pub mod service;

pub(crate) use repository::{PgInventoryRepository, ReservedStock};

pub use alerts::*;
pub use errors::InventoryServiceError;
pub use service::*;
