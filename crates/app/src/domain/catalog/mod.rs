//! Catalog

pub mod errors;
pub mod models;
mod repository;
pub mod service;

pub(crate) use repository::PgCatalogRepository;

pub use errors::CatalogServiceError;
pub use service::*;
