//! Warehouses service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::warehouses::{
        errors::WarehousesServiceError,
        models::{NewWarehouse, Warehouse},
        repository::PgWarehousesRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgWarehousesService {
    db: Db,
    repository: PgWarehousesRepository,
}

impl PgWarehousesService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgWarehousesRepository::new(),
        }
    }
}

#[async_trait]
impl WarehousesService for PgWarehousesService {
    async fn create_warehouse(
        &self,
        warehouse: NewWarehouse,
    ) -> Result<Warehouse, WarehousesServiceError> {
        let mut tx = self.db.begin().await?;

        let created = self.repository.create_warehouse(&mut tx, &warehouse).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn list_warehouses(&self) -> Result<Vec<Warehouse>, WarehousesServiceError> {
        let mut tx = self.db.begin().await?;

        let warehouses = self.repository.list_warehouses(&mut tx).await?;

        tx.commit().await?;

        Ok(warehouses)
    }
}

#[automock]
#[async_trait]
pub trait WarehousesService: Send + Sync {
    /// Creates a new warehouse.
    async fn create_warehouse(
        &self,
        warehouse: NewWarehouse,
    ) -> Result<Warehouse, WarehousesServiceError>;

    /// Retrieves all warehouses.
    async fn list_warehouses(&self) -> Result<Vec<Warehouse>, WarehousesServiceError>;
}
