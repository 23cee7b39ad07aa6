//! Warehouses Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::domain::warehouses::models::{NewWarehouse, Warehouse, WarehouseUuid};

const CREATE_WAREHOUSE_SQL: &str = include_str!("sql/create_warehouse.sql");
const LIST_WAREHOUSES_SQL: &str = include_str!("sql/list_warehouses.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgWarehousesRepository;

impl PgWarehousesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_warehouse(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        warehouse: &NewWarehouse,
    ) -> Result<Warehouse, sqlx::Error> {
        query_as::<Postgres, Warehouse>(CREATE_WAREHOUSE_SQL)
            .bind(warehouse.uuid.into_uuid())
            .bind(&warehouse.name)
            .bind(&warehouse.location)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_warehouses(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<Warehouse>, sqlx::Error> {
        query_as::<Postgres, Warehouse>(LIST_WAREHOUSES_SQL)
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for Warehouse {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: WarehouseUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            location: row.try_get("location")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
