//! Inventory Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::{
    database::try_get_amount,
    domain::{
        catalog::models::VariantUuid,
        inventory::models::{InventoryRecord, InventoryUuid, StockAdjustment, StockLevel},
        warehouses::models::WarehouseUuid,
    },
};

const ADJUST_STOCK_SQL: &str = include_str!("sql/adjust_stock.sql");
const RESERVE_STOCK_SQL: &str = include_str!("sql/reserve_stock.sql");
const LIST_STOCK_LEVELS_SQL: &str = include_str!("sql/list_stock_levels.sql");

/// Post-reservation snapshot of the mutated record.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ReservedStock {
    pub(crate) quantity: u64,
    pub(crate) reorder_level: u64,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgInventoryRepository;

impl PgInventoryRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Upsert the record: create with `quantity = delta`, or add `delta` to
    /// the existing quantity, in one atomic statement. The schema's CHECK
    /// constraint rejects any result below zero.
    pub(crate) async fn adjust_stock(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: InventoryUuid,
        adjustment: &StockAdjustment,
    ) -> Result<InventoryRecord, sqlx::Error> {
        let reorder_level = adjustment
            .reorder_level
            .map(|level| {
                i64::try_from(level).map_err(|e| sqlx::Error::ColumnDecode {
                    index: "reorder_level".to_string(),
                    source: Box::new(e),
                })
            })
            .transpose()?;

        query_as::<Postgres, InventoryRecord>(ADJUST_STOCK_SQL)
            .bind(uuid.into_uuid())
            .bind(adjustment.variant_uuid.into_uuid())
            .bind(adjustment.warehouse_uuid.into_uuid())
            .bind(adjustment.quantity_delta)
            .bind(reorder_level)
            .fetch_one(&mut **tx)
            .await
    }

    /// Atomic check-and-decrement for checkout.
    ///
    /// Returns `None` when the record is missing or holds less than
    /// `quantity` — the caller cannot distinguish the two, and does not need
    /// to. The guarded UPDATE takes a row lock, so concurrent reservations
    /// serialize per record.
    pub(crate) async fn reserve_stock(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        variant: VariantUuid,
        warehouse: WarehouseUuid,
        quantity: u64,
    ) -> Result<Option<ReservedStock>, sqlx::Error> {
        let quantity_i64 = i64::try_from(quantity).map_err(|e| sqlx::Error::ColumnDecode {
            index: "quantity".to_string(),
            source: Box::new(e),
        })?;

        let row = sqlx::query(RESERVE_STOCK_SQL)
            .bind(variant.into_uuid())
            .bind(warehouse.into_uuid())
            .bind(quantity_i64)
            .fetch_optional(&mut **tx)
            .await?;

        row.map(|row| {
            Ok(ReservedStock {
                quantity: try_get_amount(&row, "quantity")?,
                reorder_level: try_get_amount(&row, "reorder_level")?,
            })
        })
        .transpose()
    }

    pub(crate) async fn list_stock_levels(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<StockLevel>, sqlx::Error> {
        query_as::<Postgres, StockLevel>(LIST_STOCK_LEVELS_SQL)
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for InventoryRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: InventoryUuid::from_uuid(row.try_get("uuid")?),
            variant_uuid: VariantUuid::from_uuid(row.try_get("variant_uuid")?),
            warehouse_uuid: WarehouseUuid::from_uuid(row.try_get("warehouse_uuid")?),
            quantity: try_get_amount(row, "quantity")?,
            reorder_level: try_get_amount(row, "reorder_level")?,
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for StockLevel {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            variant_uuid: VariantUuid::from_uuid(row.try_get("variant_uuid")?),
            sku: row.try_get("sku")?,
            product_name: row.try_get("product_name")?,
            warehouse_uuid: WarehouseUuid::from_uuid(row.try_get("warehouse_uuid")?),
            warehouse_name: row.try_get("warehouse_name")?,
            quantity: try_get_amount(row, "quantity")?,
            reorder_level: try_get_amount(row, "reorder_level")?,
        })
    }
}
