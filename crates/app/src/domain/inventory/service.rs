//! Inventory service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::inventory::{
        alerts::{LowStockEvent, StockAlerts},
        errors::InventoryServiceError,
        models::{InventoryRecord, InventoryUuid, StockAdjustment, StockLevel},
        repository::PgInventoryRepository,
    },
};

#[derive(Clone)]
pub struct PgInventoryService {
    db: Db,
    repository: PgInventoryRepository,
    alerts: Arc<dyn StockAlerts>,
}

impl PgInventoryService {
    #[must_use]
    pub fn new(db: Db, alerts: Arc<dyn StockAlerts>) -> Self {
        Self {
            db,
            repository: PgInventoryRepository::new(),
            alerts,
        }
    }
}

#[async_trait]
impl InventoryService for PgInventoryService {
    async fn adjust_stock(
        &self,
        adjustment: StockAdjustment,
    ) -> Result<InventoryRecord, InventoryServiceError> {
        let mut tx = self.db.begin().await?;

        let record = self
            .repository
            .adjust_stock(&mut tx, InventoryUuid::new(), &adjustment)
            .await?;

        tx.commit().await?;

        // Emitted only after commit, so a failed adjustment never alerts.
        if record.quantity <= record.reorder_level {
            self.alerts.low_stock(&LowStockEvent {
                variant_uuid: record.variant_uuid,
                warehouse_uuid: record.warehouse_uuid,
                quantity: record.quantity,
                reorder_level: record.reorder_level,
            });
        }

        Ok(record)
    }

    async fn list_stock_levels(&self) -> Result<Vec<StockLevel>, InventoryServiceError> {
        let mut tx = self.db.begin().await?;

        let levels = self.repository.list_stock_levels(&mut tx).await?;

        tx.commit().await?;

        Ok(levels)
    }
}

#[automock]
#[async_trait]
pub trait InventoryService: Send + Sync {
    /// Upsert the (variant, warehouse) record by a signed delta, rejecting
    /// results below zero.
    async fn adjust_stock(
        &self,
        adjustment: StockAdjustment,
    ) -> Result<InventoryRecord, InventoryServiceError>;

    /// Stock levels joined with catalog and warehouse names, for reporting.
    async fn list_stock_levels(&self) -> Result<Vec<StockLevel>, InventoryServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        domain::inventory::alerts::MockStockAlerts,
        test::{TestContext, helpers},
    };

    use super::*;

    #[tokio::test]
    async fn adjust_creates_record_with_delta_as_quantity() -> TestResult {
        let ctx = TestContext::new().await;

        let (variant, warehouse) = helpers::create_variant_and_warehouse(&ctx, 10_00).await;

        let record = ctx
            .inventory
            .adjust_stock(StockAdjustment {
                variant_uuid: variant,
                warehouse_uuid: warehouse,
                quantity_delta: 8,
                reorder_level: None,
            })
            .await?;

        assert_eq!(record.quantity, 8);
        assert_eq!(record.reorder_level, 5);

        Ok(())
    }

    #[tokio::test]
    async fn adjust_existing_record_adds_delta() -> TestResult {
        let ctx = TestContext::new().await;

        let (variant, warehouse) = helpers::create_variant_and_warehouse(&ctx, 10_00).await;

        helpers::adjust_stock(&ctx, variant, warehouse, 8).await?;

        let record = helpers::adjust_stock(&ctx, variant, warehouse, -3).await?;

        assert_eq!(record.quantity, 5);

        Ok(())
    }

    #[tokio::test]
    async fn adjust_updates_reorder_level_in_same_call() -> TestResult {
        let ctx = TestContext::new().await;

        let (variant, warehouse) = helpers::create_variant_and_warehouse(&ctx, 10_00).await;

        let record = ctx
            .inventory
            .adjust_stock(StockAdjustment {
                variant_uuid: variant,
                warehouse_uuid: warehouse,
                quantity_delta: 20,
                reorder_level: Some(10),
            })
            .await?;

        assert_eq!(record.reorder_level, 10);

        Ok(())
    }

    #[tokio::test]
    async fn adjust_below_zero_rejects_whole_operation() -> TestResult {
        let ctx = TestContext::new().await;

        let (variant, warehouse) = helpers::create_variant_and_warehouse(&ctx, 10_00).await;

        helpers::adjust_stock(&ctx, variant, warehouse, 4).await?;

        let result = ctx
            .inventory
            .adjust_stock(StockAdjustment {
                variant_uuid: variant,
                warehouse_uuid: warehouse,
                quantity_delta: -5,
                reorder_level: None,
            })
            .await;

        assert!(
            matches!(result, Err(InventoryServiceError::StockConstraintViolation)),
            "expected StockConstraintViolation, got {result:?}"
        );

        assert_eq!(helpers::stock_quantity(&ctx, variant, warehouse).await, 4);

        Ok(())
    }

    #[tokio::test]
    async fn adjust_negative_on_missing_record_rejects() -> TestResult {
        let ctx = TestContext::new().await;

        let (variant, warehouse) = helpers::create_variant_and_warehouse(&ctx, 10_00).await;

        let result = ctx
            .inventory
            .adjust_stock(StockAdjustment {
                variant_uuid: variant,
                warehouse_uuid: warehouse,
                quantity_delta: -1,
                reorder_level: None,
            })
            .await;

        assert!(
            matches!(result, Err(InventoryServiceError::StockConstraintViolation)),
            "expected StockConstraintViolation, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn adjust_unknown_variant_returns_invalid_reference() -> TestResult {
        let ctx = TestContext::new().await;

        let (_, warehouse) = helpers::create_variant_and_warehouse(&ctx, 10_00).await;

        let result = ctx
            .inventory
            .adjust_stock(StockAdjustment {
                variant_uuid: crate::domain::catalog::models::VariantUuid::new(),
                warehouse_uuid: warehouse,
                quantity_delta: 5,
                reorder_level: None,
            })
            .await;

        assert!(
            matches!(result, Err(InventoryServiceError::InvalidReference)),
            "expected InvalidReference, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn adjust_to_reorder_level_fires_low_stock_alert() -> TestResult {
        let ctx = TestContext::new().await;

        let (variant, warehouse) = helpers::create_variant_and_warehouse(&ctx, 10_00).await;

        let mut alerts = MockStockAlerts::new();

        alerts
            .expect_low_stock()
            .once()
            .withf(move |event| {
                event.variant_uuid == variant && event.quantity == 5 && event.reorder_level == 5
            })
            .return_const(());

        let service = PgInventoryService::new(ctx.app_db.clone(), Arc::new(alerts));

        service
            .adjust_stock(StockAdjustment {
                variant_uuid: variant,
                warehouse_uuid: warehouse,
                quantity_delta: 5,
                reorder_level: None,
            })
            .await?;

        Ok(())
    }

    #[tokio::test]
    async fn no_alert_above_reorder_level() -> TestResult {
        let ctx = TestContext::new().await;

        let (variant, warehouse) = helpers::create_variant_and_warehouse(&ctx, 10_00).await;

        let mut alerts = MockStockAlerts::new();

        alerts.expect_low_stock().never();

        let service = PgInventoryService::new(ctx.app_db.clone(), Arc::new(alerts));

        service
            .adjust_stock(StockAdjustment {
                variant_uuid: variant,
                warehouse_uuid: warehouse,
                quantity_delta: 6,
                reorder_level: None,
            })
            .await?;

        Ok(())
    }

    #[tokio::test]
    async fn list_stock_levels_joins_catalog_and_warehouse() -> TestResult {
        let ctx = TestContext::new().await;

        let product = helpers::create_product(&ctx, "Phone").await?;
        let variant = helpers::create_variant(&ctx, product.uuid, "PHN-1", 10_00).await?;
        let warehouse = helpers::create_warehouse(&ctx, "Nairobi Central").await?;

        helpers::adjust_stock(&ctx, variant.uuid, warehouse.uuid, 7).await?;

        let levels = ctx.inventory.list_stock_levels().await?;

        assert_eq!(levels.len(), 1);
        assert_eq!(levels[0].sku, "PHN-1");
        assert_eq!(levels[0].product_name, "Phone");
        assert_eq!(levels[0].warehouse_name, "Nairobi Central");
        assert_eq!(levels[0].quantity, 7);

        Ok(())
    }
}
