//! Low-stock notification sink.

use mockall::automock;
use tracing::warn;

use crate::domain::{catalog::models::VariantUuid, warehouses::models::WarehouseUuid};

/// Emitted when a stock mutation leaves a record at or below its reorder
/// level.
#[derive(Debug, Clone, PartialEq)]
pub struct LowStockEvent {
    pub variant_uuid: VariantUuid,
    pub warehouse_uuid: WarehouseUuid,
    pub quantity: u64,
    pub reorder_level: u64,
}

/// Fire-and-forget notification sink for low-stock events.
///
/// Implementations must never fail the calling operation; delivery is
/// best-effort.
#[automock]
pub trait StockAlerts: Send + Sync {
    fn low_stock(&self, event: &LowStockEvent);
}

/// Production sink: a structured warning for the monitoring pipeline.
#[derive(Debug, Clone, Default)]
pub struct LogStockAlerts;

impl StockAlerts for LogStockAlerts {
    fn low_stock(&self, event: &LowStockEvent) {
        warn!(
            variant_uuid = %event.variant_uuid,
            warehouse_uuid = %event.warehouse_uuid,
            quantity = event.quantity,
            reorder_level = event.reorder_level,
            "stock at or below reorder level"
        );
    }
}
