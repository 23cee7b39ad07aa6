//! Warehouse Models

use jiff::Timestamp;

use crate::uuids::TypedUuid;

/// Warehouse UUID
pub type WarehouseUuid = TypedUuid<Warehouse>;

/// Warehouse Model
#[derive(Debug, Clone)]
pub struct Warehouse {
    pub uuid: WarehouseUuid,
    pub name: String,
    pub location: String,
    pub created_at: Timestamp,
}

/// New Warehouse Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewWarehouse {
    pub uuid: WarehouseUuid,
    pub name: String,
    pub location: String,
}
