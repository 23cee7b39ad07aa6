//! Adjust Inventory Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use duka_app::domain::inventory::models::{InventoryRecord, StockAdjustment};

use crate::{extensions::*, inventory::errors::into_status_error, state::State};

/// Adjust Inventory Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AdjustInventoryRequest {
    pub variant_uuid: Uuid,
    pub warehouse_uuid: Uuid,
    /// Signed stock change; creates the record when none exists
    pub quantity_delta: i64,
    /// Optional new reorder level
    pub reorder_level: Option<u64>,
}

impl From<AdjustInventoryRequest> for StockAdjustment {
    fn from(request: AdjustInventoryRequest) -> Self {
        StockAdjustment {
            variant_uuid: request.variant_uuid.into(),
            warehouse_uuid: request.warehouse_uuid.into(),
            quantity_delta: request.quantity_delta,
            reorder_level: request.reorder_level,
        }
    }
}

/// Inventory Record Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct InventoryRecordResponse {
    pub uuid: Uuid,
    pub variant_uuid: Uuid,
    pub warehouse_uuid: Uuid,
    pub quantity: u64,
    pub reorder_level: u64,
    pub updated_at: String,
}

impl From<InventoryRecord> for InventoryRecordResponse {
    fn from(record: InventoryRecord) -> Self {
        Self {
            uuid: record.uuid.into_uuid(),
            variant_uuid: record.variant_uuid.into_uuid(),
            warehouse_uuid: record.warehouse_uuid.into_uuid(),
            quantity: record.quantity,
            reorder_level: record.reorder_level,
            updated_at: record.updated_at.to_string(),
        }
    }
}

/// Adjust Inventory Handler
#[endpoint(
    tags("inventory"),
    summary = "Adjust Inventory",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Inventory record after adjustment"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Would drive stock negative"),
        (status_code = StatusCode::NOT_FOUND, description = "Unknown variant or warehouse"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<AdjustInventoryRequest>,
    depot: &mut Depot,
) -> Result<Json<InventoryRecordResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let record = state
        .app
        .inventory
        .adjust_stock(json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(record.into()))
}
