//! List Warehouses Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use duka_app::domain::warehouses::models::Warehouse;

use crate::{extensions::*, state::State, warehouses::errors::into_status_error};

/// Warehouse Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct WarehouseResponse {
    pub uuid: Uuid,
    pub name: String,
    pub location: String,
    pub created_at: String,
}

impl From<Warehouse> for WarehouseResponse {
    fn from(warehouse: Warehouse) -> Self {
        Self {
            uuid: warehouse.uuid.into_uuid(),
            name: warehouse.name,
            location: warehouse.location,
            created_at: warehouse.created_at.to_string(),
        }
    }
}

/// List Warehouses Handler
#[endpoint(
    tags("warehouses"),
    summary = "List Warehouses",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Warehouses"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    depot: &mut Depot,
) -> Result<Json<Vec<WarehouseResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let warehouses = state
        .app
        .warehouses
        .list_warehouses()
        .await
        .map_err(into_status_error)?;

    Ok(Json(warehouses.into_iter().map(Into::into).collect()))
}
