//! Create Warehouse Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use duka_app::domain::warehouses::models::{NewWarehouse, WarehouseUuid};

use crate::{extensions::*, state::State, warehouses::errors::into_status_error};

/// Create Warehouse Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateWarehouseRequest {
    pub name: String,
    pub location: String,
}

/// Warehouse Created Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct WarehouseCreatedResponse {
    /// Created warehouse UUID
    pub uuid: Uuid,
}

/// Create Warehouse Handler
#[endpoint(
    tags("warehouses"),
    summary = "Create Warehouse",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Warehouse created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateWarehouseRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<WarehouseCreatedResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let request = json.into_inner();

    let uuid = state
        .app
        .warehouses
        .create_warehouse(NewWarehouse {
            uuid: WarehouseUuid::new(),
            name: request.name,
            location: request.location,
        })
        .await
        .map_err(into_status_error)?
        .uuid;

    res.add_header(LOCATION, format!("/warehouses/{uuid}"), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(WarehouseCreatedResponse {
        uuid: uuid.into_uuid(),
    }))
}
