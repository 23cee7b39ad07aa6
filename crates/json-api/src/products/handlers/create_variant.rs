//! Create Variant Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use duka_app::domain::catalog::models::{NewVariant, VariantUuid};

use crate::{extensions::*, products::errors::into_status_error, state::State};

/// Create Variant Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateVariantRequest {
    /// Stock-keeping unit, unique across the catalog
    pub sku: String,

    /// Unit price in minor units
    pub price: u64,

    pub size: Option<String>,
    pub color: Option<String>,
}

/// Variant Created Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct VariantCreatedResponse {
    /// Created variant UUID
    pub uuid: Uuid,
}

/// Create Variant Handler
#[endpoint(
    tags("products"),
    summary = "Add Variant to Product",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Variant created"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::CONFLICT, description = "SKU already exists"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    product: PathParam<Uuid>,
    json: JsonBody<CreateVariantRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<VariantCreatedResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let product = product.into_inner();
    let request = json.into_inner();

    let uuid = state
        .app
        .catalog
        .create_variant(
            product.into(),
            NewVariant {
                uuid: VariantUuid::new(),
                sku: request.sku,
                price: request.price,
                size: request.size,
                color: request.color,
            },
        )
        .await
        .map_err(into_status_error)?
        .uuid;

    res.add_header(LOCATION, format!("/products/{product}"), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(VariantCreatedResponse {
        uuid: uuid.into_uuid(),
    }))
}
