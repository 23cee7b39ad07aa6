//! Get Product Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use duka_app::domain::catalog::models::{Product, Variant};

use crate::{extensions::*, products::errors::into_status_error, state::State};

/// Product Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductResponse {
    /// The unique identifier of the product
    pub uuid: Uuid,

    /// Display name
    pub name: String,

    /// Display description
    pub description: Option<String>,

    /// physical, digital, or service
    pub product_type: String,

    /// Display image
    pub image_url: Option<String>,

    /// Whether the product is purchasable
    pub is_active: bool,

    /// Purchasable variants
    pub variants: Vec<VariantResponse>,

    /// The date and time the product was created
    pub created_at: String,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            uuid: product.uuid.into_uuid(),
            name: product.name,
            description: product.description,
            product_type: product.product_type,
            image_url: product.image_url,
            is_active: product.is_active,
            variants: product.variants.into_iter().map(Into::into).collect(),
            created_at: product.created_at.to_string(),
        }
    }
}

/// Variant Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct VariantResponse {
    /// The unique identifier of the variant
    pub uuid: Uuid,

    /// Stock-keeping unit, unique across the catalog
    pub sku: String,

    /// Unit price in minor units
    pub price: u64,

    /// Size specialisation, if any
    pub size: Option<String>,

    /// Colour specialisation, if any
    pub color: Option<String>,

    /// Whether the variant is purchasable
    pub is_active: bool,
}

impl From<Variant> for VariantResponse {
    fn from(variant: Variant) -> Self {
        Self {
            uuid: variant.uuid.into_uuid(),
            sku: variant.sku,
            price: variant.price,
            size: variant.size,
            color: variant.color,
            is_active: variant.is_active,
        }
    }
}

/// Get Product Handler
#[endpoint(
    tags("products"),
    summary = "Get Product",
    responses(
        (status_code = StatusCode::OK, description = "Product with variants"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    product: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<ProductResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let product = state
        .app
        .catalog
        .get_product(product.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(product.into()))
}
