//! Get Cart Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use duka_app::domain::carts::models::{Cart, CartItem};

use crate::{carts::errors::into_status_error, extensions::*, state::State};

/// Cart Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartResponse {
    /// The unique identifier of the cart
    pub uuid: Uuid,

    /// The owning user, absent for guest carts
    pub user_uuid: Option<Uuid>,

    /// Contact email for guest carts
    pub guest_email: Option<String>,

    /// Whether the idle-cart sweeper has flagged this cart
    pub is_abandoned: bool,

    /// The items in the cart
    pub items: Vec<CartItemResponse>,

    /// The date and time of the last cart mutation
    pub last_activity_at: String,

    /// The date and time the cart was created
    pub created_at: String,

    /// The date and time the cart was last updated
    pub updated_at: String,
}

impl From<Cart> for CartResponse {
    fn from(cart: Cart) -> Self {
        CartResponse {
            uuid: cart.uuid.into_uuid(),
            user_uuid: cart.user_uuid.map(Into::into),
            guest_email: cart.guest_email,
            is_abandoned: cart.is_abandoned,
            items: cart.items.into_iter().map(CartItemResponse::from).collect(),
            last_activity_at: cart.last_activity_at.to_string(),
            created_at: cart.created_at.to_string(),
            updated_at: cart.updated_at.to_string(),
        }
    }
}

/// Cart Item Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartItemResponse {
    /// The unique identifier of the cart item
    pub uuid: Uuid,

    /// The unique identifier of the product variant in the cart item
    pub variant_uuid: Uuid,

    /// The number of units of the variant
    pub quantity: u64,

    /// The variant's current unit price in minor units
    pub price: u64,

    /// The product name for display
    pub name: String,

    /// The product description for display
    pub description: Option<String>,

    /// The product image for display
    pub image_url: Option<String>,
}

impl From<CartItem> for CartItemResponse {
    fn from(cart_item: CartItem) -> Self {
        Self {
            uuid: cart_item.uuid.into_uuid(),
            variant_uuid: cart_item.variant_uuid.into_uuid(),
            quantity: cart_item.quantity,
            price: cart_item.price,
            name: cart_item.name,
            description: cart_item.description,
            image_url: cart_item.image_url,
        }
    }
}

/// Get Cart Handler
///
/// Returns the cart view with its denormalised items.
#[endpoint(
    tags("cart"),
    summary = "Get Cart",
    responses(
        (status_code = StatusCode::OK, description = "Cart view"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    cart_uuid: QueryParam<Uuid, true>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let cart = state
        .app
        .carts
        .get_cart(cart_uuid.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.into()))
}
