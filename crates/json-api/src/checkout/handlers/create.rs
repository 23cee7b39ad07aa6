//! Checkout Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use duka_app::domain::{checkout::models::CheckoutRequest, orders::models::OrderConfirmation};

use crate::{checkout::errors::into_status_error, extensions::*, state::State};

/// Checkout Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CheckoutRequestBody {
    /// Cart to convert into an order
    pub cart_uuid: Uuid,

    /// Shipping address line
    pub line1: Option<String>,

    /// Shipping city
    pub city: Option<String>,

    /// Shipping country
    pub country: Option<String>,

    /// Contact email for guest checkout
    pub guest_email: Option<String>,

    /// Payment provider identifier, e.g. MPESA or STRIPE
    pub payment_provider: String,

    /// ISO currency code
    pub currency: String,

    /// Warehouse to reserve stock from
    pub warehouse_uuid: Uuid,
}

impl From<CheckoutRequestBody> for CheckoutRequest {
    fn from(body: CheckoutRequestBody) -> Self {
        CheckoutRequest {
            cart_uuid: body.cart_uuid.into(),
            line1: body.line1,
            city: body.city,
            country: body.country,
            guest_email: body.guest_email,
            payment_provider: body.payment_provider,
            currency: body.currency,
            warehouse_uuid: body.warehouse_uuid.into(),
        }
    }
}

/// Order Confirmation Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderConfirmationResponse {
    /// Created order UUID
    pub order_uuid: Uuid,

    /// Order status after checkout
    pub status: String,

    /// Order total in minor units
    pub total: u64,

    /// ISO currency code
    pub currency: String,
}

impl From<OrderConfirmation> for OrderConfirmationResponse {
    fn from(confirmation: OrderConfirmation) -> Self {
        Self {
            order_uuid: confirmation.order_uuid.into_uuid(),
            status: confirmation.status,
            total: confirmation.total,
            currency: confirmation.currency,
        }
    }
}

/// Checkout Handler
///
/// Atomically converts the cart into an order: reserves stock, snapshots
/// prices and the shipping address, records a pending payment, and consumes
/// the cart.
#[endpoint(
    tags("cart"),
    summary = "Checkout",
    responses(
        (status_code = StatusCode::OK, description = "Order created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Cart empty or missing"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Insufficient stock"),
        (status_code = StatusCode::CONFLICT, description = "Stock contention"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CheckoutRequestBody>,
    depot: &mut Depot,
) -> Result<Json<OrderConfirmationResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let confirmation = state
        .app
        .checkout
        .checkout(json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(confirmation.into()))
}
