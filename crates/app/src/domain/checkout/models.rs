//! Checkout Models

use crate::domain::{carts::models::CartUuid, warehouses::models::WarehouseUuid};

/// Checkout Request Model
///
/// The warehouse is the caller-supplied stock-reservation source; no
/// selection policy is applied here.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutRequest {
    pub cart_uuid: CartUuid,
    pub line1: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub guest_email: Option<String>,
    pub payment_provider: String,
    pub currency: String,
    pub warehouse_uuid: WarehouseUuid,
}

impl CheckoutRequest {
    /// Whether any shipping-address field was supplied.
    #[must_use]
    pub fn has_address(&self) -> bool {
        self.line1.is_some() || self.city.is_some() || self.country.is_some()
    }
}
