//! Cart Models

use jiff::Timestamp;

use crate::{
    domain::{catalog::models::VariantUuid, users::models::UserUuid},
    uuids::TypedUuid,
};

/// Cart UUID
pub type CartUuid = TypedUuid<Cart>;

/// Cart Model
///
/// A cart without an owning user is a guest cart.
#[derive(Debug, Clone)]
pub struct Cart {
    pub uuid: CartUuid,
    pub user_uuid: Option<UserUuid>,
    pub guest_email: Option<String>,
    pub is_abandoned: bool,
    pub items: Vec<CartItem>,
    pub last_activity_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Cart Item UUID
pub type CartItemUuid = TypedUuid<CartItem>;

/// CartItem Model
///
/// Display fields are denormalised from the variant and its product at read
/// time; a line whose variant cannot be resolved projects placeholder values
/// instead of failing the whole cart read.
#[derive(Debug, Clone)]
pub struct CartItem {
    pub uuid: CartItemUuid,
    pub variant_uuid: VariantUuid,
    pub quantity: u64,
    pub price: u64,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// New CartItem Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewCartItem {
    pub uuid: CartItemUuid,
    pub variant_uuid: VariantUuid,
    pub quantity: u64,
}
