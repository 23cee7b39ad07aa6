//! Catalog Models

use jiff::Timestamp;

use crate::uuids::TypedUuid;

/// Product UUID
pub type ProductUuid = TypedUuid<Product>;

/// Product Model
///
/// Products are display-level records; everything purchasable is a
/// [`Variant`] underneath one.
#[derive(Debug, Clone)]
pub struct Product {
    pub uuid: ProductUuid,
    pub name: String,
    pub description: Option<String>,
    pub product_type: String,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub variants: Vec<Variant>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Variant UUID
pub type VariantUuid = TypedUuid<Variant>;

/// Product Variant Model
#[derive(Debug, Clone)]
pub struct Variant {
    pub uuid: VariantUuid,
    pub product_uuid: ProductUuid,
    pub sku: String,
    /// Unit price in minor currency units.
    pub price: u64,
    pub size: Option<String>,
    pub color: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// New Product Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub uuid: ProductUuid,
    pub name: String,
    pub description: Option<String>,
    pub product_type: String,
    pub image_url: Option<String>,
}

/// New Variant Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewVariant {
    pub uuid: VariantUuid,
    pub sku: String,
    pub price: u64,
    pub size: Option<String>,
    pub color: Option<String>,
}
