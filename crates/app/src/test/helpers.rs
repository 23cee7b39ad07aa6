//! Test Helpers

use crate::{
    domain::{
        carts::{
            CartsService, CartsServiceError,
            models::{Cart, CartItemUuid, CartUuid, NewCartItem},
        },
        catalog::{
            CatalogService, CatalogServiceError,
            models::{NewProduct, NewVariant, Product, ProductUuid, Variant, VariantUuid},
        },
        inventory::{
            InventoryService, InventoryServiceError,
            models::{InventoryRecord, StockAdjustment},
        },
        users::{
            UsersService, UsersServiceError,
            models::{NewUser, Role, User, UserUuid},
        },
        warehouses::{
            WarehousesService, WarehousesServiceError,
            models::{NewWarehouse, Warehouse, WarehouseUuid},
        },
    },
    test::TestContext,
};

pub(crate) async fn create_product(
    ctx: &TestContext,
    name: &str,
) -> Result<Product, CatalogServiceError> {
    ctx.catalog
        .create_product(NewProduct {
            uuid: ProductUuid::new(),
            name: name.to_string(),
            description: Some(format!("{name} description")),
            product_type: "physical".to_string(),
            image_url: None,
        })
        .await
}

pub(crate) async fn create_variant(
    ctx: &TestContext,
    product: ProductUuid,
    sku: &str,
    price: u64,
) -> Result<Variant, CatalogServiceError> {
    ctx.catalog
        .create_variant(
            product,
            NewVariant {
                uuid: VariantUuid::new(),
                sku: sku.to_string(),
                price,
                size: None,
                color: None,
            },
        )
        .await
}

pub(crate) async fn create_warehouse(
    ctx: &TestContext,
    name: &str,
) -> Result<Warehouse, WarehousesServiceError> {
    ctx.warehouses
        .create_warehouse(NewWarehouse {
            uuid: WarehouseUuid::new(),
            name: name.to_string(),
            location: "Nairobi".to_string(),
        })
        .await
}

/// One product, one variant, one warehouse; returns the pair most tests key
/// inventory on.
pub(crate) async fn create_variant_and_warehouse(
    ctx: &TestContext,
    price: u64,
) -> (VariantUuid, WarehouseUuid) {
    let product = create_product(ctx, "Test Product")
        .await
        .expect("Failed to create test product");

    let variant = create_variant(ctx, product.uuid, "TEST-SKU-1", price)
        .await
        .expect("Failed to create test variant");

    let warehouse = create_warehouse(ctx, "Test Warehouse")
        .await
        .expect("Failed to create test warehouse");

    (variant.uuid, warehouse.uuid)
}

pub(crate) async fn create_user(
    ctx: &TestContext,
    email: &str,
) -> Result<User, UsersServiceError> {
    ctx.users
        .create_user(NewUser {
            uuid: UserUuid::new(),
            email: email.to_string(),
            role: Role::Customer,
            token_hash: None,
        })
        .await
}

pub(crate) async fn add_item(
    ctx: &TestContext,
    cart: Option<CartUuid>,
    variant: VariantUuid,
    quantity: u64,
) -> Result<Cart, CartsServiceError> {
    ctx.carts
        .add_item(
            cart,
            None,
            NewCartItem {
                uuid: CartItemUuid::new(),
                variant_uuid: variant,
                quantity,
            },
        )
        .await
}

pub(crate) async fn adjust_stock(
    ctx: &TestContext,
    variant: VariantUuid,
    warehouse: WarehouseUuid,
    delta: i64,
) -> Result<InventoryRecord, InventoryServiceError> {
    ctx.inventory
        .adjust_stock(StockAdjustment {
            variant_uuid: variant,
            warehouse_uuid: warehouse,
            quantity_delta: delta,
            reorder_level: None,
        })
        .await
}

pub(crate) async fn stock_quantity(
    ctx: &TestContext,
    variant: VariantUuid,
    warehouse: WarehouseUuid,
) -> u64 {
    let quantity: i64 = sqlx::query_scalar(
        "SELECT quantity FROM inventory WHERE variant_uuid = $1 AND warehouse_uuid = $2",
    )
    .bind(variant.into_uuid())
    .bind(warehouse.into_uuid())
    .fetch_one(ctx.db.pool())
    .await
    .expect("inventory record should exist");

    u64::try_from(quantity).expect("stock quantity should never be negative")
}

pub(crate) async fn table_count(ctx: &TestContext, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(ctx.db.pool())
        .await
        .expect("count query should succeed")
}
