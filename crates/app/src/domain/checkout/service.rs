//! Checkout service.
//!
//! Converts a cart into an order inside one transaction: reserve stock,
//! snapshot prices and the shipping address, record a pending payment, and
//! consume the cart. Either all of it commits or none of it does.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use tracing::debug;

use crate::{
    database::Db,
    domain::{
        carts::PgCartsRepository,
        checkout::{
            errors::{CheckoutError, is_transient},
            models::CheckoutRequest,
            repository::PgCheckoutRepository,
        },
        inventory::{LowStockEvent, PgInventoryRepository, StockAlerts},
        orders::{
            PgOrderAddressesRepository, PgOrderItemsRepository, PgOrdersRepository,
            PgPaymentsRepository,
            models::{
                ORDER_STATUS_CREATED, NewOrder, NewOrderItem, NewPayment, OrderAddress,
                OrderAddressUuid, OrderConfirmation, OrderItemUuid, OrderSource, OrderUuid,
                PaymentStatus, PaymentUuid,
            },
        },
    },
};

/// Bounded internal retries for serialization conflicts; beyond this the
/// caller sees [`CheckoutError::Conflict`].
const MAX_ATTEMPTS: u32 = 3;

#[derive(Clone)]
pub struct PgCheckoutService {
    db: Db,
    carts_repository: PgCartsRepository,
    checkout_repository: PgCheckoutRepository,
    inventory_repository: PgInventoryRepository,
    orders_repository: PgOrdersRepository,
    items_repository: PgOrderItemsRepository,
    addresses_repository: PgOrderAddressesRepository,
    payments_repository: PgPaymentsRepository,
    alerts: Arc<dyn StockAlerts>,
}

impl PgCheckoutService {
    #[must_use]
    pub fn new(db: Db, alerts: Arc<dyn StockAlerts>) -> Self {
        Self {
            db,
            carts_repository: PgCartsRepository::new(),
            checkout_repository: PgCheckoutRepository::new(),
            inventory_repository: PgInventoryRepository::new(),
            orders_repository: PgOrdersRepository::new(),
            items_repository: PgOrderItemsRepository::new(),
            addresses_repository: PgOrderAddressesRepository::new(),
            payments_repository: PgPaymentsRepository::new(),
            alerts,
        }
    }

    async fn try_checkout(
        &self,
        request: &CheckoutRequest,
    ) -> Result<OrderConfirmation, CheckoutError> {
        let mut tx = self.db.begin().await?;

        // Precondition check before any write: a failed checkout must be a
        // no-op.
        let cart = self
            .carts_repository
            .get_cart(&mut tx, request.cart_uuid)
            .await?
            .ok_or(CheckoutError::EmptyOrMissingCart)?;

        let lines = self
            .checkout_repository
            .get_checkout_lines(&mut tx, request.cart_uuid)
            .await?;

        if lines.is_empty() {
            return Err(CheckoutError::EmptyOrMissingCart);
        }

        let order = OrderUuid::new();

        self.orders_repository
            .create_order(
                &mut tx,
                &NewOrder {
                    uuid: order,
                    user_uuid: cart.user_uuid,
                    guest_email: request.guest_email.clone().or(cart.guest_email),
                    source: OrderSource::Online,
                    status: ORDER_STATUS_CREATED.to_string(),
                    currency: request.currency.clone(),
                },
            )
            .await?;

        let mut total: u64 = 0;
        let mut low_stock = Vec::new();

        for line in &lines {
            // The live price is frozen into the order item here; later
            // catalog changes never touch this order.
            total += line.price * line.quantity;

            let reserved = self
                .inventory_repository
                .reserve_stock(
                    &mut tx,
                    line.variant_uuid,
                    request.warehouse_uuid,
                    line.quantity,
                )
                .await?
                .ok_or(CheckoutError::InsufficientStock {
                    variant: line.variant_uuid.into_uuid(),
                })?;

            if reserved.quantity <= reserved.reorder_level {
                low_stock.push(LowStockEvent {
                    variant_uuid: line.variant_uuid,
                    warehouse_uuid: request.warehouse_uuid,
                    quantity: reserved.quantity,
                    reorder_level: reserved.reorder_level,
                });
            }

            self.items_repository
                .create_order_item(
                    &mut tx,
                    order,
                    &NewOrderItem {
                        uuid: OrderItemUuid::new(),
                        variant_uuid: line.variant_uuid,
                        quantity: line.quantity,
                        price: line.price,
                    },
                )
                .await?;
        }

        self.orders_repository
            .set_order_total(&mut tx, order, total)
            .await?;

        if request.has_address() {
            self.addresses_repository
                .create_order_address(
                    &mut tx,
                    order,
                    &OrderAddress {
                        uuid: OrderAddressUuid::new(),
                        line1: request.line1.clone(),
                        city: request.city.clone(),
                        country: request.country.clone(),
                    },
                )
                .await?;
        }

        self.payments_repository
            .create_payment(
                &mut tx,
                order,
                &NewPayment {
                    uuid: PaymentUuid::new(),
                    provider: request.payment_provider.clone(),
                    reference: None,
                    status: PaymentStatus::Pending,
                    amount: total,
                },
            )
            .await?;

        // Consume the cart; its lines cascade with it. A replayed checkout
        // finds no cart and cannot double-charge inventory.
        self.carts_repository
            .delete_cart(&mut tx, request.cart_uuid)
            .await?;

        tx.commit().await?;

        // Alerts fire only after commit, so a rollback never leaks one, and
        // the sink can never fail the transaction.
        for event in &low_stock {
            self.alerts.low_stock(event);
        }

        Ok(OrderConfirmation {
            order_uuid: order,
            status: ORDER_STATUS_CREATED.to_string(),
            total,
            currency: request.currency.clone(),
        })
    }
}

#[async_trait]
impl CheckoutService for PgCheckoutService {
    async fn checkout(
        &self,
        request: CheckoutRequest,
    ) -> Result<OrderConfirmation, CheckoutError> {
        let mut attempt = 1;

        loop {
            match self.try_checkout(&request).await {
                Err(CheckoutError::Sql(error)) if is_transient(&error) => {
                    if attempt >= MAX_ATTEMPTS {
                        return Err(CheckoutError::Conflict);
                    }

                    debug!(attempt, "retrying checkout after serialization conflict");
                    attempt += 1;
                }
                other => return other,
            }
        }
    }
}

#[automock]
#[async_trait]
pub trait CheckoutService: Send + Sync {
    /// Convert the cart into an order atomically, or fail with zero side
    /// effects.
    async fn checkout(&self, request: CheckoutRequest)
    -> Result<OrderConfirmation, CheckoutError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;
    use uuid::Uuid;

    use crate::{
        domain::{
            carts::{CartsService, CartsServiceError, models::CartUuid},
            inventory::{InventoryService, MockStockAlerts, models::StockAdjustment},
            orders::OrdersService,
            warehouses::models::WarehouseUuid,
        },
        test::{TestContext, helpers},
    };

    use super::*;

    fn request(cart: CartUuid, warehouse: WarehouseUuid) -> CheckoutRequest {
        CheckoutRequest {
            cart_uuid: cart,
            line1: None,
            city: None,
            country: None,
            guest_email: None,
            payment_provider: "MPESA".to_string(),
            currency: "KES".to_string(),
            warehouse_uuid: warehouse,
        }
    }

    #[tokio::test]
    async fn worked_example_scenario() -> TestResult {
        // Cart: one line, variant V qty 3 at 10.00; warehouse W holds 5 with
        // reorder level 2. Checkout succeeds with total 30.00, W drops to 2,
        // the low-stock signal fires, and the cart is gone.
        let ctx = TestContext::new().await;

        let product = helpers::create_product(&ctx, "Phone").await?;
        let variant = helpers::create_variant(&ctx, product.uuid, "PHN-1", 10_00).await?;
        let warehouse = helpers::create_warehouse(&ctx, "W").await?;

        ctx.inventory
            .adjust_stock(StockAdjustment {
                variant_uuid: variant.uuid,
                warehouse_uuid: warehouse.uuid,
                quantity_delta: 5,
                reorder_level: Some(2),
            })
            .await?;

        let cart = helpers::add_item(&ctx, None, variant.uuid, 3).await?;

        let mut alerts = MockStockAlerts::new();

        alerts
            .expect_low_stock()
            .once()
            .withf(move |event| event.quantity == 2 && event.reorder_level == 2)
            .return_const(());

        let service = PgCheckoutService::new(ctx.app_db.clone(), Arc::new(alerts));

        let confirmation = service.checkout(request(cart.uuid, warehouse.uuid)).await?;

        assert_eq!(confirmation.total, 30_00);
        assert_eq!(confirmation.status, ORDER_STATUS_CREATED);
        assert_eq!(confirmation.currency, "KES");

        assert_eq!(
            helpers::stock_quantity(&ctx, variant.uuid, warehouse.uuid).await,
            2
        );

        let result = ctx.carts.get_cart(cart.uuid).await;
        assert!(
            matches!(result, Err(CartsServiceError::NotFound)),
            "cart should be consumed, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn order_total_is_sum_of_snapshot_prices() -> TestResult {
        let ctx = TestContext::new().await;

        let product = helpers::create_product(&ctx, "Phone").await?;
        let phone = helpers::create_variant(&ctx, product.uuid, "PHN-1", 10_00).await?;
        let case = helpers::create_variant(&ctx, product.uuid, "CSE-1", 2_50).await?;
        let warehouse = helpers::create_warehouse(&ctx, "W").await?;

        helpers::adjust_stock(&ctx, phone.uuid, warehouse.uuid, 10).await?;
        helpers::adjust_stock(&ctx, case.uuid, warehouse.uuid, 10).await?;

        let cart = helpers::add_item(&ctx, None, phone.uuid, 2).await?;
        helpers::add_item(&ctx, Some(cart.uuid), case.uuid, 3).await?;

        let confirmation = ctx
            .checkout
            .checkout(request(cart.uuid, warehouse.uuid))
            .await?;

        assert_eq!(confirmation.total, 2 * 10_00 + 3 * 2_50);

        let order = ctx.orders.get_order(confirmation.order_uuid).await?;
        let items_total: u64 = order.items.iter().map(|i| i.price * i.quantity).sum();

        assert_eq!(order.total, items_total);

        Ok(())
    }

    #[tokio::test]
    async fn later_price_change_does_not_alter_order() -> TestResult {
        let ctx = TestContext::new().await;

        let product = helpers::create_product(&ctx, "Phone").await?;
        let variant = helpers::create_variant(&ctx, product.uuid, "PHN-1", 10_00).await?;
        let warehouse = helpers::create_warehouse(&ctx, "W").await?;

        helpers::adjust_stock(&ctx, variant.uuid, warehouse.uuid, 10).await?;

        let cart = helpers::add_item(&ctx, None, variant.uuid, 3).await?;

        let confirmation = ctx
            .checkout
            .checkout(request(cart.uuid, warehouse.uuid))
            .await?;

        sqlx::query("UPDATE product_variants SET price = $1 WHERE uuid = $2")
            .bind(99_99_i64)
            .bind(variant.uuid.into_uuid())
            .execute(ctx.db.pool())
            .await?;

        let order = ctx.orders.get_order(confirmation.order_uuid).await?;

        assert_eq!(order.total, 30_00);
        assert_eq!(order.items[0].price, 10_00);

        Ok(())
    }

    #[tokio::test]
    async fn inventory_decrements_match_cart_lines_exactly() -> TestResult {
        let ctx = TestContext::new().await;

        let product = helpers::create_product(&ctx, "Phone").await?;
        let a = helpers::create_variant(&ctx, product.uuid, "A-1", 10_00).await?;
        let b = helpers::create_variant(&ctx, product.uuid, "B-1", 5_00).await?;
        let warehouse = helpers::create_warehouse(&ctx, "W").await?;

        helpers::adjust_stock(&ctx, a.uuid, warehouse.uuid, 10).await?;
        helpers::adjust_stock(&ctx, b.uuid, warehouse.uuid, 10).await?;

        let cart = helpers::add_item(&ctx, None, a.uuid, 2).await?;
        helpers::add_item(&ctx, Some(cart.uuid), b.uuid, 3).await?;

        ctx.checkout
            .checkout(request(cart.uuid, warehouse.uuid))
            .await?;

        assert_eq!(helpers::stock_quantity(&ctx, a.uuid, warehouse.uuid).await, 8);
        assert_eq!(helpers::stock_quantity(&ctx, b.uuid, warehouse.uuid).await, 7);

        Ok(())
    }

    #[tokio::test]
    async fn missing_cart_fails_before_any_write() -> TestResult {
        let ctx = TestContext::new().await;

        let warehouse = helpers::create_warehouse(&ctx, "W").await?;

        let result = ctx
            .checkout
            .checkout(request(CartUuid::new(), warehouse.uuid))
            .await;

        assert!(
            matches!(result, Err(CheckoutError::EmptyOrMissingCart)),
            "expected EmptyOrMissingCart, got {result:?}"
        );

        assert_eq!(helpers::table_count(&ctx, "orders").await, 0);
        assert_eq!(helpers::table_count(&ctx, "payments").await, 0);

        Ok(())
    }

    #[tokio::test]
    async fn empty_cart_fails_with_no_side_effects() -> TestResult {
        let ctx = TestContext::new().await;

        let product = helpers::create_product(&ctx, "Phone").await?;
        let variant = helpers::create_variant(&ctx, product.uuid, "PHN-1", 10_00).await?;
        let warehouse = helpers::create_warehouse(&ctx, "W").await?;

        helpers::adjust_stock(&ctx, variant.uuid, warehouse.uuid, 5).await?;

        let cart = helpers::add_item(&ctx, None, variant.uuid, 1).await?;
        ctx.carts.clear_cart(cart.uuid).await?;

        let result = ctx
            .checkout
            .checkout(request(cart.uuid, warehouse.uuid))
            .await;

        assert!(
            matches!(result, Err(CheckoutError::EmptyOrMissingCart)),
            "expected EmptyOrMissingCart, got {result:?}"
        );

        assert_eq!(helpers::table_count(&ctx, "orders").await, 0);
        assert_eq!(helpers::table_count(&ctx, "order_items").await, 0);
        assert_eq!(helpers::table_count(&ctx, "payments").await, 0);
        assert_eq!(
            helpers::stock_quantity(&ctx, variant.uuid, warehouse.uuid).await,
            5
        );

        // The empty cart itself survives a failed checkout.
        assert!(ctx.carts.get_cart(cart.uuid).await.is_ok());

        Ok(())
    }

    #[tokio::test]
    async fn failed_stock_check_rolls_back_earlier_lines() -> TestResult {
        let ctx = TestContext::new().await;

        let product = helpers::create_product(&ctx, "Phone").await?;
        let a = helpers::create_variant(&ctx, product.uuid, "A-1", 10_00).await?;
        let b = helpers::create_variant(&ctx, product.uuid, "B-1", 5_00).await?;
        let warehouse = helpers::create_warehouse(&ctx, "W").await?;

        helpers::adjust_stock(&ctx, a.uuid, warehouse.uuid, 10).await?;
        helpers::adjust_stock(&ctx, b.uuid, warehouse.uuid, 1).await?;

        let cart = helpers::add_item(&ctx, None, a.uuid, 2).await?;
        helpers::add_item(&ctx, Some(cart.uuid), b.uuid, 5).await?;

        let result = ctx
            .checkout
            .checkout(request(cart.uuid, warehouse.uuid))
            .await;

        match result {
            Err(CheckoutError::InsufficientStock { variant }) => {
                assert_eq!(variant, b.uuid.into_uuid());
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }

        // A's reservation from earlier in the same call must be rolled back.
        assert_eq!(
            helpers::stock_quantity(&ctx, a.uuid, warehouse.uuid).await,
            10
        );
        assert_eq!(helpers::table_count(&ctx, "orders").await, 0);

        // The cart survives and can be retried.
        assert!(ctx.carts.get_cart(cart.uuid).await.is_ok());

        Ok(())
    }

    #[tokio::test]
    async fn missing_inventory_record_is_insufficient_stock() -> TestResult {
        let ctx = TestContext::new().await;

        let product = helpers::create_product(&ctx, "Phone").await?;
        let variant = helpers::create_variant(&ctx, product.uuid, "PHN-1", 10_00).await?;
        let warehouse = helpers::create_warehouse(&ctx, "W").await?;

        let cart = helpers::add_item(&ctx, None, variant.uuid, 1).await?;

        let result = ctx
            .checkout
            .checkout(request(cart.uuid, warehouse.uuid))
            .await;

        assert!(
            matches!(
                result,
                Err(CheckoutError::InsufficientStock { variant: v }) if v == variant.uuid.into_uuid()
            ),
            "expected InsufficientStock, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn cart_is_consumed_exactly_once() -> TestResult {
        let ctx = TestContext::new().await;

        let product = helpers::create_product(&ctx, "Phone").await?;
        let variant = helpers::create_variant(&ctx, product.uuid, "PHN-1", 10_00).await?;
        let warehouse = helpers::create_warehouse(&ctx, "W").await?;

        helpers::adjust_stock(&ctx, variant.uuid, warehouse.uuid, 10).await?;

        let cart = helpers::add_item(&ctx, None, variant.uuid, 2).await?;

        ctx.checkout
            .checkout(request(cart.uuid, warehouse.uuid))
            .await?;

        let replay = ctx
            .checkout
            .checkout(request(cart.uuid, warehouse.uuid))
            .await;

        assert!(
            matches!(replay, Err(CheckoutError::EmptyOrMissingCart)),
            "replay must not double-charge inventory, got {replay:?}"
        );

        assert_eq!(
            helpers::stock_quantity(&ctx, variant.uuid, warehouse.uuid).await,
            8
        );

        Ok(())
    }

    #[tokio::test]
    async fn address_and_payment_snapshots_are_written() -> TestResult {
        let ctx = TestContext::new().await;

        let product = helpers::create_product(&ctx, "Phone").await?;
        let variant = helpers::create_variant(&ctx, product.uuid, "PHN-1", 10_00).await?;
        let warehouse = helpers::create_warehouse(&ctx, "W").await?;

        helpers::adjust_stock(&ctx, variant.uuid, warehouse.uuid, 10).await?;

        let cart = helpers::add_item(&ctx, None, variant.uuid, 2).await?;

        let confirmation = ctx
            .checkout
            .checkout(CheckoutRequest {
                line1: Some("1 Moi Avenue".to_string()),
                city: Some("Nairobi".to_string()),
                country: Some("KE".to_string()),
                guest_email: Some("guest@example.com".to_string()),
                payment_provider: "STRIPE".to_string(),
                ..request(cart.uuid, warehouse.uuid)
            })
            .await?;

        let order = ctx.orders.get_order(confirmation.order_uuid).await?;

        let address = order.address.expect("address snapshot should exist");
        assert_eq!(address.line1.as_deref(), Some("1 Moi Avenue"));
        assert_eq!(address.city.as_deref(), Some("Nairobi"));
        assert_eq!(address.country.as_deref(), Some("KE"));

        let payment = order.payment.expect("payment should exist");
        assert_eq!(payment.status, PaymentStatus::Pending);
        assert_eq!(payment.provider, "STRIPE");
        assert_eq!(payment.amount, order.total);

        assert_eq!(order.guest_email.as_deref(), Some("guest@example.com"));
        assert!(order.user_uuid.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn owner_is_copied_from_cart() -> TestResult {
        let ctx = TestContext::new().await;

        let product = helpers::create_product(&ctx, "Phone").await?;
        let variant = helpers::create_variant(&ctx, product.uuid, "PHN-1", 10_00).await?;
        let warehouse = helpers::create_warehouse(&ctx, "W").await?;
        let user = helpers::create_user(&ctx, "buyer@example.com").await?;

        helpers::adjust_stock(&ctx, variant.uuid, warehouse.uuid, 10).await?;

        let cart = ctx
            .carts
            .add_item(
                None,
                Some(user.uuid),
                crate::domain::carts::models::NewCartItem {
                    uuid: crate::domain::carts::models::CartItemUuid::new(),
                    variant_uuid: variant.uuid,
                    quantity: 1,
                },
            )
            .await?;

        let confirmation = ctx
            .checkout
            .checkout(request(cart.uuid, warehouse.uuid))
            .await?;

        let order = ctx.orders.get_order(confirmation.order_uuid).await?;

        assert_eq!(order.user_uuid, Some(user.uuid));

        Ok(())
    }

    #[tokio::test]
    async fn no_alert_fires_for_failed_checkout() -> TestResult {
        let ctx = TestContext::new().await;

        let product = helpers::create_product(&ctx, "Phone").await?;
        let a = helpers::create_variant(&ctx, product.uuid, "A-1", 10_00).await?;
        let b = helpers::create_variant(&ctx, product.uuid, "B-1", 5_00).await?;
        let warehouse = helpers::create_warehouse(&ctx, "W").await?;

        // A would land at its reorder level; B makes the checkout fail.
        helpers::adjust_stock(&ctx, a.uuid, warehouse.uuid, 5).await?;

        let cart = helpers::add_item(&ctx, None, a.uuid, 3).await?;
        helpers::add_item(&ctx, Some(cart.uuid), b.uuid, 1).await?;

        let mut alerts = MockStockAlerts::new();
        alerts.expect_low_stock().never();

        let service = PgCheckoutService::new(ctx.app_db.clone(), Arc::new(alerts));

        let result = service.checkout(request(cart.uuid, warehouse.uuid)).await;

        assert!(matches!(
            result,
            Err(CheckoutError::InsufficientStock { .. })
        ));

        Ok(())
    }

    #[tokio::test]
    async fn concurrent_checkouts_and_adjustments_never_oversell() -> TestResult {
        let ctx = TestContext::new().await;

        let product = helpers::create_product(&ctx, "Phone").await?;
        let variant = helpers::create_variant(&ctx, product.uuid, "PHN-1", 10_00).await?;
        let warehouse = helpers::create_warehouse(&ctx, "W").await?;

        helpers::adjust_stock(&ctx, variant.uuid, warehouse.uuid, 10).await?;

        // Five checkout carts of 3 each plus three adjustments of -2 contend
        // for 10 units; any interleaving must leave the counter >= 0.
        let mut carts = Vec::new();

        for _ in 0..5 {
            let cart = helpers::add_item(&ctx, None, variant.uuid, 3).await?;
            carts.push(cart.uuid);
        }

        let mut tasks = tokio::task::JoinSet::new();

        for cart in carts {
            let checkout = ctx.checkout.clone();
            let req = request(cart, warehouse.uuid);

            tasks.spawn(async move { checkout.checkout(req).await.is_ok() as u64 * 3 });
        }

        for _ in 0..3 {
            let inventory = ctx.inventory.clone();
            let variant_uuid = variant.uuid;
            let warehouse_uuid = warehouse.uuid;

            tasks.spawn(async move {
                inventory
                    .adjust_stock(StockAdjustment {
                        variant_uuid,
                        warehouse_uuid,
                        quantity_delta: -2,
                        reorder_level: None,
                    })
                    .await
                    .is_ok() as u64
                    * 2
            });
        }

        let mut consumed = 0;

        while let Some(result) = tasks.join_next().await {
            consumed += result?;
        }

        let remaining = helpers::stock_quantity(&ctx, variant.uuid, warehouse.uuid).await;

        assert_eq!(remaining, 10 - consumed);

        Ok(())
    }

    #[tokio::test]
    async fn duplicate_variant_lines_are_unrepresentable() -> TestResult {
        // Checkout would process a duplicate line against the already
        // decremented quantity; the unique (cart, variant) index keeps such
        // rows from existing in the first place.
        let ctx = TestContext::new().await;

        let product = helpers::create_product(&ctx, "Phone").await?;
        let variant = helpers::create_variant(&ctx, product.uuid, "PHN-1", 10_00).await?;
        let warehouse = helpers::create_warehouse(&ctx, "W").await?;

        helpers::adjust_stock(&ctx, variant.uuid, warehouse.uuid, 5).await?;

        let cart = helpers::add_item(&ctx, None, variant.uuid, 3).await?;

        sqlx::query(
            "INSERT INTO cart_items (uuid, cart_uuid, variant_uuid, quantity)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(Uuid::now_v7())
        .bind(cart.uuid.into_uuid())
        .bind(variant.uuid.into_uuid())
        .bind(3_i64)
        .execute(ctx.db.pool())
        .await
        .expect_err("unique (cart, variant) index should reject the duplicate");

        Ok(())
    }
}
