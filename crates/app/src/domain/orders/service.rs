//! Orders service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::{
        catalog::PgCatalogRepository,
        orders::{
            errors::OrdersServiceError,
            models::{
                ORDER_STATUS_PAID, NewOrder, NewOrderItem, Order, OrderConfirmation,
                OrderItemUuid, OrderSource, OrderUuid, PosLine,
            },
            repositories::{
                PgOrderAddressesRepository, PgOrderItemsRepository, PgOrdersRepository,
                PgPaymentsRepository,
            },
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgOrdersService {
    db: Db,
    orders_repository: PgOrdersRepository,
    items_repository: PgOrderItemsRepository,
    addresses_repository: PgOrderAddressesRepository,
    payments_repository: PgPaymentsRepository,
    catalog_repository: PgCatalogRepository,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            orders_repository: PgOrdersRepository::new(),
            items_repository: PgOrderItemsRepository::new(),
            addresses_repository: PgOrderAddressesRepository::new(),
            payments_repository: PgPaymentsRepository::new(),
            catalog_repository: PgCatalogRepository::new(),
        }
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    async fn get_order(&self, order: OrderUuid) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let mut found = self.orders_repository.get_order(&mut tx, order).await?;

        let items = self.items_repository.get_order_items(&mut tx, order).await?;
        let address = self
            .addresses_repository
            .get_order_address(&mut tx, order)
            .await?;
        let payment = self.payments_repository.get_payment(&mut tx, order).await?;

        tx.commit().await?;

        found.items.extend(items);
        found.address = address;
        found.payment = payment;

        Ok(found)
    }

    async fn list_pos_orders(&self) -> Result<Vec<Order>, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let orders = self
            .orders_repository
            .list_orders_by_source(&mut tx, OrderSource::Pos)
            .await?;

        tx.commit().await?;

        Ok(orders)
    }

    async fn pos_sell(
        &self,
        lines: Vec<PosLine>,
        currency: String,
    ) -> Result<OrderConfirmation, OrdersServiceError> {
        if lines.is_empty() {
            return Err(OrdersServiceError::EmptySale);
        }

        let mut tx = self.db.begin().await?;

        let order = OrderUuid::new();

        self.orders_repository
            .create_order(
                &mut tx,
                &NewOrder {
                    uuid: order,
                    user_uuid: None,
                    guest_email: None,
                    source: OrderSource::Pos,
                    status: ORDER_STATUS_PAID.to_string(),
                    currency: currency.clone(),
                },
            )
            .await?;

        let mut total: u64 = 0;

        for line in &lines {
            // POS lines are priced from the live variant, same snapshot rule
            // as checkout.
            let variant = self
                .catalog_repository
                .get_variant(&mut tx, line.variant_uuid)
                .await
                .map_err(|error| match error {
                    sqlx::Error::RowNotFound => {
                        OrdersServiceError::UnknownVariant(line.variant_uuid.into_uuid())
                    }
                    other => OrdersServiceError::from(other),
                })?;

            total += variant.price * line.quantity;

            self.items_repository
                .create_order_item(
                    &mut tx,
                    order,
                    &NewOrderItem {
                        uuid: OrderItemUuid::new(),
                        variant_uuid: line.variant_uuid,
                        quantity: line.quantity,
                        price: variant.price,
                    },
                )
                .await?;
        }

        self.orders_repository
            .set_order_total(&mut tx, order, total)
            .await?;

        tx.commit().await?;

        Ok(OrderConfirmation {
            order_uuid: order,
            status: ORDER_STATUS_PAID.to_string(),
            total,
            currency,
        })
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Retrieve a single order with its items, address, and payment.
    async fn get_order(&self, order: OrderUuid) -> Result<Order, OrdersServiceError>;

    /// Retrieves all POS orders.
    async fn list_pos_orders(&self) -> Result<Vec<Order>, OrdersServiceError>;

    /// Record a point-of-sale sale: an order settled at the register, priced
    /// from the live catalog.
    async fn pos_sell(
        &self,
        lines: Vec<PosLine>,
        currency: String,
    ) -> Result<OrderConfirmation, OrdersServiceError>;
}
