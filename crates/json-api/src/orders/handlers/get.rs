//! Get Order Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use duka_app::domain::orders::models::{Order, OrderAddress, OrderItem, Payment};

use crate::{extensions::*, orders::errors::into_status_error, state::State};

/// Order Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderResponse {
    /// The unique identifier of the order
    pub uuid: Uuid,

    /// The owning user, absent for guest orders
    pub user_uuid: Option<Uuid>,

    /// Contact email for guest orders
    pub guest_email: Option<String>,

    /// POS or ONLINE
    pub source: String,

    /// Order status
    pub status: String,

    /// Order total in minor units
    pub total: u64,

    /// ISO currency code
    pub currency: String,

    /// Purchased line snapshots
    pub items: Vec<OrderItemResponse>,

    /// Shipping address snapshot, if one was captured
    pub address: Option<OrderAddressResponse>,

    /// Payment record, if one exists
    pub payment: Option<PaymentResponse>,

    /// The date and time the order was created
    pub created_at: String,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            uuid: order.uuid.into_uuid(),
            user_uuid: order.user_uuid.map(Into::into),
            guest_email: order.guest_email,
            source: order.source.as_str().to_string(),
            status: order.status,
            total: order.total,
            currency: order.currency,
            items: order.items.into_iter().map(Into::into).collect(),
            address: order.address.map(Into::into),
            payment: order.payment.map(Into::into),
            created_at: order.created_at.to_string(),
        }
    }
}

/// Order Item Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderItemResponse {
    pub uuid: Uuid,
    pub variant_uuid: Uuid,
    pub quantity: u64,
    /// Unit price frozen at purchase time
    pub price: u64,
}

impl From<OrderItem> for OrderItemResponse {
    fn from(item: OrderItem) -> Self {
        Self {
            uuid: item.uuid.into_uuid(),
            variant_uuid: item.variant_uuid.into_uuid(),
            quantity: item.quantity,
            price: item.price,
        }
    }
}

/// Order Address Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderAddressResponse {
    pub line1: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
}

impl From<OrderAddress> for OrderAddressResponse {
    fn from(address: OrderAddress) -> Self {
        Self {
            line1: address.line1,
            city: address.city,
            country: address.country,
        }
    }
}

/// Payment Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PaymentResponse {
    pub uuid: Uuid,
    pub provider: String,
    pub reference: Option<String>,
    /// PENDING, SUCCESS, or FAILED
    pub status: String,
    pub amount: u64,
}

impl From<Payment> for PaymentResponse {
    fn from(payment: Payment) -> Self {
        Self {
            uuid: payment.uuid.into_uuid(),
            provider: payment.provider,
            reference: payment.reference,
            status: payment.status.as_str().to_string(),
            amount: payment.amount,
        }
    }
}

/// Get Order Handler
#[endpoint(
    tags("orders"),
    summary = "Get Order",
    responses(
        (status_code = StatusCode::OK, description = "Order with items and payment"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let order = state
        .app
        .orders
        .get_order(order.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(order.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use duka_app::domain::orders::{
        MockOrdersService, OrdersServiceError,
        models::{ORDER_STATUS_CREATED, OrderSource, OrderUuid},
    };

    use crate::test_helpers::{MockApp, make_order, service_with};

    use super::*;

    fn make_service(orders: MockOrdersService) -> Service {
        let app = MockApp {
            orders,
            ..MockApp::default()
        };

        service_with(
            app.into_state(),
            Router::with_path("orders/{order}").get(handler),
        )
    }

    #[tokio::test]
    async fn test_get_returns_order() -> TestResult {
        let uuid = OrderUuid::new();
        let order = make_order(uuid, OrderSource::Online, ORDER_STATUS_CREATED, 30_00);

        let mut orders = MockOrdersService::new();

        orders
            .expect_get_order()
            .once()
            .withf(move |o| *o == uuid)
            .return_once(move |_| Ok(order));

        let mut res = TestClient::get(format!("http://example.com/orders/{uuid}"))
            .send(&make_service(orders))
            .await;

        let body: OrderResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.uuid, uuid.into_uuid());
        assert_eq!(body.source, "ONLINE");
        assert_eq!(body.total, 30_00);

        Ok(())
    }

    #[tokio::test]
    async fn test_get_missing_order_returns_404() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_get_order()
            .once()
            .return_once(|_| Err(OrdersServiceError::NotFound));

        let res = TestClient::get(format!("http://example.com/orders/{}", Uuid::now_v7()))
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
