//! Add Cart Item Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use duka_app::domain::carts::models::{CartItemUuid, NewCartItem};

use crate::{
    carts::{errors::into_status_error, handlers::get::CartResponse},
    extensions::*,
    state::State,
};

/// Add Cart Item Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AddCartItemRequest {
    /// Target cart; omit to open a fresh guest cart
    pub cart_uuid: Option<Uuid>,
    pub variant_uuid: Uuid,
    pub quantity: u64,
}

/// Add Cart Item Handler
///
/// Adds the variant to the cart, incrementing an existing line for the same
/// variant instead of duplicating it.
#[endpoint(
    tags("cart"),
    summary = "Add Item to Cart",
    responses(
        (status_code = StatusCode::OK, description = "Updated cart view"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart or variant not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<AddCartItemRequest>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let owner = depot.current_user().map(|user| user.uuid);

    let request = json.into_inner();

    let cart = state
        .app
        .carts
        .add_item(
            request.cart_uuid.map(Into::into),
            owner,
            NewCartItem {
                uuid: CartItemUuid::new(),
                variant_uuid: request.variant_uuid.into(),
                quantity: request.quantity,
            },
        )
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use duka_app::domain::carts::{CartsServiceError, MockCartsService, models::CartUuid};

    use crate::test_helpers::{MockApp, make_cart, service_with};

    use super::*;

    fn make_service(carts: MockCartsService) -> Service {
        let app = MockApp {
            carts,
            ..MockApp::default()
        };

        service_with(
            app.into_state(),
            Router::with_path("cart/items").post(handler),
        )
    }

    #[tokio::test]
    async fn test_add_item_without_cart_creates_one() -> TestResult {
        let variant = Uuid::now_v7();
        let cart_uuid = CartUuid::new();
        let cart = make_cart(cart_uuid);

        let mut carts = MockCartsService::new();

        carts
            .expect_add_item()
            .once()
            .withf(move |cart, owner, item| {
                cart.is_none()
                    && owner.is_none()
                    && item.variant_uuid.into_uuid() == variant
                    && item.quantity == 2
            })
            .return_once(move |_, _, _| Ok(cart));

        let mut res = TestClient::post("http://example.com/cart/items")
            .json(&json!({ "variant_uuid": variant, "quantity": 2 }))
            .send(&make_service(carts))
            .await;

        let body: CartResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.uuid, cart_uuid.into_uuid());

        Ok(())
    }

    #[tokio::test]
    async fn test_add_item_targets_existing_cart() -> TestResult {
        let variant = Uuid::now_v7();
        let cart_uuid = CartUuid::new();
        let cart = make_cart(cart_uuid);

        let mut carts = MockCartsService::new();

        carts
            .expect_add_item()
            .once()
            .withf(move |cart, _, _| *cart == Some(cart_uuid))
            .return_once(move |_, _, _| Ok(cart));

        let res = TestClient::post("http://example.com/cart/items")
            .json(&json!({
                "cart_uuid": cart_uuid.into_uuid(),
                "variant_uuid": variant,
                "quantity": 1
            }))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_add_item_unknown_cart_returns_404() -> TestResult {
        let mut carts = MockCartsService::new();

        carts
            .expect_add_item()
            .once()
            .return_once(|_, _, _| Err(CartsServiceError::NotFound));

        let res = TestClient::post("http://example.com/cart/items")
            .json(&json!({
                "cart_uuid": Uuid::now_v7(),
                "variant_uuid": Uuid::now_v7(),
                "quantity": 1
            }))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }

    #[tokio::test]
    async fn test_add_item_zero_quantity_returns_400() -> TestResult {
        let mut carts = MockCartsService::new();

        carts
            .expect_add_item()
            .once()
            .return_once(|_, _, _| Err(CartsServiceError::InvalidData));

        let res = TestClient::post("http://example.com/cart/items")
            .json(&json!({ "variant_uuid": Uuid::now_v7(), "quantity": 0 }))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
