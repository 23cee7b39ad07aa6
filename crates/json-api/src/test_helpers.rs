//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{affix_state::inject, prelude::*};

use duka_app::{
    context::AppContext,
    domain::{
        carts::{
            MockCartsService,
            models::{Cart, CartUuid},
        },
        catalog::{
            MockCatalogService,
            models::{Product, ProductUuid},
        },
        checkout::MockCheckoutService,
        inventory::MockInventoryService,
        orders::{
            MockOrdersService,
            models::{Order, OrderSource, OrderUuid},
        },
        users::{
            MockUsersService,
            models::{Role, User, UserUuid},
        },
        warehouses::MockWarehousesService,
    },
};

use crate::state::State;

/// One mock per service; every mock is strict, so any call a test did not
/// explicitly expect panics.
pub(crate) struct MockApp {
    pub(crate) users: MockUsersService,
    pub(crate) catalog: MockCatalogService,
    pub(crate) warehouses: MockWarehousesService,
    pub(crate) inventory: MockInventoryService,
    pub(crate) carts: MockCartsService,
    pub(crate) orders: MockOrdersService,
    pub(crate) checkout: MockCheckoutService,
}

impl Default for MockApp {
    fn default() -> Self {
        Self {
            users: MockUsersService::new(),
            catalog: MockCatalogService::new(),
            warehouses: MockWarehousesService::new(),
            inventory: MockInventoryService::new(),
            carts: MockCartsService::new(),
            orders: MockOrdersService::new(),
            checkout: MockCheckoutService::new(),
        }
    }
}

impl MockApp {
    pub(crate) fn into_state(self) -> Arc<State> {
        Arc::new(State::new(AppContext {
            users: Arc::new(self.users),
            catalog: Arc::new(self.catalog),
            warehouses: Arc::new(self.warehouses),
            inventory: Arc::new(self.inventory),
            carts: Arc::new(self.carts),
            orders: Arc::new(self.orders),
            checkout: Arc::new(self.checkout),
        }))
    }
}

pub(crate) fn make_user(role: Role) -> User {
    User {
        uuid: UserUuid::new(),
        email: "test@example.com".to_string(),
        role,
        is_active: true,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_cart(uuid: CartUuid) -> Cart {
    Cart {
        uuid,
        user_uuid: None,
        guest_email: None,
        is_abandoned: false,
        items: Vec::new(),
        last_activity_at: Timestamp::UNIX_EPOCH,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_product(uuid: ProductUuid, name: &str) -> Product {
    Product {
        uuid,
        name: name.to_string(),
        description: None,
        product_type: "physical".to_string(),
        image_url: None,
        is_active: true,
        variants: Vec::new(),
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_order(
    uuid: OrderUuid,
    source: OrderSource,
    status: &str,
    total: u64,
) -> Order {
    Order {
        uuid,
        user_uuid: None,
        guest_email: None,
        source,
        status: status.to_string(),
        total,
        currency: "KES".to_string(),
        items: Vec::new(),
        address: None,
        payment: None,
        created_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn service_with(state: Arc<State>, route: Router) -> Service {
    Service::new(Router::new().hoop(inject(state)).push(route))
}
