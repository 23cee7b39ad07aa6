//! App Router

use salvo::Router;

use duka_app::domain::users::models::Role;

use crate::{auth, carts, checkout, inventory, orders, pos, products, warehouses};

pub(crate) fn app_router() -> Router {
    Router::new()
        .push(
            Router::with_path("cart")
                .hoop(auth::optional)
                .push(
                    Router::with_path("items")
                        .post(carts::handlers::add_item::handler)
                        .get(carts::handlers::get::handler)
                        .delete(carts::handlers::clear::handler),
                )
                .push(Router::with_path("abandoned").post(carts::handlers::abandon::handler))
                .push(Router::with_path("checkout").post(checkout::handlers::create::handler)),
        )
        .push(
            Router::with_path("inventory")
                .hoop(auth::RequireRole(Role::Admin))
                .get(inventory::handlers::index::handler)
                .push(Router::with_path("adjust").post(inventory::handlers::adjust::handler)),
        )
        .push(
            Router::with_path("products")
                .get(products::handlers::index::handler)
                .push(Router::with_path("{product}").get(products::handlers::get::handler)),
        )
        .push(
            Router::with_path("products")
                .hoop(auth::RequireRole(Role::Admin))
                .post(products::handlers::create::handler)
                .push(
                    Router::with_path("{product}/variants")
                        .post(products::handlers::create_variant::handler),
                ),
        )
        .push(
            Router::with_path("warehouses")
                .hoop(auth::RequireRole(Role::Admin))
                .get(warehouses::handlers::index::handler)
                .post(warehouses::handlers::create::handler),
        )
        .push(
            Router::with_path("pos")
                .hoop(auth::RequireRole(Role::Cashier))
                .get(pos::handlers::index::handler)
                .push(Router::with_path("sell").post(pos::handlers::sell::handler)),
        )
        .push(Router::with_path("orders/{order}").get(orders::handlers::get::handler))
}
