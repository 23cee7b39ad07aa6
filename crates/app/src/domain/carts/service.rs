//! Carts service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::{
        carts::{
            errors::CartsServiceError,
            models::{Cart, CartUuid, NewCartItem},
            repositories::{PgCartItemsRepository, PgCartsRepository},
        },
        users::models::UserUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgCartsService {
    db: Db,
    carts_repository: PgCartsRepository,
    items_repository: PgCartItemsRepository,
}

impl PgCartsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            carts_repository: PgCartsRepository::new(),
            items_repository: PgCartItemsRepository::new(),
        }
    }
}

#[async_trait]
impl CartsService for PgCartsService {
    async fn add_item(
        &self,
        cart: Option<CartUuid>,
        owner: Option<UserUuid>,
        item: NewCartItem,
    ) -> Result<Cart, CartsServiceError> {
        if item.quantity == 0 {
            return Err(CartsServiceError::InvalidData);
        }

        let mut tx = self.db.begin().await?;

        let cart = match cart {
            Some(cart) => {
                // Touching also resets the abandonment flag and bumps
                // last_activity_at.
                if self.carts_repository.touch_cart(&mut tx, cart).await? == 0 {
                    return Err(CartsServiceError::NotFound);
                }

                cart
            }
            None => {
                let cart = CartUuid::new();

                self.carts_repository
                    .create_cart(&mut tx, cart, owner, None)
                    .await?;

                cart
            }
        };

        self.items_repository
            .upsert_cart_item(&mut tx, cart, &item)
            .await?;

        let mut view = self
            .carts_repository
            .get_cart(&mut tx, cart)
            .await?
            .ok_or(CartsServiceError::NotFound)?;

        let items = self
            .items_repository
            .get_cart_items(&mut tx, cart)
            .await?;

        tx.commit().await?;

        view.items.extend(items);

        Ok(view)
    }

    async fn get_cart(&self, cart: CartUuid) -> Result<Cart, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let mut view = self
            .carts_repository
            .get_cart(&mut tx, cart)
            .await?
            .ok_or(CartsServiceError::NotFound)?;

        let items = self
            .items_repository
            .get_cart_items(&mut tx, cart)
            .await?;

        tx.commit().await?;

        view.items.extend(items);

        Ok(view)
    }

    async fn clear_cart(&self, cart: CartUuid) -> Result<Cart, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        if self.carts_repository.touch_cart(&mut tx, cart).await? == 0 {
            return Err(CartsServiceError::NotFound);
        }

        self.items_repository
            .clear_cart_items(&mut tx, cart)
            .await?;

        let view = self
            .carts_repository
            .get_cart(&mut tx, cart)
            .await?
            .ok_or(CartsServiceError::NotFound)?;

        tx.commit().await?;

        Ok(view)
    }

    async fn mark_abandoned(&self, cart: CartUuid) -> Result<(), CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self
            .carts_repository
            .mark_cart_abandoned(&mut tx, cart)
            .await?;

        if rows_affected == 0 {
            return Err(CartsServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Add a line to the cart, incrementing the existing line for the same
    /// variant instead of duplicating it. A missing cart id creates a fresh
    /// cart (owned by `owner` when given, guest otherwise). Returns the full
    /// cart view.
    async fn add_item(
        &self,
        cart: Option<CartUuid>,
        owner: Option<UserUuid>,
        item: NewCartItem,
    ) -> Result<Cart, CartsServiceError>;

    /// Retrieve a single cart with its denormalised item projection.
    async fn get_cart(&self, cart: CartUuid) -> Result<Cart, CartsServiceError>;

    /// Delete all lines, keeping the (now-empty) cart record.
    async fn clear_cart(&self, cart: CartUuid) -> Result<Cart, CartsServiceError>;

    /// Flag the cart as abandoned without touching its lines.
    async fn mark_abandoned(&self, cart: CartUuid) -> Result<(), CartsServiceError>;
}
