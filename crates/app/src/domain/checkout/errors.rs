//! Checkout errors.

use sqlx::Error;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("cart is empty or does not exist")]
    EmptyOrMissingCart,

    #[error("insufficient stock for variant {variant}")]
    InsufficientStock { variant: Uuid },

    #[error("stock contention, retries exhausted")]
    Conflict,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for CheckoutError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::EmptyOrMissingCart;
        }

        Self::Sql(error)
    }
}

/// Serialization failures and deadlocks are safe to retry: the transaction
/// rolled back without side effects.
pub(crate) fn is_transient(error: &Error) -> bool {
    error
        .as_database_error()
        .and_then(|db| db.code())
        .is_some_and(|code| code == "40001" || code == "40P01")
}
