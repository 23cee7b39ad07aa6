//! Errors

use salvo::http::StatusError;
use tracing::error;

use duka_app::domain::checkout::CheckoutError;

pub(crate) fn into_status_error(error: CheckoutError) -> StatusError {
    match error {
        CheckoutError::EmptyOrMissingCart => {
            StatusError::bad_request().brief("Cart is empty or does not exist")
        }
        CheckoutError::InsufficientStock { variant } => StatusError::unprocessable_entity()
            .brief(format!("Insufficient stock for variant {variant}")),
        CheckoutError::Conflict => {
            StatusError::conflict().brief("Stock contention, please retry")
        }
        CheckoutError::Sql(source) => {
            error!("checkout storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
