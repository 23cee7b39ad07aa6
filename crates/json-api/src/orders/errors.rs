//! Errors

use salvo::http::StatusError;
use tracing::error;

use duka_app::domain::orders::OrdersServiceError;

pub(crate) fn into_status_error(error: OrdersServiceError) -> StatusError {
    match error {
        OrdersServiceError::NotFound => StatusError::not_found().brief("Order not found"),
        OrdersServiceError::UnknownVariant(variant) => {
            StatusError::not_found().brief(format!("Unknown variant {variant}"))
        }
        OrdersServiceError::EmptySale => StatusError::bad_request().brief("Sale has no lines"),
        OrdersServiceError::InvalidData => StatusError::bad_request().brief("Invalid sale payload"),
        OrdersServiceError::Sql(source) => {
            error!("order storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
