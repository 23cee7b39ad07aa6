//! Errors

use salvo::http::StatusError;
use tracing::error;

use duka_app::domain::inventory::InventoryServiceError;

pub(crate) fn into_status_error(error: InventoryServiceError) -> StatusError {
    match error {
        InventoryServiceError::StockConstraintViolation => StatusError::unprocessable_entity()
            .brief("Adjustment would drive stock below zero"),
        InventoryServiceError::InvalidReference => {
            StatusError::not_found().brief("Unknown variant or warehouse")
        }
        InventoryServiceError::NotFound => {
            StatusError::not_found().brief("Inventory record not found")
        }
        InventoryServiceError::MissingRequiredData => {
            StatusError::bad_request().brief("Invalid inventory payload")
        }
        InventoryServiceError::Sql(source) => {
            error!("inventory storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
