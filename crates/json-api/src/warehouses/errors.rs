//! Errors

use salvo::http::StatusError;
use tracing::error;

use duka_app::domain::warehouses::WarehousesServiceError;

pub(crate) fn into_status_error(error: WarehousesServiceError) -> StatusError {
    match error {
        WarehousesServiceError::AlreadyExists => {
            StatusError::conflict().brief("Warehouse already exists")
        }
        WarehousesServiceError::NotFound => StatusError::not_found().brief("Warehouse not found"),
        WarehousesServiceError::MissingRequiredData => {
            StatusError::bad_request().brief("Invalid warehouse payload")
        }
        WarehousesServiceError::Sql(source) => {
            error!("warehouse storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
