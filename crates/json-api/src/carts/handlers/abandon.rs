//! Mark Cart Abandoned Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{carts::errors::into_status_error, extensions::*, state::State};

/// Mark Cart Abandoned Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct MarkAbandonedRequest {
    pub cart_uuid: Uuid,
}

/// Mark Cart Abandoned Handler
///
/// Used by the idle-cart sweeper; flags the cart without touching its lines.
#[endpoint(
    tags("cart"),
    summary = "Mark Cart Abandoned",
    responses(
        (status_code = StatusCode::OK, description = "Cart flagged"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<MarkAbandonedRequest>,
    depot: &mut Depot,
) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    state
        .app
        .carts
        .mark_abandoned(json.into_inner().cart_uuid.into())
        .await
        .map_err(into_status_error)?;

    Ok(StatusCode::OK)
}
