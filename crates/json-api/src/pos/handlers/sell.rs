//! POS Sell Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use duka_app::domain::orders::models::PosLine;

use crate::{
    checkout::handlers::create::OrderConfirmationResponse, extensions::*,
    orders::errors::into_status_error, state::State,
};

/// POS Sale Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PosSaleRequest {
    /// Lines sold at the register
    pub lines: Vec<PosSaleLine>,

    /// ISO currency code
    pub currency: String,
}

/// One POS sale line
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PosSaleLine {
    pub variant_uuid: Uuid,
    pub quantity: u64,
}

impl From<PosSaleLine> for PosLine {
    fn from(line: PosSaleLine) -> Self {
        PosLine {
            variant_uuid: line.variant_uuid.into(),
            quantity: line.quantity,
        }
    }
}

/// POS Sell Handler
///
/// Records a sale settled at the register, priced from the live catalog.
#[endpoint(
    tags("pos"),
    summary = "Record POS Sale",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Sale recorded"),
        (status_code = StatusCode::NOT_FOUND, description = "Unknown variant"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<PosSaleRequest>,
    depot: &mut Depot,
) -> Result<Json<OrderConfirmationResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let request = json.into_inner();

    let confirmation = state
        .app
        .orders
        .pos_sell(
            request.lines.into_iter().map(Into::into).collect(),
            request.currency,
        )
        .await
        .map_err(into_status_error)?;

    Ok(Json(confirmation.into()))
}
