//! Stock Levels Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use duka_app::domain::inventory::models::StockLevel;

use crate::{extensions::*, inventory::errors::into_status_error, state::State};

/// Stock Level Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct StockLevelResponse {
    pub variant_uuid: Uuid,
    pub sku: String,
    pub product_name: String,
    pub warehouse_uuid: Uuid,
    pub warehouse_name: String,
    pub quantity: u64,
    pub reorder_level: u64,
}

impl From<StockLevel> for StockLevelResponse {
    fn from(level: StockLevel) -> Self {
        Self {
            variant_uuid: level.variant_uuid.into_uuid(),
            sku: level.sku,
            product_name: level.product_name,
            warehouse_uuid: level.warehouse_uuid.into_uuid(),
            warehouse_name: level.warehouse_name,
            quantity: level.quantity,
            reorder_level: level.reorder_level,
        }
    }
}

/// Stock Levels Handler
///
/// Stock counters joined with catalog and warehouse names.
#[endpoint(
    tags("inventory"),
    summary = "List Stock Levels",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Stock levels"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    depot: &mut Depot,
) -> Result<Json<Vec<StockLevelResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let levels = state
        .app
        .inventory
        .list_stock_levels()
        .await
        .map_err(into_status_error)?;

    Ok(Json(levels.into_iter().map(Into::into).collect()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use duka_app::domain::inventory::MockInventoryService;

    use crate::test_helpers::{MockApp, service_with};

    use super::*;

    #[tokio::test]
    async fn test_index_returns_levels() -> TestResult {
        let variant = Uuid::now_v7();

        let mut inventory = MockInventoryService::new();

        inventory.expect_list_stock_levels().once().return_once(move || {
            Ok(vec![StockLevel {
                variant_uuid: variant.into(),
                sku: "PHN-1".to_string(),
                product_name: "Phone".to_string(),
                warehouse_uuid: Uuid::now_v7().into(),
                warehouse_name: "Nairobi Central".to_string(),
                quantity: 7,
                reorder_level: 5,
            }])
        });

        let app = MockApp {
            inventory,
            ..MockApp::default()
        };

        let mut res = TestClient::get("http://example.com/inventory")
            .send(&service_with(
                app.into_state(),
                Router::with_path("inventory").get(handler),
            ))
            .await;

        let body: Vec<StockLevelResponse> = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.len(), 1);
        assert!(
            matches!(
                body.first(),
                Some(level) if level.variant_uuid == variant && level.quantity == 7
            ),
            "unexpected stock level payload: {body:?}"
        );

        Ok(())
    }
}
