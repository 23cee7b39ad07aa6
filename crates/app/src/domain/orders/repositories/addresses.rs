//! Order Addresses Repository

use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::domain::orders::models::{OrderAddress, OrderAddressUuid, OrderUuid};

const CREATE_ORDER_ADDRESS_SQL: &str = include_str!("../sql/create_order_address.sql");
const GET_ORDER_ADDRESS_SQL: &str = include_str!("../sql/get_order_address.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrderAddressesRepository;

impl PgOrderAddressesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_order_address(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        address: &OrderAddress,
    ) -> Result<(), sqlx::Error> {
        query(CREATE_ORDER_ADDRESS_SQL)
            .bind(address.uuid.into_uuid())
            .bind(order.into_uuid())
            .bind(address.line1.as_deref())
            .bind(address.city.as_deref())
            .bind(address.country.as_deref())
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn get_order_address(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Option<OrderAddress>, sqlx::Error> {
        query_as::<Postgres, OrderAddress>(GET_ORDER_ADDRESS_SQL)
            .bind(order.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for OrderAddress {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: OrderAddressUuid::from_uuid(row.try_get("uuid")?),
            line1: row.try_get("line1")?,
            city: row.try_get("city")?,
            country: row.try_get("country")?,
        })
    }
}
