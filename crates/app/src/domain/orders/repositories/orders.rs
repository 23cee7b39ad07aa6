//! Orders Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::{
    database::try_get_amount,
    domain::{
        orders::models::{NewOrder, Order, OrderSource, OrderUuid},
        users::models::UserUuid,
    },
};

const CREATE_ORDER_SQL: &str = include_str!("../sql/create_order.sql");
const SET_ORDER_TOTAL_SQL: &str = include_str!("../sql/set_order_total.sql");
const GET_ORDER_SQL: &str = include_str!("../sql/get_order.sql");
const LIST_ORDERS_BY_SOURCE_SQL: &str = include_str!("../sql/list_orders_by_source.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: &NewOrder,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, Order>(CREATE_ORDER_SQL)
            .bind(order.uuid.into_uuid())
            .bind(order.user_uuid.map(UserUuid::into_uuid))
            .bind(order.guest_email.as_deref())
            .bind(order.source.as_str())
            .bind(&order.status)
            .bind(&order.currency)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn set_order_total(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        total: u64,
    ) -> Result<(), sqlx::Error> {
        let total_i64 = i64::try_from(total).map_err(|e| sqlx::Error::ColumnDecode {
            index: "total".to_string(),
            source: Box::new(e),
        })?;

        query(SET_ORDER_TOTAL_SQL)
            .bind(order.into_uuid())
            .bind(total_i64)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn get_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, Order>(GET_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_orders_by_source(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        source: OrderSource,
    ) -> Result<Vec<Order>, sqlx::Error> {
        query_as::<Postgres, Order>(LIST_ORDERS_BY_SOURCE_SQL)
            .bind(source.as_str())
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for Order {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let source: String = row.try_get("source")?;

        let source = source
            .parse::<OrderSource>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "source".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            user_uuid: row
                .try_get::<Option<Uuid>, _>("user_uuid")?
                .map(UserUuid::from_uuid),
            guest_email: row.try_get("guest_email")?,
            source,
            status: row.try_get("status")?,
            total: try_get_amount(row, "total")?,
            currency: row.try_get("currency")?,
            items: Vec::new(),
            address: None,
            payment: None,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
