//! Order Models

use std::str::FromStr;

use jiff::Timestamp;
use thiserror::Error;

use crate::{
    domain::{catalog::models::VariantUuid, users::models::UserUuid},
    uuids::TypedUuid,
};

/// Initial status written by checkout; fulfillment transitions happen in
/// downstream systems.
pub const ORDER_STATUS_CREATED: &str = "CREATED";

/// Status written by POS sales, which settle at the register.
pub const ORDER_STATUS_PAID: &str = "PAID";

/// Order UUID
pub type OrderUuid = TypedUuid<Order>;

/// Sales channel an order originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderSource {
    Pos,
    Online,
}

impl OrderSource {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pos => "POS",
            Self::Online => "ONLINE",
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown order source: {0}")]
pub struct ParseOrderSourceError(String);

impl FromStr for OrderSource {
    type Err = ParseOrderSourceError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "POS" => Ok(Self::Pos),
            "ONLINE" => Ok(Self::Online),
            other => Err(ParseOrderSourceError(other.to_string())),
        }
    }
}

/// Order Model
///
/// An order without an owning user is a guest order, identified by its
/// snapshotted contact email.
#[derive(Debug, Clone)]
pub struct Order {
    pub uuid: OrderUuid,
    pub user_uuid: Option<UserUuid>,
    pub guest_email: Option<String>,
    pub source: OrderSource,
    pub status: String,
    pub total: u64,
    pub currency: String,
    pub items: Vec<OrderItem>,
    pub address: Option<OrderAddress>,
    pub payment: Option<Payment>,
    pub created_at: Timestamp,
}

/// New Order Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub uuid: OrderUuid,
    pub user_uuid: Option<UserUuid>,
    pub guest_email: Option<String>,
    pub source: OrderSource,
    pub status: String,
    pub currency: String,
}

/// Order Item UUID
pub type OrderItemUuid = TypedUuid<OrderItem>;

/// OrderItem Model
///
/// The price is a snapshot taken at purchase time; later catalog price
/// changes never alter it.
#[derive(Debug, Clone)]
pub struct OrderItem {
    pub uuid: OrderItemUuid,
    pub variant_uuid: VariantUuid,
    pub quantity: u64,
    pub price: u64,
    pub created_at: Timestamp,
}

/// New OrderItem Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrderItem {
    pub uuid: OrderItemUuid,
    pub variant_uuid: VariantUuid,
    pub quantity: u64,
    pub price: u64,
}

/// Order Address UUID
pub type OrderAddressUuid = TypedUuid<OrderAddress>;

/// OrderAddress Model
///
/// Shipping destination snapshotted at checkout, decoupled from any live
/// address record.
#[derive(Debug, Clone)]
pub struct OrderAddress {
    pub uuid: OrderAddressUuid,
    pub line1: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
}

/// Payment UUID
pub type PaymentUuid = TypedUuid<Payment>;

/// Settlement state of a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Pending,
    Success,
    Failed,
}

impl PaymentStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Success => "SUCCESS",
            Self::Failed => "FAILED",
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown payment status: {0}")]
pub struct ParsePaymentStatusError(String);

impl FromStr for PaymentStatus {
    type Err = ParsePaymentStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "PENDING" => Ok(Self::Pending),
            "SUCCESS" => Ok(Self::Success),
            "FAILED" => Ok(Self::Failed),
            other => Err(ParsePaymentStatusError(other.to_string())),
        }
    }
}

/// Payment Model
#[derive(Debug, Clone)]
pub struct Payment {
    pub uuid: PaymentUuid,
    pub provider: String,
    pub reference: Option<String>,
    pub status: PaymentStatus,
    pub amount: u64,
    pub created_at: Timestamp,
}

/// New Payment Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewPayment {
    pub uuid: PaymentUuid,
    pub provider: String,
    pub reference: Option<String>,
    pub status: PaymentStatus,
    pub amount: u64,
}

/// One line of a POS sale.
#[derive(Debug, Clone, PartialEq)]
pub struct PosLine {
    pub variant_uuid: VariantUuid,
    pub quantity: u64,
}

/// Confirmation returned by checkout and POS sales.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderConfirmation {
    pub order_uuid: OrderUuid,
    pub status: String,
    pub total: u64,
    pub currency: String,
}
