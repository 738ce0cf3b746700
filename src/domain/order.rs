use super::money::Money;
use crate::error::{OrderError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub u64);

/// Identifier issued by the payment gateway on approval.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for PaymentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PaymentId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

fn default_quantity() -> u32 {
    1
}

/// Unvalidated shape of an item as it arrives from callers.
#[derive(Deserialize)]
struct RawOrderItem {
    price: Decimal,
    #[serde(default = "default_quantity", alias = "qty")]
    quantity: u32,
}

/// A line of an order: a unit price and how many units.
///
/// The price is never negative and the quantity never zero; both are checked
/// on construction and on deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawOrderItem")]
pub struct OrderItem {
    price: Money,
    quantity: u32,
}

impl OrderItem {
    pub fn new(price: Decimal, quantity: u32) -> Result<Self> {
        if price.is_sign_negative() && !price.is_zero() {
            return Err(OrderError::invalid("item price cannot be negative"));
        }
        if quantity == 0 {
            return Err(OrderError::invalid("item quantity must be positive"));
        }
        Ok(Self {
            price: Money::new(price),
            quantity,
        })
    }

    /// An item whose quantity was not given, which counts as one unit.
    pub fn single(price: Decimal) -> Result<Self> {
        Self::new(price, default_quantity())
    }

    pub fn price(&self) -> Money {
        self.price
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// `price × quantity`, or `None` on overflow.
    pub fn subtotal(&self) -> Option<Money> {
        self.price.checked_mul(self.quantity)
    }
}

impl TryFrom<RawOrderItem> for OrderItem {
    type Error = OrderError;

    fn try_from(raw: RawOrderItem) -> Result<Self> {
        Self::new(raw.price, raw.quantity)
    }
}

/// An order as stored by an `OrderRepository`.
///
/// The service reads only `id`; the remaining fields are what the bundled
/// repositories echo back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedOrder {
    pub id: OrderId,
    pub user_id: UserId,
    pub items: Vec<OrderItem>,
    pub total: Money,
    pub payment_id: PaymentId,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_item_validation() {
        assert!(OrderItem::new(dec!(0), 1).is_ok());
        assert!(matches!(
            OrderItem::new(dec!(-1.0), 1),
            Err(OrderError::InvalidArgument(_))
        ));
        assert!(matches!(
            OrderItem::new(dec!(1.0), 0),
            Err(OrderError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_single_defaults_quantity_to_one() {
        let item = OrderItem::single(dec!(10)).unwrap();
        assert_eq!(item.quantity(), 1);
        assert_eq!(item.subtotal(), Some(Money::new(dec!(10))));
    }

    #[test]
    fn test_item_deserialization_defaults_quantity() {
        let item: OrderItem = serde_json::from_str(r#"{"price": "10"}"#).unwrap();
        assert_eq!(item, OrderItem::new(dec!(10), 1).unwrap());

        let item: OrderItem = serde_json::from_str(r#"{"price": "5", "qty": 3}"#).unwrap();
        assert_eq!(item.quantity(), 3);
    }

    #[test]
    fn test_item_deserialization_rejects_invalid() {
        assert!(serde_json::from_str::<OrderItem>(r#"{"price": "-5"}"#).is_err());
        assert!(serde_json::from_str::<OrderItem>(r#"{"price": "5", "quantity": 0}"#).is_err());
    }

    #[test]
    fn test_persisted_order_roundtrip_keeps_items_valid() {
        let order = PersistedOrder {
            id: OrderId(99),
            user_id: UserId(1),
            items: vec![OrderItem::new(dec!(10), 2).unwrap()],
            total: Money::new(dec!(20)),
            payment_id: PaymentId::from("pay_123"),
        };
        let json = serde_json::to_string(&order).unwrap();
        let back: PersistedOrder = serde_json::from_str(&json).unwrap();
        assert_eq!(back, order);
    }
}
