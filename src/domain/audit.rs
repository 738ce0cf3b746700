use super::money::Money;
use super::order::{OrderId, UserId};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

/// Business events the order service records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventName {
    OrderCreated,
    OrderDenied,
}

impl AuditEventName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OrderCreated => "order_created",
            Self::OrderDenied => "order_denied",
        }
    }
}

impl fmt::Display for AuditEventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub type AuditPayload = Map<String, Value>;

/// A write-once audit record: an event name plus a JSON payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditEvent {
    pub name: AuditEventName,
    pub payload: AuditPayload,
}

impl AuditEvent {
    /// `order_created` with `{order_id, total}`.
    pub fn order_created(order_id: OrderId, total: Money) -> Self {
        let mut payload = AuditPayload::new();
        payload.insert("order_id".into(), Value::from(order_id.0));
        payload.insert("total".into(), money_value(total));
        Self {
            name: AuditEventName::OrderCreated,
            payload,
        }
    }

    /// `order_denied` with `{user_id, total}`.
    pub fn order_denied(user_id: UserId, total: Money) -> Self {
        let mut payload = AuditPayload::new();
        payload.insert("user_id".into(), Value::from(user_id.0));
        payload.insert("total".into(), money_value(total));
        Self {
            name: AuditEventName::OrderDenied,
            payload,
        }
    }
}

// JSON number holding the exact decimal digits, never an `f64`.
fn money_value(total: Money) -> Value {
    let value = total.value().normalize();
    rust_decimal::serde::arbitrary_precision::serialize(&value, serde_json::value::Serializer)
        .unwrap_or_else(|_| Value::String(value.to_string()))
}
