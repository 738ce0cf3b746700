//! Collaborator-free order rules shared by the blocking and async services.

use super::audit::AuditEvent;
use super::authorization::AuthorizationResult;
use super::money::Money;
use super::order::{OrderItem, PaymentId, UserId};
use crate::error::{OrderError, Result};

pub const EMPTY_ITEMS: &str = "items cannot be empty";
pub const NOT_APPROVED: &str = "payment not approved";

/// Validates `items` and returns the order total, `Σ price × quantity`.
pub fn price_order(items: &[OrderItem]) -> Result<Money> {
    if items.is_empty() {
        return Err(OrderError::invalid(EMPTY_ITEMS));
    }

    items.iter().try_fold(Money::ZERO, |total, item| {
        item.subtotal()
            .and_then(|subtotal| total.checked_add(subtotal))
            .ok_or_else(|| OrderError::invalid("order total overflows"))
    })
}

/// What the service does after the gateway has answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Persist with this payment id.
    Proceed(PaymentId),
    /// Record the denial, then fail with [`denied`].
    Deny(AuditEvent),
}

pub fn denied() -> OrderError {
    OrderError::PermissionDenied(NOT_APPROVED.to_string())
}

pub fn review(auth: AuthorizationResult, user_id: UserId, total: Money) -> Verdict {
    match auth {
        AuthorizationResult::Approved { payment_id } => Verdict::Proceed(payment_id),
        AuthorizationResult::Declined { .. } => {
            Verdict::Deny(AuditEvent::order_denied(user_id, total))
        }
    }
}
