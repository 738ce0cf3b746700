//! Blocking capabilities consumed by `OrderService`.
//!
//! Each call blocks the caller until the collaborator answers.

use crate::domain::audit::AuditEvent;
use crate::domain::authorization::AuthorizationResult;
use crate::domain::money::Money;
use crate::domain::order::{OrderItem, PaymentId, PersistedOrder, UserId};
use crate::error::CollaboratorResult;

pub trait PaymentGateway: Send + Sync {
    fn authorize_payment(
        &self,
        user_id: UserId,
        amount: Money,
    ) -> CollaboratorResult<AuthorizationResult>;
}

pub trait OrderRepository: Send + Sync {
    fn save_order(
        &self,
        user_id: UserId,
        items: &[OrderItem],
        total: Money,
        payment_id: PaymentId,
    ) -> CollaboratorResult<PersistedOrder>;
}

pub trait AuditSink: Send + Sync {
    fn track(&self, event: AuditEvent) -> CollaboratorResult<()>;
}

pub type PaymentGatewayBox = Box<dyn PaymentGateway>;
pub type OrderRepositoryBox = Box<dyn OrderRepository>;
pub type AuditSinkBox = Box<dyn AuditSink>;
