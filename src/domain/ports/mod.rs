//! Capabilities the order service consumes.
//!
//! The traits in this module are the suspending variants, awaited by
//! `AsyncOrderService`. Their blocking twins live in [`blocking`].

pub mod blocking;

use super::audit::AuditEvent;
use super::authorization::AuthorizationResult;
use super::money::Money;
use super::order::{OrderItem, PaymentId, PersistedOrder, UserId};
use crate::error::CollaboratorResult;
use async_trait::async_trait;

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn authorize_payment(
        &self,
        user_id: UserId,
        amount: Money,
    ) -> CollaboratorResult<AuthorizationResult>;
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn save_order(
        &self,
        user_id: UserId,
        items: &[OrderItem],
        total: Money,
        payment_id: PaymentId,
    ) -> CollaboratorResult<PersistedOrder>;
}

#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn track(&self, event: AuditEvent) -> CollaboratorResult<()>;
}

pub type PaymentGatewayBox = Box<dyn PaymentGateway>;
pub type OrderRepositoryBox = Box<dyn OrderRepository>;
pub type AuditSinkBox = Box<dyn AuditSink>;
