use crate::domain::authorization::AuthorizationResult;
use crate::domain::money::Money;
use crate::domain::order::{PaymentId, UserId};
use crate::domain::ports::{self, blocking};
use crate::error::CollaboratorResult;
use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

pub const DEFAULT_APPROVAL_LIMIT: Decimal = dec!(1000);

/// A local payment gateway approving any amount up to a fixed limit.
///
/// Approvals get sequential `pay_<n>` ids; amounts above the limit are
/// answered with status `"denied"`.
#[derive(Clone)]
pub struct LimitPaymentGateway {
    limit: Money,
    issued: Arc<AtomicU64>,
}

impl LimitPaymentGateway {
    pub fn new(limit: Money) -> Self {
        Self {
            limit,
            issued: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn limit(&self) -> Money {
        self.limit
    }

    fn decide(&self, amount: Money) -> AuthorizationResult {
        if amount > self.limit {
            return AuthorizationResult::denied();
        }
        let seq = self.issued.fetch_add(1, Ordering::Relaxed) + 1;
        AuthorizationResult::approved(PaymentId(format!("pay_{seq}")))
    }
}

impl Default for LimitPaymentGateway {
    fn default() -> Self {
        Self::new(Money::new(DEFAULT_APPROVAL_LIMIT))
    }
}

impl blocking::PaymentGateway for LimitPaymentGateway {
    fn authorize_payment(
        &self,
        _user_id: UserId,
        amount: Money,
    ) -> CollaboratorResult<AuthorizationResult> {
        Ok(self.decide(amount))
    }
}

#[async_trait]
impl ports::PaymentGateway for LimitPaymentGateway {
    async fn authorize_payment(
        &self,
        _user_id: UserId,
        amount: Money,
    ) -> CollaboratorResult<AuthorizationResult> {
        Ok(self.decide(amount))
    }
}
