use super::order_service::collaborator_failure;
use crate::domain::audit::AuditEvent;
use crate::domain::checkout::{self, Verdict};
use crate::domain::order::{OrderItem, PersistedOrder, UserId};
use crate::domain::ports::{AuditSinkBox, OrderRepositoryBox, PaymentGatewayBox};
use crate::error::Result;
use tracing::{debug, info, warn};

/// Suspending twin of [`OrderService`](super::order_service::OrderService).
///
/// Collaborator calls are awaited one after another, in the same order and
/// with the same outcomes as the blocking service. Nothing is spawned.
pub struct AsyncOrderService {
    gateway: PaymentGatewayBox,
    repository: OrderRepositoryBox,
    audit: AuditSinkBox,
}

impl AsyncOrderService {
    pub fn new(
        gateway: PaymentGatewayBox,
        repository: OrderRepositoryBox,
        audit: AuditSinkBox,
    ) -> Self {
        Self {
            gateway,
            repository,
            audit,
        }
    }

    /// Authorizes, persists, and audits one order.
    #[tracing::instrument(name = "create_order", skip_all, fields(user_id = %user_id))]
    pub async fn create_order(
        &self,
        user_id: UserId,
        items: &[OrderItem],
    ) -> Result<PersistedOrder> {
        let total = checkout::price_order(items)?;
        debug!(%total, items = items.len(), "order priced");

        let auth = self
            .gateway
            .authorize_payment(user_id, total)
            .await
            .map_err(collaborator_failure)?;

        let payment_id = match checkout::review(auth, user_id, total) {
            Verdict::Proceed(payment_id) => payment_id,
            Verdict::Deny(event) => {
                warn!(%total, "payment not approved");
                self.audit.track(event).await.map_err(collaborator_failure)?;
                return Err(checkout::denied());
            }
        };

        let order = self
            .repository
            .save_order(user_id, items, total, payment_id)
            .await
            .map_err(collaborator_failure)?;

        self.audit
            .track(AuditEvent::order_created(order.id, total))
            .await
            .map_err(collaborator_failure)?;
        info!(order_id = %order.id, %total, "order created");

        Ok(order)
    }
}
