use crate::domain::audit::AuditEvent;
use crate::domain::checkout::{self, Verdict};
use crate::domain::order::{OrderItem, PersistedOrder, UserId};
use crate::domain::ports::blocking::{AuditSinkBox, OrderRepositoryBox, PaymentGatewayBox};
use crate::error::{OrderError, Result};
use tracing::{debug, info, warn};

/// Blocking order service.
///
/// Every collaborator call blocks the caller. The service holds no state of
/// its own, so a shared instance may serve concurrent callers.
pub struct OrderService {
    gateway: PaymentGatewayBox,
    repository: OrderRepositoryBox,
    audit: AuditSinkBox,
}

impl OrderService {
    /// Creates a new `OrderService`.
    ///
    /// # Arguments
    ///
    /// * `gateway` - Authorizes payments.
    /// * `repository` - Persists approved orders.
    /// * `audit` - Records `order_created` / `order_denied` events.
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
    ///
    /// Fails with `InvalidArgument` before any collaborator call when `items`
    /// is empty, and with `PermissionDenied` after auditing the denial when
    /// the gateway does not approve. Collaborator failures are returned as
    /// `OrderError::Collaborator` without further calls.
    #[tracing::instrument(name = "create_order", skip_all, fields(user_id = %user_id))]
    pub fn create_order(&self, user_id: UserId, items: &[OrderItem]) -> Result<PersistedOrder> {
        let total = checkout::price_order(items)?;
        debug!(%total, items = items.len(), "order priced");

        let auth = self
            .gateway
            .authorize_payment(user_id, total)
            .map_err(collaborator_failure)?;

        let payment_id = match checkout::review(auth, user_id, total) {
            Verdict::Proceed(payment_id) => payment_id,
            Verdict::Deny(event) => {
                warn!(%total, "payment not approved");
                self.audit.track(event).map_err(collaborator_failure)?;
                return Err(checkout::denied());
            }
        };

        let order = self
            .repository
            .save_order(user_id, items, total, payment_id)
            .map_err(collaborator_failure)?;

        self.audit
            .track(AuditEvent::order_created(order.id, total))
            .map_err(collaborator_failure)?;
        info!(order_id = %order.id, %total, "order created");

        Ok(order)
    }
}

pub(crate) fn collaborator_failure(err: crate::error::BoxError) -> OrderError {
    warn!(error = %err, "collaborator failed");
    OrderError::Collaborator(err)
}
