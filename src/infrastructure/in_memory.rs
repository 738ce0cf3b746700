use crate::domain::audit::AuditEvent;
use crate::domain::money::Money;
use crate::domain::order::{OrderId, OrderItem, PaymentId, PersistedOrder, UserId};
use crate::domain::ports::{self, blocking};
use crate::error::CollaboratorResult;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Default)]
struct OrderTable {
    last_id: u64,
    orders: BTreeMap<OrderId, PersistedOrder>,
}

/// A thread-safe in-memory order repository.
///
/// Ids are assigned sequentially from 1. `Clone` shares the underlying
/// table, so a test can keep a handle while the service owns another.
///
/// A `std::sync::Mutex` guards the table: no lock is held across an await,
/// which lets the same store serve the blocking and the async ports.
#[derive(Default, Clone)]
pub struct InMemoryOrderRepository {
    table: Arc<Mutex<OrderTable>>,
}

impl InMemoryOrderRepository {
    /// Creates a new, empty in-memory order repository.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: OrderId) -> Option<PersistedOrder> {
        self.lock().orders.get(&id).cloned()
    }

    /// All persisted orders, by ascending id.
    pub fn all(&self) -> Vec<PersistedOrder> {
        self.lock().orders.values().cloned().collect()
    }

    fn lock(&self) -> MutexGuard<'_, OrderTable> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn insert(
        &self,
        user_id: UserId,
        items: &[OrderItem],
        total: Money,
        payment_id: PaymentId,
    ) -> PersistedOrder {
        let mut table = self.lock();
        table.last_id += 1;
        let order = PersistedOrder {
            id: OrderId(table.last_id),
            user_id,
            items: items.to_vec(),
            total,
            payment_id,
        };
        table.orders.insert(order.id, order.clone());
        order
    }
}

impl blocking::OrderRepository for InMemoryOrderRepository {
    fn save_order(
        &self,
        user_id: UserId,
        items: &[OrderItem],
        total: Money,
        payment_id: PaymentId,
    ) -> CollaboratorResult<PersistedOrder> {
        Ok(self.insert(user_id, items, total, payment_id))
    }
}

#[async_trait]
impl ports::OrderRepository for InMemoryOrderRepository {
    async fn save_order(
        &self,
        user_id: UserId,
        items: &[OrderItem],
        total: Money,
        payment_id: PaymentId,
    ) -> CollaboratorResult<PersistedOrder> {
        Ok(self.insert(user_id, items, total, payment_id))
    }
}

/// Audit sink keeping every tracked event in memory, in arrival order.
#[derive(Default, Clone)]
pub struct InMemoryAuditSink {
    events: Arc<Mutex<Vec<AuditEvent>>>,
}

impl InMemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<AuditEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn push(&self, event: AuditEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

impl blocking::AuditSink for InMemoryAuditSink {
    fn track(&self, event: AuditEvent) -> CollaboratorResult<()> {
        self.push(event);
        Ok(())
    }
}

#[async_trait]
impl ports::AuditSink for InMemoryAuditSink {
    async fn track(&self, event: AuditEvent) -> CollaboratorResult<()> {
        self.push(event);
        Ok(())
    }
}
