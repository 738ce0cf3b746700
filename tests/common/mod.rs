#![allow(dead_code)]

use async_trait::async_trait;
use order_service::domain::audit::AuditEvent;
use order_service::domain::authorization::AuthorizationResult;
use order_service::domain::money::Money;
use order_service::domain::order::{OrderId, OrderItem, PaymentId, PersistedOrder, UserId};
use order_service::domain::ports::{self, blocking};
use order_service::error::{BoxError, CollaboratorResult};
use rust_decimal::Decimal;
use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};

/// A collaborator call as observed by the fakes.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Authorize {
        user_id: UserId,
        amount: Money,
    },
    Save {
        user_id: UserId,
        items: Vec<OrderItem>,
        total: Money,
        payment_id: PaymentId,
    },
    Track(AuditEvent),
}

/// Call log shared by all fakes of one test, in global call order.
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<Call>>>);

impl CallLog {
    pub fn push(&self, call: Call) {
        self.0.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.0.lock().unwrap().clear();
    }

    pub fn authorizations(&self) -> Vec<Call> {
        self.filtered(|c| matches!(c, Call::Authorize { .. }))
    }

    pub fn saves(&self) -> Vec<Call> {
        self.filtered(|c| matches!(c, Call::Save { .. }))
    }

    pub fn tracks(&self) -> Vec<Call> {
        self.filtered(|c| matches!(c, Call::Track(_)))
    }

    fn filtered(&self, keep: impl Fn(&Call) -> bool) -> Vec<Call> {
        self.calls().into_iter().filter(|c| keep(c)).collect()
    }
}

#[derive(Debug, thiserror::Error)]
#[error("db down")]
pub struct DbDown;

#[derive(Debug, thiserror::Error)]
#[error("audit sink unavailable")]
pub struct AuditDown;

pub fn gateway_timeout() -> BoxError {
    Box::new(io::Error::new(io::ErrorKind::TimedOut, "gateway timeout"))
}

/// Gateway answering from a script, then from a fixed answer.
#[derive(Clone)]
pub struct ScriptedGateway {
    log: CallLog,
    script: Arc<Mutex<VecDeque<CollaboratorResult<AuthorizationResult>>>>,
    fallback: Option<AuthorizationResult>,
}

impl ScriptedGateway {
    pub fn answering(log: &CallLog, answer: AuthorizationResult) -> Self {
        Self {
            log: log.clone(),
            script: Arc::default(),
            fallback: Some(answer),
        }
    }

    pub fn scripted(
        log: &CallLog,
        answers: Vec<CollaboratorResult<AuthorizationResult>>,
    ) -> Self {
        Self {
            log: log.clone(),
            script: Arc::new(Mutex::new(answers.into())),
            fallback: None,
        }
    }

    fn answer(&self, user_id: UserId, amount: Money) -> CollaboratorResult<AuthorizationResult> {
        self.log.push(Call::Authorize { user_id, amount });
        if let Some(next) = self.script.lock().unwrap().pop_front() {
            return next;
        }
        self.fallback
            .clone()
            .ok_or_else(|| "gateway script exhausted".into())
    }
}

impl blocking::PaymentGateway for ScriptedGateway {
    fn authorize_payment(
        &self,
        user_id: UserId,
        amount: Money,
    ) -> CollaboratorResult<AuthorizationResult> {
        self.answer(user_id, amount)
    }
}

#[async_trait]
impl ports::PaymentGateway for ScriptedGateway {
    async fn authorize_payment(
        &self,
        user_id: UserId,
        amount: Money,
    ) -> CollaboratorResult<AuthorizationResult> {
        tokio::task::yield_now().await;
        self.answer(user_id, amount)
    }
}

/// Repository returning an order with a fixed id, or failing with `DbDown`.
#[derive(Clone)]
pub struct StubRepository {
    log: CallLog,
    id: Option<OrderId>,
}

impl StubRepository {
    pub fn returning(log: &CallLog, id: u64) -> Self {
        Self {
            log: log.clone(),
            id: Some(OrderId(id)),
        }
    }

    pub fn failing(log: &CallLog) -> Self {
        Self {
            log: log.clone(),
            id: None,
        }
    }

    fn save(
        &self,
        user_id: UserId,
        items: &[OrderItem],
        total: Money,
        payment_id: PaymentId,
    ) -> CollaboratorResult<PersistedOrder> {
        self.log.push(Call::Save {
            user_id,
            items: items.to_vec(),
            total,
            payment_id: payment_id.clone(),
        });
        let id = self.id.ok_or_else(|| Box::new(DbDown) as BoxError)?;
        Ok(PersistedOrder {
            id,
            user_id,
            items: items.to_vec(),
            total,
            payment_id,
        })
    }
}

impl blocking::OrderRepository for StubRepository {
    fn save_order(
        &self,
        user_id: UserId,
        items: &[OrderItem],
        total: Money,
        payment_id: PaymentId,
    ) -> CollaboratorResult<PersistedOrder> {
        self.save(user_id, items, total, payment_id)
    }
}

#[async_trait]
impl ports::OrderRepository for StubRepository {
    async fn save_order(
        &self,
        user_id: UserId,
        items: &[OrderItem],
        total: Money,
        payment_id: PaymentId,
    ) -> CollaboratorResult<PersistedOrder> {
        tokio::task::yield_now().await;
        self.save(user_id, items, total, payment_id)
    }
}

/// Audit sink recording events, optionally failing every call with `AuditDown`.
#[derive(Clone)]
pub struct RecordingAudit {
    log: CallLog,
    fail: bool,
}

impl RecordingAudit {
    pub fn new(log: &CallLog) -> Self {
        Self {
            log: log.clone(),
            fail: false,
        }
    }

    pub fn failing(log: &CallLog) -> Self {
        Self {
            log: log.clone(),
            fail: true,
        }
    }

    fn record(&self, event: AuditEvent) -> CollaboratorResult<()> {
        self.log.push(Call::Track(event));
        if self.fail {
            return Err(Box::new(AuditDown));
        }
        Ok(())
    }
}

impl blocking::AuditSink for RecordingAudit {
    fn track(&self, event: AuditEvent) -> CollaboratorResult<()> {
        self.record(event)
    }
}

#[async_trait]
impl ports::AuditSink for RecordingAudit {
    async fn track(&self, event: AuditEvent) -> CollaboratorResult<()> {
        tokio::task::yield_now().await;
        self.record(event)
    }
}

pub fn item(price: Decimal, quantity: u32) -> OrderItem {
    OrderItem::new(price, quantity).unwrap()
}

pub fn money(value: Decimal) -> Money {
    Money::new(value)
}
