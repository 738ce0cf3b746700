use crate::domain::audit::AuditEvent;
use crate::domain::ports::{self, blocking};
use crate::error::CollaboratorResult;
use async_trait::async_trait;
use serde_json::Value;

/// Audit sink that emits each event as a `tracing` event on the `audit` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAuditSink;

impl TracingAuditSink {
    pub fn new() -> Self {
        Self
    }

    fn emit(&self, event: &AuditEvent) {
        let payload = Value::Object(event.payload.clone());
        tracing::info!(target: "audit", event = %event.name, %payload, "audit event");
    }
}

impl blocking::AuditSink for TracingAuditSink {
    fn track(&self, event: AuditEvent) -> CollaboratorResult<()> {
        self.emit(&event);
        Ok(())
    }
}

#[async_trait]
impl ports::AuditSink for TracingAuditSink {
    async fn track(&self, event: AuditEvent) -> CollaboratorResult<()> {
        self.emit(&event);
        Ok(())
    }
}
