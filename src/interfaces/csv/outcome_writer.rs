use crate::domain::money::Money;
use crate::domain::order::PersistedOrder;
use crate::error::{OrderError, Result};
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Created,
    Denied,
    Invalid,
    Failed,
}

impl Outcome {
    pub fn of_error(err: &OrderError) -> Self {
        match err {
            OrderError::InvalidArgument(_) => Self::Invalid,
            OrderError::PermissionDenied(_) => Self::Denied,
            _ => Self::Failed,
        }
    }
}

/// One line of the result report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutcomeRecord {
    pub order: String,
    pub user: u64,
    pub outcome: Outcome,
    pub order_id: Option<u64>,
    pub total: Option<String>,
    pub payment_id: Option<String>,
}

impl OutcomeRecord {
    pub fn created(reference: &str, order: &PersistedOrder) -> Self {
        Self {
            order: reference.to_string(),
            user: order.user_id.0,
            outcome: Outcome::Created,
            order_id: Some(order.id.0),
            total: Some(order.total.to_string()),
            payment_id: Some(order.payment_id.to_string()),
        }
    }

    pub fn rejected(reference: &str, user: u64, total: Option<Money>, err: &OrderError) -> Self {
        Self {
            order: reference.to_string(),
            user,
            outcome: Outcome::of_error(err),
            order_id: None,
            total: total.map(|t| t.to_string()),
            payment_id: None,
        }
    }
}

/// Writes `order,user,outcome,order_id,total,payment_id` records.
pub struct OutcomeWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> OutcomeWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_outcomes<I>(&mut self, records: I) -> Result<()>
    where
        I: IntoIterator<Item = OutcomeRecord>,
    {
        let mut wrote_any = false;
        for record in records {
            self.writer.serialize(record)?;
            wrote_any = true;
        }
        if !wrote_any {
            // serialize() only emits the header alongside the first record.
            self.writer.write_record([
                "order",
                "user",
                "outcome",
                "order_id",
                "total",
                "payment_id",
            ])?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
