use crate::domain::order::{OrderItem, UserId};
use crate::error::{OrderError, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;

/// One `order, user, price, qty` line.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct OrderRow {
    pub order: String,
    pub user: u64,
    pub price: Decimal,
    #[serde(default)]
    pub qty: Option<u32>,
}

/// All rows sharing one `order` reference.
///
/// Items are validated lazily so that an order with a bad line can still be
/// reported as invalid instead of disappearing.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRequest {
    pub reference: String,
    pub user_id: UserId,
    lines: Vec<(Decimal, Option<u32>)>,
}

impl OrderRequest {
    pub fn items(&self) -> Result<Vec<OrderItem>> {
        self.lines
            .iter()
            .map(|&(price, qty)| match qty {
                Some(qty) => OrderItem::new(price, qty),
                None => OrderItem::single(price),
            })
            .collect()
    }
}

/// Groups rows into orders, in order of first appearance.
///
/// A row whose user differs from the first row of its order is rejected.
pub fn group_orders<I>(rows: I) -> (Vec<OrderRequest>, Vec<OrderError>)
where
    I: IntoIterator<Item = OrderRow>,
{
    let mut requests: Vec<OrderRequest> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut rejected = Vec::new();

    for row in rows {
        match index.get(&row.order) {
            Some(&pos) => {
                let request = &mut requests[pos];
                if request.user_id != UserId(row.user) {
                    rejected.push(OrderError::invalid(format!(
                        "order {} belongs to user {}, not {}",
                        row.order, request.user_id, row.user
                    )));
                    continue;
                }
                request.lines.push((row.price, row.qty));
            }
            None => {
                index.insert(row.order.clone(), requests.len());
                requests.push(OrderRequest {
                    reference: row.order,
                    user_id: UserId(row.user),
                    lines: vec![(row.price, row.qty)],
                });
            }
        }
    }

    (requests, rejected)
}

/// Reads order lines from a CSV source.
///
/// This reader wraps `csv::Reader` and provides an iterator over `Result<OrderRow>`.
/// It handles whitespace trimming and flexible record lengths automatically, so
/// the `qty` column may be left out.
pub struct OrderReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> OrderReader<R> {
    /// Creates a new `OrderReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes rows.
    pub fn rows(self) -> impl Iterator<Item = Result<OrderRow>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(OrderError::from))
    }
}
