use crate::domain::money::Money;
use crate::domain::order::{OrderId, OrderItem, PaymentId, PersistedOrder, UserId};
use crate::domain::ports::{self, blocking};
use crate::error::{CollaboratorResult, OrderError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, IteratorMode, Options};
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

/// Column Family for storing persisted orders.
pub const CF_ORDERS: &str = "orders";

/// A persistent order repository using RocksDB.
///
/// Orders are stored as JSON in the `orders` column family, keyed by the
/// big-endian order id so iteration follows id order. The id sequence is
/// recovered from the last key when the database is opened.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDbOrderRepository {
    db: Arc<DB>,
    last_id: Arc<Mutex<u64>>,
}

impl RocksDbOrderRepository {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// # Arguments
    ///
    /// * `path` - The filesystem path where the database will be stored.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_orders = ColumnFamilyDescriptor::new(CF_ORDERS, Options::default());
        let db = DB::open_cf_descriptors(&opts, path, vec![cf_orders])?;

        let last_id = {
            let cf = db
                .cf_handle(CF_ORDERS)
                .ok_or_else(|| OrderError::Collaborator(missing_cf()))?;
            match db.iterator_cf(cf, IteratorMode::End).next() {
                Some(entry) => {
                    let (key, _) = entry?;
                    decode_id(&key).map_err(OrderError::Collaborator)?
                }
                None => 0,
            }
        };

        Ok(Self {
            db: Arc::new(db),
            last_id: Arc::new(Mutex::new(last_id)),
        })
    }

    pub fn get(&self, id: OrderId) -> CollaboratorResult<Option<PersistedOrder>> {
        let cf = self.db.cf_handle(CF_ORDERS).ok_or_else(missing_cf)?;
        match self.db.get_cf(cf, id.0.to_be_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn insert(
        &self,
        user_id: UserId,
        items: &[OrderItem],
        total: Money,
        payment_id: PaymentId,
    ) -> CollaboratorResult<PersistedOrder> {
        let cf = self.db.cf_handle(CF_ORDERS).ok_or_else(missing_cf)?;

        // The id is only committed once the write has succeeded.
        let mut last_id = self.last_id.lock().unwrap_or_else(PoisonError::into_inner);
        let order = PersistedOrder {
            id: OrderId(*last_id + 1),
            user_id,
            items: items.to_vec(),
            total,
            payment_id,
        };
        let value = serde_json::to_vec(&order)?;
        self.db.put_cf(cf, order.id.0.to_be_bytes(), value)?;
        *last_id = order.id.0;

        Ok(order)
    }
}

fn missing_cf() -> crate::error::BoxError {
    Box::new(std::io::Error::other("Orders column family not found"))
}

fn decode_id(key: &[u8]) -> CollaboratorResult<u64> {
    let bytes: [u8; 8] = key.try_into().map_err(|_| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("Malformed order key of {} bytes", key.len()),
        )
    })?;
    Ok(u64::from_be_bytes(bytes))
}

impl blocking::OrderRepository for RocksDbOrderRepository {
    fn save_order(
        &self,
        user_id: UserId,
        items: &[OrderItem],
        total: Money,
        payment_id: PaymentId,
    ) -> CollaboratorResult<PersistedOrder> {
        self.insert(user_id, items, total, payment_id)
    }
}

#[async_trait]
impl ports::OrderRepository for RocksDbOrderRepository {
    async fn save_order(
        &self,
        user_id: UserId,
        items: &[OrderItem],
        total: Money,
        payment_id: PaymentId,
    ) -> CollaboratorResult<PersistedOrder> {
        self.insert(user_id, items, total, payment_id)
    }
}
