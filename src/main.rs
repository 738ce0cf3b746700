use clap::Parser;
use miette::{IntoDiagnostic, Result};
use order_service::application::async_order_service::AsyncOrderService;
use order_service::application::order_service::OrderService;
use order_service::domain::checkout;
use order_service::domain::money::Money;
use order_service::domain::order::{OrderItem, PersistedOrder};
use order_service::domain::ports::{self, blocking};
use order_service::error::OrderError;
use order_service::infrastructure::gateway::{DEFAULT_APPROVAL_LIMIT, LimitPaymentGateway};
use order_service::infrastructure::in_memory::InMemoryOrderRepository;
#[cfg(feature = "storage-rocksdb")]
use order_service::infrastructure::rocksdb::RocksDbOrderRepository;
use order_service::infrastructure::tracing_audit::TracingAuditSink;
use order_service::interfaces::csv::order_reader::{OrderReader, OrderRequest, group_orders};
use order_service::interfaces::csv::outcome_writer::{OutcomeRecord, OutcomeWriter};
use rust_decimal::Decimal;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input order lines CSV file (order, user, price, qty)
    input: PathBuf,

    /// Largest total the bundled payment gateway approves.
    #[arg(long, env = "ORDER_APPROVAL_LIMIT", default_value_t = DEFAULT_APPROVAL_LIMIT)]
    approval_limit: Decimal,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long, env = "ORDER_DB_PATH")]
    db_path: Option<PathBuf>,

    /// Drive the blocking service instead of the async one.
    #[arg(long)]
    blocking: bool,
}

enum Storage {
    Memory(InMemoryOrderRepository),
    #[cfg(feature = "storage-rocksdb")]
    RocksDb(RocksDbOrderRepository),
}

impl Storage {
    fn open(db_path: Option<PathBuf>) -> Result<Self> {
        match db_path {
            #[cfg(feature = "storage-rocksdb")]
            Some(path) => Ok(Self::RocksDb(
                RocksDbOrderRepository::open(path).into_diagnostic()?,
            )),
            #[cfg(not(feature = "storage-rocksdb"))]
            Some(_) => {
                warn!(
                    "Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to in-memory storage."
                );
                Ok(Self::Memory(InMemoryOrderRepository::new()))
            }
            None => Ok(Self::Memory(InMemoryOrderRepository::new())),
        }
    }

    fn into_blocking(self) -> blocking::OrderRepositoryBox {
        match self {
            Self::Memory(repo) => Box::new(repo),
            #[cfg(feature = "storage-rocksdb")]
            Self::RocksDb(repo) => Box::new(repo),
        }
    }

    fn into_async(self) -> ports::OrderRepositoryBox {
        match self {
            Self::Memory(repo) => Box::new(repo),
            #[cfg(feature = "storage-rocksdb")]
            Self::RocksDb(repo) => Box::new(repo),
        }
    }
}

fn process_blocking(service: &OrderService, request: &OrderRequest) -> OutcomeRecord {
    let items = match request.items() {
        Ok(items) => items,
        Err(err) => return rejected(request, None, err),
    };
    let result = service.create_order(request.user_id, &items);
    record(request, &items, result)
}

async fn process_async(service: &AsyncOrderService, request: &OrderRequest) -> OutcomeRecord {
    let items = match request.items() {
        Ok(items) => items,
        Err(err) => return rejected(request, None, err),
    };
    let result = service.create_order(request.user_id, &items).await;
    record(request, &items, result)
}

fn record(
    request: &OrderRequest,
    items: &[OrderItem],
    result: order_service::error::Result<PersistedOrder>,
) -> OutcomeRecord {
    match result {
        Ok(order) => OutcomeRecord::created(&request.reference, &order),
        Err(err) => rejected(request, checkout::price_order(items).ok(), err),
    }
}

fn rejected(request: &OrderRequest, total: Option<Money>, err: OrderError) -> OutcomeRecord {
    warn!(order = %request.reference, error = %err, "order not created");
    OutcomeRecord::rejected(&request.reference, request.user_id.0, total, &err)
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let storage = Storage::open(cli.db_path)?;
    let gateway = LimitPaymentGateway::new(Money::new(cli.approval_limit));

    // Read all lines up front; orders are grouped by reference.
    let file = File::open(cli.input).into_diagnostic()?;
    let rows = OrderReader::new(file).rows().filter_map(|row| match row {
        Ok(row) => Some(row),
        Err(e) => {
            warn!("Error reading order line: {}", e);
            None
        }
    });
    let (requests, skipped) = group_orders(rows);
    for e in skipped {
        warn!("Skipping order line: {}", e);
    }

    let records = if cli.blocking {
        let service = OrderService::new(
            Box::new(gateway),
            storage.into_blocking(),
            Box::new(TracingAuditSink::new()),
        );
        tokio::task::spawn_blocking(move || {
            requests
                .iter()
                .map(|request| process_blocking(&service, request))
                .collect::<Vec<_>>()
        })
        .await
        .into_diagnostic()?
    } else {
        let service = AsyncOrderService::new(
            Box::new(gateway),
            storage.into_async(),
            Box::new(TracingAuditSink::new()),
        );
        let mut records = Vec::with_capacity(requests.len());
        for request in &requests {
            records.push(process_async(&service, request).await);
        }
        records
    };

    let stdout = io::stdout();
    let mut writer = OutcomeWriter::new(stdout.lock());
    writer.write_outcomes(records).into_diagnostic()?;

    Ok(())
}
