use clap::Parser;
use miette::{IntoDiagnostic, Result};
use payrecord::application::listeners::ListenerRegistry;
use payrecord::application::manager::PaymentManager;
use payrecord::config::PaymentConfig;
use payrecord::domain::ports::PaymentStoreBox;
use payrecord::domain::provider::{DummyProvider, ProviderRegistry};
use payrecord::infrastructure::in_memory::InMemoryPaymentStore;
use payrecord::infrastructure::listeners::LoggingListener;
use payrecord::interfaces::csv::batch::BatchProcessor;
use payrecord::interfaces::csv::command_reader::CommandReader;
use payrecord::interfaces::csv::payment_writer::PaymentWriter;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input CSV file of payment commands
    input: PathBuf,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,
}

fn open_store(db_path: Option<PathBuf>) -> Result<PaymentStoreBox> {
    match db_path {
        #[cfg(feature = "storage-rocksdb")]
        Some(path) => {
            use payrecord::infrastructure::rocksdb::RocksDBPaymentStore;
            let store = RocksDBPaymentStore::open(path).into_diagnostic()?;
            Ok(Box::new(store))
        }
        #[cfg(not(feature = "storage-rocksdb"))]
        Some(_) => {
            eprintln!(
                "WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
            );
            Ok(Box::new(InMemoryPaymentStore::new()))
        }
        None => Ok(Box::new(InMemoryPaymentStore::new())),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = PaymentConfig::from_env().into_diagnostic()?;
    let store = open_store(cli.db_path)?;

    let listeners = ListenerRegistry::new();
    listeners.subscribe(Arc::new(LoggingListener)).await;
    let manager = PaymentManager::new(store, listeners, config).into_diagnostic()?;

    let mut providers = ProviderRegistry::new();
    providers.register(Arc::new(DummyProvider));

    // Apply commands
    let file = File::open(cli.input).into_diagnostic()?;
    let reader = CommandReader::new(file);
    let mut batch = BatchProcessor::new(&manager, &providers);
    for command_result in reader.commands() {
        match command_result {
            Ok(command) => {
                let reference = command.reference.clone();
                if let Err(e) = batch.apply(command).await {
                    eprintln!("Error applying command for {}: {}", reference, e);
                }
            }
            Err(e) => {
                eprintln!("Error reading command: {}", e);
            }
        }
    }

    // Output final state
    let payments = manager.into_results().await.into_diagnostic()?;
    let stdout = io::stdout();
    let mut writer = PaymentWriter::new(stdout.lock());
    writer.write_payments(&payments).into_diagnostic()?;

    Ok(())
}
