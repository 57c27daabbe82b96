use crate::domain::payment::Payment;
use crate::domain::ports::PaymentStore;
use crate::error::{PaymentError, PersistenceError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, Options, WriteBatch};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Column Family holding payments as JSON, keyed by payment id.
pub const CF_PAYMENTS: &str = "payments";
/// Column Family indexing token -> payment id.
pub const CF_TOKENS: &str = "tokens";

/// A persistent payment store backed by RocksDB.
///
/// Token uniqueness is enforced here: the index lookup and the batched write of
/// record plus index happen under a write lock shared by all clones.
#[derive(Clone)]
pub struct RocksDBPaymentStore {
    db: Arc<DB>,
    write_lock: Arc<Mutex<()>>,
}

impl RocksDBPaymentStore {
    /// Opens or creates a RocksDB instance at the specified path, creating the
    /// `payments` and `tokens` column families if missing.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_payments = ColumnFamilyDescriptor::new(CF_PAYMENTS, Options::default());
        let cf_tokens = ColumnFamilyDescriptor::new(CF_TOKENS, Options::default());

        let db = DB::open_cf_descriptors(&opts, path, vec![cf_payments, cf_tokens])?;

        Ok(Self {
            db: Arc::new(db),
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    fn cf(&self, name: &str) -> Result<&rocksdb::ColumnFamily> {
        self.db.cf_handle(name).ok_or_else(|| {
            PaymentError::Persistence(PersistenceError::Backend(Box::new(std::io::Error::other(
                format!("{} column family not found", name),
            ))))
        })
    }

    fn load(&self, id_bytes: &[u8]) -> Result<Option<Payment>> {
        let cf = self.cf(CF_PAYMENTS)?;
        match self.db.get_cf(cf, id_bytes)? {
            Some(bytes) => {
                let payment = serde_json::from_slice(&bytes).map_err(PersistenceError::from)?;
                Ok(Some(payment))
            }
            None => Ok(None),
        }
    }
}

#[async_trait]
impl PaymentStore for RocksDBPaymentStore {
    async fn exists(&self, token: &str) -> Result<bool> {
        let cf = self.cf(CF_TOKENS)?;
        // Only check the key, without copying the value out
        Ok(self.db.get_pinned_cf(cf, token.as_bytes())?.is_some())
    }

    async fn save(&self, payment: &Payment) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let cf_payments = self.cf(CF_PAYMENTS)?;
        let cf_tokens = self.cf(CF_TOKENS)?;
        let id = payment.id();
        let token = payment.token();

        if !token.is_empty()
            && let Some(owner) = self.db.get_cf(cf_tokens, token.as_bytes())?
            && owner.as_slice() != id.as_bytes()
        {
            return Err(PersistenceError::DuplicateToken(token.to_string()).into());
        }

        let mut batch = WriteBatch::default();
        if let Some(previous) = self.load(id.as_bytes())?
            && previous.token() != token
            && !previous.token().is_empty()
        {
            batch.delete_cf(cf_tokens, previous.token().as_bytes());
        }
        if !token.is_empty() {
            batch.put_cf(cf_tokens, token.as_bytes(), id.as_bytes());
        }
        let value = serde_json::to_vec(payment).map_err(PersistenceError::from)?;
        batch.put_cf(cf_payments, id.as_bytes(), value);

        self.db.write(batch)?;
        Ok(())
    }

    async fn get_by_token(&self, token: &str) -> Result<Option<Payment>> {
        let cf = self.cf(CF_TOKENS)?;
        match self.db.get_cf(cf, token.as_bytes())? {
            Some(id_bytes) => self.load(&id_bytes),
            None => Ok(None),
        }
    }

    async fn get_all(&self) -> Result<Vec<Payment>> {
        let cf = self.cf(CF_PAYMENTS)?;
        let mut payments = Vec::new();

        for item in self.db.iterator_cf(cf, rocksdb::IteratorMode::Start) {
            let (_key, value) = item?;
            let payment: Payment =
                serde_json::from_slice(&value).map_err(PersistenceError::from)?;
            payments.push(payment);
        }

        payments.sort_by_key(|p| p.created());
        Ok(payments)
    }
}
