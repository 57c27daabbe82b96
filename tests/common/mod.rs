#![allow(dead_code)]

use async_trait::async_trait;
use payrecord::domain::payment::Payment;
use payrecord::domain::ports::{PaymentStore, StatusListener};
use payrecord::domain::token::TokenGenerator;
use payrecord::error::{ListenerError, PersistenceError, Result};
use payrecord::infrastructure::in_memory::InMemoryPaymentStore;
use std::fs::File;
use std::io::Error;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use uuid::Uuid;

pub fn generate_commands_csv(path: &Path, rows: usize) -> std::result::Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);

    wtr.write_record(["op", "reference", "variant", "currency", "total", "status"])?;

    for i in 1..=rows {
        let reference = format!("order-{}", i);
        wtr.write_record(["create", &reference, "dummy", "USD", "1.00", ""])?;
        wtr.write_record(["status", &reference, "", "", "", "confirmed"])?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn token(n: u128) -> String {
    Uuid::from_u128(n).to_string()
}

/// Returns `repeated` for the first `times` calls, then fresh sequential tokens.
pub struct RepeatingGenerator {
    repeated: String,
    remaining: Mutex<usize>,
    next: AtomicU64,
}

impl RepeatingGenerator {
    pub fn new(repeated: String, times: usize) -> Self {
        Self {
            repeated,
            remaining: Mutex::new(times),
            next: AtomicU64::new(1_000),
        }
    }
}

impl TokenGenerator for RepeatingGenerator {
    fn generate(&self) -> String {
        let mut remaining = self.remaining.lock().unwrap();
        if *remaining > 0 {
            *remaining -= 1;
            self.repeated.clone()
        } else {
            token(u128::from(self.next.fetch_add(1, Ordering::SeqCst)))
        }
    }
}

/// Store whose `save` always fails with a backend error.
#[derive(Default)]
pub struct FailingStore {
    pub inner: InMemoryPaymentStore,
}

#[async_trait]
impl PaymentStore for FailingStore {
    async fn exists(&self, token: &str) -> Result<bool> {
        self.inner.exists(token).await
    }

    async fn save(&self, _payment: &Payment) -> Result<()> {
        Err(PersistenceError::Backend(Box::new(std::io::Error::other("database unavailable"))).into())
    }

    async fn get_by_token(&self, token: &str) -> Result<Option<Payment>> {
        self.inner.get_by_token(token).await
    }

    async fn get_all(&self) -> Result<Vec<Payment>> {
        self.inner.get_all().await
    }
}

/// Store whose `exists` lookup fails; counts the saves that still reach it.
#[derive(Default, Clone)]
pub struct UnreachableIndexStore {
    pub inner: InMemoryPaymentStore,
    pub saves: Arc<AtomicUsize>,
}

#[async_trait]
impl PaymentStore for UnreachableIndexStore {
    async fn exists(&self, _token: &str) -> Result<bool> {
        Err(PersistenceError::Backend(Box::new(std::io::Error::other("token index unreachable"))).into())
    }

    async fn save(&self, payment: &Payment) -> Result<()> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        self.inner.save(payment).await
    }

    async fn get_by_token(&self, token: &str) -> Result<Option<Payment>> {
        self.inner.get_by_token(token).await
    }

    async fn get_all(&self) -> Result<Vec<Payment>> {
        self.inner.get_all().await
    }
}

/// Store that never reports a token as taken, leaving uniqueness to `save`.
#[derive(Default, Clone)]
pub struct BlindStore {
    pub inner: InMemoryPaymentStore,
}

#[async_trait]
impl PaymentStore for BlindStore {
    async fn exists(&self, _token: &str) -> Result<bool> {
        Ok(false)
    }

    async fn save(&self, payment: &Payment) -> Result<()> {
        self.inner.save(payment).await
    }

    async fn get_by_token(&self, token: &str) -> Result<Option<Payment>> {
        self.inner.get_by_token(token).await
    }

    async fn get_all(&self) -> Result<Vec<Payment>> {
        self.inner.get_all().await
    }
}

/// Records every notification along with the status stored at that moment.
pub struct RecordingListener {
    store: InMemoryPaymentStore,
    pub seen: Mutex<Vec<(String, Payment, Option<String>)>>,
}

impl RecordingListener {
    pub fn new(store: InMemoryPaymentStore) -> Self {
        Self {
            store,
            seen: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl StatusListener for RecordingListener {
    async fn status_changed(
        &self,
        record_type: &str,
        payment: &Payment,
    ) -> std::result::Result<(), ListenerError> {
        let stored = self
            .store
            .get_by_token(payment.token())
            .await
            .map_err(|e| ListenerError::new("recorder", e.to_string()))?
            .map(|p| p.status().to_string());
        self.seen
            .lock()
            .unwrap()
            .push((record_type.to_string(), payment.clone(), stored));
        Ok(())
    }
}

/// Listener that always fails.
pub struct FailingListener(pub &'static str);

#[async_trait]
impl StatusListener for FailingListener {
    async fn status_changed(
        &self,
        _record_type: &str,
        _payment: &Payment,
    ) -> std::result::Result<(), ListenerError> {
        Err(ListenerError::new(self.0, "webhook endpoint returned 500"))
    }
}
