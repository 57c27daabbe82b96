use crate::domain::payment::{Payment, PaymentId};
use crate::domain::ports::PaymentStore;
use crate::error::{PersistenceError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct Tables {
    payments: HashMap<PaymentId, Payment>,
    tokens: HashMap<String, PaymentId>,
}

/// A thread-safe in-memory payment store.
///
/// Keeps payments keyed by id plus a token index, both behind one
/// `Arc<RwLock<..>>` so the uniqueness check and the write happen under the
/// same lock. Clones share the same tables.
#[derive(Default, Clone)]
pub struct InMemoryPaymentStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryPaymentStore {
    /// Creates a new, empty in-memory payment store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PaymentStore for InMemoryPaymentStore {
    async fn exists(&self, token: &str) -> Result<bool> {
        let tables = self.tables.read().await;
        Ok(tables.tokens.contains_key(token))
    }

    async fn save(&self, payment: &Payment) -> Result<()> {
        let mut tables = self.tables.write().await;
        let token = payment.token();

        if !token.is_empty() {
            match tables.tokens.get(token) {
                Some(owner) if *owner != payment.id() => {
                    return Err(PersistenceError::DuplicateToken(token.to_string()).into());
                }
                _ => {}
            }
        }

        let previous_token = tables
            .payments
            .get(&payment.id())
            .map(|previous| previous.token().to_string());
        if let Some(previous_token) = previous_token
            && previous_token != token
        {
            tables.tokens.remove(&previous_token);
        }
        if !token.is_empty() {
            tables.tokens.insert(token.to_string(), payment.id());
        }
        tables.payments.insert(payment.id(), payment.clone());
        Ok(())
    }

    async fn get_by_token(&self, token: &str) -> Result<Option<Payment>> {
        let tables = self.tables.read().await;
        Ok(tables
            .tokens
            .get(token)
            .and_then(|id| tables.payments.get(id))
            .cloned())
    }

    async fn get_all(&self) -> Result<Vec<Payment>> {
        let tables = self.tables.read().await;
        let mut payments: Vec<Payment> = tables.payments.values().cloned().collect();
        payments.sort_by_key(|p| p.created());
        Ok(payments)
    }
}
