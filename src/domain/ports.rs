use super::payment::Payment;
use crate::error::{ListenerError, Result};
use async_trait::async_trait;

/// Persistence port for payments.
///
/// Implementations must enforce token uniqueness themselves and report a
/// conflicting save as `PersistenceError::DuplicateToken`; the `exists` check
/// made during token allocation is advisory only.
#[async_trait]
pub trait PaymentStore: Send + Sync {
    /// Whether any stored payment, of any variant, holds `token`.
    async fn exists(&self, token: &str) -> Result<bool>;
    /// Inserts or replaces the payment keyed by its id.
    async fn save(&self, payment: &Payment) -> Result<()>;
    async fn get_by_token(&self, token: &str) -> Result<Option<Payment>>;
    async fn get_all(&self) -> Result<Vec<Payment>>;
}

pub type PaymentStoreBox = Box<dyn PaymentStore>;
pub type PaymentStoreFactory = Box<dyn Fn() -> PaymentStoreBox + Send + Sync>;

/// Receives status-changed events after the new status has been persisted.
#[async_trait]
pub trait StatusListener: Send + Sync {
    /// `record_type` tags the kind of record that changed; `payment` carries the
    /// committed state.
    async fn status_changed(
        &self,
        record_type: &str,
        payment: &Payment,
    ) -> std::result::Result<(), ListenerError>;
}
