use super::listeners::ListenerRegistry;
use crate::config::PaymentConfig;
use crate::domain::payment::{Payment, PaymentAddress};
use crate::domain::ports::PaymentStoreBox;
use crate::domain::status::StatusChoices;
use crate::domain::token::{TokenAllocator, TokenGenerator, UuidTokenGenerator};
use crate::error::Result;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Drives the payment lifecycle: token issuance on persist, status transitions
/// and change notification.
///
/// Every operation runs on the calling task and awaits the store and the
/// listeners in sequence. The manager performs no retries; each failure is
/// returned to the caller as-is.
pub struct PaymentManager {
    store: PaymentStoreBox,
    listeners: ListenerRegistry,
    tokens: TokenAllocator,
    config: PaymentConfig,
}

impl PaymentManager {
    /// Creates a manager issuing random UUID tokens.
    ///
    /// # Arguments
    ///
    /// * `store` - Where payments are persisted.
    /// * `listeners` - Observer list notified after each status change.
    /// * `config` - Status vocabulary, record type tag and token attempt bound.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when `config` fails [`PaymentConfig::validate`].
    pub fn new(
        store: PaymentStoreBox,
        listeners: ListenerRegistry,
        config: PaymentConfig,
    ) -> Result<Self> {
        Self::with_generator(store, listeners, config, Arc::new(UuidTokenGenerator))
    }

    /// Same as [`PaymentManager::new`] with a custom token source.
    pub fn with_generator(
        store: PaymentStoreBox,
        listeners: ListenerRegistry,
        config: PaymentConfig,
        generator: Arc<dyn TokenGenerator>,
    ) -> Result<Self> {
        config.validate()?;
        let tokens = TokenAllocator::new(generator, config.token_attempts);
        Ok(Self {
            store,
            listeners,
            tokens,
            config,
        })
    }

    pub fn statuses(&self) -> &StatusChoices {
        &self.config.statuses
    }

    pub fn listeners(&self) -> &ListenerRegistry {
        &self.listeners
    }

    /// Persists the payment, issuing a token first if it has none.
    ///
    /// Makes exactly one `save` call. If it fails the in-memory record is put
    /// back the way it was: timestamps restored and, on a first persist, the
    /// token cleared again so that a retry draws a new one.
    pub async fn persist(&self, payment: &mut Payment) -> Result<()> {
        let first_persist = payment.token().is_empty();
        if first_persist {
            let token = self.tokens.allocate(self.store.as_ref()).await?;
            debug!(variant = %payment.variant, %token, "allocated payment token");
            payment.assign_token(token);
        }

        let previous = payment.timestamps();
        payment.touch(Utc::now());

        if let Err(e) = self.store.save(payment).await {
            payment.restore_timestamps(previous);
            if first_persist {
                payment.clear_token();
            }
            return Err(e);
        }

        debug!(variant = %payment.variant, token = %payment.token(), "payment persisted");
        Ok(())
    }

    /// Moves the payment to `status`, persists it, then notifies listeners.
    ///
    /// Any status in the vocabulary may follow any other, including itself.
    /// When persisting fails no listener is called. A listener error means the
    /// new status is already stored.
    pub async fn change_status(&self, payment: &mut Payment, status: &str) -> Result<()> {
        let status = self.config.statuses.resolve(status)?;
        let previous = payment.status().clone();
        payment.set_status(status);

        self.persist(payment).await?;
        info!(
            variant = %payment.variant,
            token = %payment.token(),
            from = %previous,
            to = %payment.status(),
            "payment status changed"
        );

        if let Err(e) = self
            .listeners
            .notify(&self.config.record_type, payment)
            .await
        {
            warn!(listener = %e.listener, token = %payment.token(), "status listener failed");
            return Err(e.into());
        }
        Ok(())
    }

    /// Loads the payment behind an external `(variant, token)` handle.
    ///
    /// Returns `None` when the token is unknown or belongs to another variant.
    pub async fn resolve(&self, address: &PaymentAddress) -> Result<Option<Payment>> {
        Ok(self
            .store
            .get_by_token(&address.token)
            .await?
            .filter(|payment| payment.variant == address.variant))
    }

    pub async fn get_by_token(&self, token: &str) -> Result<Option<Payment>> {
        self.store.get_by_token(token).await
    }

    /// Consumes the manager and returns every stored payment.
    pub async fn into_results(self) -> Result<Vec<Payment>> {
        self.store.get_all().await
    }
}
