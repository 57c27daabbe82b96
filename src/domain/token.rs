use super::payment::TOKEN_LENGTH;
use super::ports::PaymentStore;
use crate::error::{PaymentError, Result};
use std::sync::Arc;
use uuid::Uuid;

pub const DEFAULT_TOKEN_ATTEMPTS: usize = 100;

/// Source of candidate tokens.
pub trait TokenGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Issues random version-4 UUIDs in their 36-character textual form.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidTokenGenerator;

impl TokenGenerator for UuidTokenGenerator {
    fn generate(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Draws candidates until one is not held by any stored payment.
#[derive(Clone)]
pub struct TokenAllocator {
    generator: Arc<dyn TokenGenerator>,
    max_attempts: usize,
}

impl TokenAllocator {
    pub fn new(generator: Arc<dyn TokenGenerator>, max_attempts: usize) -> Self {
        Self {
            generator,
            max_attempts,
        }
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Returns the first candidate the store reports as unused.
    ///
    /// Fails with `TokenAllocationExhausted` once `max_attempts` candidates
    /// have all been taken.
    pub async fn allocate(&self, store: &dyn PaymentStore) -> Result<String> {
        for attempt in 1..=self.max_attempts {
            let candidate = self.generator.generate();
            if candidate.len() != TOKEN_LENGTH {
                return Err(PaymentError::ValidationError(format!(
                    "generated token {:?} is not {} characters",
                    candidate, TOKEN_LENGTH
                )));
            }
            if !store.exists(&candidate).await? {
                return Ok(candidate);
            }
            tracing::debug!(attempt, "token candidate already taken");
        }
        Err(PaymentError::TokenAllocationExhausted {
            attempts: self.max_attempts,
        })
    }
}

impl Default for TokenAllocator {
    fn default() -> Self {
        Self::new(Arc::new(UuidTokenGenerator), DEFAULT_TOKEN_ATTEMPTS)
    }
}
