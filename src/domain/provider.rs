use super::payment::Payment;
use crate::error::{PaymentError, Result};
use std::collections::HashMap;
use std::sync::Arc;

/// A payment provider integration, identified by its variant tag.
pub trait PaymentProvider: Send + Sync {
    fn variant(&self) -> &str;

    fn label(&self) -> &str {
        self.variant()
    }
}

/// Maps variant tags to the provider integrations that own them.
#[derive(Default, Clone)]
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn PaymentProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a provider under its own variant, replacing any previous one.
    pub fn register(&mut self, provider: Arc<dyn PaymentProvider>) {
        self.providers
            .insert(provider.variant().to_string(), provider);
    }

    pub fn get(&self, variant: &str) -> Option<Arc<dyn PaymentProvider>> {
        self.providers.get(variant).cloned()
    }

    pub fn provider_for(&self, payment: &Payment) -> Result<Arc<dyn PaymentProvider>> {
        self.get(&payment.variant)
            .ok_or_else(|| PaymentError::UnknownVariant(payment.variant.clone()))
    }

    pub fn variants(&self) -> impl Iterator<Item = &str> {
        self.providers.keys().map(String::as_str)
    }
}

/// Provider that accepts every payment as-is. Used for local runs and tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct DummyProvider;

impl PaymentProvider for DummyProvider {
    fn variant(&self) -> &str {
        "dummy"
    }

    fn label(&self) -> &str {
        "Dummy provider"
    }
}
