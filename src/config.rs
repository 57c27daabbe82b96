//! Deployment configuration for the payment lifecycle.

use crate::domain::status::StatusChoices;
use crate::domain::token::DEFAULT_TOKEN_ATTEMPTS;
use crate::error::{PaymentError, Result};
use std::env;

pub const DEFAULT_RECORD_TYPE: &str = "payment";

/// Settings injected into a [`PaymentManager`](crate::application::manager::PaymentManager).
#[derive(Debug, Clone)]
pub struct PaymentConfig {
    /// Recognized status vocabulary.
    pub statuses: StatusChoices,
    /// Tag passed to listeners identifying the kind of record that changed.
    pub record_type: String,
    /// Upper bound on token candidates drawn for a single record.
    pub token_attempts: usize,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            statuses: StatusChoices::default(),
            record_type: DEFAULT_RECORD_TYPE.to_string(),
            token_attempts: DEFAULT_TOKEN_ATTEMPTS,
        }
    }
}

impl PaymentConfig {
    /// Loads settings from the environment, falling back to defaults for
    /// anything unset.
    ///
    /// * `PAYMENT_STATUS_CHOICES` - `value:Label` pairs separated by commas
    /// * `PAYMENT_RECORD_TYPE`
    /// * `PAYMENT_TOKEN_ATTEMPTS`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup("PAYMENT_STATUS_CHOICES") {
            config.statuses = StatusChoices::parse(&raw)?;
        }
        if let Some(record_type) = lookup("PAYMENT_RECORD_TYPE") {
            let record_type = record_type.trim();
            if !record_type.is_empty() {
                config.record_type = record_type.to_string();
            }
        }
        if let Some(raw) = lookup("PAYMENT_TOKEN_ATTEMPTS") {
            config.token_attempts = raw.trim().parse::<usize>().map_err(|e| {
                PaymentError::ConfigError(format!("PAYMENT_TOKEN_ATTEMPTS={:?}: {}", raw, e))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.token_attempts == 0 {
            return Err(PaymentError::ConfigError(
                "token_attempts must be at least 1".to_string(),
            ));
        }
        if self.record_type.is_empty() {
            return Err(PaymentError::ConfigError(
                "record_type must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
