use super::status::PaymentStatus;
use crate::error::{PaymentError, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Length of every issued token (textual UUID).
pub const TOKEN_LENGTH: usize = 36;

const MONEY_SCALE: u32 = 2;
const MONEY_MAX_DIGITS: u32 = 9;

/// A monetary amount with 2 decimal places and at most 9 digits.
///
/// Wraps `rust_decimal::Decimal` and rejects values the storage column could not
/// hold. Stored values are always rescaled to 2 places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Self = Self(Decimal::from_parts(0, 0, 0, false, MONEY_SCALE));

    pub fn new(value: Decimal) -> Result<Self> {
        let normalized = value.normalize();
        if normalized.scale() > MONEY_SCALE {
            return Err(PaymentError::ValidationError(format!(
                "amount {} has more than {} decimal places",
                value, MONEY_SCALE
            )));
        }
        let limit = Decimal::from(10i64.pow(MONEY_MAX_DIGITS - MONEY_SCALE));
        if normalized.abs() >= limit {
            return Err(PaymentError::ValidationError(format!(
                "amount {} exceeds {} digits",
                value, MONEY_MAX_DIGITS
            )));
        }
        let mut rescaled = normalized;
        rescaled.rescale(MONEY_SCALE);
        Ok(Self(rescaled))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::ZERO
    }
}

impl TryFrom<Decimal> for Money {
    type Error = PaymentError;

    fn try_from(value: Decimal) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.0
    }
}

impl FromStr for Money {
    type Err = PaymentError;

    fn from_str(s: &str) -> Result<Self> {
        let value = Decimal::from_str(s.trim())
            .map_err(|e| PaymentError::ValidationError(format!("invalid amount {:?}: {}", s, e)))?;
        Self::new(value)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Internal storage key of a payment. Never exposed as an external handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentId(Uuid);

impl PaymentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }
}

impl Default for PaymentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PaymentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// The stable `(variant, token)` handle callers use to address a payment from
/// outside, e.g. to build a retrieval URL. Prints as `variant/token`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PaymentAddress {
    pub variant: String,
    pub token: String,
}

impl fmt::Display for PaymentAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.variant, self.token)
    }
}

impl FromStr for PaymentAddress {
    type Err = PaymentError;

    fn from_str(s: &str) -> Result<Self> {
        // Tokens never contain '/', variants might.
        match s.trim_matches('/').rsplit_once('/') {
            Some((variant, token)) if !variant.is_empty() && token.len() == TOKEN_LENGTH => {
                Ok(Self {
                    variant: variant.to_string(),
                    token: token.to_string(),
                })
            }
            _ => Err(PaymentError::ValidationError(format!(
                "invalid payment address {:?}",
                s
            ))),
        }
    }
}

/// A single payment transaction.
///
/// Every provider integration shares this one record type; `variant` names the
/// integration that owns it. Status, token and timestamps have no public
/// setters: the status moves only through
/// [`PaymentManager::change_status`](crate::application::manager::PaymentManager::change_status)
/// and the rest is maintained on persist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    id: PaymentId,
    pub variant: String,
    status: PaymentStatus,
    created: Option<DateTime<Utc>>,
    modified: Option<DateTime<Utc>>,
    pub transaction_id: Option<String>,
    pub currency: String,
    pub total: Money,
    pub delivery: Money,
    pub tax: Money,
    pub description: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub city: Option<String>,
    pub country_area: Option<String>,
    pub zip: Option<String>,
    pub country: Option<String>,
    pub extra_data: Option<String>,
    token: String,
    pub success_url: Option<String>,
    pub cancel_url: Option<String>,
}

impl Payment {
    /// Creates an unsaved payment: status `waiting`, zero amounts, empty token.
    pub fn new(variant: impl Into<String>) -> Self {
        Self {
            id: PaymentId::new(),
            variant: variant.into(),
            status: PaymentStatus::waiting(),
            created: None,
            modified: None,
            transaction_id: None,
            currency: String::new(),
            total: Money::ZERO,
            delivery: Money::ZERO,
            tax: Money::ZERO,
            description: None,
            first_name: None,
            last_name: None,
            city: None,
            country_area: None,
            zip: None,
            country: None,
            extra_data: None,
            token: String::new(),
            success_url: None,
            cancel_url: None,
        }
    }

    pub fn id(&self) -> PaymentId {
        self.id
    }

    pub fn status(&self) -> &PaymentStatus {
        &self.status
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn created(&self) -> Option<DateTime<Utc>> {
        self.created
    }

    pub fn modified(&self) -> Option<DateTime<Utc>> {
        self.modified
    }

    /// True once the record has been persisted successfully at least once.
    pub fn is_persisted(&self) -> bool {
        self.created.is_some()
    }

    /// The `(variant, token)` handle, available once a token has been issued.
    pub fn address(&self) -> Option<PaymentAddress> {
        if self.token.is_empty() {
            None
        } else {
            Some(PaymentAddress {
                variant: self.variant.clone(),
                token: self.token.clone(),
            })
        }
    }

    /// Checks every attribute against the limits of its storage column.
    pub fn validate(&self) -> Result<()> {
        check_length("variant", Some(self.variant.as_str()), 255)?;
        if self.variant.is_empty() {
            return Err(PaymentError::ValidationError(
                "variant must not be empty".to_string(),
            ));
        }
        if self.currency.is_empty() {
            return Err(PaymentError::ValidationError(
                "currency must not be empty".to_string(),
            ));
        }
        check_length("currency", Some(self.currency.as_str()), 10)?;
        check_length("transaction_id", self.transaction_id.as_deref(), 255)?;
        for (field, value) in [
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("city", &self.city),
            ("country_area", &self.country_area),
            ("zip", &self.zip),
            ("country", &self.country),
        ] {
            check_length(field, value.as_deref(), 256)?;
        }
        check_length("success_url", self.success_url.as_deref(), 255)?;
        check_length("cancel_url", self.cancel_url.as_deref(), 255)?;
        Ok(())
    }

    pub(crate) fn set_status(&mut self, status: PaymentStatus) {
        self.status = status;
    }

    pub(crate) fn assign_token(&mut self, token: String) {
        debug_assert!(self.token.is_empty(), "token is fixed once issued");
        self.token = token;
    }

    pub(crate) fn clear_token(&mut self) {
        self.token.clear();
    }

    /// Stamps a persist at `now`. `created` is only set the first time.
    pub(crate) fn touch(&mut self, now: DateTime<Utc>) {
        self.created.get_or_insert(now);
        self.modified = Some(now);
    }

    pub(crate) fn timestamps(&self) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
        (self.created, self.modified)
    }

    pub(crate) fn restore_timestamps(
        &mut self,
        (created, modified): (Option<DateTime<Utc>>, Option<DateTime<Utc>>),
    ) {
        self.created = created;
        self.modified = modified;
    }
}

impl fmt::Display for Payment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.variant)
    }
}

fn check_length(field: &str, value: Option<&str>, max: usize) -> Result<()> {
    match value {
        Some(v) if v.chars().count() > max => Err(PaymentError::ValidationError(format!(
            "{} exceeds {} characters",
            field, max
        ))),
        _ => Ok(()),
    }
}
