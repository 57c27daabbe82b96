use crate::error::{PaymentError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Longest status value a record can hold.
pub const MAX_STATUS_LENGTH: usize = 10;

/// A payment status value.
///
/// Statuses are plain strings rather than a closed enum because deployments may
/// extend the vocabulary with provider-specific values. Membership is checked
/// against a [`StatusChoices`] when a transition is requested.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentStatus(String);

impl PaymentStatus {
    pub const WAITING: &'static str = "waiting";
    pub const CONFIRMED: &'static str = "confirmed";
    pub const REJECTED: &'static str = "rejected";
    pub const ERROR: &'static str = "error";

    pub fn waiting() -> Self {
        Self(Self::WAITING.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for PaymentStatus {
    fn default() -> Self {
        Self::waiting()
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for PaymentStatus {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for PaymentStatus {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// One allowed status with its human-readable label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChoice {
    pub value: String,
    pub label: String,
}

/// The recognized status vocabulary, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChoices {
    choices: Vec<StatusChoice>,
}

impl StatusChoices {
    /// Builds a vocabulary from `(value, label)` pairs.
    ///
    /// The vocabulary must be non-empty, free of duplicates, contain `waiting`
    /// (the initial status of every record) and keep values within
    /// [`MAX_STATUS_LENGTH`].
    pub fn new<I, V, L>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (V, L)>,
        V: Into<String>,
        L: Into<String>,
    {
        let mut choices: Vec<StatusChoice> = Vec::new();
        for (value, label) in pairs {
            let value = value.into();
            if value.is_empty() || value.chars().count() > MAX_STATUS_LENGTH {
                return Err(PaymentError::ConfigError(format!(
                    "status value {:?} must be 1 to {} characters",
                    value, MAX_STATUS_LENGTH
                )));
            }
            if choices.iter().any(|c| c.value == value) {
                return Err(PaymentError::ConfigError(format!(
                    "duplicate status value {:?}",
                    value
                )));
            }
            choices.push(StatusChoice {
                value,
                label: label.into(),
            });
        }

        if !choices.iter().any(|c| c.value == PaymentStatus::WAITING) {
            return Err(PaymentError::ConfigError(
                "status vocabulary must include \"waiting\"".to_string(),
            ));
        }

        Ok(Self { choices })
    }

    /// Parses `value:Label` pairs separated by commas. A missing label falls
    /// back to the value itself.
    pub fn parse(raw: &str) -> Result<Self> {
        let pairs = raw
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| match part.split_once(':') {
                Some((value, label)) => (value.trim().to_string(), label.trim().to_string()),
                None => (part.to_string(), part.to_string()),
            });
        Self::new(pairs)
    }

    /// Returns a copy of the vocabulary with one more status appended.
    pub fn with_status(self, value: impl Into<String>, label: impl Into<String>) -> Result<Self> {
        let extra = (value.into(), label.into());
        Self::new(
            self.choices
                .into_iter()
                .map(|c| (c.value, c.label))
                .chain(std::iter::once(extra)),
        )
    }

    pub fn contains(&self, value: &str) -> bool {
        self.choices.iter().any(|c| c.value == value)
    }

    pub fn label(&self, value: &str) -> Option<&str> {
        self.choices
            .iter()
            .find(|c| c.value == value)
            .map(|c| c.label.as_str())
    }

    /// Resolves a raw value into a [`PaymentStatus`] if it belongs to the vocabulary.
    pub fn resolve(&self, value: &str) -> Result<PaymentStatus> {
        if self.contains(value) {
            Ok(PaymentStatus(value.to_string()))
        } else {
            Err(PaymentError::UnknownStatus(value.to_string()))
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusChoice> {
        self.choices.iter()
    }

    pub fn len(&self) -> usize {
        self.choices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }
}

impl Default for StatusChoices {
    fn default() -> Self {
        Self {
            choices: [
                (PaymentStatus::WAITING, "Waiting for confirmation"),
                (PaymentStatus::CONFIRMED, "Confirmed"),
                (PaymentStatus::REJECTED, "Rejected"),
                (PaymentStatus::ERROR, "Error"),
            ]
            .into_iter()
            .map(|(value, label)| StatusChoice {
                value: value.to_string(),
                label: label.to_string(),
            })
            .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_vocabulary() {
        let choices = StatusChoices::default();
        let values: Vec<&str> = choices.iter().map(|c| c.value.as_str()).collect();
        assert_eq!(values, vec!["waiting", "confirmed", "rejected", "error"]);
        assert_eq!(choices.label("waiting"), Some("Waiting for confirmation"));
        assert_eq!(choices.label("refunded"), None);
    }

    #[test]
    fn test_resolve_rejects_unknown_status() {
        let choices = StatusChoices::default();
        assert_eq!(choices.resolve("confirmed").unwrap(), "confirmed");
        assert!(matches!(
            choices.resolve("refunded"),
            Err(PaymentError::UnknownStatus(s)) if s == "refunded"
        ));
    }

    #[test]
    fn test_extended_vocabulary() {
        let choices = StatusChoices::default()
            .with_status("refunded", "Refunded")
            .unwrap();
        assert_eq!(choices.len(), 5);
        assert!(choices.resolve("refunded").is_ok());
    }

    #[test]
    fn test_parse_pairs() {
        let choices = StatusChoices::parse("waiting:Pending, paid:Paid ,void").unwrap();
        assert_eq!(choices.len(), 3);
        assert_eq!(choices.label("paid"), Some("Paid"));
        assert_eq!(choices.label("void"), Some("void"));
    }

    #[test]
    fn test_invalid_vocabularies() {
        assert!(matches!(
            StatusChoices::parse("confirmed:Confirmed"),
            Err(PaymentError::ConfigError(_))
        ));
        assert!(matches!(
            StatusChoices::parse("waiting,waiting"),
            Err(PaymentError::ConfigError(_))
        ));
        assert!(matches!(
            StatusChoices::parse("waiting,partially_refunded"),
            Err(PaymentError::ConfigError(_))
        ));
        assert!(StatusChoices::parse("").is_err());
    }

    #[test]
    fn test_status_length_counts_characters() {
        // 10 characters, 11 bytes
        let choices = StatusChoices::default()
            .with_status("annulé_xyz", "Annulé")
            .unwrap();
        assert!(choices.contains("annulé_xyz"));

        assert!(matches!(
            StatusChoices::default().with_status("annulé_xyzw", "Annulé"),
            Err(PaymentError::ConfigError(_))
        ));
    }

    #[test]
    fn test_status_serializes_as_plain_string() {
        let json = serde_json::to_string(&PaymentStatus::waiting()).unwrap();
        assert_eq!(json, "\"waiting\"");
    }
}
