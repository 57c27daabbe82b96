use thiserror::Error;

pub type Result<T> = std::result::Result<T, PaymentError>;

#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),
    #[error("Could not allocate a unique token after {attempts} attempts")]
    TokenAllocationExhausted { attempts: usize },
    #[error("Status change committed but a listener failed: {0}")]
    Listener(#[from] ListenerError),
    #[error("Unknown payment status: {0}")]
    UnknownStatus(String),
    #[error("No provider registered for variant: {0}")]
    UnknownVariant(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Failures raised by a [`PaymentStore`](crate::domain::ports::PaymentStore) backend.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("token {0} is already held by another payment")]
    DuplicateToken(String),
    #[error("storage backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PersistenceError {
    /// A token conflict loses the race between `exists` and `save`; persisting
    /// again draws a fresh token.
    pub fn is_retryable(&self) -> bool {
        matches!(self, PersistenceError::DuplicateToken(_))
    }
}

#[cfg(feature = "storage-rocksdb")]
impl From<rocksdb::Error> for PaymentError {
    fn from(err: rocksdb::Error) -> Self {
        PaymentError::Persistence(PersistenceError::Backend(Box::new(err)))
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("listener {listener} failed: {message}")]
pub struct ListenerError {
    pub listener: String,
    pub message: String,
}

impl ListenerError {
    pub fn new(listener: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            listener: listener.into(),
            message: message.into(),
        }
    }
}

impl PaymentError {
    /// True when the caller may retry the whole operation unchanged.
    pub fn is_retryable(&self) -> bool {
        match self {
            PaymentError::Persistence(err) => err.is_retryable(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_token_is_retryable() {
        let err: PaymentError = PersistenceError::DuplicateToken("abc".to_string()).into();
        assert!(err.is_retryable());

        let backend: PaymentError =
            PersistenceError::Backend(Box::new(std::io::Error::other("down"))).into();
        assert!(!backend.is_retryable());
        assert!(!PaymentError::TokenAllocationExhausted { attempts: 100 }.is_retryable());
    }

    #[test]
    fn test_listener_error_message() {
        let err = PaymentError::from(ListenerError::new("mailer", "smtp timeout"));
        assert_eq!(
            err.to_string(),
            "Status change committed but a listener failed: listener mailer failed: smtp timeout"
        );
    }
}
