use crate::domain::payment::Payment;
use crate::domain::ports::StatusListener;
use crate::error::ListenerError;
use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::info;

/// A status change as delivered through a channel.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusChanged {
    pub record_type: String,
    pub payment: Payment,
}

/// Forwards every status change into a channel the caller drains.
///
/// Fails once the receiving side has been dropped.
#[derive(Clone)]
pub struct ChannelListener {
    sender: mpsc::UnboundedSender<StatusChanged>,
}

impl ChannelListener {
    /// Creates the listener together with the receiving end of its channel.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<StatusChanged>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

#[async_trait]
impl StatusListener for ChannelListener {
    async fn status_changed(
        &self,
        record_type: &str,
        payment: &Payment,
    ) -> Result<(), ListenerError> {
        self.sender
            .send(StatusChanged {
                record_type: record_type.to_string(),
                payment: payment.clone(),
            })
            .map_err(|_| ListenerError::new("channel", "receiver dropped"))
    }
}

/// Emits a structured log event for each status change.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingListener;

#[async_trait]
impl StatusListener for LoggingListener {
    async fn status_changed(
        &self,
        record_type: &str,
        payment: &Payment,
    ) -> Result<(), ListenerError> {
        info!(
            record_type,
            variant = %payment.variant,
            token = %payment.token(),
            status = %payment.status(),
            total = %payment.total,
            currency = %payment.currency,
            "payment status changed"
        );
        Ok(())
    }
}
