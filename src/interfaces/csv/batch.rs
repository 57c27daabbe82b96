use super::command_reader::{CommandType, PaymentCommand};
use crate::application::manager::PaymentManager;
use crate::domain::payment::Payment;
use crate::domain::provider::ProviderRegistry;
use crate::error::{PaymentError, Result};
use std::collections::HashMap;

/// Applies command rows against a `PaymentManager`, remembering the payments
/// created in this batch by their reference.
pub struct BatchProcessor<'a> {
    manager: &'a PaymentManager,
    providers: &'a ProviderRegistry,
    created: HashMap<String, Payment>,
}

impl<'a> BatchProcessor<'a> {
    pub fn new(manager: &'a PaymentManager, providers: &'a ProviderRegistry) -> Self {
        Self {
            manager,
            providers,
            created: HashMap::new(),
        }
    }

    pub async fn apply(&mut self, command: PaymentCommand) -> Result<()> {
        match command.op {
            CommandType::Create => self.create(command).await,
            CommandType::Status => self.change_status(command).await,
        }
    }

    async fn create(&mut self, command: PaymentCommand) -> Result<()> {
        if self.created.contains_key(&command.reference) {
            return Err(PaymentError::ValidationError(format!(
                "reference {:?} already used in this batch",
                command.reference
            )));
        }

        let variant = command.variant.unwrap_or_default();
        let mut payment = Payment::new(variant);
        self.providers.provider_for(&payment)?;
        payment.currency = command.currency.unwrap_or_default();
        if let Some(total) = command.total {
            payment.total = total;
        }
        payment.validate()?;

        let result = match command.status {
            Some(status) => self.manager.change_status(&mut payment, &status).await,
            None => self.manager.persist(&mut payment).await,
        };
        if committed(&result) {
            self.created.insert(command.reference, payment);
        }
        result
    }

    async fn change_status(&mut self, command: PaymentCommand) -> Result<()> {
        let status = command.status.ok_or_else(|| {
            PaymentError::ValidationError(format!(
                "status row for {:?} has no status",
                command.reference
            ))
        })?;

        let (mut payment, batch_local) = match self.created.remove(&command.reference) {
            Some(payment) => (payment, true),
            None => {
                let stored = self
                    .manager
                    .get_by_token(&command.reference)
                    .await?
                    .ok_or_else(|| {
                        PaymentError::ValidationError(format!(
                            "unknown payment reference {:?}",
                            command.reference
                        ))
                    })?;
                (stored, false)
            }
        };

        let result = self.manager.change_status(&mut payment, &status).await;
        if batch_local {
            // After a failed save the cached copy holds an unstored status
            let cached = if committed(&result) {
                Some(payment)
            } else {
                self.manager.get_by_token(payment.token()).await.ok().flatten()
            };
            if let Some(payment) = cached {
                self.created.insert(command.reference, payment);
            }
        }
        result
    }
}

/// Whether the record reached the store. Listener failures happen after the save.
fn committed(result: &Result<()>) -> bool {
    matches!(result, Ok(()) | Err(PaymentError::Listener(_)))
}
