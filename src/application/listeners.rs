use crate::domain::payment::Payment;
use crate::domain::ports::StatusListener;
use crate::error::ListenerError;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Caller-owned list of status listeners.
///
/// Clones share the same list, so a caller can keep a handle to subscribe
/// listeners after handing another clone to a `PaymentManager`.
#[derive(Default, Clone)]
pub struct ListenerRegistry {
    listeners: Arc<RwLock<Vec<Arc<dyn StatusListener>>>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a listener; listeners are notified in subscription order.
    pub async fn subscribe(&self, listener: Arc<dyn StatusListener>) {
        self.listeners.write().await.push(listener);
    }

    pub async fn len(&self) -> usize {
        self.listeners.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.listeners.read().await.is_empty()
    }

    /// Delivers the event to every listener in order.
    ///
    /// Stops at the first listener that fails and returns its error; later
    /// listeners are not called.
    pub async fn notify(&self, record_type: &str, payment: &Payment) -> Result<(), ListenerError> {
        // Snapshot so a listener may subscribe others without deadlocking.
        let listeners = self.listeners.read().await.clone();
        for listener in listeners {
            listener.status_changed(record_type, payment).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct Named {
        name: &'static str,
        fail: bool,
        log: Arc<Mutex<Vec<&'static str>>>,
    }

    #[async_trait]
    impl StatusListener for Named {
        async fn status_changed(
            &self,
            _record_type: &str,
            _payment: &Payment,
        ) -> Result<(), ListenerError> {
            self.log.lock().unwrap().push(self.name);
            if self.fail {
                Err(ListenerError::new(self.name, "boom"))
            } else {
                Ok(())
            }
        }
    }

    fn named(name: &'static str, fail: bool, log: &Arc<Mutex<Vec<&'static str>>>) -> Arc<Named> {
        Arc::new(Named {
            name,
            fail,
            log: log.clone(),
        })
    }

    #[tokio::test]
    async fn test_notify_in_subscription_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let registry = ListenerRegistry::new();
        registry.subscribe(named("first", false, &log)).await;
        registry.subscribe(named("second", false, &log)).await;
        assert_eq!(registry.len().await, 2);

        registry
            .notify("payment", &Payment::new("dummy"))
            .await
            .unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_first_failure_stops_delivery() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let registry = ListenerRegistry::new();
        registry.subscribe(named("first", false, &log)).await;
        registry.subscribe(named("broken", true, &log)).await;
        registry.subscribe(named("never", false, &log)).await;

        let err = registry
            .notify("payment", &Payment::new("dummy"))
            .await
            .unwrap_err();
        assert_eq!(err.listener, "broken");
        assert_eq!(*log.lock().unwrap(), vec!["first", "broken"]);
    }

    #[tokio::test]
    async fn test_clones_share_listeners() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let registry = ListenerRegistry::new();
        let handle = registry.clone();
        handle.subscribe(named("late", false, &log)).await;

        assert!(!registry.is_empty().await);
    }
}
