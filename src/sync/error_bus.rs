use serde::Serialize;
use std::fmt;
use tokio::sync::broadcast;

/// Store operation kinds carried in permission-error events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreOperation {
    Get,
    List,
    Create,
    Update,
    Delete,
    Set,
}

impl fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreOperation::Get => write!(f, "get"),
            StoreOperation::List => write!(f, "list"),
            StoreOperation::Create => write!(f, "create"),
            StoreOperation::Update => write!(f, "update"),
            StoreOperation::Delete => write!(f, "delete"),
            StoreOperation::Set => write!(f, "set"),
        }
    }
}

/// Structured permission/access error broadcast by reads and writes
#[derive(Debug, Clone, Serialize)]
pub struct PermissionError {
    pub operation: StoreOperation,
    pub path: String,
    pub message: String,
}

impl fmt::Display for PermissionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "permission error: {} on '{}': {}",
            self.operation, self.path, self.message
        )
    }
}

/// Process-wide publish/subscribe channel for store errors. Constructed once
/// in `main` and passed down via `web::Data` - not a global. Any number of
/// subscribers may attach; no delivery-order guarantee.
#[derive(Clone)]
pub struct ErrorBus {
    tx: broadcast::Sender<PermissionError>,
}

impl ErrorBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(64);
        Self { tx }
    }

    /// Publish an event to every subscriber. With no subscribers attached the
    /// event is logged here so it is never silently lost.
    pub fn publish(&self, error: PermissionError) {
        if self.tx.send(error.clone()).is_err() {
            log::error!("🔒 {} (no listeners attached)", error);
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PermissionError> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for ErrorBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_reaches_subscriber() {
        let bus = ErrorBus::new();
        let mut rx = bus.subscribe();

        bus.publish(PermissionError {
            operation: StoreOperation::List,
            path: "users/abc/researcher_profile".to_string(),
            message: "insufficient permissions".to_string(),
        });

        let event = rx.recv().await.unwrap();
        assert_eq!(event.operation, StoreOperation::List);
        assert_eq!(event.path, "users/abc/researcher_profile");
    }

    #[tokio::test]
    async fn test_multiple_subscribers_each_receive() {
        let bus = ErrorBus::new();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        bus.publish(PermissionError {
            operation: StoreOperation::Create,
            path: "posts".to_string(),
            message: "denied".to_string(),
        });

        assert_eq!(rx1.recv().await.unwrap().path, "posts");
        assert_eq!(rx2.recv().await.unwrap().path, "posts");
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_does_not_panic() {
        let bus = ErrorBus::new();
        bus.publish(PermissionError {
            operation: StoreOperation::Delete,
            path: "favorites".to_string(),
            message: "denied".to_string(),
        });
    }
}
