use crate::sync::error_bus::{ErrorBus, PermissionError, StoreOperation};
use mongodb::bson::{doc, Document};
use mongodb::Collection;
use serde::Serialize;
use std::future::Future;
use tokio::sync::oneshot;

/// Handle to an in-flight non-blocking write. The caller's critical path
/// never awaits the store: dropping the handle is the fire-and-forget
/// default, and failures still reach the error bus. Callers that do care can
/// `outcome().await` the result.
pub struct WriteTask {
    rx: oneshot::Receiver<Result<(), String>>,
}

impl WriteTask {
    pub async fn outcome(self) -> Result<(), String> {
        self.rx
            .await
            .unwrap_or_else(|_| Err("write task ended before reporting".to_string()))
    }
}

fn spawn_write<F>(bus: &ErrorBus, operation: StoreOperation, path: String, op: F) -> WriteTask
where
    F: Future<Output = Result<(), String>> + Send + 'static,
{
    let bus = bus.clone();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let result = op.await;
        if let Err(e) = &result {
            log::warn!("⚠️ Non-blocking {} on '{}' failed: {}", operation, path, e);
            bus.publish(PermissionError {
                operation,
                path,
                message: e.clone(),
            });
        }
        // receiver may already be dropped (fire-and-forget)
        let _ = tx.send(result);
    });

    WriteTask { rx }
}

/// Insert a document without blocking the caller
pub fn create_non_blocking<T>(collection: &Collection<T>, document: T, bus: &ErrorBus) -> WriteTask
where
    T: Serialize + Send + Sync + 'static,
{
    let coll = collection.clone();
    let path = collection.name().to_string();

    spawn_write(bus, StoreOperation::Create, path, async move {
        coll.insert_one(document)
            .await
            .map(|_| ())
            .map_err(|e| e.to_string())
    })
}

/// Apply a partial `$set` update without blocking the caller
pub fn update_non_blocking<T>(
    collection: &Collection<T>,
    filter: Document,
    partial: Document,
    bus: &ErrorBus,
) -> WriteTask
where
    T: Send + Sync + 'static,
{
    let coll = collection.clone();
    let path = collection.name().to_string();

    spawn_write(bus, StoreOperation::Update, path, async move {
        coll.update_one(filter, doc! { "$set": partial })
            .await
            .map(|_| ())
            .map_err(|e| e.to_string())
    })
}

/// Delete a document without blocking the caller
pub fn delete_non_blocking<T>(
    collection: &Collection<T>,
    filter: Document,
    bus: &ErrorBus,
) -> WriteTask
where
    T: Send + Sync + 'static,
{
    let coll = collection.clone();
    let path = collection.name().to_string();

    spawn_write(bus, StoreOperation::Delete, path, async move {
        coll.delete_one(filter)
            .await
            .map(|_| ())
            .map_err(|e| e.to_string())
    })
}

/// Upsert a document without blocking the caller. With `merge` the given
/// fields are `$set` into the existing document; without it the document is
/// replaced wholesale.
pub fn set_non_blocking<T>(
    collection: &Collection<T>,
    filter: Document,
    data: Document,
    merge: bool,
    bus: &ErrorBus,
) -> WriteTask
where
    T: Send + Sync + 'static,
{
    let coll = collection.clone_with_type::<Document>();
    let path = collection.name().to_string();

    spawn_write(bus, StoreOperation::Set, path, async move {
        if merge {
            coll.update_one(filter, doc! { "$set": data })
                .upsert(true)
                .await
                .map(|_| ())
                .map_err(|e| e.to_string())
        } else {
            coll.replace_one(filter, data)
                .upsert(true)
                .await
                .map(|_| ())
                .map_err(|e| e.to_string())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Favorite;
    use mongodb::Client;

    async fn unreachable_collection() -> Collection<Favorite> {
        // Nothing listens on this port; operations fail after the short
        // server-selection timeout.
        Client::with_uri_str("mongodb://127.0.0.1:9/?serverSelectionTimeoutMS=200")
            .await
            .unwrap()
            .database("curalink_test")
            .collection("favorites")
    }

    fn favorite() -> Favorite {
        Favorite {
            id: None,
            user_id: "patient-1".to_string(),
            item_type: "trial".to_string(),
            item_id: "trial-1".to_string(),
            created_at: 0,
        }
    }

    #[tokio::test]
    async fn test_failed_create_reports_on_bus_and_outcome() {
        let coll = unreachable_collection().await;
        let bus = ErrorBus::new();
        let mut events = bus.subscribe();

        let task = create_non_blocking(&coll, favorite(), &bus);

        let outcome = task.outcome().await;
        assert!(outcome.is_err());

        let event = events.recv().await.unwrap();
        assert_eq!(event.operation, StoreOperation::Create);
        assert_eq!(event.path, "favorites");
    }

    #[tokio::test]
    async fn test_dropped_task_still_reaches_bus() {
        let coll = unreachable_collection().await;
        let bus = ErrorBus::new();
        let mut events = bus.subscribe();

        // fire-and-forget: drop the handle immediately
        drop(delete_non_blocking(
            &coll,
            doc! { "user_id": "patient-1" },
            &bus,
        ));

        let event = events.recv().await.unwrap();
        assert_eq!(event.operation, StoreOperation::Delete);
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_successful_create_outcome_ok() {
        let coll: Collection<Favorite> = Client::with_uri_str("mongodb://localhost:27017")
            .await
            .unwrap()
            .database("curalink_test")
            .collection("favorites_write_test");

        let bus = ErrorBus::new();
        let task = create_non_blocking(&coll, favorite(), &bus);
        assert!(task.outcome().await.is_ok());
    }
}
