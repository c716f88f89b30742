use crate::sync::error_bus::{ErrorBus, PermissionError, StoreOperation};
use futures::TryStreamExt;
use mongodb::bson::Document;
use mongodb::Collection;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Immutable description of a store query: collection path plus filter,
/// order, and cap. Built once per dependency set (see `QueryMemo`) so the
/// same dependencies always yield an equal descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryDescriptor {
    pub path: String,
    pub filter: Document,
    pub sort: Option<Document>,
    pub limit: Option<i64>,
}

impl QueryDescriptor {
    pub fn new(path: impl Into<String>, filter: Document) -> Self {
        Self {
            path: path.into(),
            filter,
            sort: None,
            limit: None,
        }
    }

    pub fn sorted(mut self, sort: Document) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn capped(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Snapshot of a live collection query
#[derive(Debug, Clone)]
pub struct Snapshot<T> {
    pub data: Option<Vec<T>>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl<T> Snapshot<T> {
    fn loading() -> Self {
        Self {
            data: None,
            is_loading: true,
            error: None,
        }
    }

    /// Settled without a subscription (absent query descriptor)
    fn settled_empty() -> Self {
        Self {
            data: None,
            is_loading: false,
            error: None,
        }
    }
}

/// Snapshot of a live single-document read
#[derive(Debug, Clone)]
pub struct DocSnapshot<T> {
    pub data: Option<T>,
    pub is_loading: bool,
    pub error: Option<String>,
}

/// Live subscription over a collection query with a caller-owned lifetime.
///
/// Snapshots are pushed through a `watch` channel; consumers call
/// `subscribe()` and poll or await changes. Change streams require a replica
/// set, so the subscription re-runs the query on a fixed interval instead;
/// each successful pass emits a fresh snapshot in commit order.
///
/// An absent descriptor settles immediately (`data: None, is_loading: false`)
/// and `start()` opens nothing. A read error publishes a permission-error
/// event on the bus, emits an error snapshot, and ends the subscription.
/// `stop()` (or drop) tears the subscription down exactly once; nothing is
/// delivered after teardown.
pub struct LiveQuery<T: Send + Sync> {
    collection: Collection<T>,
    descriptor: Option<QueryDescriptor>,
    bus: ErrorBus,
    poll_interval: Duration,
    tx: watch::Sender<Snapshot<T>>,
    task: Option<JoinHandle<()>>,
}

impl<T> LiveQuery<T>
where
    T: DeserializeOwned + Send + Sync + Unpin + 'static,
{
    pub fn new(
        collection: Collection<T>,
        descriptor: Option<QueryDescriptor>,
        bus: ErrorBus,
        poll_interval: Duration,
    ) -> Self {
        let initial = if descriptor.is_some() {
            Snapshot::loading()
        } else {
            Snapshot::settled_empty()
        };
        let (tx, _) = watch::channel(initial);

        Self {
            collection,
            descriptor,
            bus,
            poll_interval,
            tx,
            task: None,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot<T>> {
        self.tx.subscribe()
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().map(|t| !t.is_finished()).unwrap_or(false)
    }

    /// Open the subscription. A second call while running is a no-op, as is
    /// starting with an absent descriptor.
    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }
        let descriptor = match &self.descriptor {
            Some(d) => d.clone(),
            None => return,
        };

        let collection = self.collection.clone();
        let tx = self.tx.clone();
        let bus = self.bus.clone();
        let poll_interval = self.poll_interval;

        self.task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(poll_interval);
            loop {
                ticker.tick().await;

                match run_query(&collection, &descriptor).await {
                    Ok(rows) => {
                        let snapshot = Snapshot {
                            data: Some(rows),
                            is_loading: false,
                            error: None,
                        };
                        if tx.send(snapshot).is_err() {
                            // every receiver gone; nothing left to notify
                            break;
                        }
                    }
                    Err(e) => {
                        bus.publish(PermissionError {
                            operation: StoreOperation::List,
                            path: descriptor.path.clone(),
                            message: e.clone(),
                        });
                        let _ = tx.send(Snapshot {
                            data: None,
                            is_loading: false,
                            error: Some(e),
                        });
                        break;
                    }
                }
            }
        }));
    }

    /// Tear the subscription down. Idempotent: the task handle is taken on
    /// the first call, so repeated stops do nothing.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    /// Swap the dependency set: stops the current subscription and resets the
    /// snapshot; call `start()` to re-subscribe under the new descriptor.
    pub fn set_descriptor(&mut self, descriptor: Option<QueryDescriptor>) {
        self.stop();
        let reset = if descriptor.is_some() {
            Snapshot::loading()
        } else {
            Snapshot::settled_empty()
        };
        // send_replace updates the value even with no receivers attached
        self.tx.send_replace(reset);
        self.descriptor = descriptor;
    }
}

impl<T: Send + Sync> Drop for LiveQuery<T> {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn run_query<T>(
    collection: &Collection<T>,
    descriptor: &QueryDescriptor,
) -> Result<Vec<T>, String>
where
    T: DeserializeOwned + Send + Sync + Unpin,
{
    let mut find = collection.find(descriptor.filter.clone());
    if let Some(sort) = &descriptor.sort {
        find = find.sort(sort.clone());
    }
    if let Some(limit) = descriptor.limit {
        find = find.limit(limit);
    }

    let cursor = find.await.map_err(|e| format!("Query failed: {}", e))?;
    cursor
        .try_collect()
        .await
        .map_err(|e| format!("Failed to decode snapshot: {}", e))
}

/// Live read of a single document. Same lifecycle as `LiveQuery`; errors are
/// published with operation kind `get`.
pub struct LiveDoc<T: Send + Sync> {
    collection: Collection<T>,
    descriptor: Option<QueryDescriptor>,
    bus: ErrorBus,
    poll_interval: Duration,
    tx: watch::Sender<DocSnapshot<T>>,
    task: Option<JoinHandle<()>>,
}

impl<T> LiveDoc<T>
where
    T: DeserializeOwned + Clone + Send + Sync + Unpin + 'static,
{
    pub fn new(
        collection: Collection<T>,
        descriptor: Option<QueryDescriptor>,
        bus: ErrorBus,
        poll_interval: Duration,
    ) -> Self {
        let initial = DocSnapshot {
            data: None,
            is_loading: descriptor.is_some(),
            error: None,
        };
        let (tx, _) = watch::channel(initial);

        Self {
            collection,
            descriptor,
            bus,
            poll_interval,
            tx,
            task: None,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<DocSnapshot<T>> {
        self.tx.subscribe()
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().map(|t| !t.is_finished()).unwrap_or(false)
    }

    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }
        let descriptor = match &self.descriptor {
            Some(d) => d.clone(),
            None => return,
        };

        let collection = self.collection.clone();
        let tx = self.tx.clone();
        let bus = self.bus.clone();
        let poll_interval = self.poll_interval;

        self.task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(poll_interval);
            loop {
                ticker.tick().await;

                match collection.find_one(descriptor.filter.clone()).await {
                    Ok(doc) => {
                        let snapshot = DocSnapshot {
                            data: doc,
                            is_loading: false,
                            error: None,
                        };
                        if tx.send(snapshot).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        let message = format!("Read failed: {}", e);
                        bus.publish(PermissionError {
                            operation: StoreOperation::Get,
                            path: descriptor.path.clone(),
                            message: message.clone(),
                        });
                        let _ = tx.send(DocSnapshot {
                            data: None,
                            is_loading: false,
                            error: Some(message),
                        });
                        break;
                    }
                }
            }
        }));
    }

    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl<T: Send + Sync> Drop for LiveDoc<T> {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Post;
    use mongodb::bson::doc;
    use mongodb::Client;

    // Client construction is lazy - no server contact until the first
    // operation, so these lifecycle tests run without a database.
    async fn offline_collection() -> Collection<Post> {
        Client::with_uri_str("mongodb://127.0.0.1:27017/?serverSelectionTimeoutMS=200")
            .await
            .unwrap()
            .database("curalink_test")
            .collection("posts")
    }

    fn posts_descriptor(forum_id: &str) -> QueryDescriptor {
        QueryDescriptor::new("posts", doc! { "forum_id": forum_id })
            .sorted(doc! { "timestamp": 1 })
    }

    #[tokio::test]
    async fn test_absent_descriptor_settles_immediately() {
        let coll = offline_collection().await;
        let query = LiveQuery::new(coll, None, ErrorBus::new(), Duration::from_millis(50));

        let rx = query.subscribe();
        let snapshot = rx.borrow();
        assert!(snapshot.data.is_none());
        assert!(!snapshot.is_loading);
        assert!(snapshot.error.is_none());
    }

    #[tokio::test]
    async fn test_start_with_absent_descriptor_opens_nothing() {
        let coll = offline_collection().await;
        let mut query = LiveQuery::new(coll, None, ErrorBus::new(), Duration::from_millis(50));

        query.start();
        assert!(!query.is_running());
    }

    #[tokio::test]
    async fn test_stop_is_idempotent() {
        let coll = offline_collection().await;
        let mut query = LiveQuery::new(
            coll,
            Some(posts_descriptor("forum-1")),
            ErrorBus::new(),
            Duration::from_millis(50),
        );

        query.start();
        assert!(query.is_running());
        query.stop();
        assert!(!query.is_running());
        query.stop(); // second stop must be a no-op
        assert!(!query.is_running());
    }

    #[tokio::test]
    async fn test_restart_after_descriptor_change() {
        let coll = offline_collection().await;
        let mut query = LiveQuery::new(
            coll,
            Some(posts_descriptor("forum-1")),
            ErrorBus::new(),
            Duration::from_millis(50),
        );

        query.start();
        query.set_descriptor(Some(posts_descriptor("forum-2")));
        // descriptor swap stops the old subscription and resets to loading
        assert!(!query.is_running());
        assert!(query.subscribe().borrow().is_loading);

        query.start();
        assert!(query.is_running());
        query.stop();
    }

    #[tokio::test]
    async fn test_read_error_publishes_permission_event() {
        // Nothing listens on this port, so the first poll fails fast.
        let coll: Collection<Post> =
            Client::with_uri_str("mongodb://127.0.0.1:9/?serverSelectionTimeoutMS=200")
                .await
                .unwrap()
                .database("curalink_test")
                .collection("posts");

        let bus = ErrorBus::new();
        let mut events = bus.subscribe();

        let mut query = LiveQuery::new(
            coll,
            Some(posts_descriptor("forum-1")),
            bus.clone(),
            Duration::from_millis(10),
        );
        let mut rx = query.subscribe();
        query.start();

        let event = events.recv().await.unwrap();
        assert_eq!(event.operation, StoreOperation::List);
        assert_eq!(event.path, "posts");

        rx.changed().await.unwrap();
        let snapshot = rx.borrow();
        assert!(snapshot.error.is_some());
        assert!(!snapshot.is_loading);
    }

    #[tokio::test]
    async fn test_live_doc_absent_descriptor_settles_immediately() {
        let coll: Collection<crate::models::Forum> =
            Client::with_uri_str("mongodb://127.0.0.1:27017/?serverSelectionTimeoutMS=200")
                .await
                .unwrap()
                .database("curalink_test")
                .collection("forums");

        let mut doc_read = LiveDoc::new(coll, None, ErrorBus::new(), Duration::from_millis(50));
        doc_read.start();
        assert!(!doc_read.is_running());

        let rx = doc_read.subscribe();
        let snapshot = rx.borrow();
        assert!(snapshot.data.is_none());
        assert!(!snapshot.is_loading);
    }

    #[tokio::test]
    async fn test_live_doc_error_publishes_get_event() {
        let coll: Collection<crate::models::Forum> =
            Client::with_uri_str("mongodb://127.0.0.1:9/?serverSelectionTimeoutMS=200")
                .await
                .unwrap()
                .database("curalink_test")
                .collection("forums");

        let bus = ErrorBus::new();
        let mut events = bus.subscribe();

        let mut doc_read = LiveDoc::new(
            coll,
            Some(QueryDescriptor::new(
                "forums/abc",
                doc! { "name": "Test Question" },
            )),
            bus.clone(),
            Duration::from_millis(10),
        );
        doc_read.start();

        let event = events.recv().await.unwrap();
        assert_eq!(event.operation, StoreOperation::Get);
        assert_eq!(event.path, "forums/abc");
        doc_read.stop();
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_live_query_round_trip() {
        let coll: Collection<Post> = Client::with_uri_str("mongodb://localhost:27017")
            .await
            .unwrap()
            .database("curalink_test")
            .collection("posts_live_test");

        let mut query = LiveQuery::new(
            coll,
            Some(posts_descriptor("forum-live")),
            ErrorBus::new(),
            Duration::from_millis(20),
        );
        let mut rx = query.subscribe();
        query.start();

        rx.changed().await.unwrap();
        let snapshot = rx.borrow_and_update();
        assert!(snapshot.data.is_some());
        assert!(!snapshot.is_loading);
    }
}
