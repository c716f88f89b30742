use std::sync::Arc;

/// Memoizes a query descriptor against its dependency key: the factory runs
/// only when the key changes, so repeated lookups with the same dependencies
/// get back the same `Arc` and downstream subscriptions are not rebuilt.
/// Returns `None` while a required dependency is absent (`key` is `None`).
pub struct QueryMemo<K, Q> {
    entry: Option<(K, Arc<Q>)>,
}

impl<K: PartialEq, Q> QueryMemo<K, Q> {
    pub fn new() -> Self {
        Self { entry: None }
    }

    pub fn get_or_build<F>(&mut self, key: Option<K>, factory: F) -> Option<Arc<Q>>
    where
        F: FnOnce(&K) -> Q,
    {
        let key = key?;

        if let Some((cached_key, cached)) = &self.entry {
            if *cached_key == key {
                return Some(Arc::clone(cached));
            }
        }

        let built = Arc::new(factory(&key));
        self.entry = Some((key, Arc::clone(&built)));
        Some(built)
    }

    /// Drop the cached entry; the next lookup rebuilds.
    pub fn invalidate(&mut self) {
        self.entry = None;
    }
}

impl<K: PartialEq, Q> Default for QueryMemo<K, Q> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_same_key_returns_same_arc() {
        let mut memo: QueryMemo<String, String> = QueryMemo::new();

        let first = memo
            .get_or_build(Some("forum-1".to_string()), |id| format!("posts/{}", id))
            .unwrap();
        let second = memo
            .get_or_build(Some("forum-1".to_string()), |id| format!("posts/{}", id))
            .unwrap();

        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_key_change_rebuilds() {
        let mut memo: QueryMemo<String, String> = QueryMemo::new();

        let first = memo
            .get_or_build(Some("forum-1".to_string()), |id| format!("posts/{}", id))
            .unwrap();
        let second = memo
            .get_or_build(Some("forum-2".to_string()), |id| format!("posts/{}", id))
            .unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(*second, "posts/forum-2");
    }

    #[test]
    fn test_absent_dependency_returns_none() {
        let mut memo: QueryMemo<String, String> = QueryMemo::new();
        let result = memo.get_or_build(None, |id| format!("posts/{}", id));
        assert!(result.is_none());
    }

    #[test]
    fn test_factory_runs_once_per_key() {
        let calls = Cell::new(0);
        let mut memo: QueryMemo<u32, u32> = QueryMemo::new();

        for _ in 0..5 {
            memo.get_or_build(Some(7), |k| {
                calls.set(calls.get() + 1);
                k * 10
            });
        }

        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_invalidate_forces_rebuild() {
        let mut memo: QueryMemo<u32, u32> = QueryMemo::new();

        let first = memo.get_or_build(Some(1), |k| k + 1).unwrap();
        memo.invalidate();
        let second = memo.get_or_build(Some(1), |k| k + 1).unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(*first, *second);
    }
}
