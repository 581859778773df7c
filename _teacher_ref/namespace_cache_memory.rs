use super::NamespaceCache;
use data_types::{DatabaseName, NamespaceSchema};
use hashbrown::HashMap;
use parking_lot::RwLock;
use std::sync::Arc;

/// An in-memory cache of [`NamespaceSchema`] backed by a hashmap protected with
/// a read-write mutex.
#[derive(Debug, Default)]
pub struct MemoryNamespaceCache {
    cache: RwLock<HashMap<DatabaseName<'static>, Arc<NamespaceSchema>>>,
}

impl NamespaceCache for Arc<MemoryNamespaceCache> {
    fn get_schema(&self, namespace: &DatabaseName<'_>) -> Option<Arc<NamespaceSchema>> {
        self.cache.read().get(namespace).map(Arc::clone)
    }

    fn put_schema(
        &self,
        namespace: DatabaseName<'static>,
        schema: impl Into<Arc<NamespaceSchema>>,
    ) -> Option<Arc<NamespaceSchema>> {
        self.cache.write().insert(namespace, schema.into())
    }
}
