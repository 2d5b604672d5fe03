//! Thread-safe facade combining the ordered store and the secondary indexer.
//!
//! One `RwLock` guards both as a unit: the serialized watch-event stream
//! mutates under the write lock while any number of readers serve queries
//! under the read lock, so no reader ever observes a store state whose index
//! updates have not landed yet. Critical sections are short and never invoke
//! caller code.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::trace;

use super::Indexer;
use super::OrderedStore;
use crate::Indexers;
use crate::Keyed;
use crate::Result;
use crate::StoreError;

pub struct ThreadedStoreIndexer<E> {
    inner: RwLock<StoreIndexer<E>>,
}

struct StoreIndexer<E> {
    store: OrderedStore<E>,
    indexer: Indexer<E>,
}

impl<E: Keyed> ThreadedStoreIndexer<E> {
    pub fn new(indexers: Indexers<E>) -> Self {
        Self {
            inner: RwLock::new(StoreIndexer {
                store: OrderedStore::new(),
                indexer: Indexer::new(indexers),
            }),
        }
    }

    pub fn add(
        &self,
        elem: E,
    ) -> Result<()> {
        self.add_or_update(Arc::new(elem))
    }

    pub fn update(
        &self,
        elem: E,
    ) -> Result<()> {
        self.add_or_update(Arc::new(elem))
    }

    fn add_or_update(
        &self,
        elem: Arc<E>,
    ) -> Result<()> {
        // Validate before taking the lock so an error never leaves the store
        // and the index diverged.
        if elem.key().is_empty() {
            return Err(StoreError::EmptyKey.into());
        }
        trace!("add_or_update key = {}", elem.key());

        let mut inner = self.inner.write();
        let old = inner.store.add_or_update(elem.clone())?;
        inner.indexer.update_elem(elem.key(), old.as_ref(), Some(&elem));
        Ok(())
    }

    /// Removes the element matching `elem`'s key; absent keys are a no-op.
    pub fn delete(
        &self,
        elem: &E,
    ) -> Result<()> {
        if elem.key().is_empty() {
            return Err(StoreError::EmptyKey.into());
        }
        trace!("delete key = {}", elem.key());

        let mut inner = self.inner.write();
        let Some(old) = inner.store.delete(elem.key()) else {
            return Ok(());
        };
        inner.indexer.update_elem(elem.key(), Some(&old), None);
        Ok(())
    }

    /// Atomically discards current content and rebuilds store and indices
    /// from `elems` (full resync after a watch restart).
    pub fn replace(
        &self,
        elems: Vec<E>,
        revision: u64,
    ) -> Result<()> {
        let elems: Vec<Arc<E>> = elems.into_iter().map(Arc::new).collect();
        for elem in &elems {
            if elem.key().is_empty() {
                return Err(StoreError::EmptyKey.into());
            }
        }
        trace!("replace with {} elements at revision {}", elems.len(), revision);

        let mut inner = self.inner.write();
        inner.store.replace(elems.iter().cloned(), revision)?;
        inner.indexer.replace(&elems);
        Ok(())
    }

    pub fn list(&self) -> Vec<Arc<E>> {
        self.inner.read().store.list()
    }

    pub fn list_keys(&self) -> Vec<String> {
        self.inner.read().store.list_keys()
    }

    pub fn list_prefix(
        &self,
        prefix: &str,
        continue_key: &str,
        limit: i64,
    ) -> (Vec<Arc<E>>, bool) {
        self.inner.read().store.list_prefix(prefix, continue_key, limit)
    }

    pub fn count(
        &self,
        prefix: &str,
        continue_key: &str,
    ) -> usize {
        self.inner.read().store.count(prefix, continue_key)
    }

    pub fn get(
        &self,
        elem: &E,
    ) -> Option<Arc<E>> {
        self.get_by_key(elem.key())
    }

    pub fn get_by_key(
        &self,
        key: &str,
    ) -> Option<Arc<E>> {
        self.inner.read().store.get_by_key(key)
    }

    pub fn by_index(
        &self,
        index_name: &str,
        index_value: &str,
    ) -> Result<Vec<Arc<E>>> {
        Ok(self.inner.read().indexer.by_index(index_name, index_value)?)
    }

    /// Snapshot of the ordered store, sharing structure with the live tree.
    /// O(1) while holding only the read lock.
    pub fn clone_store(&self) -> OrderedStore<E> {
        self.inner.read().store.clone()
    }

    pub fn len(&self) -> usize {
        self.inner.read().store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().store.is_empty()
    }
}
