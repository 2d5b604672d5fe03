//! Ordered store of elements sorted by key.
//!
//! The authoritative collection behind the watch cache. `clone()` shares all
//! tree nodes with the source, which is what makes per-revision snapshots
//! cheap enough to take while readers and the event applier keep going.

use std::sync::Arc;

use super::cow_tree::CowTree;
use crate::Keyed;
use crate::StoreError;

#[derive(Debug)]
pub struct OrderedStore<E> {
    tree: CowTree<E>,
}

impl<E> Clone for OrderedStore<E> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree.clone(),
        }
    }
}

impl<E> Default for OrderedStore<E> {
    fn default() -> Self {
        Self {
            tree: CowTree::default(),
        }
    }
}

impl<E: Keyed> OrderedStore<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(
        &mut self,
        elem: Arc<E>,
    ) -> Result<(), StoreError> {
        self.add_or_update(elem).map(|_| ())
    }

    pub fn update(
        &mut self,
        elem: Arc<E>,
    ) -> Result<(), StoreError> {
        self.add_or_update(elem).map(|_| ())
    }

    /// Insert-or-replace by key; returns the element it replaced, if any.
    pub(crate) fn add_or_update(
        &mut self,
        elem: Arc<E>,
    ) -> Result<Option<Arc<E>>, StoreError> {
        if elem.key().is_empty() {
            return Err(StoreError::EmptyKey);
        }
        Ok(self.tree.insert(elem))
    }

    /// Removes the element with `key`; no-op when absent.
    pub fn delete(
        &mut self,
        key: &str,
    ) -> Option<Arc<E>> {
        self.tree.remove(key)
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
        self.tree.get(key).cloned()
    }

    /// All elements in ascending key order.
    pub fn list(&self) -> Vec<Arc<E>> {
        let mut items = Vec::with_capacity(self.tree.len());
        self.tree.ascend(|elem| {
            items.push(elem.clone());
            true
        });
        items
    }

    /// All keys in ascending order.
    pub fn list_keys(&self) -> Vec<String> {
        let mut keys = Vec::with_capacity(self.tree.len());
        self.tree.ascend(|elem| {
            keys.push(elem.key().to_string());
            true
        });
        keys
    }

    /// Ascending scan of keys sharing `prefix`, starting at `continue_key`
    /// (or at `prefix` itself when empty, inclusive of a key equal to the
    /// prefix), collecting up to `limit` elements.
    ///
    /// `limit == 0` means unlimited; a negative limit yields no results. The
    /// returned flag is true iff at least one more matching element exists
    /// past the returned page, detected within the same traversal.
    pub fn list_prefix(
        &self,
        prefix: &str,
        continue_key: &str,
        limit: i64,
    ) -> (Vec<Arc<E>>, bool) {
        if limit < 0 {
            return (Vec::new(), false);
        }
        let start = if continue_key.is_empty() {
            prefix
        } else {
            continue_key
        };
        let mut result = Vec::new();

        if limit == 0 {
            self.tree.ascend_from(start, |elem| {
                if !elem.key().starts_with(prefix) {
                    return false;
                }
                result.push(elem.clone());
                true
            });
            return (result, false);
        }

        let limit = limit as usize;
        let mut has_more = false;
        self.tree.ascend_from(start, |elem| {
            if !elem.key().starts_with(prefix) {
                return false;
            }
            if result.len() < limit {
                result.push(elem.clone());
                true
            } else {
                has_more = true;
                false
            }
        });
        (result, has_more)
    }

    /// Same traversal as [`Self::list_prefix`], counting instead of
    /// materializing.
    pub fn count(
        &self,
        prefix: &str,
        continue_key: &str,
    ) -> usize {
        let start = if continue_key.is_empty() {
            prefix
        } else {
            continue_key
        };
        let mut count = 0;
        self.tree.ascend_from(start, |elem| {
            if !elem.key().starts_with(prefix) {
                return false;
            }
            count += 1;
            true
        });
        count
    }

    /// Discards all current elements and rebuilds from `elems`. The revision
    /// is accepted for interface symmetry with the indexer and not
    /// interpreted here.
    pub fn replace<I>(
        &mut self,
        elems: I,
        _revision: u64,
    ) -> Result<(), StoreError>
    where
        I: IntoIterator<Item = Arc<E>>,
    {
        let mut tree = CowTree::new();
        for elem in elems {
            if elem.key().is_empty() {
                return Err(StoreError::EmptyKey);
            }
            tree.insert(elem);
        }
        self.tree = tree;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.len() == 0
    }
}
