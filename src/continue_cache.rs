//! Revision-keyed cache of store snapshots serving continue requests.
//!
//! A paginated LIST starts against some revision of the store; follow-up
//! pages carrying a continuation must see the exact snapshot the first page
//! was served from, not the live, mutating store. This cache retains clones
//! of the ordered store keyed by the revision they were captured at. Each
//! clone shares structure with its source, so holding one revision per
//! in-flight LIST stays cheap.
//!
//! A snapshot is dropped once its revision falls below the oldest revision
//! any client might still continue from; that low-water mark is policy of the
//! caller invoking [`ContinueCache::cleanup`].

use std::collections::BTreeSet;
use std::collections::HashMap;

use parking_lot::RwLock;
use tracing::trace;

use crate::Keyed;
use crate::OrderedStore;

pub struct ContinueCache<E> {
    inner: RwLock<Snapshots<E>>,
}

struct Snapshots<E> {
    /// Known revisions in ascending order.
    revisions: BTreeSet<u64>,
    cache: HashMap<u64, OrderedStore<E>>,
}

impl<E: Keyed> ContinueCache<E> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Snapshots {
                revisions: BTreeSet::new(),
                cache: HashMap::new(),
            }),
        }
    }

    /// Snapshot for the greatest cached revision <= `rv`, together with that
    /// revision. Exact matches are resolved by map lookup first.
    pub fn find_equal_or_lower(
        &self,
        rv: u64,
    ) -> Option<(OrderedStore<E>, u64)> {
        let inner = self.inner.read();
        if let Some(store) = inner.cache.get(&rv) {
            return Some((store.clone(), rv));
        }
        let found = *inner.revisions.range(..=rv).next_back()?;
        inner.cache.get(&found).map(|store| (store.clone(), found))
    }

    /// Caches a clone of `store` under `rv` unless that revision is already
    /// present. Never retains a live reference: later mutations of `store`
    /// must not reach the cached snapshot.
    pub fn set(
        &self,
        rv: u64,
        store: &OrderedStore<E>,
    ) {
        let mut inner = self.inner.write();
        if inner.cache.contains_key(&rv) {
            return;
        }
        trace!("caching snapshot at revision {}", rv);
        inner.revisions.insert(rv);
        inner.cache.insert(rv, store.clone());
    }

    /// Drops every snapshot whose revision is strictly below `rv`, walking
    /// the ordered revision set from the minimum upward.
    pub fn cleanup(
        &self,
        rv: u64,
    ) {
        let mut inner = self.inner.write();
        while let Some(&min) = inner.revisions.first() {
            if min >= rv {
                break;
            }
            trace!("dropping snapshot at revision {}", min);
            inner.revisions.pop_first();
            inner.cache.remove(&min);
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().cache.is_empty()
    }
}

impl<E: Keyed> Default for ContinueCache<E> {
    fn default() -> Self {
        Self::new()
    }
}
