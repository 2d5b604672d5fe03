//! Watch cache assembly.
//!
//! Applies the serialized watch-event stream to the store facade, tracks the
//! current revision, and serves revision-consistent snapshots for paginated
//! reads through the continuation cache.

use parking_lot::RwLock;
use tracing::debug;
use tracing::warn;

use crate::CacheConfig;
use crate::ContinueCache;
use crate::Indexers;
use crate::Keyed;
use crate::OrderedStore;
use crate::Result;
use crate::ThreadedStoreIndexer;

/// One entry of the serialized mutation stream feeding the cache.
#[derive(Debug, Clone)]
pub enum WatchEvent<E> {
    Added(E),
    Modified(E),
    Deleted(E),
    /// Full state replacement after a watch restart.
    Replaced(Vec<E>),
}

pub struct WatchCache<E> {
    store: ThreadedStoreIndexer<E>,
    snapshots: ContinueCache<E>,
    /// Current revision. Held for writing across a whole event application
    /// so a snapshot request can never pair a revision with a store state it
    /// does not match.
    revision: RwLock<u64>,
    config: CacheConfig,
}

impl<E: Keyed> WatchCache<E> {
    pub fn new(
        config: CacheConfig,
        indexers: Indexers<E>,
    ) -> Self {
        Self {
            store: ThreadedStoreIndexer::new(indexers),
            snapshots: ContinueCache::new(),
            revision: RwLock::new(config.initial_revision),
            config,
        }
    }

    /// Applies one watch event at `revision`. Events arrive in revision
    /// order from a single stream; a regression is applied anyway but
    /// logged, since it signals an upstream resync.
    pub fn apply(
        &self,
        event: WatchEvent<E>,
        revision: u64,
    ) -> Result<()> {
        let mut current = self.revision.write();
        if revision < *current {
            warn!("revision regressed from {} to {}", *current, revision);
        }
        match event {
            WatchEvent::Added(elem) => self.store.add(elem)?,
            WatchEvent::Modified(elem) => self.store.update(elem)?,
            WatchEvent::Deleted(elem) => self.store.delete(&elem)?,
            WatchEvent::Replaced(elems) => {
                debug!("replacing cache content at revision {}", revision);
                self.store.replace(elems, revision)?;
            }
        }
        *current = revision;
        Ok(())
    }

    pub fn revision(&self) -> u64 {
        *self.revision.read()
    }

    /// Snapshot serving revision `rv`: the cached clone at the greatest
    /// revision <= `rv`. A request at or above the current revision captures
    /// a fresh clone of the live store the first time it is seen. Returns
    /// `None` when snapshotting is disabled or no retained revision is low
    /// enough.
    pub fn snapshot(
        &self,
        rv: u64,
    ) -> Option<(OrderedStore<E>, u64)> {
        if !self.config.snapshots_enabled {
            return None;
        }
        let current = self.revision.read();
        if rv >= *current {
            self.snapshots.set(*current, &self.store.clone_store());
        }
        self.snapshots.find_equal_or_lower(rv)
    }

    /// Drops snapshots no client can continue from anymore; `oldest_rv` is
    /// the caller-decided low-water mark.
    pub fn cleanup(
        &self,
        oldest_rv: u64,
    ) {
        self.snapshots.cleanup(oldest_rv);
    }

    /// Live read/query surface.
    pub fn store(&self) -> &ThreadedStoreIndexer<E> {
        &self.store
    }
}
