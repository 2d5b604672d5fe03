//! Core model of the cache: the stored element and the index registry.

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::sync::Arc;

/// Capability required of everything placed in the store: a stable string key.
///
/// The byte-wise lexicographic order over keys defines both the tree order
/// and the prefix-scan semantics; there is no secondary sort key.
pub trait Keyed {
    fn key(&self) -> &str;
}

/// The unit stored in the watch cache.
///
/// Carries the object itself plus the label and field projections that index
/// functions read. Elements handed out by the store are shared with its
/// snapshots and must be treated as read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreElement<T> {
    /// Unique key, typically `<resource-prefix>/<namespace>/<name>`.
    pub key: String,
    pub object: T,
    pub labels: BTreeMap<String, String>,
    pub fields: BTreeMap<String, String>,
}

impl<T> StoreElement<T> {
    pub fn new(
        key: impl Into<String>,
        object: T,
    ) -> Self {
        Self {
            key: key.into(),
            object,
            labels: BTreeMap::new(),
            fields: BTreeMap::new(),
        }
    }

    pub fn with_labels(
        mut self,
        labels: BTreeMap<String, String>,
    ) -> Self {
        self.labels = labels;
        self
    }

    pub fn with_fields(
        mut self,
        fields: BTreeMap<String, String>,
    ) -> Self {
        self.fields = fields;
        self
    }
}

impl<T> Keyed for StoreElement<T> {
    fn key(&self) -> &str {
        &self.key
    }
}

/// Pure function producing the index values of an element.
///
/// Zero values means the element is absent from that index; one value is the
/// optimized common case; more than one triggers a full old/new diff on
/// update.
pub type IndexFunc<E> = Arc<dyn Fn(&E) -> Vec<String> + Send + Sync>;

/// Registry mapping index names to their extraction functions.
///
/// Constructed explicitly and passed to the store at build time, so multiple
/// independent caches can coexist in one process.
pub struct Indexers<E> {
    funcs: HashMap<String, IndexFunc<E>>,
}

impl<E> Indexers<E> {
    pub fn new() -> Self {
        Self { funcs: HashMap::new() }
    }

    /// Registers `func` under `name`, replacing any previous registration.
    pub fn with<F>(
        mut self,
        name: impl Into<String>,
        func: F,
    ) -> Self
    where
        F: Fn(&E) -> Vec<String> + Send + Sync + 'static,
    {
        self.funcs.insert(name.into(), Arc::new(func));
        self
    }

    pub fn contains(
        &self,
        name: &str,
    ) -> bool {
        self.funcs.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.funcs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.funcs.is_empty()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&str, &IndexFunc<E>)> {
        self.funcs.iter().map(|(name, func)| (name.as_str(), func))
    }
}

impl<E> Default for Indexers<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for Indexers<E> {
    fn clone(&self) -> Self {
        Self {
            funcs: self.funcs.clone(),
        }
    }
}
