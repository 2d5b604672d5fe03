//! Secondary indexer: `indexName -> indexValue -> {objectKey -> element}`.
//!
//! Maintained incrementally from the same mutation stream as the ordered
//! store; the facade keeps both under one lock so neither can be observed
//! ahead of the other.

use std::collections::HashMap;
use std::sync::Arc;

use crate::Indexers;
use crate::Keyed;
use crate::StoreError;

type ValueMap<E> = HashMap<String, HashMap<String, Arc<E>>>;

pub struct Indexer<E> {
    indices: HashMap<String, ValueMap<E>>,
    indexers: Indexers<E>,
}

impl<E: Keyed> Indexer<E> {
    pub fn new(indexers: Indexers<E>) -> Self {
        Self {
            indices: HashMap::new(),
            indexers,
        }
    }

    /// All elements currently associated with `index_value` under the named
    /// index. Unknown index names are an error; unknown values are empty.
    pub fn by_index(
        &self,
        index_name: &str,
        index_value: &str,
    ) -> Result<Vec<Arc<E>>, StoreError> {
        if !self.indexers.contains(index_name) {
            return Err(StoreError::UnknownIndex(index_name.to_string()));
        }
        let Some(set) = self
            .indices
            .get(index_name)
            .and_then(|index| index.get(index_value))
        else {
            return Ok(Vec::new());
        };
        Ok(set.values().cloned().collect())
    }

    /// Applies one mutation to every registered index. `old`/`new` are `None`
    /// for creation and deletion respectively.
    pub(crate) fn update_elem(
        &mut self,
        key: &str,
        old: Option<&Arc<E>>,
        new: Option<&Arc<E>>,
    ) {
        for (name, index_func) in self.indexers.iter() {
            let old_values = old.map(|elem| index_func(elem)).unwrap_or_default();
            let new_values = new.map(|elem| index_func(elem)).unwrap_or_default();

            let index = self.indices.entry(name.to_string()).or_default();

            // Most updates leave a single-valued index unchanged; refresh the
            // stored element without diffing the value sets.
            if new_values.len() == 1 && old_values.len() == 1 && new_values[0] == old_values[0] {
                if let Some(elem) = new {
                    add_entry(index, key, &new_values[0], elem);
                }
                continue;
            }

            for value in &old_values {
                delete_entry(index, key, value);
            }
            if let Some(elem) = new {
                for value in &new_values {
                    add_entry(index, key, value, elem);
                }
            }
        }
    }

    /// Resets all indices and replays `elems` as creations.
    pub(crate) fn replace(
        &mut self,
        elems: &[Arc<E>],
    ) {
        self.indices.clear();
        for elem in elems {
            self.update_elem(elem.key(), None, Some(elem));
        }
    }
}

fn add_entry<E>(
    index: &mut ValueMap<E>,
    key: &str,
    value: &str,
    elem: &Arc<E>,
) {
    index
        .entry(value.to_string())
        .or_default()
        .insert(key.to_string(), elem.clone());
}

fn delete_entry<E>(
    index: &mut ValueMap<E>,
    key: &str,
    value: &str,
) {
    let Some(set) = index.get_mut(value) else {
        return;
    };
    set.remove(key);
    // Empty sets are dropped entirely so indices over high-cardinality,
    // short-lived values do not accumulate dead entries.
    if set.is_empty() {
        index.remove(value);
    }
}

#[cfg(test)]
impl<E: Keyed> Indexer<E> {
    /// Number of distinct values currently present under the named index.
    pub(crate) fn value_count(
        &self,
        index_name: &str,
    ) -> usize {
        self.indices.get(index_name).map_or(0, HashMap::len)
    }
}
