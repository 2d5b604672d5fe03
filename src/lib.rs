//! In-memory ordered, indexed store with copy-on-write snapshots.
//!
//! The building blocks of an API server's watch cache: a persistent ordered
//! store ([`OrderedStore`]) with prefix pagination, a secondary indexer kept
//! consistent behind one lock ([`ThreadedStoreIndexer`]), a revision-keyed
//! snapshot cache for continue requests ([`ContinueCache`]), and the
//! [`WatchCache`] assembly applying a serialized watch-event stream.

mod config;
mod continue_cache;
mod element;
mod errors;
mod store;
mod watch_cache;

pub use config::*;
pub use continue_cache::*;
pub use element::*;
pub use errors::*;
pub use store::*;
pub use watch_cache::*;

#[cfg(test)]
mod config_test;

//-----------------------------------------------------------
// Test utils

#[cfg(test)]
pub mod test_utils;
