//! Watch Cache Error Hierarchy
//!
//! All errors produced by this crate are local and recoverable: the core
//! performs no I/O and no cross-process calls, so there is no retryable/fatal
//! distinction here. Absence of a key is reported through `Option`, never as
//! an error.

#[doc(hidden)]
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Store and index mutation failures
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Configuration loading failures
    #[error(transparent)]
    Config(#[from] config::ConfigError),
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The element key defines the store order and must be non-empty.
    #[error("element key cannot be empty")]
    EmptyKey,

    /// Queried an index name that was never registered.
    #[error("index with name {0} does not exist")]
    UnknownIndex(String),
}
