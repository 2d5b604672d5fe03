mod cow_tree;
mod indexer;
mod ordered;
mod threaded;

pub use indexer::*;
pub use ordered::*;
pub use threaded::*;

#[cfg(test)]
mod threaded_test;
