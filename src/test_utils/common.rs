use std::sync::Arc;

use crate::Indexers;
use crate::StoreElement;

/// Element type used across the store tests; the object payload is just a
/// marker string.
pub type TestElement = StoreElement<String>;

static LOGGER_INIT: once_cell::sync::Lazy<()> = once_cell::sync::Lazy::new(|| {
    env_logger::init();
});

pub fn enable_logger() {
    *LOGGER_INIT;
}

pub fn pod_key(
    namespace: &str,
    name: &str,
) -> String {
    format!("/pods/{}/{}", namespace, name)
}

/// Builds the canonical `/pods/<namespace>/<name>` element used across the
/// store tests.
pub fn pod(
    namespace: &str,
    name: &str,
) -> TestElement {
    StoreElement::new(pod_key(namespace, name), format!("{}/{}", namespace, name))
}

pub fn pod_arc(
    namespace: &str,
    name: &str,
) -> Arc<TestElement> {
    Arc::new(pod(namespace, name))
}

/// Extracts the namespace segment of a `/pods/<namespace>/<name>` key.
pub fn namespace_of(elem: &TestElement) -> Vec<String> {
    match elem.key.split('/').nth(2) {
        Some(namespace) => vec![namespace.to_string()],
        None => Vec::new(),
    }
}

/// Registry with the single "namespace" index over the key segment.
pub fn namespace_indexers() -> Indexers<TestElement> {
    Indexers::new().with("namespace", namespace_of)
}
