use std::sync::Arc;
use std::thread;

use super::ThreadedStoreIndexer;
use crate::test_utils;
use crate::test_utils::namespace_indexers;
use crate::test_utils::pod;
use crate::test_utils::pod_key;
use crate::test_utils::TestElement;
use crate::Error;
use crate::StoreElement;
use crate::StoreError;

fn seeded_facade() -> ThreadedStoreIndexer<TestElement> {
    let facade = ThreadedStoreIndexer::new(namespace_indexers());
    facade.add(pod("ns1", "a")).expect("should add");
    facade.add(pod("ns1", "b")).expect("should add");
    facade.add(pod("ns2", "a")).expect("should add");
    facade
}

/// # Case 1: CRUD and queries through the facade
///
/// ## Criterias:
/// 1. list/get/prefix/count/by_index all observe the same state
/// 2. deleting an element removes it from both store and index
#[test]
fn test_facade_crud_case1() {
    test_utils::enable_logger();

    let facade = seeded_facade();
    assert_eq!(3, facade.len());
    assert_eq!(3, facade.count("/pods/", ""));
    assert!(facade.get_by_key(&pod_key("ns1", "a")).is_some());
    assert!(facade.get(&pod("ns1", "b")).is_some());

    let (page, has_more) = facade.list_prefix("/pods/ns1/", "", 10);
    assert_eq!(2, page.len());
    assert!(!has_more);
    assert_eq!(2, facade.by_index("namespace", "ns1").expect("known index").len());

    facade.delete(&pod("ns1", "a")).expect("should delete");
    assert!(facade.get_by_key(&pod_key("ns1", "a")).is_none());
    assert_eq!(1, facade.by_index("namespace", "ns1").expect("known index").len());

    // Deleting an absent element stays a no-op.
    facade.delete(&pod("ns1", "a")).expect("absent delete is ok");
    assert_eq!(2, facade.len());
}

/// # Case 2: update re-indexes the element
#[test]
fn test_update_reindex_case2() {
    let facade = seeded_facade();

    facade
        .update(StoreElement::new(pod_key("ns1", "a"), "updated".to_string()))
        .expect("should update");

    let found = facade.get_by_key(&pod_key("ns1", "a")).expect("should exist");
    assert_eq!("updated", found.object);

    let indexed = facade.by_index("namespace", "ns1").expect("known index");
    assert!(indexed.iter().any(|e| e.object == "updated"));
    assert_eq!(3, facade.len());
}

/// # Case 3: invalid input is rejected before any mutation
#[test]
fn test_empty_key_rejected_case3() {
    let facade = seeded_facade();

    let err = facade
        .add(StoreElement::new("", "x".to_string()))
        .expect_err("empty key must be rejected");
    assert!(matches!(err, Error::Store(StoreError::EmptyKey)));

    let err = facade
        .replace(vec![pod("ns1", "ok"), StoreElement::new("", "x".to_string())], 9)
        .expect_err("empty key must be rejected");
    assert!(matches!(err, Error::Store(StoreError::EmptyKey)));

    // The failed replace left the previous content in place.
    assert_eq!(3, facade.len());
    assert!(facade.get_by_key(&pod_key("ns1", "a")).is_some());
}

/// # Case 4: replace swaps store and indices together
#[test]
fn test_replace_case4() {
    let facade = seeded_facade();

    facade
        .replace(vec![pod("ns3", "x"), pod("ns3", "y")], 17)
        .expect("should replace");

    assert_eq!(vec![pod_key("ns3", "x"), pod_key("ns3", "y")], facade.list_keys());
    assert!(facade.by_index("namespace", "ns1").expect("known index").is_empty());
    assert_eq!(2, facade.by_index("namespace", "ns3").expect("known index").len());
}

/// # Case 5: one writer, many readers
///
/// ## Setup:
/// 1. a writer thread applies 1000 interleaved add/delete mutations
/// 2. four reader threads list, count and query indexes concurrently
///
/// ## Criterias:
/// 1. every read observes a sorted, duplicate-free key set
/// 2. snapshots cloned mid-stream are internally consistent
/// 3. the final state matches the mutation stream
#[test]
fn test_concurrent_readers_case5() {
    test_utils::enable_logger();

    let facade = Arc::new(ThreadedStoreIndexer::new(namespace_indexers()));

    let writer = {
        let facade = Arc::clone(&facade);
        thread::spawn(move || {
            for i in 0..1000 {
                let name = format!("p{:03}", i % 250);
                if i % 4 == 3 {
                    facade.delete(&pod("ns1", &name)).expect("should delete");
                } else {
                    facade.add(pod("ns1", &name)).expect("should add");
                }
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let facade = Arc::clone(&facade);
            thread::spawn(move || {
                for _ in 0..200 {
                    let keys = facade.list_keys();
                    let mut sorted = keys.clone();
                    sorted.sort();
                    sorted.dedup();
                    assert_eq!(sorted, keys);

                    let snapshot = facade.clone_store();
                    assert_eq!(snapshot.len(), snapshot.list().len());

                    let indexed = facade.by_index("namespace", "ns1").expect("known index");
                    assert!(indexed.len() <= 250);
                }
            })
        })
        .collect();

    writer.join().expect("writer should not panic");
    for reader in readers {
        reader.join().expect("reader should not panic");
    }

    // The last operation on name n runs at i = n + 750, a delete iff
    // (n + 750) % 4 == 3, i.e. n % 4 == 1: 63 of the 250 names end deleted.
    assert_eq!(187, facade.len());
    assert_eq!(187, facade.count("/pods/ns1/", ""));
    assert_eq!(187, facade.by_index("namespace", "ns1").expect("known index").len());
}
