//! Persistent balanced tree backing the ordered store.
//!
//! Every mutation allocates fresh nodes along the touched path and shares all
//! untouched subtrees with previous versions. Cloning a tree is therefore an
//! O(1) root copy, and a clone taken as a snapshot keeps returning the state
//! it was captured at while the live tree continues to change. Shared nodes
//! are never mutated in place.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::Keyed;

type Link<E> = Option<Arc<Node<E>>>;

#[derive(Debug)]
struct Node<E> {
    elem: Arc<E>,
    height: u32,
    left: Link<E>,
    right: Link<E>,
}

/// AVL tree with path-copying mutations, ordered by element key.
#[derive(Debug)]
pub(crate) struct CowTree<E> {
    root: Link<E>,
    len: usize,
}

impl<E> Clone for CowTree<E> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
            len: self.len,
        }
    }
}

impl<E> Default for CowTree<E> {
    fn default() -> Self {
        Self { root: None, len: 0 }
    }
}

impl<E: Keyed> CowTree<E> {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn get(
        &self,
        key: &str,
    ) -> Option<&Arc<E>> {
        let mut current = self.root.as_ref();
        while let Some(node) = current {
            match key.cmp(node.elem.key()) {
                Ordering::Equal => return Some(&node.elem),
                Ordering::Less => current = node.left.as_ref(),
                Ordering::Greater => current = node.right.as_ref(),
            }
        }
        None
    }

    /// Inserts or replaces by key; returns the replaced element, if any.
    pub(crate) fn insert(
        &mut self,
        elem: Arc<E>,
    ) -> Option<Arc<E>> {
        let mut replaced = None;
        self.root = Some(insert_at(&self.root, elem, &mut replaced));
        if replaced.is_none() {
            self.len += 1;
        }
        replaced
    }

    /// Removes the element with `key`; no-op when absent.
    pub(crate) fn remove(
        &mut self,
        key: &str,
    ) -> Option<Arc<E>> {
        let mut removed = None;
        self.root = remove_at(&self.root, key, &mut removed);
        if removed.is_some() {
            self.len -= 1;
        }
        removed
    }

    /// In-order traversal over all elements with key >= `start`, until the
    /// visitor returns false.
    pub(crate) fn ascend_from<F>(
        &self,
        start: &str,
        mut visit: F,
    ) where
        F: FnMut(&Arc<E>) -> bool,
    {
        ascend_at(&self.root, start, &mut visit);
    }

    /// In-order traversal over the whole tree.
    pub(crate) fn ascend<F>(
        &self,
        visit: F,
    ) where
        F: FnMut(&Arc<E>) -> bool,
    {
        self.ascend_from("", visit);
    }
}

fn height<E>(link: &Link<E>) -> u32 {
    link.as_ref().map_or(0, |node| node.height)
}

fn node<E: Keyed>(
    elem: Arc<E>,
    left: Link<E>,
    right: Link<E>,
) -> Arc<Node<E>> {
    let height = 1 + height(&left).max(height(&right));
    Arc::new(Node {
        elem,
        height,
        left,
        right,
    })
}

/// Rebuilds a node from its parts and restores the AVL invariant for it.
/// Children differ in height by at most two when this is called.
fn rebalance<E: Keyed>(
    elem: Arc<E>,
    left: Link<E>,
    right: Link<E>,
) -> Arc<Node<E>> {
    let left_height = height(&left);
    let right_height = height(&right);
    match (&left, &right) {
        (Some(l), _) if left_height > right_height + 1 => {
            if height(&l.left) >= height(&l.right) {
                // single right rotation
                node(
                    l.elem.clone(),
                    l.left.clone(),
                    Some(node(elem, l.right.clone(), right.clone())),
                )
            } else if let Some(lr) = l.right.as_ref() {
                // left-right double rotation
                node(
                    lr.elem.clone(),
                    Some(node(l.elem.clone(), l.left.clone(), lr.left.clone())),
                    Some(node(elem, lr.right.clone(), right.clone())),
                )
            } else {
                node(elem, left.clone(), right.clone())
            }
        }
        (_, Some(r)) if right_height > left_height + 1 => {
            if height(&r.right) >= height(&r.left) {
                // single left rotation
                node(
                    r.elem.clone(),
                    Some(node(elem, left.clone(), r.left.clone())),
                    r.right.clone(),
                )
            } else if let Some(rl) = r.left.as_ref() {
                // right-left double rotation
                node(
                    rl.elem.clone(),
                    Some(node(elem, left.clone(), rl.left.clone())),
                    Some(node(r.elem.clone(), rl.right.clone(), r.right.clone())),
                )
            } else {
                node(elem, left.clone(), right.clone())
            }
        }
        _ => node(elem, left, right),
    }
}

fn insert_at<E: Keyed>(
    link: &Link<E>,
    elem: Arc<E>,
    replaced: &mut Option<Arc<E>>,
) -> Arc<Node<E>> {
    let Some(current) = link else {
        return node(elem, None, None);
    };
    match elem.key().cmp(current.elem.key()) {
        Ordering::Equal => {
            *replaced = Some(current.elem.clone());
            Arc::new(Node {
                elem,
                height: current.height,
                left: current.left.clone(),
                right: current.right.clone(),
            })
        }
        Ordering::Less => {
            let left = insert_at(&current.left, elem, replaced);
            rebalance(current.elem.clone(), Some(left), current.right.clone())
        }
        Ordering::Greater => {
            let right = insert_at(&current.right, elem, replaced);
            rebalance(current.elem.clone(), current.left.clone(), Some(right))
        }
    }
}

fn remove_at<E: Keyed>(
    link: &Link<E>,
    key: &str,
    removed: &mut Option<Arc<E>>,
) -> Link<E> {
    let current = link.as_ref()?;
    match key.cmp(current.elem.key()) {
        Ordering::Less => {
            let left = remove_at(&current.left, key, removed);
            if removed.is_none() {
                return link.clone();
            }
            Some(rebalance(current.elem.clone(), left, current.right.clone()))
        }
        Ordering::Greater => {
            let right = remove_at(&current.right, key, removed);
            if removed.is_none() {
                return link.clone();
            }
            Some(rebalance(current.elem.clone(), current.left.clone(), right))
        }
        Ordering::Equal => {
            *removed = Some(current.elem.clone());
            match (&current.left, &current.right) {
                (None, right) => right.clone(),
                (left, None) => left.clone(),
                (left, Some(right)) => {
                    // Two children: pull up the in-order successor.
                    let (successor, rest) = detach_min(right);
                    Some(rebalance(successor, left.clone(), rest))
                }
            }
        }
    }
}

fn detach_min<E: Keyed>(current: &Arc<Node<E>>) -> (Arc<E>, Link<E>) {
    match &current.left {
        None => (current.elem.clone(), current.right.clone()),
        Some(left) => {
            let (min, rest) = detach_min(left);
            (
                min,
                Some(rebalance(current.elem.clone(), rest, current.right.clone())),
            )
        }
    }
}

fn ascend_at<E: Keyed>(
    link: &Link<E>,
    start: &str,
    visit: &mut impl FnMut(&Arc<E>) -> bool,
) -> bool {
    let Some(current) = link else {
        return true;
    };
    // The node and its whole left subtree sort below `start`.
    if current.elem.key() < start {
        return ascend_at(&current.right, start, visit);
    }
    if !ascend_at(&current.left, start, visit) {
        return false;
    }
    if !visit(&current.elem) {
        return false;
    }
    ascend_at(&current.right, start, visit)
}

#[cfg(test)]
impl<E: Keyed> CowTree<E> {
    /// Verifies heights and the AVL balance factor over the whole tree.
    pub(crate) fn is_balanced(&self) -> bool {
        check_balance(&self.root).is_some()
    }
}

#[cfg(test)]
fn check_balance<E>(link: &Link<E>) -> Option<u32> {
    let Some(node) = link else {
        return Some(0);
    };
    let left = check_balance(&node.left)?;
    let right = check_balance(&node.right)?;
    if left.abs_diff(right) > 1 || node.height != 1 + left.max(right) {
        return None;
    }
    Some(node.height)
}
