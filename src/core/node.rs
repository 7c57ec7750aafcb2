//! The immutable tree.
//!
//! Nodes are never mutated in place: every write produces a new spine
//! and shares untouched subtrees, so a published snapshot stays valid
//! forever and readers never synchronize with the apply loop.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::path;
use super::rev;

#[derive(Debug, PartialEq, Eq)]
struct NodeInner {
    value: String,
    rev: i64,
    children: BTreeMap<String, Node>,
}

/// A handle to one tree node. Cloning is cheap (one `Arc`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    inner: Arc<NodeInner>,
}

impl Node {
    fn new(value: String, rev: i64, children: BTreeMap<String, Node>) -> Node {
        Node {
            inner: Arc::new(NodeInner {
                value,
                rev,
                children,
            }),
        }
    }

    /// An empty directory; the initial state of the store root.
    pub fn empty_dir() -> Node {
        Node::new(String::new(), rev::DIR, BTreeMap::new())
    }

    /// The absent node: what a write finds where nothing exists yet.
    fn missing() -> Node {
        Node::new(String::new(), rev::MISSING, BTreeMap::new())
    }

    fn is_dir(&self) -> bool {
        self.inner.rev == rev::DIR
    }

    fn at(&self, parts: &[&str]) -> Option<&Node> {
        match parts.split_first() {
            None => Some(self),
            Some((first, rest)) => self.inner.children.get(*first)?.at(rest),
        }
    }

    fn readdir(&self) -> Vec<String> {
        self.inner.children.keys().cloned().collect()
    }

    /// The revision at `parts`: the node's stamp, or `MISSING`.
    pub(crate) fn rev_at(&self, parts: &[&str]) -> i64 {
        match self.at(parts) {
            None => rev::MISSING,
            Some(node) => node.inner.rev,
        }
    }

    /// Read `path`.
    ///
    /// Missing or invalid paths read as `([""], MISSING)`; a file reads
    /// as its body and revision; a directory reads as its sorted child
    /// names and `DIR`.
    pub fn get(&self, path: &str) -> (Vec<String>, i64) {
        if path::check(path).is_err() {
            return (vec![String::new()], rev::MISSING);
        }
        match self.at(&path::split(path)) {
            None => (vec![String::new()], rev::MISSING),
            Some(node) if node.is_dir() => (node.readdir(), rev::DIR),
            Some(node) => (vec![node.inner.value.clone()], node.inner.rev),
        }
    }

    /// Size and revision of `path`: byte length for a file, child count
    /// for a directory, `(0, MISSING)` otherwise.
    pub fn stat(&self, path: &str) -> (u32, i64) {
        if path::check(path).is_err() {
            return (0, rev::MISSING);
        }
        match self.at(&path::split(path)) {
            None => (0, rev::MISSING),
            Some(node) if node.is_dir() => (node.inner.children.len() as u32, rev::DIR),
            Some(node) => (node.inner.value.len() as u32, node.inner.rev),
        }
    }

    /// Copy-on-write update.
    ///
    /// Returns the replacement node and whether the caller should keep
    /// it in its slot; `false` deletes the slot, which is how empty
    /// directories collapse upward.
    pub(crate) fn set(&self, parts: &[&str], value: &str, rev: i64, keep: bool) -> (Node, bool) {
        let Some((first, rest)) = parts.split_first() else {
            let node = Node::new(value.to_string(), rev, self.inner.children.clone());
            return (node, keep);
        };

        let mut children = self.inner.children.clone();
        let child = children.get(*first).cloned().unwrap_or_else(Node::missing);
        let (child, keep_child) = child.set(rest, value, rev, keep);
        if keep_child {
            children.insert((*first).to_string(), child);
        } else {
            children.remove(*first);
        }
        let non_empty = !children.is_empty();
        (
            Node::new(self.inner.value.clone(), rev::DIR, children),
            non_empty,
        )
    }

    /// Write `path` if it is valid, ignoring the keep signal at the top
    /// level: the root has no parent slot to vacate, so it is never
    /// pruned.
    pub(crate) fn with_path(&self, p: &str, value: &str, rev: i64, keep: bool) -> Node {
        if path::check(p).is_err() {
            return self.clone();
        }
        let (node, _) = self.set(&path::split(p), value, rev, keep);
        node
    }
}
