//! Core domain model: pure data, no threads.
//!
//! Module hierarchy follows dependency order:
//! - rev: revision sentinels
//! - error: codec and apply error taxonomy
//! - path: path grammar and splitting
//! - mutation: the mutation wire codec
//! - glob: the watcher match contract
//! - node: the immutable tree
//! - event: per-position apply outcomes
//! - apply: mutation application over the tree
//! - limits: ambient queue bounds

pub mod apply;
pub mod error;
pub mod event;
pub mod glob;
pub mod limits;
pub mod mutation;
pub mod node;
pub mod path;
pub mod rev;

pub use error::{ApplyError, MutationError};
pub use event::{ERROR_PATH, Event};
pub use glob::{Any, PathMatcher};
pub use limits::Limits;
pub use mutation::{Mutation, NOP, decode, encode_del, encode_set};
pub use node::Node;
