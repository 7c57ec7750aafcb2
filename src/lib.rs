#![forbid(unsafe_code)]

//! A versioned, hierarchical, in-memory key/value store driven by a
//! totally-ordered stream of numbered mutation strings.
//!
//! This is the state-machine replica behind a consensus service: the
//! consensus layer assigns sequence numbers to opaque mutation strings,
//! and a [`Store`] applies them deterministically, publishes an
//! [`Event`] per position, and serves concurrent readers from immutable
//! snapshots. One-shot watchers observe the first matching change at or
//! after a revision, catching up from a bounded history log.

pub mod core;
pub mod error;
pub mod store;
pub mod telemetry;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;

pub use crate::core::{
    Any, ApplyError, ERROR_PATH, Event, Limits, Mutation, MutationError, NOP, Node, PathMatcher,
    decode, encode_del, encode_set, rev,
};
pub use crate::store::{ClosedError, EventWatch, Op, Store, WaitError};
