//! Codec and apply error taxonomy.
//!
//! These are bounded and deterministic: apply errors become the body of
//! `/ctl/err` events, so their `Display` output is part of the
//! replicated state and must never depend on anything but the input.

use std::num::ParseIntError;

use thiserror::Error;

/// Mutation codec failure, returned synchronously at encode/decode time.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MutationError {
    #[error("bad path")]
    BadPath,
    #[error("bad mutation")]
    BadMutation,
    #[error("bad rev: {0}")]
    BadRev(#[from] ParseIntError),
}

/// Apply-time failure.
///
/// Never aborts the apply loop; materialized as an event at
/// [`ERROR_PATH`](super::event::ERROR_PATH) so every replica records the
/// failure at the same position.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApplyError {
    #[error(transparent)]
    Mutation(#[from] MutationError),
    #[error("rev mismatch")]
    RevMismatch,
    #[error("not a directory")]
    NotDir,
    #[error("is a directory")]
    IsDir,
}
