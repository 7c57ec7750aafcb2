//! Revision sentinels.
//!
//! User sequence numbers are strictly positive; everything at or below
//! zero is a reserved marker. Callers never synthesize a sentinel as a
//! write precondition except [`CLOBBER`].

/// The path has no value.
pub const MISSING: i64 = 0;

/// Write precondition that bypasses the revision check.
pub const CLOBBER: i64 = -1;

/// The node is a directory.
pub const DIR: i64 = -2;

/// The event was produced by a no-op mutation.
pub const NOP: i64 = -3;
