//! Mutation wire codec.
//!
//! A mutation is `"<rev>:<path>=<body>"` (set) or `"<rev>:<path>"`
//! (delete). `<rev>` is a signed 64-bit decimal. The body is arbitrary
//! and may contain `=` and `:`, so only the first `:` and the first `=`
//! after it are delimiters.

use super::error::MutationError;
use super::path;

/// The no-op mutation. Applies no change but still produces an event.
pub const NOP: &str = "nop:";

/// A decoded mutation. `keep` distinguishes a set (`true`) from a
/// delete (`false`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mutation {
    pub path: String,
    pub value: String,
    pub rev: i64,
    pub keep: bool,
}

/// Encode a mutation that sets `path` to `body` iff `rev` is at least
/// the path's revision at application time, with one exception:
/// [`CLOBBER`](super::rev::CLOBBER) sets unconditionally.
pub fn encode_set(path: &str, body: &str, rev: i64) -> Result<String, MutationError> {
    path::check(path)?;
    Ok(format!("{rev}:{path}={body}"))
}

/// Encode a mutation that deletes `path`, under the same precondition
/// rules as [`encode_set`].
pub fn encode_del(path: &str, rev: i64) -> Result<String, MutationError> {
    path::check(path)?;
    Ok(format!("{rev}:{path}"))
}

/// Decode a mutation string.
pub fn decode(mutation: &str) -> Result<Mutation, MutationError> {
    let Some((rev, tail)) = mutation.split_once(':') else {
        return Err(MutationError::BadMutation);
    };
    let rev: i64 = rev.parse()?;

    let (path, value, keep) = match tail.split_once('=') {
        Some((path, value)) => (path, value, true),
        None => (tail, "", false),
    };
    path::check(path)?;

    Ok(Mutation {
        path: path.to_string(),
        value: value.to_string(),
        rev,
        keep,
    })
}
