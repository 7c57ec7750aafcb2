//! Events produced by the apply loop, one per sequence position.

use super::error::ApplyError;
use super::node::Node;
use super::rev;

/// Failed mutations land here as error events, so observers can watch
/// for failures like any other path.
pub const ERROR_PATH: &str = "/ctl/err";

/// The outcome of applying one mutation at one sequence position.
///
/// `tree` is the store as of this event, so an observer can read the
/// exact state the event created without racing later applies.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Event {
    pub seqn: i64,
    pub rev: i64,
    pub path: String,
    pub body: String,
    pub mutation: String,
    pub err: Option<ApplyError>,
    pub tree: Node,
}

impl Event {
    /// True for a successful write of a value.
    pub fn is_set(&self) -> bool {
        self.err.is_none() && self.rev > 0
    }

    /// True for a successful delete.
    pub fn is_del(&self) -> bool {
        self.err.is_none() && self.rev == rev::MISSING
    }
}
