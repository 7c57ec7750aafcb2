//! Path matching contract for watchers.
//!
//! Glob compilation is a collaborator concern; the store only needs an
//! opaque match predicate.

/// Decides whether an event path is interesting to a watcher.
pub trait PathMatcher: Send {
    fn matches(&self, path: &str) -> bool;
}

/// Matches every path (the `/**` matcher).
#[derive(Clone, Copy, Debug, Default)]
pub struct Any;

impl PathMatcher for Any {
    fn matches(&self, _path: &str) -> bool {
        true
    }
}

impl<F> PathMatcher for F
where
    F: Fn(&str) -> bool + Send,
{
    fn matches(&self, path: &str) -> bool {
        self(path)
    }
}
