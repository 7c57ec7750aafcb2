//! Deterministic application of one mutation at one sequence position.

use super::error::ApplyError;
use super::event::{ERROR_PATH, Event};
use super::mutation::{NOP, decode};
use super::node::Node;
use super::path;
use super::rev;

impl Node {
    /// Apply `mutation` at position `seqn`, yielding the replacement
    /// tree and the event for this position.
    ///
    /// Total and deterministic: validation failures become an event at
    /// [`ERROR_PATH`] instead of an error return, so every replica that
    /// consumes the same op stream converges on the same state and the
    /// same event sequence.
    pub fn apply(&self, seqn: i64, mutation: &str) -> (Node, Event) {
        if mutation == NOP {
            let event = Event {
                seqn,
                rev: rev::NOP,
                path: "/".to_string(),
                body: String::new(),
                mutation: mutation.to_string(),
                err: None,
                tree: self.clone(),
            };
            return (self.clone(), event);
        }

        let mut err = None;
        let (mut path, mut body, rev_wanted, mut keep) = match decode(mutation) {
            Ok(m) => (m.path, m.value, m.rev, m.keep),
            Err(e) => {
                err = Some(ApplyError::Mutation(e));
                (String::new(), String::new(), rev::MISSING, false)
            }
        };

        if err.is_none() && keep {
            // Every proper ancestor of a set must be a directory;
            // missing ancestors are created by the write itself.
            let parts = path::split(&path);
            for depth in 1..parts.len() {
                match self.rev_at(&parts[..depth]) {
                    rev::MISSING => break,
                    rev::DIR => {}
                    _ => {
                        err = Some(ApplyError::NotDir);
                        break;
                    }
                }
            }
        }

        if err.is_none() {
            let cur_rev = self.rev_at(&path::split(&path));
            if rev_wanted != rev::CLOBBER && rev_wanted < cur_rev {
                err = Some(ApplyError::RevMismatch);
            } else if cur_rev == rev::DIR {
                err = Some(ApplyError::IsDir);
            }
        }

        if let Some(e) = &err {
            path = ERROR_PATH.to_string();
            body = e.to_string();
            keep = true;
        }

        let event_rev = if keep { seqn } else { rev::MISSING };
        let tree = self.with_path(&path, &body, event_rev, keep);
        let event = Event {
            seqn,
            rev: event_rev,
            path,
            body,
            mutation: mutation.to_string(),
            err,
            tree: tree.clone(),
        };
        (tree, event)
    }
}
