//! One-shot path watchers.

use crossbeam::channel::Sender;

use crate::core::{Event, PathMatcher};

/// A live subscription: the first event at or after `rev` whose path
/// matches is delivered on `sink`, then the watch is gone.
pub(crate) struct Watch {
    matcher: Box<dyn PathMatcher>,
    rev: i64,
    sink: Sender<Event>,
}

impl Watch {
    pub(crate) fn new(matcher: Box<dyn PathMatcher>, rev: i64, sink: Sender<Event>) -> Watch {
        Watch { matcher, rev, sink }
    }

    fn wants(&self, event: &Event) -> bool {
        event.seqn >= self.rev && self.matcher.matches(&event.path)
    }
}

/// Deliver `event` to every matching watch and return the rest.
///
/// The live set is rebuilt rather than edited during iteration. Sinks
/// hold exactly one event and fire at most once, so the send never
/// blocks; a disconnected sink just drops the watch.
pub(crate) fn notify(watches: Vec<Watch>, event: &Event) -> Vec<Watch> {
    let mut kept = Vec::with_capacity(watches.len());
    for watch in watches {
        if watch.wants(event) {
            let _ = watch.sink.send(event.clone());
        } else {
            kept.push(watch);
        }
    }
    kept
}
