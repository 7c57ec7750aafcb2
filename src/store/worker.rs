//! The serializer thread.
//!
//! One thread owns every piece of mutable store state - this is THE
//! serialization point. Each loop iteration services exactly one
//! channel interaction, then applies every pending op whose turn has
//! come. Everyone else talks to it through channels or reads published
//! immutable snapshots.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use crossbeam::channel::{Receiver, Sender};

use super::log::EventLog;
use super::watch::{self, Watch};
use super::{Op, Snapshot, WaitError, WatchRequest};
use crate::core::{Event, Node};

pub(crate) struct Channels {
    pub(crate) ops: Receiver<Op>,
    pub(crate) watches: Receiver<WatchRequest>,
    pub(crate) cleans: Receiver<i64>,
    pub(crate) flushes: Receiver<()>,
    pub(crate) seqns: Sender<i64>,
    pub(crate) waiting: Sender<usize>,
}

pub(crate) struct Worker {
    shared: Arc<RwLock<Snapshot>>,
    state: Snapshot,
    todo: BTreeMap<i64, Op>,
    log: EventLog,
    watches: Vec<Watch>,
}

/// Run the serializer until the op channel closes.
///
/// On shutdown the live watch registry is dropped, which closes every
/// sink; blocked watchers observe the closure as cancellation.
pub(crate) fn run(mut worker: Worker, ch: Channels) {
    loop {
        let ver = worker.state.ver;
        let live_watches = worker.watches.len();
        let mut flush = false;

        crossbeam::select! {
            recv(ch.ops) -> msg => {
                match msg {
                    Ok(op) => worker.enqueue(op),
                    Err(_) => {
                        tracing::debug!(ver, "op stream closed, shutting down");
                        return;
                    }
                }
            }
            recv(ch.watches) -> msg => {
                if let Ok(request) = msg {
                    worker.register(request);
                }
            }
            recv(ch.cleans) -> msg => {
                if let Ok(seqn) = msg {
                    tracing::debug!(seqn, "reclaiming log history");
                    worker.log.clean(seqn);
                }
            }
            recv(ch.flushes) -> msg => {
                if msg.is_ok() {
                    flush = true;
                }
            }
            send(ch.seqns, ver) -> _res => {}
            send(ch.waiting, live_watches) -> _res => {}
        }

        worker.drain(flush);
    }
}

impl Worker {
    pub(crate) fn new(shared: Arc<RwLock<Snapshot>>) -> Worker {
        let state = shared.read().unwrap_or_else(|e| e.into_inner()).clone();
        Worker {
            shared,
            state,
            todo: BTreeMap::new(),
            log: EventLog::new(),
            watches: Vec::new(),
        }
    }

    /// Queue an op for its turn. Ops at or below the current version
    /// are duplicates or stragglers and are silently dropped, as is a
    /// second op at an already-queued position.
    fn enqueue(&mut self, op: Op) {
        if op.seqn > self.state.ver {
            self.todo.entry(op.seqn).or_insert(op);
        } else {
            tracing::trace!(seqn = op.seqn, ver = self.state.ver, "dropping stale op");
        }
    }

    /// Apply every queued op whose position has come up.
    ///
    /// Under flush, gaps are skipped as if they were no-ops, per-op
    /// publication is suppressed, and only the final event reaches the
    /// log and the watchers; history below the new version is then
    /// unrecoverable.
    fn drain(&mut self, flush: bool) {
        let mut ver = self.state.ver;
        let mut root = self.state.root.clone();
        let mut last = None;

        loop {
            let Some((&seqn, _)) = self.todo.first_key_value() else {
                break;
            };
            if flush && ver < seqn {
                ver = seqn - 1;
            }
            if seqn > ver + 1 {
                break;
            }
            let Some((_, op)) = self.todo.pop_first() else {
                break;
            };
            if op.seqn < ver + 1 {
                continue;
            }

            let (next_root, event) = root.apply(op.seqn, &op.mutation);
            tracing::debug!(seqn = event.seqn, path = %event.path, "applied");
            root = next_root;
            ver = event.seqn;
            self.publish(ver, &root);
            if flush {
                last = Some(event);
            } else {
                self.log.append(event.clone());
                self.fan_out(event);
            }
        }

        if flush {
            if let Some(event) = last {
                self.log.append(event.clone());
                self.fan_out(event);
            }
            tracing::debug!(head = ver + 1, "flush forgot history");
            self.log.advance_head(ver + 1);
        }
    }

    fn publish(&mut self, ver: i64, root: &Node) {
        self.state = Snapshot {
            ver,
            root: root.clone(),
        };
        let mut shared = self.shared.write().unwrap_or_else(|e| e.into_inner());
        *shared = self.state.clone();
    }

    fn fan_out(&mut self, event: Event) {
        self.watches = watch::notify(std::mem::take(&mut self.watches), &event);
    }

    /// Register a watch, deciding too-late and historical catch-up here
    /// so neither can race a concurrent clean.
    fn register(&mut self, request: WatchRequest) {
        let WatchRequest {
            matcher,
            rev,
            reply,
        } = request;

        if rev < self.log.head() {
            tracing::debug!(rev, head = self.log.head(), "watch is too late");
            let _ = reply.send(Err(WaitError::TooLate));
            return;
        }

        let (sink, receiver) = crossbeam::channel::bounded(1);
        let mut seqn = rev.max(self.log.head());
        while seqn <= self.state.ver {
            if let Some(event) = self.log.get(seqn)
                && matcher.matches(&event.path)
            {
                let _ = sink.send(event.clone());
                let _ = reply.send(Ok(receiver));
                return;
            }
            seqn += 1;
        }

        self.watches.push(Watch::new(matcher, rev, sink));
        let _ = reply.send(Ok(receiver));
    }
}
