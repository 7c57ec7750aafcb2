//! The live store: a serializer thread behind channels.
//!
//! All writes enter as a totally-ordered stream of numbered ops; one
//! thread applies them and publishes immutable snapshots; watchers are
//! one-shot subscriptions with historical catch-up from a bounded log.

mod log;
mod watch;
mod worker;

use std::sync::{Arc, RwLock};
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam::channel::{
    Receiver, RecvError, RecvTimeoutError, Sender, TryRecvError, bounded,
};
use thiserror::Error;

use crate::core::{Event, Limits, Node, PathMatcher};

/// A mutation to apply at position `seqn` in the global order.
///
/// Ops at or below the store's version are silently dropped; duplicate
/// ops at one position apply once.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Op {
    pub seqn: i64,
    pub mutation: String,
}

/// A consistent `(version, tree)` pair, published as one unit.
#[derive(Clone, Debug)]
pub(crate) struct Snapshot {
    pub(crate) ver: i64,
    pub(crate) root: Node,
}

/// The store was shut down.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("store closed")]
pub struct ClosedError;

/// Watch registration failure.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum WaitError {
    /// The requested revision is below the log head; its history is
    /// gone.
    #[error("too late")]
    TooLate,
    #[error("store closed")]
    Closed,
}

pub(crate) struct WatchRequest {
    pub(crate) matcher: Box<dyn PathMatcher>,
    pub(crate) rev: i64,
    pub(crate) reply: Sender<Result<Receiver<Event>, WaitError>>,
}

/// The receiving half of a one-shot watch.
///
/// Exactly one event ever arrives. Channel closure means the store
/// shut down before the watch fired; treat it as cancellation.
pub struct EventWatch {
    receiver: Receiver<Event>,
}

impl EventWatch {
    pub fn recv(&self) -> Result<Event, RecvError> {
        self.receiver.recv()
    }

    pub fn try_recv(&self) -> Result<Event, TryRecvError> {
        self.receiver.try_recv()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Result<Event, RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }
}

/// Handle to a running store.
pub struct Store {
    ops: Sender<Op>,
    watches: Sender<WatchRequest>,
    cleans: Sender<i64>,
    flushes: Sender<()>,
    seqns: Receiver<i64>,
    waiting: Receiver<usize>,
    shared: Arc<RwLock<Snapshot>>,
    worker: Option<JoinHandle<()>>,
}

impl Store {
    /// An empty store at version 0; mutations start at 1.
    pub fn new() -> Store {
        Store::with_limits(Limits::default())
    }

    pub fn with_limits(limits: Limits) -> Store {
        let (ops_tx, ops_rx) = bounded(limits.max_op_queue_events);
        let (watch_tx, watch_rx) = bounded(limits.max_watch_queue_events);
        let (clean_tx, clean_rx) = bounded(0);
        let (flush_tx, flush_rx) = bounded(0);
        let (seqns_tx, seqns_rx) = bounded(0);
        let (waiting_tx, waiting_rx) = bounded(0);

        let shared = Arc::new(RwLock::new(Snapshot {
            ver: 0,
            root: Node::empty_dir(),
        }));
        let worker = worker::Worker::new(Arc::clone(&shared));
        let channels = worker::Channels {
            ops: ops_rx,
            watches: watch_rx,
            cleans: clean_rx,
            flushes: flush_rx,
            seqns: seqns_tx,
            waiting: waiting_tx,
        };
        let handle = std::thread::spawn(move || worker::run(worker, channels));

        Store {
            ops: ops_tx,
            watches: watch_tx,
            cleans: clean_tx,
            flushes: flush_tx,
            seqns: seqns_rx,
            waiting: waiting_rx,
            shared,
            worker: Some(handle),
        }
    }

    /// Submit an op, blocking until the serializer accepts it.
    pub fn submit(&self, op: Op) -> Result<(), ClosedError> {
        self.ops.send(op).map_err(|_| ClosedError)
    }

    /// The highest applied sequence number.
    pub fn version(&self) -> Result<i64, ClosedError> {
        self.seqns.recv().map_err(|_| ClosedError)
    }

    /// How many watches are still waiting for a match.
    pub fn waiting(&self) -> Result<usize, ClosedError> {
        self.waiting.recv().map_err(|_| ClosedError)
    }

    /// Reclaim log history through `seqn`. Watches for revisions at or
    /// below it will be too late afterwards.
    pub fn clean(&self, seqn: i64) -> Result<(), ClosedError> {
        self.cleans.send(seqn).map_err(|_| ClosedError)
    }

    /// Apply everything queued even across sequence gaps, publishing a
    /// single final event and forgetting prior history. Only useful
    /// when bootstrapping a store from another replica's point-in-time
    /// snapshot, where the intermediate events are irrelevant.
    pub fn flush(&self) -> Result<(), ClosedError> {
        self.flushes.send(()).map_err(|_| ClosedError)
    }

    /// A point-in-time snapshot: the version and the tree it produced.
    ///
    /// The pair comes from a single publication, so it is always
    /// consistent, and later applies never disturb it.
    pub fn snap(&self) -> (i64, Node) {
        let snapshot = self.shared.read().unwrap_or_else(|e| e.into_inner());
        (snapshot.ver, snapshot.root.clone())
    }

    /// Read `path` in the current snapshot.
    pub fn get(&self, path: &str) -> (Vec<String>, i64) {
        let (_, root) = self.snap();
        root.get(path)
    }

    /// Stat `path` in the current snapshot.
    pub fn stat(&self, path: &str) -> (u32, i64) {
        let (_, root) = self.snap();
        root.stat(path)
    }

    /// Watch for the first event at or after `rev` whose path matches.
    ///
    /// Revisions below 1 are treated as 1. Returns `TooLate` when the
    /// log no longer reaches back to `rev`; the decision is made on the
    /// serializer, so it cannot race a concurrent [`clean`](Store::clean).
    pub fn wait(
        &self,
        matcher: impl PathMatcher + 'static,
        rev: i64,
    ) -> Result<EventWatch, WaitError> {
        let (reply_tx, reply_rx) = bounded(1);
        let request = WatchRequest {
            matcher: Box::new(matcher),
            rev: rev.max(1),
            reply: reply_tx,
        };
        self.watches.send(request).map_err(|_| WaitError::Closed)?;
        match reply_rx.recv() {
            Ok(Ok(receiver)) => Ok(EventWatch { receiver }),
            Ok(Err(err)) => Err(err),
            Err(_) => Err(WaitError::Closed),
        }
    }

    /// Shut down: stop accepting ops, release live watches (their
    /// sinks close), and join the serializer.
    pub fn close(mut self) {
        let worker = self.worker.take();
        drop(self);
        if let Some(handle) = worker {
            let _ = handle.join();
        }
    }
}

impl Default for Store {
    fn default() -> Store {
        Store::new()
    }
}
