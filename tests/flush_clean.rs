//! Flush and clean: history reclamation and gap-collapsing bootstrap.

use std::time::Duration;

use canopy::{Any, Limits, Op, Store, WaitError};

const TICK: Duration = Duration::from_secs(5);

fn rendezvous_store() -> Store {
    Store::with_limits(Limits {
        max_op_queue_events: 0,
        ..Limits::default()
    })
}

fn op(seqn: i64, mutation: &str) -> Op {
    Op {
        seqn,
        mutation: mutation.to_string(),
    }
}

#[test]
fn flush_jumps_over_gaps_and_emits_one_event() {
    let store = rendezvous_store();
    let watch = store.wait(Any, 1).expect("wait");

    store.submit(op(3, "-1:/a=3")).expect("submit");
    store.submit(op(5, "-1:/b=5")).expect("submit");
    assert_eq!(store.version().expect("version"), 0);

    store.flush().expect("flush");
    assert_eq!(store.version().expect("version"), 5);

    // Both queued ops applied; only the final event was published.
    assert_eq!(store.get("/a"), (vec!["3".to_string()], 3));
    assert_eq!(store.get("/b"), (vec!["5".to_string()], 5));
    let event = watch.recv_timeout(TICK).expect("final event");
    assert_eq!(event.seqn, 5);
    assert_eq!(event.path, "/b");

    // Flush forgets the past: the log restarts at ver + 1.
    assert_eq!(store.wait(Any, 5).err(), Some(WaitError::TooLate));
    let late = store.wait(Any, 6).expect("future watch");
    assert_eq!(store.waiting().expect("waiting"), 1);
    drop(late);
    store.close();
}

#[test]
fn flush_without_gaps_still_purges_history() {
    let store = rendezvous_store();
    store.submit(op(1, "-1:/a=1")).expect("submit");
    store.submit(op(2, "-1:/b=2")).expect("submit");
    assert_eq!(store.version().expect("version"), 2);

    store.submit(op(4, "-1:/d=4")).expect("submit");
    store.flush().expect("flush");
    assert_eq!(store.version().expect("version"), 4);

    assert_eq!(store.wait(Any, 2).err(), Some(WaitError::TooLate));
    store.close();
}

#[test]
fn flush_with_nothing_queued_changes_nothing() {
    let store = rendezvous_store();
    store.flush().expect("flush");
    assert_eq!(store.version().expect("version"), 0);

    let watch = store.wait(Any, 1).expect("wait");
    assert_eq!(store.waiting().expect("waiting"), 1);
    drop(watch);
    store.close();
}

#[test]
fn clean_reclaims_only_the_requested_prefix() {
    let store = rendezvous_store();
    for seqn in 1..=4 {
        store
            .submit(op(seqn, &format!("-1:/n/{seqn}={seqn}")))
            .expect("submit");
    }
    assert_eq!(store.version().expect("version"), 4);

    store.clean(2).expect("clean");
    assert_eq!(store.wait(Any, 2).err(), Some(WaitError::TooLate));

    let watch = store.wait(Any, 3).expect("wait");
    assert_eq!(watch.recv_timeout(TICK).expect("event").seqn, 3);
    store.close();
}

#[test]
fn clean_past_the_version_empties_the_log() {
    let store = rendezvous_store();
    store.submit(op(1, "-1:/a=1")).expect("submit");
    assert_eq!(store.version().expect("version"), 1);

    store.clean(10).expect("clean");
    assert_eq!(store.wait(Any, 5).err(), Some(WaitError::TooLate));

    // The state itself is untouched; only history is gone.
    assert_eq!(store.get("/a"), (vec!["1".to_string()], 1));
    store.close();
}
