//! Apply-loop ordering: in-order and out-of-order ops, duplicates,
//! gaps, version accounting, and snapshot stability.

use canopy::{ERROR_PATH, Limits, Op, Store, rev};

/// A store whose op queue is rendezvous: `submit` returns only once the
/// serializer has ingested the op, which makes assertions deterministic.
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
fn applies_ops_in_order() {
    let store = rendezvous_store();
    store.submit(op(1, "1:/x=hi")).expect("submit");

    assert_eq!(store.version().expect("version"), 1);
    assert_eq!(store.get("/x"), (vec!["hi".to_string()], 1));
    assert_eq!(store.get("/"), (vec!["x".to_string()], rev::DIR));
    assert_eq!(store.stat("/x"), (2, 1));
    store.close();
}

#[test]
fn reorders_out_of_order_ops() {
    let store = rendezvous_store();
    store.submit(op(2, "-1:/b=two")).expect("submit");
    assert_eq!(store.version().expect("version"), 0);

    store.submit(op(1, "-1:/a=one")).expect("submit");
    assert_eq!(store.version().expect("version"), 2);
    assert_eq!(store.get("/a"), (vec!["one".to_string()], 1));
    assert_eq!(store.get("/b"), (vec!["two".to_string()], 2));
    store.close();
}

#[test]
fn gap_blocks_until_filled() {
    let store = rendezvous_store();
    store.submit(op(1, "-1:/a=1")).expect("submit");
    store.submit(op(3, "-1:/c=3")).expect("submit");
    assert_eq!(store.version().expect("version"), 1);
    assert_eq!(store.get("/c").1, rev::MISSING);

    store.submit(op(2, "-1:/b=2")).expect("submit");
    assert_eq!(store.version().expect("version"), 3);
    assert_eq!(store.get("/c"), (vec!["3".to_string()], 3));
    store.close();
}

#[test]
fn duplicate_seqns_apply_once() {
    let store = rendezvous_store();
    store.submit(op(2, "-1:/win=first")).expect("submit");
    store.submit(op(2, "-1:/win=second")).expect("submit");
    store.submit(op(1, "-1:/a=1")).expect("submit");

    assert_eq!(store.version().expect("version"), 2);
    assert_eq!(store.get("/win"), (vec!["first".to_string()], 2));
    store.close();
}

#[test]
fn late_ops_are_dropped() {
    let store = rendezvous_store();
    store.submit(op(1, "-1:/a=1")).expect("submit");
    store.submit(op(1, "-1:/a=rewrite")).expect("submit");

    assert_eq!(store.version().expect("version"), 1);
    assert_eq!(store.get("/a"), (vec!["1".to_string()], 1));
    store.close();
}

#[test]
fn failed_mutations_advance_the_version() {
    let store = rendezvous_store();
    store.submit(op(1, "1:/x=hi")).expect("submit");
    store.submit(op(2, "0:/x=nope")).expect("submit");

    assert_eq!(store.version().expect("version"), 2);
    assert_eq!(store.get("/x"), (vec!["hi".to_string()], 1));
    assert_eq!(store.get(ERROR_PATH), (vec!["rev mismatch".to_string()], 2));
    store.close();
}

#[test]
fn snapshots_are_stable_across_later_applies() {
    let store = rendezvous_store();
    store.submit(op(1, "-1:/k=old")).expect("submit");
    assert_eq!(store.version().expect("version"), 1);

    let (ver, root) = store.snap();
    assert_eq!(ver, 1);

    store.submit(op(2, "-1:/k=new")).expect("submit");
    assert_eq!(store.version().expect("version"), 2);

    assert_eq!(root.get("/k"), (vec!["old".to_string()], 1));
    assert_eq!(store.get("/k"), (vec!["new".to_string()], 2));
    store.close();
}

#[test]
fn nop_advances_version_without_changes() {
    let store = rendezvous_store();
    store.submit(op(1, "-1:/a=1")).expect("submit");
    store.submit(op(2, "nop:")).expect("submit");

    assert_eq!(store.version().expect("version"), 2);
    assert_eq!(store.get("/a"), (vec!["1".to_string()], 1));
    store.close();
}

#[test]
fn identical_op_streams_converge() {
    let muts = [
        (1, "1:/a=1"),
        (2, "-1:/b/c=2"),
        (3, "0:/a=stale"),
        (4, "-1:/a"),
        (5, "nop:"),
    ];

    let left = rendezvous_store();
    for (seqn, m) in muts {
        left.submit(op(seqn, m)).expect("submit");
    }

    // Same ops, delivered in a different order and with duplicates.
    let right = rendezvous_store();
    for (seqn, m) in [muts[2], muts[4], muts[0], muts[3], muts[1], muts[1]] {
        right.submit(op(seqn, m)).expect("submit");
    }

    assert_eq!(left.version().expect("version"), 5);
    assert_eq!(right.version().expect("version"), 5);

    let (_, left_root) = left.snap();
    let (_, right_root) = right.snap();
    assert_eq!(left_root, right_root);
    left.close();
    right.close();
}
