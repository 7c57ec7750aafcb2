//! Queue bounds for the store's ingress channels.

use serde::{Deserialize, Serialize};

/// Channel capacities for a [`Store`](crate::store::Store).
///
/// Control channels (version, waiting, clean, flush) are rendezvous by
/// construction and not configurable. A zero op queue makes `submit`
/// rendezvous too: it returns only once the serializer has taken the op.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    pub max_op_queue_events: usize,
    pub max_watch_queue_events: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_op_queue_events: 1024,
            max_watch_queue_events: 256,
        }
    }
}
