//! In-flight read coalescing.
//!
//! Identical reads issued while one is already on the wire share its result
//! instead of starting another round-trip. Nothing is cached: once the
//! shared request settles its slot is dropped, so the next read goes to the
//! backend again.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::OnceCell;
use tracing::debug;

use crate::error::GatewayError;
use crate::query_keys::QueryKey;
use crate::transport::RawResponse;

type Outcome = Result<RawResponse, GatewayError>;
type Slot = Arc<OnceCell<Outcome>>;

/// Registry of reads currently on the wire, keyed by [`QueryKey`].
#[derive(Debug, Default)]
pub struct InFlight {
    slots: Mutex<HashMap<QueryKey, Slot>>,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Run `fetch` unless an identical read is already in flight, in which
    /// case wait for that one and return a copy of its outcome.
    ///
    /// Returns the outcome and whether this caller joined an existing read.
    /// If the caller driving the shared request is dropped, one of the
    /// waiters takes over with its own `fetch`.
    pub async fn share<F, Fut>(&self, key: QueryKey, fetch: F) -> (Outcome, bool)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Outcome>,
    {
        let (slot, joined) = {
            let mut slots = self.lock();
            match slots.get(&key) {
                Some(slot) => (Arc::clone(slot), true),
                None => {
                    let slot: Slot = Arc::new(OnceCell::new());
                    slots.insert(key.clone(), Arc::clone(&slot));
                    (slot, false)
                }
            }
        };

        if joined {
            debug!(key = %key, "Joining in-flight request");
        }

        let release = Release {
            owner: self,
            key,
            slot,
        };

        let outcome = release.slot.get_or_init(fetch).await.clone();
        (outcome, joined)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<QueryKey, Slot>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Removes a slot from the registry once it has settled or its last waiter
/// has gone away, so a later read never sees a stale outcome.
struct Release<'a> {
    owner: &'a InFlight,
    key: QueryKey,
    slot: Slot,
}

impl Drop for Release<'_> {
    fn drop(&mut self) {
        let mut slots = self.owner.lock();
        let Some(current) = slots.get(&self.key) else {
            return;
        };
        if !Arc::ptr_eq(current, &self.slot) {
            return;
        }
        // One reference is held by the map and one by this guard.
        if self.slot.initialized() || Arc::strong_count(&self.slot) <= 2 {
            slots.remove(&self.key);
        }
    }
}
