//! Caller-owned memo of detected garment colors
//!
//! Keyed by image reference. Concurrent lookups of the same key share one
//! in-flight detection; failed detections leave the slot empty so the next
//! caller retries.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::OnceCell;
use tracing::debug;

use crate::color::dominant::DominantColor;

type Slot = Arc<OnceCell<DominantColor>>;

/// Image-keyed dominant color cache. Explicit invalidation, no TTL.
#[derive(Debug, Default)]
pub struct DominantColorCache {
    slots: Mutex<HashMap<String, Slot>>,
}

impl DominantColorCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn slots(&self) -> MutexGuard<'_, HashMap<String, Slot>> {
        // A panic while holding the lock cannot leave the map half-written.
        self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn slot(&self, key: &str) -> Slot {
        let mut slots = self.slots();
        Arc::clone(slots.entry(key.to_string()).or_default())
    }

    /// Cached color for `key`, if a detection already completed.
    pub fn get(&self, key: &str) -> Option<DominantColor> {
        self.slots().get(key).and_then(|slot| slot.get().cloned())
    }

    /// Return the cached color or run `detect` once for all concurrent callers.
    ///
    /// When `detect` yields `None`, nothing is stored.
    pub async fn get_or_detect<F, Fut>(&self, key: &str, detect: F) -> Option<DominantColor>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Option<DominantColor>>,
    {
        let slot = self.slot(key);
        if let Some(hit) = slot.get() {
            debug!(key, "dominant color cache hit");
            return Some(hit.clone());
        }

        let result = slot
            .get_or_try_init(|| async {
                debug!(key, "dominant color cache miss");
                detect().await.ok_or(())
            })
            .await;

        match result {
            Ok(color) => Some(color.clone()),
            Err(()) => {
                self.forget_empty(key, &slot);
                None
            }
        }
    }

    /// Drop an uninitialized slot so failed keys do not accumulate.
    fn forget_empty(&self, key: &str, slot: &Slot) {
        let mut slots = self.slots();
        if let Some(current) = slots.get(key) {
            if Arc::ptr_eq(current, slot) && !current.initialized() {
                slots.remove(key);
            }
        }
    }

    /// Remove one entry. Returns true when something was cached for `key`.
    pub fn invalidate(&self, key: &str) -> bool {
        self.slots()
            .remove(key)
            .is_some_and(|slot| slot.initialized())
    }

    pub fn clear(&self) {
        self.slots().clear();
    }

    /// Number of completed detections held.
    pub fn len(&self) -> usize {
        self.slots().values().filter(|slot| slot.initialized()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
