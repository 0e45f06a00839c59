//! Process-wide handle to the invalidatable query cache.
//!
//! The registry does not own the cache; it holds a weak back-reference to
//! whatever the data-access collaborator constructed. Only the session
//! guard clears it, and clearing must happen strictly before the
//! post-termination redirect so no authenticated-looking frame can read
//! stale data across sessions.

use std::sync::{Arc, RwLock, Weak};

/// An invalidatable query cache owned by the data-access collaborator.
pub trait QueryCache: Send + Sync {
    /// Drops every cached query result.
    fn clear(&self);
}

/// Single-slot registry for the active query cache.
///
/// At most one cache is registered at a time; registering while a live
/// cache is present replaces it. `clear` is idempotent and safe with no
/// cache registered, because logout may race app teardown or reload.
#[derive(Default)]
pub struct QueryCacheRegistry {
    slot: RwLock<Option<Weak<dyn QueryCache>>>,
}

impl QueryCacheRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the active cache, replacing any previous registration.
    pub fn register(&self, cache: Arc<dyn QueryCache>) {
        let mut slot = self.slot.write().unwrap();
        if slot.as_ref().is_some_and(|w| w.upgrade().is_some()) {
            tracing::warn!("[QueryCacheRegistry] replacing a live cache registration");
        }
        *slot = Some(Arc::downgrade(&cache));
    }

    /// Clears the registered cache, if any.
    ///
    /// No-op when nothing is registered or the cache has already been
    /// dropped; never panics.
    pub fn clear(&self) {
        let slot = self.slot.read().unwrap();
        match slot.as_ref().and_then(Weak::upgrade) {
            Some(cache) => {
                tracing::debug!("[QueryCacheRegistry] clearing registered cache");
                cache.clear();
            }
            None => {
                tracing::debug!("[QueryCacheRegistry] clear with no live cache, skipping");
            }
        }
    }

    /// Removes the registration without touching the cache.
    pub fn unregister(&self) {
        let mut slot = self.slot.write().unwrap();
        *slot = None;
    }

    /// Returns whether a live cache is currently registered.
    pub fn is_registered(&self) -> bool {
        let slot = self.slot.read().unwrap();
        slot.as_ref().is_some_and(|w| w.upgrade().is_some())
    }
}
