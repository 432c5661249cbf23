use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::{error::AppError, models::trip::TripRecord, services::store::StateStore};

/// Process-wide mirror of the single active trip, persisted through the
/// state store so independently-loaded pages agree on which trip is open.
/// Holds exactly one trip at a time; writes are whole-object replacements
/// and the last completed authoritative write wins.
#[derive(Clone)]
pub struct TripCache {
    active: Arc<Mutex<Option<TripRecord>>>,
    store: StateStore,
}

impl TripCache {
    pub fn new(store: StateStore) -> Self {
        Self {
            active: Arc::new(Mutex::new(None)),
            store,
        }
    }

    /// Pulls the snapshot a previous page load persisted, if any. Call once
    /// at page start, before anything reads the cache.
    pub async fn hydrate(&self) -> Result<(), AppError> {
        if let Some(trip) = self.store.load_current_trip().await? {
            *self.slot() = Some(trip);
        }
        Ok(())
    }

    pub fn active(&self) -> Option<TripRecord> {
        self.slot().clone()
    }

    pub fn active_id(&self) -> Option<i64> {
        self.slot().as_ref().map(|trip| trip.id)
    }

    /// Makes `trip` the active trip unconditionally: the user explicitly
    /// opened or created it. Persists the snapshot before returning so a
    /// page loaded next sees the same trip.
    pub async fn store_active(&self, trip: TripRecord) -> Result<(), AppError> {
        *self.slot() = Some(trip.clone());
        self.store.save_current_trip(&trip).await
    }

    /// Guarded write for fetch responses that may arrive late. The snapshot
    /// is only overwritten when the fetched trip is still the active one;
    /// a stale response for a trip the user has since navigated away from
    /// is dropped. Returns whether the write happened.
    pub async fn refresh_if_active(&self, trip: TripRecord) -> Result<bool, AppError> {
        let current = match self.active_id() {
            Some(id) => Some(id),
            None => self.store.load_current_trip_id().await?,
        };
        if current != Some(trip.id) {
            debug!(
                fetched = trip.id,
                active = ?current,
                "dropping stale trip fetch result"
            );
            return Ok(false);
        }
        self.store_active(trip).await?;
        Ok(true)
    }

    /// Drops the in-memory copy only. Used on sign-out, where the store is
    /// wiped separately together with the token.
    pub fn forget(&self) {
        *self.slot() = None;
    }

    pub async fn clear(&self) -> Result<(), AppError> {
        self.forget();
        self.store.clear_current_trip().await
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<TripRecord>> {
        self.active.lock().expect("trip cache lock poisoned")
    }
}
