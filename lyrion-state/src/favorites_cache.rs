//! Cached favorites listing
//!
//! Favorites change rarely, so the listing is fetched once at startup and
//! on explicit refresh rather than polled. Reads hand out a shared
//! snapshot; a refresh swaps the whole list atomically so readers never
//! observe a partially replaced listing.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use lyrion_api::Favorite;

/// Maximum number of favorites surfaced to selection interfaces
///
/// The full listing stays available through [`FavoritesCache::snapshot`];
/// only the surfaced view truncates.
pub const MAX_SURFACE_SLOTS: usize = 24;

/// Atomic store for the server's favorites listing
pub struct FavoritesCache {
    favorites: RwLock<Arc<Vec<Favorite>>>,
}

impl FavoritesCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self {
            favorites: RwLock::new(Arc::new(Vec::new())),
        }
    }

    /// Replace the cached listing with a freshly fetched one
    pub fn replace(&self, favorites: Vec<Favorite>) {
        debug!(count = favorites.len(), "favorites cache refreshed");
        *self.favorites.write() = Arc::new(favorites);
    }

    /// The complete cached listing, in server order
    pub fn snapshot(&self) -> Arc<Vec<Favorite>> {
        self.favorites.read().clone()
    }

    /// The listing truncated to the surfaced slot count, in server order
    pub fn surface(&self) -> Vec<Favorite> {
        let all = self.snapshot();
        all.iter().take(MAX_SURFACE_SLOTS).cloned().collect()
    }

    /// Look up a favorite by its identifier
    pub fn find(&self, item_id: &str) -> Option<Favorite> {
        self.snapshot().iter().find(|f| f.id == item_id).cloned()
    }

    /// Number of cached favorites
    pub fn len(&self) -> usize {
        self.favorites.read().len()
    }

    /// Whether the cache holds no favorites
    pub fn is_empty(&self) -> bool {
        self.favorites.read().is_empty()
    }
}

impl Default for FavoritesCache {
    fn default() -> Self {
        Self::new()
    }
}
