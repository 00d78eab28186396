use std::{
    collections::BTreeSet,
    sync::Mutex,
};

use tracing::{
    info,
    warn,
};

use super::FinderError;

/// Fixed name the favorite episode ids are stored under.
pub const FAVORITES_KEY: &str = "favEpisodes";

/// Opaque persistence for the favorite set. `load` of a never-written store yields an empty set.
pub trait FavoritesStore: Send {
    fn load(&self) -> Result<BTreeSet<u32>, FinderError>;
    fn save(&self, ids: &BTreeSet<u32>) -> Result<(), FinderError>;

    /// Keeps an unreadable blob out of the way of the next `save`.
    fn set_aside(&self) -> Result<(), FinderError> {
        Ok(())
    }
}

/// Store that keeps the serialized blob in memory; nothing outlives the process.
#[derive(Default)]
pub struct MemoryStore {
    blob: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw(&self) -> Option<String> {
        self.blob.lock().ok().and_then(|b| b.clone())
    }
}

impl FavoritesStore for MemoryStore {
    fn load(&self) -> Result<BTreeSet<u32>, FinderError> {
        let blob = self
            .blob
            .lock()
            .map_err(|_| FinderError::Custom("Favorites store lock poisoned".into()))?;
        match blob.as_deref() {
            Some(json) => Ok(serde_json::from_str(json)?),
            None => Ok(BTreeSet::new()),
        }
    }

    fn save(&self, ids: &BTreeSet<u32>) -> Result<(), FinderError> {
        let json = serde_json::to_string(ids)?;
        let mut blob = self
            .blob
            .lock()
            .map_err(|_| FinderError::Custom("Favorites store lock poisoned".into()))?;
        *blob = Some(json);
        Ok(())
    }
}

/// Favorite episode ids, loaded once and rewritten in full on every change.
///
/// The in-memory set only changes after the store accepted the new set, so a failed write
/// leaves both sides as they were.
pub struct Favorites {
    ids: BTreeSet<u32>,
    store: Box<dyn FavoritesStore>,
}

impl Favorites {
    pub fn load(store: Box<dyn FavoritesStore>) -> Result<Self, FinderError> {
        let ids = store.load()?;
        info!(count = ids.len(), "favorites loaded");
        Ok(Self { ids, store })
    }

    /// Like [`Favorites::load`] but starts empty when the stored blob cannot be read. The
    /// unreadable blob is set aside first so the next toggle does not overwrite it.
    pub fn load_or_empty(store: Box<dyn FavoritesStore>) -> Self {
        match store.load() {
            Ok(ids) => Self { ids, store },
            Err(e) => {
                warn!("Failed to load favorites: {}. Starting empty.", e);
                if let Err(e) = store.set_aside() {
                    warn!("Failed to set aside unreadable favorites: {}", e);
                }
                Self { ids: BTreeSet::new(), store }
            }
        }
    }

    pub fn contains(&self, id: u32) -> bool {
        self.ids.contains(&id)
    }

    pub fn ids(&self) -> &BTreeSet<u32> {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Adds `id` if absent, removes it otherwise. Returns whether it is now a favorite.
    pub fn toggle(&mut self, id: u32) -> Result<bool, FinderError> {
        let mut next = self.ids.clone();
        let now_favorite = if next.remove(&id) {
            false
        } else {
            next.insert(id);
            true
        };

        self.store.save(&next)?;
        self.ids = next;
        Ok(now_favorite)
    }
}
