use std::{
    collections::BTreeSet,
    fs,
    path::{
        Path,
        PathBuf,
    },
};

use serde::{
    Deserialize,
    Serialize,
};
use tracing::{
    debug,
    warn,
};

use crate::core::{
    favorites::{
        FavoritesStore,
        FAVORITES_KEY,
    },
    FinderError,
};

const APP_NAME: &str = "portal-finder";

pub fn get_app_data_dir() -> PathBuf {
    if let Some(data_dir) = dirs::data_local_dir() {
        let app_dir = data_dir.join(APP_NAME);
        let _ = fs::create_dir_all(&app_dir);
        app_dir
    } else {
        PathBuf::from(".")
    }
}

pub fn get_data_file_path(filename: &str) -> PathBuf {
    get_app_data_dir().join(filename)
}

pub fn save_json<T: Serialize>(data: &T, filename: &str) -> Result<(), FinderError> {
    save_json_to(data, &get_data_file_path(filename))
}

pub fn load_json<T: for<'de> Deserialize<'de> + Default>(filename: &str) -> Result<T, FinderError> {
    load_json_from(&get_data_file_path(filename))
}

pub fn load_json_or_default<T: for<'de> Deserialize<'de> + Default>(filename: &str) -> T {
    match load_json::<T>(filename) {
        Ok(data) => data,
        Err(e) => {
            warn!("Failed to load {}: {}. Using defaults.", filename, e);
            T::default()
        }
    }
}

/// Writes `data` next to `path` and renames it into place, so readers never see a partial file.
pub fn save_json_to<T: Serialize>(data: &T, path: &Path) -> Result<(), FinderError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(data)?;
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, json)?;
    fs::rename(&tmp_path, path)?;
    debug!("Data saved to: {}", path.display());
    Ok(())
}

pub fn load_json_from<T: for<'de> Deserialize<'de> + Default>(path: &Path) -> Result<T, FinderError> {
    if !path.exists() {
        return Ok(T::default());
    }

    let json = fs::read_to_string(path)?;
    let data: T = serde_json::from_str(&json)?;
    debug!("Data loaded from: {}", path.display());
    Ok(data)
}

/// Favorites kept as a JSON array of episode ids in a single file.
pub struct JsonFavoritesStore {
    path: PathBuf,
}

impl JsonFavoritesStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_app_dir() -> Self {
        Self::new(get_data_file_path(&format!("{FAVORITES_KEY}.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn backup_path(&self) -> PathBuf {
        self.path.with_extension("json.bak")
    }
}

impl FavoritesStore for JsonFavoritesStore {
    fn load(&self) -> Result<BTreeSet<u32>, FinderError> {
        load_json_from(&self.path)
    }

    fn save(&self, ids: &BTreeSet<u32>) -> Result<(), FinderError> {
        save_json_to(ids, &self.path)
    }

    /// Renames the file to `<name>.json.bak`, replacing an older backup.
    fn set_aside(&self) -> Result<(), FinderError> {
        if !self.path.exists() {
            return Ok(());
        }
        let backup = self.backup_path();
        fs::rename(&self.path, &backup)?;
        warn!("Unreadable favorites moved to {}", backup.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::favorites::Favorites;

    #[test]
    fn test_favorites_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("favEpisodes.json");

        let store = JsonFavoritesStore::new(&path);
        store.save(&BTreeSet::from([1, 5, 9])).unwrap();

        let on_disk: Vec<u32> = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk, vec![1, 5, 9]);

        let fresh = JsonFavoritesStore::new(&path);
        assert_eq!(fresh.load().unwrap(), BTreeSet::from([1, 5, 9]));
    }

    #[test]
    fn test_missing_file_is_empty_set() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFavoritesStore::new(dir.path().join("nothing.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_unreadable_file_is_kept_as_backup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("favEpisodes.json");
        fs::write(&path, "[1, 2,").unwrap();

        let store = JsonFavoritesStore::new(&path);
        let backup = store.backup_path();
        let mut favorites = Favorites::load_or_empty(Box::new(store));
        assert!(favorites.is_empty());
        assert_eq!(fs::read_to_string(&backup).unwrap(), "[1, 2,");

        favorites.toggle(8).unwrap();
        let on_disk: Vec<u32> = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk, vec![8]);
        assert_eq!(fs::read_to_string(&backup).unwrap(), "[1, 2,");
    }

    #[test]
    fn test_toggle_rewrites_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("favEpisodes.json");

        let mut favorites = Favorites::load(Box::new(JsonFavoritesStore::new(&path))).unwrap();
        favorites.toggle(3).unwrap();
        favorites.toggle(2).unwrap();
        favorites.toggle(3).unwrap();

        let reloaded = JsonFavoritesStore::new(&path).load().unwrap();
        assert_eq!(reloaded, BTreeSet::from([2]));
        assert!(!path.with_extension("json.tmp").exists());
    }
}
