//! Recents and favorites, persisted as JSON arrays in a key-value store.

use anyhow::{anyhow, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{debug, info, warn};
use wtw_config::DEFAULT_RECENTS_MAX;
use wtw_models::LibraryItem;

use crate::actions::{reduce, CardTarget, LibraryState, RenderInstruction};

pub const RECENTS_KEY: &str = "wtw.recents";
pub const FAVORITES_KEY: &str = "wtw.favorites";

/// String values by string key
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// One `<key>.json` file per key inside a directory
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            return Err(anyhow!("Invalid store key: {:?}", key));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(std::fs::read_to_string(path)?))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        // Atomic write: write to temp file, then rename
        let temp_path = path.with_extension("json.tmp");
        std::fs::write(&temp_path, value)?;
        std::fs::rename(&temp_path, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.values.lock().map_err(|_| anyhow!("memory store lock poisoned"))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}

/// Move `item` to the front, replacing any entry with the same id, then cap the length.
pub fn upsert_front(list: &mut Vec<LibraryItem>, item: LibraryItem, cap: usize) {
    list.retain(|existing| existing.id != item.id);
    list.insert(0, item);
    list.truncate(cap.max(1));
}

/// Remove the item if present, else add it to the front. Returns whether it is now in the list.
///
/// Id 0 is never added.
pub fn toggle(list: &mut Vec<LibraryItem>, item: LibraryItem) -> bool {
    if contains(list, item.id) {
        list.retain(|existing| existing.id != item.id);
        return false;
    }
    if item.id == 0 {
        return false;
    }
    list.insert(0, item);
    true
}

pub fn contains(list: &[LibraryItem], id: i64) -> bool {
    list.iter().any(|item| item.id == id)
}

pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Recents and favorites on top of a [`KeyValueStore`].
///
/// Reads of missing or corrupt values give an empty list; write failures are logged and dropped.
pub struct Library<S: KeyValueStore> {
    store: S,
    recents_max: usize,
}

impl<S: KeyValueStore> Library<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            recents_max: DEFAULT_RECENTS_MAX,
        }
    }

    pub fn with_recents_max(mut self, recents_max: usize) -> Self {
        self.recents_max = recents_max.max(1);
        self
    }

    pub fn recents_max(&self) -> usize {
        self.recents_max
    }

    pub fn recents(&self) -> Vec<LibraryItem> {
        self.load_list(RECENTS_KEY)
    }

    pub fn favorites(&self) -> Vec<LibraryItem> {
        self.load_list(FAVORITES_KEY)
    }

    pub fn is_favorite(&self, id: i64) -> bool {
        contains(&self.favorites(), id)
    }

    pub fn upsert_recent(&self, item: LibraryItem) {
        let mut recents = self.recents();
        upsert_front(&mut recents, item.stamped(now_millis()), self.recents_max);
        self.save_list(RECENTS_KEY, &recents);
    }

    pub fn toggle_favorite(&self, item: LibraryItem) -> bool {
        let mut favorites = self.favorites();
        let active = toggle(&mut favorites, item.stamped(now_millis()));
        self.save_list(FAVORITES_KEY, &favorites);
        active
    }

    pub fn clear_recents(&self) {
        self.remove_list(RECENTS_KEY);
    }

    pub fn clear_favorites(&self) {
        self.remove_list(FAVORITES_KEY);
    }

    /// Run a card click through the reducer and persist whichever list changed
    pub fn dispatch(&self, target: CardTarget) -> RenderInstruction {
        let before = LibraryState {
            recents: self.recents(),
            favorites: self.favorites(),
        };
        let (after, instruction) = reduce(target, before.clone(), self.recents_max, now_millis());

        if after.recents != before.recents {
            self.save_list(RECENTS_KEY, &after.recents);
        }
        if after.favorites != before.favorites {
            self.save_list(FAVORITES_KEY, &after.favorites);
        }
        instruction
    }

    fn load_list(&self, key: &str) -> Vec<LibraryItem> {
        let content = match self.store.get(key) {
            Ok(Some(content)) => content,
            Ok(None) => {
                debug!("{} not stored yet", key);
                return Vec::new();
            }
            Err(e) => {
                warn!("Failed to read {}: {}", key, e);
                return Vec::new();
            }
        };

        let values = match serde_json::from_str::<Vec<Value>>(&content) {
            Ok(values) => values,
            Err(e) => {
                warn!("Ignoring corrupt {}: {}", key, e);
                return Vec::new();
            }
        };

        let total = values.len();
        let items: Vec<LibraryItem> = values
            .into_iter()
            .filter_map(|value| serde_json::from_value(value).ok())
            .collect();
        if items.len() < total {
            warn!("Skipped {} malformed entries of {} in {}", total - items.len(), total, key);
        }
        items
    }

    fn save_list(&self, key: &str, items: &[LibraryItem]) {
        let result = serde_json::to_string(items)
            .map_err(anyhow::Error::from)
            .and_then(|json| self.store.set(key, &json));
        match result {
            Ok(()) => debug!("Saved {} ({} items)", key, items.len()),
            Err(e) => warn!("Failed to save {}: {}", key, e),
        }
    }

    fn remove_list(&self, key: &str) {
        match self.store.remove(key) {
            Ok(()) => info!("Cleared {}", key),
            Err(e) => warn!("Failed to clear {}: {}", key, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::CardInfo;
    use tempfile::TempDir;

    fn item(id: i64) -> LibraryItem {
        LibraryItem::new(id, format!("Movie {}", id), "", "2000")
    }

    fn ids(list: &[LibraryItem]) -> Vec<i64> {
        list.iter().map(|i| i.id).collect()
    }

    #[test]
    fn test_upsert_front_moves_existing() {
        let mut list = vec![item(1), item(2), item(3)];
        upsert_front(&mut list, item(3), 50);
        assert_eq!(ids(&list), vec![3, 1, 2]);
    }

    #[test]
    fn test_upsert_front_evicts_oldest_past_cap() {
        let mut list: Vec<LibraryItem> = (1..=50).rev().map(item).collect();
        assert_eq!(list.len(), 50);
        upsert_front(&mut list, item(51), 50);
        assert_eq!(list.len(), 50);
        assert_eq!(list[0].id, 51);
        assert!(!contains(&list, 1));
    }

    #[test]
    fn test_toggle() {
        let mut list = vec![item(1)];
        assert!(toggle(&mut list, item(2)));
        assert_eq!(ids(&list), vec![2, 1]);
        assert!(!toggle(&mut list, item(1)));
        assert_eq!(ids(&list), vec![2]);
        assert!(!toggle(&mut list, item(0)));
        assert_eq!(ids(&list), vec![2]);
    }

    #[test]
    fn test_library_recents_and_favorites() {
        let library = Library::new(MemoryStore::new()).with_recents_max(2);
        library.upsert_recent(item(1));
        library.upsert_recent(item(2));
        library.upsert_recent(item(3));
        assert_eq!(ids(&library.recents()), vec![3, 2]);
        assert!(library.recents()[0].added_at > 0);

        assert!(library.toggle_favorite(item(7)));
        assert!(library.is_favorite(7));
        assert!(!library.toggle_favorite(item(7)));
        assert!(library.favorites().is_empty());
    }

    #[test]
    fn test_corrupt_value_reads_as_empty() {
        let store = MemoryStore::new();
        store.set(RECENTS_KEY, "{not json").unwrap();
        let library = Library::new(store);
        assert!(library.recents().is_empty());

        library.upsert_recent(item(4));
        assert_eq!(ids(&library.recents()), vec![4]);
    }

    #[test]
    fn test_malformed_entries_are_skipped_not_the_list() {
        let store = MemoryStore::new();
        store
            .set(
                FAVORITES_KEY,
                r#"[{"id": 1, "title": "A"}, {"id": "7"}, {"id": 1.5}, null, {"id": 2, "title": "B"}]"#,
            )
            .unwrap();
        let library = Library::new(store);
        assert_eq!(ids(&library.favorites()), vec![1, 2]);

        assert!(library.toggle_favorite(item(3)));
        assert_eq!(ids(&library.favorites()), vec![3, 1, 2]);
    }

    #[test]
    fn test_reads_legacy_entries_with_missing_fields() {
        let store = MemoryStore::new();
        store
            .set(FAVORITES_KEY, r#"[{"id": 105, "title": "Back to the Future"}]"#)
            .unwrap();
        let favorites = Library::new(store).favorites();
        assert_eq!(favorites[0].id, 105);
        assert_eq!(favorites[0].poster_url, "");
        assert_eq!(favorites[0].added_at, 0);
    }

    #[test]
    fn test_file_store_persists_and_clears() {
        let dir = TempDir::new().unwrap();
        {
            let library = Library::new(FileStore::new(dir.path()).unwrap());
            library.upsert_recent(item(9));
            library.toggle_favorite(item(9));
        }

        let store = FileStore::new(dir.path()).unwrap();
        assert!(dir.path().join("wtw.recents.json").exists());
        assert!(!dir.path().join("wtw.recents.json.tmp").exists());

        let library = Library::new(store);
        assert_eq!(ids(&library.recents()), vec![9]);
        library.clear_recents();
        library.clear_recents();
        assert!(library.recents().is_empty());
        assert!(library.is_favorite(9));
        library.clear_favorites();
        assert!(library.favorites().is_empty());
    }

    #[test]
    fn test_file_store_rejects_path_keys() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path()).unwrap();
        assert!(store.set("../escape", "[]").is_err());
        assert!(store.get("").is_err());
    }

    #[test]
    fn test_dispatch_persists_reducer_result() {
        let library = Library::new(MemoryStore::new());
        let card = CardInfo::new(603, "The Matrix", "", "1999");

        let instruction = library.dispatch(CardTarget::FavoriteButton(card.clone()));
        assert_eq!(instruction, RenderInstruction::RefreshLibrary { favorite_active: true });
        assert!(library.is_favorite(603));

        let instruction = library.dispatch(CardTarget::Card(card));
        assert_eq!(instruction, RenderInstruction::OpenMovie { id: 603 });
        assert_eq!(ids(&library.recents()), vec![603]);
    }
}
