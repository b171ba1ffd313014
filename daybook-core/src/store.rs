//! JSON document storage.
//!
//! Every collection (tasks, notes, ...) and every singleton document (user,
//! preferences) is one pretty-printed JSON file under the data directory,
//! rewritten whole on each save.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{DaybookError, DaybookResult};

/// Named documents in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
    Tasks,
    Notes,
    Goals,
    Events,
    User,
    Preferences,
}

impl StoreKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKey::Tasks => "tasks",
            StoreKey::Notes => "notes",
            StoreKey::Goals => "goals",
            StoreKey::Events => "events",
            StoreKey::User => "user",
            StoreKey::Preferences => "preferences",
        }
    }

    fn file_name(&self) -> String {
        format!("{}.json", self.as_str())
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Handle to the data directory. Cheap to clone; holds no cached state.
#[derive(Debug, Clone)]
pub struct Store {
    root: PathBuf,
}

impl Store {
    pub fn open(root: impl Into<PathBuf>) -> DaybookResult<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Store { root })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    pub fn document_path(&self, key: StoreKey) -> PathBuf {
        self.root.join(key.file_name())
    }

    /// Read a document. A missing file is `None`; so is a file that no longer
    /// parses, which is logged and left on disk untouched until the next save.
    pub fn read<T: DeserializeOwned>(&self, key: StoreKey) -> DaybookResult<Option<T>> {
        let path = self.document_path(key);

        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path)?;

        match serde_json::from_str(&content) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!(%key, path = %path.display(), error = %e, "malformed document, using default");
                Ok(None)
            }
        }
    }

    /// Write a document atomically (temp file + rename).
    pub fn write<T: Serialize + ?Sized>(&self, key: StoreKey, value: &T) -> DaybookResult<()> {
        let path = self.document_path(key);
        let temp = self.root.join(format!("{}.tmp", key.file_name()));

        let content = serde_json::to_string_pretty(value)?;

        std::fs::write(&temp, content)?;
        std::fs::rename(&temp, &path)?;

        debug!(%key, path = %path.display(), "saved document");
        Ok(())
    }
}

/// An entity stored as one element of a keyed collection.
pub trait Record: Serialize + DeserializeOwned + Clone {
    const KEY: StoreKey;
    /// Singular noun used in messages ("task", "note", ...).
    const KIND: &'static str;

    fn id(&self) -> Uuid;
}

/// Outcome of merging imported records into a collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub added: usize,
    pub replaced: usize,
}

/// In-memory mirror of one stored collection.
#[derive(Debug, Clone)]
pub struct Collection<T: Record> {
    items: Vec<T>,
}

impl<T: Record> Default for Collection<T> {
    fn default() -> Self {
        Collection { items: Vec::new() }
    }
}

impl<T: Record> Collection<T> {
    pub fn new(items: Vec<T>) -> Self {
        Collection { items }
    }

    pub fn load(store: &Store) -> DaybookResult<Self> {
        let items: Vec<T> = store.read(T::KEY)?.unwrap_or_default();
        debug!(key = %T::KEY, count = items.len(), "loaded collection");
        Ok(Collection { items })
    }

    pub fn save(&self, store: &Store) -> DaybookResult<()> {
        store.write(T::KEY, &self.items)
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn get_mut(&mut self, id: Uuid) -> Option<&mut T> {
        self.items.iter_mut().find(|item| item.id() == id)
    }

    pub fn push(&mut self, item: T) -> &T {
        self.items.push(item);
        &self.items[self.items.len() - 1]
    }

    pub fn remove(&mut self, id: Uuid) -> Option<T> {
        let index = self.items.iter().position(|item| item.id() == id)?;
        Some(self.items.remove(index))
    }

    /// Keep only the items matching `keep`. Returns how many were dropped.
    pub fn retain(&mut self, keep: impl FnMut(&T) -> bool) -> usize {
        let before = self.items.len();
        self.items.retain(keep);
        before - self.items.len()
    }

    /// Find the single record whose id starts with `prefix` (case-insensitive).
    pub fn resolve(&self, prefix: &str) -> DaybookResult<Uuid> {
        let needle = prefix.trim().to_ascii_lowercase();
        let not_found = || DaybookError::NotFound {
            kind: T::KIND,
            id: prefix.to_string(),
        };

        if needle.is_empty() {
            return Err(not_found());
        }

        let mut matches = self
            .items
            .iter()
            .map(|item| item.id())
            .filter(|id| id.to_string().starts_with(&needle));

        match (matches.next(), matches.next()) {
            (Some(id), None) => Ok(id),
            (Some(_), Some(_)) => Err(DaybookError::Ambiguous {
                kind: T::KIND,
                id: prefix.to_string(),
            }),
            (None, _) => Err(not_found()),
        }
    }

    /// Merge records by id: known ids are replaced in place, unknown ids are
    /// appended in input order. Importing the same records twice is a no-op
    /// the second time.
    pub fn import(&mut self, incoming: Vec<T>) -> ImportSummary {
        let mut summary = ImportSummary::default();

        for record in incoming {
            match self.get_mut(record.id()) {
                Some(existing) => {
                    *existing = record;
                    summary.replaced += 1;
                }
                None => {
                    self.items.push(record);
                    summary.added += 1;
                }
            }
        }

        debug!(
            key = %T::KEY,
            added = summary.added,
            replaced = summary.replaced,
            "imported records"
        );
        summary
    }

    pub fn import_json(&mut self, json: &str) -> DaybookResult<ImportSummary> {
        let incoming: Vec<T> = serde_json::from_str(json)?;
        Ok(self.import(incoming))
    }

    pub fn export_json(&self) -> DaybookResult<String> {
        Ok(serde_json::to_string_pretty(&self.items)?)
    }
}

impl<'a, T: Record> IntoIterator for &'a Collection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Item {
        id: Uuid,
        label: String,
    }

    impl Record for Item {
        const KEY: StoreKey = StoreKey::Notes;
        const KIND: &'static str = "item";

        fn id(&self) -> Uuid {
            self.id
        }
    }

    fn item(label: &str) -> Item {
        Item {
            id: Uuid::new_v4(),
            label: label.to_string(),
        }
    }

    #[test]
    fn missing_document_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();

        let collection = Collection::<Item>::load(&store).unwrap();
        assert!(collection.is_empty());
    }

    #[test]
    fn malformed_document_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        std::fs::write(store.document_path(StoreKey::Notes), "{not json").unwrap();

        let collection = Collection::<Item>::load(&store).unwrap();
        assert!(collection.is_empty());
    }

    #[test]
    fn save_then_load_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();

        let mut collection = Collection::<Item>::default();
        collection.push(item("a"));
        collection.push(item("b"));
        collection.save(&store).unwrap();

        let loaded = Collection::<Item>::load(&store).unwrap();
        assert_eq!(loaded.items(), collection.items());
        assert!(!store.path().join("notes.json.tmp").exists());
    }

    #[test]
    fn import_twice_does_not_duplicate() {
        let original = vec![item("a"), item("b")];
        let json = Collection::new(original.clone()).export_json().unwrap();

        let mut target = Collection::<Item>::default();
        let first = target.import_json(&json).unwrap();
        let second = target.import_json(&json).unwrap();

        assert_eq!(first, ImportSummary { added: 2, replaced: 0 });
        assert_eq!(second, ImportSummary { added: 0, replaced: 2 });
        assert_eq!(target.items(), original.as_slice());
    }

    #[test]
    fn import_replaces_known_ids() {
        let a = item("a");
        let mut collection = Collection::new(vec![a.clone()]);

        let mut edited = a.clone();
        edited.label = "a2".to_string();
        let summary = collection.import(vec![edited, item("c")]);

        assert_eq!(summary, ImportSummary { added: 1, replaced: 1 });
        assert_eq!(collection.get(a.id).unwrap().label, "a2");
        assert_eq!(collection.len(), 2);
    }

    #[test]
    fn resolve_by_prefix() {
        let a = item("a");
        let collection = Collection::new(vec![a.clone()]);

        let prefix = &a.id.to_string()[..8];
        assert_eq!(collection.resolve(prefix).unwrap(), a.id);
        assert_eq!(
            collection.resolve(&prefix.to_uppercase()).unwrap(),
            a.id
        );
        assert!(matches!(
            collection.resolve("zzzz"),
            Err(DaybookError::NotFound { .. })
        ));
        assert!(matches!(
            collection.resolve(""),
            Err(DaybookError::NotFound { .. })
        ));
    }

    #[test]
    fn remove_and_retain() {
        let a = item("a");
        let mut collection = Collection::new(vec![a.clone(), item("b"), item("c")]);

        assert_eq!(collection.remove(a.id).map(|i| i.label), Some("a".to_string()));
        assert!(collection.remove(a.id).is_none());
        assert_eq!(collection.retain(|i| i.label != "b"), 1);
        assert_eq!(collection.len(), 1);
    }
}
