use chrono::Utc;
use tracing::{debug, warn};
use truthtracer_schema::{generate_fact_id, FactResult};

use crate::storage::Storage;

/// Storage key holding the saved results as one JSON array.
pub const RESULTS_KEY: &str = "factResult";

/// Saved results kept; older entries are evicted on save.
pub const MAX_SAVED_RESULTS: usize = 5;

/// Bounded, most-recent-first cache of saved analysis results.
///
/// None of these calls fail. An unreadable or unwritable backing store
/// behaves like an empty one, and writes to it are dropped.
pub trait ResultStore: Send + Sync {
    /// Saved results, newest first.
    fn list(&self) -> Vec<FactResult>;

    /// Prepend `result` and keep only the newest [`MAX_SAVED_RESULTS`].
    ///
    /// The caller assigns the id. A result whose id is already stored is
    /// ignored rather than overwriting the existing entry.
    fn save(&self, result: FactResult);

    fn remove_by_id(&self, id: &str);

    /// Drop every saved result.
    fn clear(&self);

    fn find_by_id(&self, id: &str) -> Option<FactResult> {
        self.list()
            .into_iter()
            .find(|result| result.id.as_deref() == Some(id))
    }

    /// Assign an id and save timestamp where missing, save, and return what was stored.
    fn save_new(&self, mut result: FactResult) -> FactResult {
        if result.id.is_none() {
            result.id = Some(generate_fact_id());
        }
        result.stamp_if_missing(Utc::now());
        self.save(result.clone());
        result
    }

    fn len(&self) -> usize {
        self.list().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// [`ResultStore`] over any key-value [`Storage`].
pub struct LocalResultStore<S> {
    storage: S,
}

impl<S: Storage> LocalResultStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn read(&self) -> Vec<FactResult> {
        let raw = match self.storage.get_item(RESULTS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(error) => {
                debug!(%error, "result storage unavailable, treating as empty");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<FactResult>>(&raw) {
            Ok(results) => results,
            Err(error) => {
                debug!(%error, "saved results are corrupt, treating as empty");
                Vec::new()
            }
        }
    }

    fn write(&self, results: &[FactResult]) {
        let json = match serde_json::to_string(results) {
            Ok(json) => json,
            Err(error) => {
                debug!(%error, "failed to serialize saved results");
                return;
            }
        };
        if let Err(error) = self.storage.set_item(RESULTS_KEY, &json) {
            debug!(%error, "failed to persist saved results");
        }
    }
}

impl<S: Storage> ResultStore for LocalResultStore<S> {
    fn list(&self) -> Vec<FactResult> {
        self.read()
    }

    fn save(&self, mut result: FactResult) {
        let id = match result.id.clone() {
            Some(id) => id,
            None => {
                let id = generate_fact_id();
                debug!(%id, "assigned id to unsaved result");
                result.id = Some(id.clone());
                id
            }
        };

        let existing = self.read();
        if existing.iter().any(|r| r.id.as_deref() == Some(id.as_str())) {
            warn!(%id, "result already saved, keeping the stored entry");
            return;
        }

        let mut updated = Vec::with_capacity(existing.len() + 1);
        updated.push(result);
        updated.extend(existing);
        updated.truncate(MAX_SAVED_RESULTS);
        self.write(&updated);
    }

    fn remove_by_id(&self, id: &str) {
        let mut results = self.read();
        results.retain(|r| r.id.as_deref() != Some(id));
        self.write(&results);
    }

    fn clear(&self) {
        if let Err(error) = self.storage.remove_item(RESULTS_KEY) {
            debug!(%error, "failed to clear saved results");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileStorage, MemoryStorage, Storage, UnavailableStorage};

    fn result(id: &str, claim: &str) -> FactResult {
        FactResult {
            id: Some(id.to_owned()),
            ..FactResult::new(claim)
        }
    }

    fn ids(store: &impl ResultStore) -> Vec<String> {
        store
            .list()
            .into_iter()
            .filter_map(|r| r.id)
            .collect()
    }

    #[test]
    fn empty_store_lists_nothing() {
        let store = LocalResultStore::new(MemoryStorage::new());
        assert!(store.list().is_empty());
        assert!(store.is_empty());
        assert_eq!(store.find_by_id("f1"), None);
    }

    #[test]
    fn newest_save_comes_first() {
        let store = LocalResultStore::new(MemoryStorage::new());
        store.save(result("a", "first"));
        store.save(result("b", "second"));
        assert_eq!(ids(&store), vec!["b", "a"]);
    }

    #[test]
    fn sky_and_earth_scenario() {
        let store = LocalResultStore::new(MemoryStorage::new());
        store.save(result("f1", "The sky is blue."));
        store.save(result("f2", "The earth is flat."));

        assert_eq!(ids(&store), vec!["f2", "f1"]);
        let found = store.find_by_id("f1").unwrap();
        assert_eq!(found.claim.as_deref(), Some("The sky is blue."));
    }

    #[test]
    fn sixth_save_evicts_the_oldest() {
        let store = LocalResultStore::new(MemoryStorage::new());
        for i in 1..=5 {
            store.save(result(&format!("f{i}"), "claim"));
        }
        assert_eq!(store.len(), 5);

        store.save(result("f6", "claim"));
        assert_eq!(ids(&store), vec!["f6", "f5", "f4", "f3", "f2"]);
        assert_eq!(store.find_by_id("f1"), None);
    }

    #[test]
    fn length_never_exceeds_cap() {
        let store = LocalResultStore::new(MemoryStorage::new());
        for i in 0..12 {
            store.save(result(&format!("f{i}"), "claim"));
            let listed = ids(&store);
            assert!(listed.len() <= MAX_SAVED_RESULTS);
            assert_eq!(listed[0], format!("f{i}"));
        }
    }

    #[test]
    fn duplicate_id_is_not_overwritten() {
        let store = LocalResultStore::new(MemoryStorage::new());
        store.save(result("f1", "original"));
        store.save(result("f1", "replacement"));

        assert_eq!(store.len(), 1);
        assert_eq!(
            store.find_by_id("f1").unwrap().claim.as_deref(),
            Some("original")
        );
    }

    #[test]
    fn save_without_id_assigns_one() {
        let store = LocalResultStore::new(MemoryStorage::new());
        store.save(FactResult::new("anonymous"));
        let listed = store.list();
        assert_eq!(listed.len(), 1);
        assert!(listed[0].id.as_deref().unwrap().starts_with("fact_"));
    }

    #[test]
    fn save_new_returns_the_stored_record() {
        let store = LocalResultStore::new(MemoryStorage::new());
        let saved = store.save_new(FactResult::new("c"));
        let id = saved.id.clone().unwrap();
        assert!(saved.saved_at().is_some());
        assert_eq!(store.find_by_id(&id), Some(saved));
    }

    #[test]
    fn remove_by_id_then_find_is_none() {
        let store = LocalResultStore::new(MemoryStorage::new());
        store.save(result("f1", "a"));
        store.save(result("f2", "b"));

        store.remove_by_id("f1");
        assert_eq!(store.find_by_id("f1"), None);
        assert_eq!(ids(&store), vec!["f2"]);

        store.remove_by_id("missing");
        assert_eq!(ids(&store), vec!["f2"]);
    }

    #[test]
    fn clear_deletes_the_key() {
        let store = LocalResultStore::new(MemoryStorage::new());
        store.save(result("f1", "a"));
        store.clear();
        assert!(store.list().is_empty());
        assert_eq!(store.storage().get_item(RESULTS_KEY).unwrap(), None);

        store.clear();
        assert!(store.list().is_empty());
    }

    #[test]
    fn corrupt_blob_reads_as_empty() {
        let storage = MemoryStorage::new();
        storage.set_item(RESULTS_KEY, "{not json").unwrap();
        let store = LocalResultStore::new(storage);

        assert!(store.list().is_empty());
        store.save(result("f1", "recovered"));
        assert_eq!(ids(&store), vec!["f1"]);
    }

    #[test]
    fn unavailable_storage_degrades_silently() {
        let store = LocalResultStore::new(UnavailableStorage);
        store.save(result("f1", "lost"));
        assert!(store.list().is_empty());
        assert_eq!(store.find_by_id("f1"), None);
        store.remove_by_id("f1");
        store.clear();
    }

    #[test]
    fn file_backed_store_persists_across_instances() {
        let tmp = tempfile::tempdir().unwrap();
        {
            let store = LocalResultStore::new(FileStorage::new(tmp.path()));
            store.save(result("f1", "The sky is blue."));
            store.save(result("f2", "The earth is flat."));
        }

        let reopened = LocalResultStore::new(FileStorage::new(tmp.path()));
        assert_eq!(ids(&reopened), vec!["f2", "f1"]);

        let raw = std::fs::read_to_string(tmp.path().join("factResult.json")).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed[0]["id"], "f2");
        assert_eq!(parsed[1]["claim"], "The sky is blue.");
    }
}
