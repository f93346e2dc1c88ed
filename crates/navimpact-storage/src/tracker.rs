use std::collections::HashSet;

use chrono::{DateTime, Utc};
use navimpact_core::Grant;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::kv::KeyValueStore;

pub const STORAGE_PREFIX: &str = "navimpact_";
pub const SAVED_GRANTS_KEY: &str = "navimpact_saved_grants";
pub const PREFERENCES_KEY: &str = "navimpact_user_preferences";
pub const VIEWED_GRANTS_KEY: &str = "navimpact_viewed_grants";
pub const COMPARISON_HISTORY_KEY: &str = "navimpact_comparison_history";

pub const MAX_VIEWED_GRANTS: usize = 50;
pub const MAX_COMPARISONS: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedGrant {
    pub grant: Grant,
    pub saved_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonEntry {
    pub grant_ids: Vec<String>,
    pub compared_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    #[serde(default)]
    pub favorite_categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_amount: Option<f64>,
    #[serde(default = "default_true")]
    pub email_notifications: bool,
    #[serde(default = "default_reminder_days")]
    pub deadline_reminder_days: u32,
}

const fn default_true() -> bool {
    true
}

const fn default_reminder_days() -> u32 {
    7
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            favorite_categories: Vec::new(),
            min_amount: None,
            max_amount: None,
            email_notifications: default_true(),
            deadline_reminder_days: default_reminder_days(),
        }
    }
}

/// Everything the tracker persists, as one portable document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerSnapshot {
    #[serde(default)]
    pub saved_grants: Vec<SavedGrant>,
    #[serde(default)]
    pub viewed_grants: Vec<String>,
    #[serde(default)]
    pub comparison_history: Vec<ComparisonEntry>,
    #[serde(default)]
    pub preferences: Option<UserPreferences>,
    pub exported_at: DateTime<Utc>,
}

/// Saved, viewed and compared grants plus user preferences, kept in a
/// [`KeyValueStore`] as one JSON value per key. Lists are newest first.
pub struct GrantTracker {
    store: Box<dyn KeyValueStore>,
}

impl GrantTracker {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn save_grant(&mut self, grant: Grant) -> Result<bool, StorageError> {
        logged("save_grant", self.save_grant_inner(grant))
    }

    fn save_grant_inner(&mut self, grant: Grant) -> Result<bool, StorageError> {
        require_id(&grant.id)?;
        let mut saved: Vec<SavedGrant> = self.read(SAVED_GRANTS_KEY)?;
        if saved.iter().any(|s| s.grant.id == grant.id) {
            return Ok(false);
        }
        saved.insert(
            0,
            SavedGrant {
                grant,
                saved_at: Utc::now(),
            },
        );
        self.write(SAVED_GRANTS_KEY, &saved)?;
        Ok(true)
    }

    pub fn remove_saved_grant(&mut self, id: &str) -> Result<bool, StorageError> {
        logged("remove_saved_grant", self.remove_saved_inner(id))
    }

    fn remove_saved_inner(&mut self, id: &str) -> Result<bool, StorageError> {
        let mut saved: Vec<SavedGrant> = self.read(SAVED_GRANTS_KEY)?;
        let before = saved.len();
        saved.retain(|s| s.grant.id != id);
        if saved.len() == before {
            return Ok(false);
        }
        self.write(SAVED_GRANTS_KEY, &saved)?;
        Ok(true)
    }

    pub fn is_saved(&self, id: &str) -> Result<bool, StorageError> {
        let saved: Result<Vec<SavedGrant>, _> = self.read(SAVED_GRANTS_KEY);
        logged("is_saved", saved.map(|s| s.iter().any(|g| g.grant.id == id)))
    }

    pub fn saved_grants(&self) -> Result<Vec<SavedGrant>, StorageError> {
        logged("saved_grants", self.read(SAVED_GRANTS_KEY))
    }

    /// Moves `id` to the front of the viewed list, evicting the oldest
    /// entries past [`MAX_VIEWED_GRANTS`].
    pub fn record_view(&mut self, id: &str) -> Result<(), StorageError> {
        logged("record_view", self.record_view_inner(id))
    }

    fn record_view_inner(&mut self, id: &str) -> Result<(), StorageError> {
        require_id(id)?;
        let mut viewed: Vec<String> = self.read(VIEWED_GRANTS_KEY)?;
        viewed.retain(|v| v != id);
        viewed.insert(0, id.to_string());
        viewed.truncate(MAX_VIEWED_GRANTS);
        self.write(VIEWED_GRANTS_KEY, &viewed)
    }

    pub fn viewed_grants(&self) -> Result<Vec<String>, StorageError> {
        logged("viewed_grants", self.read(VIEWED_GRANTS_KEY))
    }

    pub fn clear_viewed(&mut self) -> Result<(), StorageError> {
        logged("clear_viewed", self.store.remove(VIEWED_GRANTS_KEY).map(|_| ()))
    }

    pub fn add_comparison(&mut self, grant_ids: Vec<String>) -> Result<ComparisonEntry, StorageError> {
        logged("add_comparison", self.add_comparison_inner(grant_ids))
    }

    fn add_comparison_inner(
        &mut self,
        grant_ids: Vec<String>,
    ) -> Result<ComparisonEntry, StorageError> {
        check_comparison(&grant_ids)?;

        let entry = ComparisonEntry {
            grant_ids,
            compared_at: Utc::now(),
        };
        let mut history: Vec<ComparisonEntry> = self.read(COMPARISON_HISTORY_KEY)?;
        history.insert(0, entry.clone());
        history.truncate(MAX_COMPARISONS);
        self.write(COMPARISON_HISTORY_KEY, &history)?;
        Ok(entry)
    }

    pub fn comparisons(&self) -> Result<Vec<ComparisonEntry>, StorageError> {
        logged("comparisons", self.read(COMPARISON_HISTORY_KEY))
    }

    pub fn clear_comparisons(&mut self) -> Result<(), StorageError> {
        logged(
            "clear_comparisons",
            self.store.remove(COMPARISON_HISTORY_KEY).map(|_| ()),
        )
    }

    pub fn preferences(&self) -> Result<UserPreferences, StorageError> {
        let stored: Result<Option<UserPreferences>, _> = self.read_opt(PREFERENCES_KEY);
        logged("preferences", stored.map(Option::unwrap_or_default))
    }

    pub fn set_preferences(&mut self, preferences: &UserPreferences) -> Result<(), StorageError> {
        logged("set_preferences", self.write(PREFERENCES_KEY, preferences))
    }

    pub fn export_snapshot(&self) -> Result<TrackerSnapshot, StorageError> {
        logged("export_snapshot", self.export_inner())
    }

    fn export_inner(&self) -> Result<TrackerSnapshot, StorageError> {
        Ok(TrackerSnapshot {
            saved_grants: self.read(SAVED_GRANTS_KEY)?,
            viewed_grants: self.read(VIEWED_GRANTS_KEY)?,
            comparison_history: self.read(COMPARISON_HISTORY_KEY)?,
            preferences: self.read_opt(PREFERENCES_KEY)?,
            exported_at: Utc::now(),
        })
    }

    /// Replaces all tracked state with `snapshot`. Ids are validated and
    /// deduplicated (first occurrence wins) and the list limits applied before
    /// anything is written; a failed write restores the previous values.
    pub fn import_snapshot(&mut self, snapshot: TrackerSnapshot) -> Result<(), StorageError> {
        logged("import_snapshot", self.import_inner(snapshot))
    }

    fn import_inner(&mut self, snapshot: TrackerSnapshot) -> Result<(), StorageError> {
        let TrackerSnapshot {
            mut saved_grants,
            viewed_grants,
            mut comparison_history,
            preferences,
            ..
        } = snapshot;

        for saved in &saved_grants {
            require_id(&saved.grant.id)?;
        }
        for id in &viewed_grants {
            require_id(id)?;
        }
        for entry in &comparison_history {
            check_comparison(&entry.grant_ids)?;
        }

        let mut seen = HashSet::new();
        saved_grants.retain(|s| seen.insert(s.grant.id.clone()));
        let mut seen = HashSet::new();
        let mut viewed: Vec<String> = viewed_grants
            .into_iter()
            .filter(|id| seen.insert(id.clone()))
            .collect();
        viewed.truncate(MAX_VIEWED_GRANTS);
        comparison_history.truncate(MAX_COMPARISONS);

        let staged = vec![
            (SAVED_GRANTS_KEY, Some(serde_json::to_string(&saved_grants)?)),
            (VIEWED_GRANTS_KEY, Some(serde_json::to_string(&viewed)?)),
            (
                COMPARISON_HISTORY_KEY,
                Some(serde_json::to_string(&comparison_history)?),
            ),
            (
                PREFERENCES_KEY,
                preferences.as_ref().map(serde_json::to_string).transpose()?,
            ),
        ];
        let previous = staged
            .iter()
            .map(|(key, _)| Ok((*key, self.store.get(key)?)))
            .collect::<Result<Vec<_>, StorageError>>()?;

        if let Err(err) = self.apply(staged) {
            if let Err(restore) = self.apply(previous) {
                tracing::warn!(error = %restore, "could not restore tracker state after failed import");
            }
            return Err(err);
        }
        Ok(())
    }

    fn apply(&mut self, values: Vec<(&'static str, Option<String>)>) -> Result<(), StorageError> {
        for (key, value) in values {
            match value {
                Some(raw) => self.store.set(key, raw)?,
                None => {
                    self.store.remove(key)?;
                }
            }
        }
        Ok(())
    }

    pub fn clear_all(&mut self) -> Result<(), StorageError> {
        let keys: Vec<String> = self
            .store
            .keys()
            .into_iter()
            .filter(|k| k.starts_with(STORAGE_PREFIX))
            .collect();
        for key in keys {
            logged("clear_all", self.store.remove(&key))?;
        }
        Ok(())
    }

    fn read<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T, StorageError> {
        Ok(self.read_opt(key)?.unwrap_or_default())
    }

    fn read_opt<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        match self.store.get(key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn write<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value)?;
        self.store.set(key, raw)
    }
}

fn require_id(id: &str) -> Result<(), StorageError> {
    if id.trim().is_empty() {
        return Err(StorageError::InvalidInput(
            "grant id cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn check_comparison(grant_ids: &[String]) -> Result<(), StorageError> {
    if grant_ids.len() < 2 {
        return Err(StorageError::InvalidInput(
            "a comparison needs at least two grants".to_string(),
        ));
    }
    grant_ids.iter().try_for_each(|id| require_id(id))
}

fn logged<T>(op: &'static str, result: Result<T, StorageError>) -> Result<T, StorageError> {
    if let Err(err) = &result {
        tracing::warn!(op, error = %err, "grant tracker operation failed");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryKeyValueStore;

    fn tracker() -> GrantTracker {
        GrantTracker::new(Box::new(MemoryKeyValueStore::new()))
    }

    #[test]
    fn save_is_idempotent_and_newest_first() {
        let mut tracker = tracker();
        assert!(tracker.save_grant(Grant::new("g-1", "One")).expect("save g-1"));
        assert!(tracker.save_grant(Grant::new("g-2", "Two")).expect("save g-2"));
        assert!(!tracker.save_grant(Grant::new("g-1", "One again")).expect("resave g-1"));

        let ids: Vec<String> = tracker
            .saved_grants()
            .expect("saved")
            .into_iter()
            .map(|s| s.grant.id)
            .collect();
        assert_eq!(ids, vec!["g-2", "g-1"]);
    }

    #[test]
    fn viewing_again_moves_to_front() {
        let mut tracker = tracker();
        for id in ["a", "b", "c"] {
            tracker.record_view(id).expect("record view");
        }
        tracker.record_view("a").expect("record again");

        assert_eq!(tracker.viewed_grants().expect("viewed"), vec!["a", "c", "b"]);
    }

    #[test]
    fn comparison_history_is_capped() {
        let mut tracker = tracker();
        for i in 0..25 {
            tracker
                .add_comparison(vec![format!("g-{i}"), format!("h-{i}")])
                .expect("add comparison");
        }

        let history = tracker.comparisons().expect("history");
        assert_eq!(history.len(), MAX_COMPARISONS);
        assert_eq!(history.first().map(|c| c.grant_ids[0].as_str()), Some("g-24"));
        assert_eq!(history.last().map(|c| c.grant_ids[0].as_str()), Some("g-5"));
    }

    #[test]
    fn single_grant_comparison_is_rejected() {
        let mut tracker = tracker();
        let err = tracker.add_comparison(vec!["g-1".to_string()]).err();
        assert!(matches!(err, Some(StorageError::InvalidInput(_))));
        assert!(tracker.comparisons().expect("history").is_empty());
    }

    #[test]
    fn preferences_default_until_set() {
        let mut tracker = tracker();
        assert_eq!(tracker.preferences().expect("defaults"), UserPreferences::default());

        let prefs = UserPreferences {
            favorite_categories: vec!["arts".to_string()],
            min_amount: Some(5000.0),
            email_notifications: false,
            ..UserPreferences::default()
        };
        tracker.set_preferences(&prefs).expect("set prefs");
        assert_eq!(tracker.preferences().expect("prefs"), prefs);
    }

    #[test]
    fn corrupt_value_surfaces_as_error() {
        let mut store = MemoryKeyValueStore::new();
        store
            .set(SAVED_GRANTS_KEY, "{broken".to_string())
            .expect("seed garbage");
        let tracker = GrantTracker::new(Box::new(store));

        assert!(matches!(tracker.is_saved("g-1"), Err(StorageError::Serde(_))));
    }

    #[test]
    fn clear_all_only_touches_namespaced_keys() {
        let mut store = MemoryKeyValueStore::new();
        store.set("other_app", "keep".to_string()).expect("seed");
        let mut tracker = GrantTracker::new(Box::new(store));
        tracker.record_view("g-1").expect("view");
        tracker.save_grant(Grant::new("g-1", "One")).expect("save");

        tracker.clear_all().expect("clear");
        assert!(tracker.viewed_grants().expect("viewed").is_empty());
        assert!(!tracker.is_saved("g-1").expect("is saved"));
        assert_eq!(tracker.store.keys(), vec!["other_app".to_string()]);
    }
}
