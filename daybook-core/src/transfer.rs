//! Import/export of single collections and whole-store backups.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::date_range::now;
use crate::error::DaybookResult;
use crate::event::Event;
use crate::goal::Goal;
use crate::keyword::keyword_enum;
use crate::note::Note;
use crate::profile::UserProfile;
use crate::store::{Collection, ImportSummary, Record, Store, StoreKey};
use crate::task::Task;

/// A collection that can be exported and imported on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionKind {
    Tasks,
    Notes,
    Goals,
    Events,
}

keyword_enum!(CollectionKind, "collection", {
    Tasks => "tasks",
    Notes => "notes",
    Goals => "goals",
    Events => "events",
});

impl CollectionKind {
    /// The stored collection as a pretty-printed JSON array.
    pub fn export(&self, store: &Store) -> DaybookResult<String> {
        match self {
            CollectionKind::Tasks => export_collection::<Task>(store),
            CollectionKind::Notes => export_collection::<Note>(store),
            CollectionKind::Goals => export_collection::<Goal>(store),
            CollectionKind::Events => export_collection::<Event>(store),
        }
    }

    /// Merge a JSON array into the stored collection by id.
    pub fn import(&self, store: &Store, json: &str) -> DaybookResult<ImportSummary> {
        match self {
            CollectionKind::Tasks => import_collection::<Task>(store, json),
            CollectionKind::Notes => import_collection::<Note>(store, json),
            CollectionKind::Goals => import_collection::<Goal>(store, json),
            CollectionKind::Events => import_collection::<Event>(store, json),
        }
    }
}

pub fn export_collection<T: Record>(store: &Store) -> DaybookResult<String> {
    Collection::<T>::load(store)?.export_json()
}

/// A file that fails to parse returns before anything is saved.
pub fn import_collection<T: Record>(store: &Store, json: &str) -> DaybookResult<ImportSummary> {
    let mut collection = Collection::<T>::load(store)?;
    let summary = collection.import_json(json)?;
    collection.save(store)?;

    Ok(summary)
}

/// Everything in the store in one document. Absent keys are skipped on restore.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Backup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tasks: Option<Vec<Task>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<Vec<Note>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goals: Option<Vec<Goal>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events: Option<Vec<Event>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exported_at: Option<NaiveDateTime>,
}

impl Backup {
    /// Snapshot the store. Collections are always present, possibly empty.
    pub fn collect(store: &Store) -> DaybookResult<Self> {
        Ok(Backup {
            user: Some(store.read(StoreKey::User)?.unwrap_or_default()),
            tasks: Some(Collection::<Task>::load(store)?.items().to_vec()),
            notes: Some(Collection::<Note>::load(store)?.items().to_vec()),
            goals: Some(Collection::<Goal>::load(store)?.items().to_vec()),
            events: Some(Collection::<Event>::load(store)?.items().to_vec()),
            exported_at: Some(now()),
        })
    }

    pub fn to_json(&self) -> DaybookResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> DaybookResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Overwrite every key present in the backup. Returns the keys written.
    pub fn restore(&self, store: &Store) -> DaybookResult<Vec<StoreKey>> {
        let mut restored = Vec::new();

        if let Some(user) = &self.user {
            store.write(StoreKey::User, user)?;
            restored.push(StoreKey::User);
        }
        if let Some(tasks) = &self.tasks {
            store.write(Task::KEY, tasks)?;
            restored.push(Task::KEY);
        }
        if let Some(notes) = &self.notes {
            store.write(Note::KEY, notes)?;
            restored.push(Note::KEY);
        }
        if let Some(goals) = &self.goals {
            store.write(Goal::KEY, goals)?;
            restored.push(Goal::KEY);
        }
        if let Some(events) = &self.events {
            store.write(Event::KEY, events)?;
            restored.push(Event::KEY);
        }

        debug!(keys = restored.len(), "restored backup");
        Ok(restored)
    }
}
