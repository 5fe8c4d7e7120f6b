/// Local persistence adapter for guest mode
///
/// Each entity kind is kept as one serialized JSON blob under a fixed storage
/// key in the store's data directory. Every mutation deserializes the whole
/// collection, applies the change and rewrites the file, so the adapter is
/// only safe under the session's one-operation-at-a-time discipline; callers
/// adding any concurrent access must add their own mutual exclusion first.
///
/// Ids are derived from the millisecond wall clock at creation time (the same
/// shape the server never sees, since guest data never leaves the machine);
/// the value is bumped until it is unique within the loaded collection.
///
/// A missing or unreadable blob degrades to an empty collection instead of
/// failing the adapter; the corrupt content is discarded on the next write.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::domain::{
    Identity, ReadingReminder, ReminderDraft, ReminderPatch, Task, TaskDraft, TaskPatch,
};
use crate::store::{EntityStore, StoreError, REMINDERS_KEY, TASKS_KEY};

/// Blob-per-collection store rooted at a data directory
///
/// Guest mode has exactly one implicit identity, so the blobs are not
/// partitioned by owner and the `owner` argument is ignored.
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    /// Open (and create if needed) the data directory
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        tracing::info!("Local store initialized at: {}", root.display());
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn blob_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }

    /// Read the full collection for a storage key
    ///
    /// Missing file and corrupt content both come back as an empty
    /// collection; only a real I/O failure propagates.
    fn load_collection<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>, StoreError> {
        let path = self.blob_path(key);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        match serde_json::from_str(&raw) {
            Ok(items) => Ok(items),
            Err(err) => {
                tracing::warn!(
                    "Unreadable blob at {}, treating collection as empty: {}",
                    path.display(),
                    err
                );
                Ok(Vec::new())
            }
        }
    }

    /// Rewrite the full collection for a storage key
    fn save_collection<T: Serialize>(&self, key: &str, items: &[T]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(items)?;
        fs::write(self.blob_path(key), raw)?;
        Ok(())
    }

    /// Millisecond-clock id, bumped past any value already in the collection
    fn next_id<'a>(existing: impl Iterator<Item = &'a str> + Clone) -> String {
        let mut millis = Utc::now().timestamp_millis();
        loop {
            let candidate = millis.to_string();
            if !existing.clone().any(|id| id == candidate) {
                return candidate;
            }
            millis += 1;
        }
    }
}

#[async_trait]
impl EntityStore for LocalStore {
    async fn list_tasks(&self, _owner: &Identity) -> Result<Vec<Task>, StoreError> {
        let mut tasks: Vec<Task> = self.load_collection(TASKS_KEY)?;
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(tasks)
    }

    async fn create_task(&self, _owner: &Identity, draft: &TaskDraft) -> Result<Task, StoreError> {
        let mut tasks: Vec<Task> = self.load_collection(TASKS_KEY)?;
        let id = Self::next_id(tasks.iter().map(|t| t.id.as_str()));
        let task = Task::from_draft(id, draft, Utc::now());
        tasks.insert(0, task.clone());
        self.save_collection(TASKS_KEY, &tasks)?;
        tracing::debug!("Created local task {} ({})", task.title, task.id);
        Ok(task)
    }

    async fn update_task(
        &self,
        _owner: &Identity,
        id: &str,
        patch: &TaskPatch,
    ) -> Result<Task, StoreError> {
        let mut tasks: Vec<Task> = self.load_collection(TASKS_KEY)?;
        let task = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| StoreError::NotFound {
                kind: "task",
                id: id.to_string(),
            })?;
        task.apply_patch(patch);
        task.updated_at = Utc::now();
        let updated = task.clone();
        self.save_collection(TASKS_KEY, &tasks)?;
        Ok(updated)
    }

    async fn delete_task(&self, _owner: &Identity, id: &str) -> Result<(), StoreError> {
        let mut tasks: Vec<Task> = self.load_collection(TASKS_KEY)?;
        let before = tasks.len();
        tasks.retain(|t| t.id != id);
        if tasks.len() == before {
            return Err(StoreError::NotFound {
                kind: "task",
                id: id.to_string(),
            });
        }
        self.save_collection(TASKS_KEY, &tasks)?;
        tracing::debug!("Deleted local task {}", id);
        Ok(())
    }

    async fn list_reminders(&self, _owner: &Identity) -> Result<Vec<ReadingReminder>, StoreError> {
        let mut reminders: Vec<ReadingReminder> = self.load_collection(REMINDERS_KEY)?;
        reminders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(reminders)
    }

    async fn create_reminder(
        &self,
        _owner: &Identity,
        draft: &ReminderDraft,
        surah_name: &str,
    ) -> Result<ReadingReminder, StoreError> {
        let mut reminders: Vec<ReadingReminder> = self.load_collection(REMINDERS_KEY)?;
        let id = Self::next_id(reminders.iter().map(|r| r.id.as_str()));
        let reminder =
            ReadingReminder::from_draft(id, draft, surah_name.to_string(), Utc::now());
        reminders.insert(0, reminder.clone());
        self.save_collection(REMINDERS_KEY, &reminders)?;
        tracing::debug!(
            "Created local reminder for surah {} ({})",
            reminder.surah_name,
            reminder.id
        );
        Ok(reminder)
    }

    async fn update_reminder(
        &self,
        _owner: &Identity,
        id: &str,
        patch: &ReminderPatch,
    ) -> Result<ReadingReminder, StoreError> {
        let mut reminders: Vec<ReadingReminder> = self.load_collection(REMINDERS_KEY)?;
        let reminder = reminders
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| StoreError::NotFound {
                kind: "reminder",
                id: id.to_string(),
            })?;
        reminder.apply_patch(patch);
        reminder.updated_at = Utc::now();
        let updated = reminder.clone();
        self.save_collection(REMINDERS_KEY, &reminders)?;
        Ok(updated)
    }

    async fn delete_reminder(&self, _owner: &Identity, id: &str) -> Result<(), StoreError> {
        let mut reminders: Vec<ReadingReminder> = self.load_collection(REMINDERS_KEY)?;
        let before = reminders.len();
        reminders.retain(|r| r.id != id);
        if reminders.len() == before {
            return Err(StoreError::NotFound {
                kind: "reminder",
                id: id.to_string(),
            });
        }
        self.save_collection(REMINDERS_KEY, &reminders)?;
        tracing::debug!("Deleted local reminder {}", id);
        Ok(())
    }
}
