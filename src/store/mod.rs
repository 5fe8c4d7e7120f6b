/// Persistence layer for tasks and reading reminders
///
/// This module defines the entity store contract shared by the two adapters:
/// a local adapter that keeps everything in serialized blobs on disk (guest
/// mode) and a remote adapter that talks to the API server (authenticated
/// mode). The session layer picks one per operation; the adapters never
/// decide that themselves.

pub mod local;
pub mod remote;

pub use local::LocalStore;
pub use remote::RemoteStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{
    FieldError, Identity, ReadingReminder, ReminderDraft, ReminderPatch, Task, TaskDraft,
    TaskPatch,
};

/// Fixed storage key for the serialized task collection
pub const TASKS_KEY: &str = "islamic-tracker-tasks";
/// Fixed storage key for the serialized reminder collection
pub const REMINDERS_KEY: &str = "islamic-tracker-reminders";

/// Errors that can occur during store operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Input rejected by the validation gate before any adapter ran
    #[error("validation failed: {}", format_field_errors(.0))]
    Validation(Vec<FieldError>),

    /// No entity with this id exists under the owning identity
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// The server answered with a non-success status, or the request never
    /// completed (no status in that case)
    #[error("remote request failed{}: {message}", format_status(.status))]
    Remote { status: Option<u16>, message: String },

    /// Local blob file could not be read or written
    #[error("local storage error: {0}")]
    Io(#[from] std::io::Error),

    /// Entity could not be serialized for storage
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        StoreError::Remote {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }

    /// Field-level errors when this is a validation failure
    pub fn field_errors(&self) -> Option<&[FieldError]> {
        match self {
            StoreError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

fn format_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

fn format_status(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" ({})", code),
        None => String::new(),
    }
}

/// The entity store contract implemented by both persistence adapters
///
/// Listing is newest-first by creation time. Create returns the fully
/// populated entity including its generated id and timestamps; update applies
/// only the supplied fields. Update and delete fail with `NotFound` when the
/// id does not exist under the owner, and a second delete of the same id
/// fails the same way.
#[async_trait]
pub trait EntityStore: Send + Sync {
    async fn list_tasks(&self, owner: &Identity) -> Result<Vec<Task>, StoreError>;

    async fn create_task(&self, owner: &Identity, draft: &TaskDraft) -> Result<Task, StoreError>;

    async fn update_task(
        &self,
        owner: &Identity,
        id: &str,
        patch: &TaskPatch,
    ) -> Result<Task, StoreError>;

    async fn delete_task(&self, owner: &Identity, id: &str) -> Result<(), StoreError>;

    async fn list_reminders(&self, owner: &Identity) -> Result<Vec<ReadingReminder>, StoreError>;

    /// `surah_name` is resolved by the caller from the active locale and
    /// stored denormalized on the created reminder
    async fn create_reminder(
        &self,
        owner: &Identity,
        draft: &ReminderDraft,
        surah_name: &str,
    ) -> Result<ReadingReminder, StoreError>;

    async fn update_reminder(
        &self,
        owner: &Identity,
        id: &str,
        patch: &ReminderPatch,
    ) -> Result<ReadingReminder, StoreError>;

    async fn delete_reminder(&self, owner: &Identity, id: &str) -> Result<(), StoreError>;
}
