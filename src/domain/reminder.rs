/// Quran reading reminder entity and its draft/patch companions
///
/// The surah display name is resolved from the static table once, when the
/// reminder is created, and stored denormalized on the record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A reminder to read a range of ayahs from one surah
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingReminder {
    pub id: String,
    pub surah_number: u32,
    /// Display name captured at creation time in the session's locale
    pub surah_name: String,
    pub start_ayah: u32,
    pub end_ayah: u32,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub reminder_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ReadingReminder {
    /// Materialize a reminder from validated draft fields plus the resolved
    /// surah name
    pub fn from_draft(
        id: String,
        draft: &ReminderDraft,
        surah_name: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            surah_number: draft.surah_number,
            surah_name,
            start_ayah: draft.start_ayah,
            end_ayah: draft.end_ayah,
            notes: draft.notes.clone(),
            completed: false,
            reminder_time: draft.reminder_time,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a partial update in place; only supplied fields change.
    /// The caller stamps `updated_at`.
    pub fn apply_patch(&mut self, patch: &ReminderPatch) {
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
        if let Some(notes) = &patch.notes {
            self.notes = Some(notes.clone());
        }
        if let Some(reminder_time) = patch.reminder_time {
            self.reminder_time = Some(reminder_time);
        }
    }
}

/// User input for creating a reminder
///
/// Numeric fields use `0` for "not provided"; the validation gate reports
/// those as missing required fields before any adapter runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderDraft {
    pub surah_number: u32,
    pub start_ayah: u32,
    pub end_ayah: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reminder_time: Option<DateTime<Utc>>,
}

impl ReminderDraft {
    pub fn new(surah_number: u32, start_ayah: u32, end_ayah: u32) -> Self {
        Self {
            surah_number,
            start_ayah,
            end_ayah,
            ..Default::default()
        }
    }
}

/// Partial update for a reminder; the ayah range and surah are fixed at
/// creation, matching the server's update contract
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reminder_time: Option<DateTime<Utc>>,
}

impl ReminderPatch {
    pub fn completion(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Default::default()
        }
    }
}
