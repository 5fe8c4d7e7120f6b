/// Pre-dispatch validation gate
///
/// Pure functions that check a draft against the data model rules and return
/// every violation as a field-level error. The gate runs before an adapter is
/// chosen and never inspects the session mode, so guest and authenticated
/// input is held to exactly the same rules. An empty result means the
/// operation may proceed.

use crate::domain::reminder::{ReminderDraft, ReminderPatch};
use crate::domain::task::{TaskDraft, TaskPatch};

pub const MAX_TITLE_LEN: usize = 200;
pub const MAX_DESCRIPTION_LEN: usize = 1000;
pub const MAX_NOTES_LEN: usize = 1000;

/// One validation failure, attributed to the offending field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate task creation input
pub fn validate_task(draft: &TaskDraft) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if draft.title.trim().is_empty() {
        errors.push(FieldError::new("title", "Task title is required"));
    } else if draft.title.chars().count() > MAX_TITLE_LEN {
        errors.push(FieldError::new("title", "Task title is too long"));
    }

    if let Some(description) = &draft.description {
        if description.chars().count() > MAX_DESCRIPTION_LEN {
            errors.push(FieldError::new("description", "Description is too long"));
        }
    }

    errors
}

/// Validate a task patch; only supplied fields are checked
pub fn validate_task_patch(patch: &TaskPatch) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if let Some(title) = &patch.title {
        if title.trim().is_empty() {
            errors.push(FieldError::new("title", "Task title is required"));
        } else if title.chars().count() > MAX_TITLE_LEN {
            errors.push(FieldError::new("title", "Task title is too long"));
        }
    }

    if let Some(description) = &patch.description {
        if description.chars().count() > MAX_DESCRIPTION_LEN {
            errors.push(FieldError::new("description", "Description is too long"));
        }
    }

    errors
}

/// Validate reminder creation input
///
/// Zero counts as "not provided" for the numeric fields, so a zero surah or
/// ayah reports as a missing required field rather than an out-of-range one.
pub fn validate_reminder(draft: &ReminderDraft) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if draft.surah_number == 0 {
        errors.push(FieldError::new("surahNumber", "Please select a surah"));
    }

    if draft.start_ayah == 0 {
        errors.push(FieldError::new(
            "startAyah",
            "Start ayah must be a positive number",
        ));
    }

    if draft.end_ayah == 0 {
        errors.push(FieldError::new(
            "endAyah",
            "End ayah must be a positive number",
        ));
    } else if draft.start_ayah > 0 && draft.end_ayah < draft.start_ayah {
        errors.push(FieldError::new(
            "endAyah",
            "End ayah must be greater than or equal to start ayah",
        ));
    }

    if let Some(notes) = &draft.notes {
        if notes.chars().count() > MAX_NOTES_LEN {
            errors.push(FieldError::new("notes", "Notes are too long"));
        }
    }

    errors
}

/// Validate a reminder patch; only supplied fields are checked
pub fn validate_reminder_patch(patch: &ReminderPatch) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if let Some(notes) = &patch.notes {
        if notes.chars().count() > MAX_NOTES_LEN {
            errors.push(FieldError::new("notes", "Notes are too long"));
        }
    }

    errors
}
