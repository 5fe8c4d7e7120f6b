/// Task entity and its draft/patch companions
///
/// A Task is one of the two tracked record kinds. Drafts carry user input into
/// the create flow; patches carry partial updates where `None` means "leave
/// unchanged". Field names serialize in camelCase to match the wire format
/// and the stored blob format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Task category, for organizing tasks into life areas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    General,
    Worship,
    Study,
    Work,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::General => "general",
            Category::Worship => "worship",
            Category::Study => "study",
            Category::Work => "work",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "general" => Some(Category::General),
            "worship" => Some(Category::Worship),
            "study" => Some(Category::Study),
            "work" => Some(Category::Work),
            _ => None,
        }
    }
}

/// Task priority level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" => Some(Priority::Low),
            "medium" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            _ => None,
        }
    }
}

/// A single to-do item owned by one identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Opaque identifier: clock-derived in local mode, server-assigned in
    /// remote mode
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Materialize a task from validated draft fields, applying the creation
    /// defaults (not completed, both timestamps set to now)
    pub fn from_draft(id: String, draft: &TaskDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title.clone(),
            description: draft.description.clone(),
            completed: false,
            category: draft.category,
            priority: draft.priority,
            due_date: draft.due_date,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a partial update in place; only supplied fields change.
    /// The caller stamps `updated_at`.
    pub fn apply_patch(&mut self, patch: &TaskPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(description) = &patch.description {
            self.description = Some(description.clone());
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = Some(due_date);
        }
    }
}

/// User input for creating a task
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category: Category,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }
}

/// Partial update for a task; `None` fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
}

impl TaskPatch {
    /// Patch that only flips the completion flag
    pub fn completion(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Default::default()
        }
    }
}
