// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use std::fmt;

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum length (in characters) of a category or priority name.
pub const NAME_MAX_LEN: usize = 100;

/// Maximum length (in characters) of a task or subtask title.
pub const TITLE_MAX_LEN: usize = 200;

/// Workflow state shared by tasks and subtasks.
///
/// Stored as the human readable label (`"In Progress"`, not `"in_progress"`)
/// so rows stay legible from any SQLite shell.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default, sqlx::Type)]
#[sqlx(type_name = "TEXT")]
pub enum TaskStatus {
    #[default]
    #[sqlx(rename = "Pending")]
    #[serde(rename = "Pending")]
    Pending,

    #[sqlx(rename = "In Progress")]
    #[serde(rename = "In Progress")]
    InProgress,

    #[sqlx(rename = "Completed")]
    #[serde(rename = "Completed")]
    Completed,
}

impl TaskStatus {
    /// Every status, in workflow order.
    pub const ALL: [TaskStatus; 3] = [
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Completed => "Completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A grouping label for tasks (e.g. "Work", "School").
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

impl Category {
    pub const VERBOSE_NAME_PLURAL: &'static str = "Categories";
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// An urgency label for tasks (e.g. "High", "Low").
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Priority {
    pub id: i64,
    pub name: String,
}

impl Priority {
    pub const VERBOSE_NAME_PLURAL: &'static str = "Priorities";
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Represents a task within the system.
///
/// `priority_id` and `category_id` are nullable references: deleting the
/// referenced row clears them instead of deleting the task.
/// Deleting the task itself removes every [`SubTask`] and [`Note`] pointing
/// at it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub deadline: Option<DateTime<Utc>>,
    pub priority_id: Option<i64>,
    pub category_id: Option<i64>,

    // Set once on insert, never written again.
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct SubTask {
    pub id: i64,
    pub parent_task_id: i64,
    pub title: String,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl fmt::Display for SubTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

/// Free-form text attached to a task.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Note {
    pub id: i64,
    pub task_id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// Human readable label, e.g. `Note for Buy milk @ 2025-03-14 09:30`.
    /// The creation time is rendered in the local timezone.
    pub fn label(&self, task: &Task) -> String {
        format!(
            "Note for {} @ {}",
            task.title,
            self.created_at
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M")
        )
    }
}

/// Field constraint violations, raised before anything reaches the database.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} cannot be empty")]
    Blank { field: &'static str },

    #[error("{field} must be at most {max} characters (got {len})")]
    TooLong {
        field: &'static str,
        max: usize,
        len: usize,
    },
}

fn require_text(field: &'static str, value: &str, max: Option<usize>) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Blank { field });
    }
    if let Some(max) = max {
        let len = value.chars().count();
        if len > max {
            return Err(ValidationError::TooLong { field, max, len });
        }
    }
    Ok(())
}

/// Checks a category or priority name.
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    require_text("name", name, Some(NAME_MAX_LEN))
}

/// Checks a task or subtask title.
pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    require_text("title", title, Some(TITLE_MAX_LEN))
}

/// Checks note content. Content has no length cap.
pub fn validate_content(content: &str) -> Result<(), ValidationError> {
    require_text("content", content, None)
}

/// Data required to insert a task. Timestamps are assigned by the store.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct NewTask {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: TaskStatus,
    pub deadline: Option<DateTime<Utc>>,
    pub priority_id: Option<i64>,
    pub category_id: Option<i64>,
}

impl NewTask {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_title(&self.title)
    }
}

/// Partial update of a task. `None` leaves a field untouched; for the
/// nullable columns `Some(None)` clears the value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub deadline: Option<Option<DateTime<Utc>>>,
    pub priority_id: Option<Option<i64>>,
    pub category_id: Option<Option<i64>>,
}

impl UpdateTask {
    /// Applies the changes to `task` in place. Timestamps are left alone.
    pub fn apply_to(self, task: &mut Task) -> Result<(), ValidationError> {
        if let Some(title) = self.title {
            validate_title(&title)?;
            task.title = title;
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(deadline) = self.deadline {
            task.deadline = deadline;
        }
        if let Some(priority_id) = self.priority_id {
            task.priority_id = priority_id;
        }
        if let Some(category_id) = self.category_id {
            task.category_id = category_id;
        }
        Ok(())
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct NewSubTask {
    pub parent_task_id: i64,
    pub title: String,
    #[serde(default)]
    pub status: TaskStatus,
}

impl NewSubTask {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_title(&self.title)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateSubTask {
    pub title: Option<String>,
    pub status: Option<TaskStatus>,
}

impl UpdateSubTask {
    pub fn apply_to(self, subtask: &mut SubTask) -> Result<(), ValidationError> {
        if let Some(title) = self.title {
            validate_title(&title)?;
            subtask.title = title;
        }
        if let Some(status) = self.status {
            subtask.status = status;
        }
        Ok(())
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct NewNote {
    pub task_id: i64,
    pub content: String,
}

impl NewNote {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_content(&self.content)
    }
}
