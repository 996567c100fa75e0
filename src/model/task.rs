use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use super::status::Status;

/// Prefix on card element ids: task `7` renders as `task-7`
pub const CARD_ID_PREFIX: &str = "task-";

/// Backend-assigned task identifier. Numeric ids are kept in their string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        TaskId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Element id of this task's card
    pub fn dom_id(&self) -> String {
        format!("{}{}", CARD_ID_PREFIX, self.0)
    }

    /// Recover the task id from a card element id
    pub fn from_dom_id(dom_id: &str) -> Option<TaskId> {
        dom_id
            .strip_prefix(CARD_ID_PREFIX)
            .filter(|rest| !rest.is_empty())
            .map(TaskId::new)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        TaskId(s.to_string())
    }
}

/// Task priority. Parsed case-insensitively; anything unrecognized is `Medium`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Priority {
    Urgent,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub fn parse(s: &str) -> Priority {
        match s.trim().to_ascii_lowercase().as_str() {
            "urgent" => Priority::Urgent,
            "low" => Priority::Low,
            _ => Priority::Medium,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Urgent => "Urgent",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

/// Task category. Only drives icon selection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Category {
    UserStory,
    TechnicalTask,
    #[default]
    Unset,
    Other(String),
}

impl Category {
    pub fn parse(s: &str) -> Category {
        match s.trim() {
            "" => Category::Unset,
            "User_Story" | "User Story" => Category::UserStory,
            "Technical_Task" | "Technical Task" => Category::TechnicalTask,
            other => Category::Other(other.to_string()),
        }
    }

    /// Wire form
    pub fn as_str(&self) -> &str {
        match self {
            Category::UserStory => "User_Story",
            Category::TechnicalTask => "Technical_Task",
            Category::Unset => "",
            Category::Other(s) => s,
        }
    }

    pub fn is_unset(&self) -> bool {
        *self == Category::Unset
    }

    /// Human label for the category chip
    pub fn label(&self) -> String {
        match self {
            Category::Unset => "Task".to_string(),
            other => other.as_str().replace('_', " "),
        }
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.as_str())
    }
}

/// A task exactly as the backend hands it over. Every field is optional and
/// wrongly typed values are dropped instead of failing the whole snapshot.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRaw {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub due_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub prio: Option<String>,
    #[serde(default, deserialize_with = "lenient_string_list")]
    pub assigned_users: Vec<String>,
    #[serde(default, deserialize_with = "lenient_string_list")]
    pub subtasks: Vec<String>,
    /// `None` when missing or not an array
    #[serde(default, deserialize_with = "lenient_bool_list")]
    pub subtask_done: Option<Vec<bool>>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: Option<String>,
    /// Everything else on the record
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TaskRaw {
    /// Decode one snapshot entry. Never fails: a value that is not an object
    /// yields an empty raw task.
    pub fn from_value(value: &Value) -> TaskRaw {
        TaskRaw::deserialize(value).unwrap_or_default()
    }
}

/// Normalized task held by the store
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Store key; immutable after creation
    pub id: TaskId,
    pub title: String,
    pub description: String,
    /// ISO calendar date as sent by the backend
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Category::is_unset")]
    pub category: Category,
    /// `None` when the record has no priority; displayed as `Medium`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prio: Option<Priority>,
    pub assigned_users: Vec<String>,
    pub subtasks: Vec<String>,
    /// Aligned with `subtasks`, same length at all times
    pub subtask_done: Vec<bool>,
    pub status: Status,
    /// Backend fields the board does not model, written back untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Task {
    pub fn priority(&self) -> Priority {
        self.prio.unwrap_or_default()
    }

    /// Parsed due date, if present and well-formed
    pub fn due(&self) -> Option<NaiveDate> {
        self.due_date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d").ok())
    }

    /// Assigned users with duplicates removed, first occurrence wins
    pub fn unique_assignees(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for name in &self.assigned_users {
            let name = name.trim();
            if !name.is_empty() && !seen.iter().any(|s| s.eq_ignore_ascii_case(name)) {
                seen.push(name);
            }
        }
        seen
    }
}

/// Input for creating a task on the backend
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub due_date: String,
    pub category: Category,
    pub prio: Priority,
    pub assigned_users: Vec<String>,
    pub subtasks: Vec<String>,
    pub subtask_done: Vec<bool>,
    pub status: Status,
}

/// Error type for task drafts
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DraftError {
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("description must not be empty")]
    EmptyDescription,
    #[error("invalid due date '{0}': expected YYYY-MM-DD")]
    BadDueDate(String),
    #[error("due date {0} is in the past")]
    DueDateInPast(NaiveDate),
}

impl TaskDraft {
    pub fn new(title: &str, description: &str, due_date: &str) -> Self {
        TaskDraft {
            title: title.trim().to_string(),
            description: description.trim().to_string(),
            due_date: due_date.trim().to_string(),
            category: Category::Unset,
            prio: Priority::Medium,
            assigned_users: Vec::new(),
            subtasks: Vec::new(),
            subtask_done: Vec::new(),
            status: Status::Todo,
        }
    }

    pub fn with_subtasks(mut self, subtasks: Vec<String>) -> Self {
        self.subtask_done = vec![false; subtasks.len()];
        self.subtasks = subtasks;
        self
    }

    /// Check required fields and that the due date is not before `today`
    pub fn validate(&self, today: NaiveDate) -> Result<(), DraftError> {
        if self.title.is_empty() {
            return Err(DraftError::EmptyTitle);
        }
        if self.description.is_empty() {
            return Err(DraftError::EmptyDescription);
        }
        let due = NaiveDate::parse_from_str(&self.due_date, "%Y-%m-%d")
            .map_err(|_| DraftError::BadDueDate(self.due_date.clone()))?;
        if due < today {
            return Err(DraftError::DueDateInPast(due));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Lenient field decoders
// ---------------------------------------------------------------------------

fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn lenient_string_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

fn lenient_bool_list<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<bool>>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Array(items) => Some(items.iter().map(truthy).collect()),
        _ => None,
    })
}

/// Loose truthiness for completion flags stored by other clients
fn truthy(v: &Value) -> bool {
    match v {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
        Value::Null => false,
    }
}
