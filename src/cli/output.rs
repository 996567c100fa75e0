use serde::Serialize;

use crate::board::card::priority_icon;
use crate::model::status::Status;
use crate::model::task::{Category, Priority, Task};
use crate::model::user::{User, UserDirectory};
use crate::ops::progress::progress;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TaskJson {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    pub category: Category,
    pub prio: Priority,
    pub status: Status,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub assigned_users: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub subtasks: Vec<SubtaskJson>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<ProgressJson>,
}

#[derive(Serialize)]
pub struct SubtaskJson {
    pub text: String,
    pub done: bool,
}

#[derive(Serialize)]
pub struct ProgressJson {
    pub done: usize,
    pub total: usize,
    pub percent: f64,
}

#[derive(Serialize)]
pub struct ColumnJson {
    pub status: Status,
    pub label: &'static str,
    pub tasks: Vec<TaskJson>,
}

#[derive(Serialize)]
pub struct UserJson {
    pub id: String,
    pub name: String,
    pub initials: String,
    pub color: String,
}

#[derive(Serialize)]
pub struct MoveJson {
    pub id: String,
    pub from: Status,
    pub to: Status,
    pub changed: bool,
}

#[derive(Serialize)]
pub struct CreatedJson {
    pub id: String,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn task_to_json(task: &Task) -> TaskJson {
    let p = progress(task);
    TaskJson {
        id: task.id.to_string(),
        title: task.title.clone(),
        description: task.description.clone(),
        due_date: task.due_date.clone(),
        category: task.category.clone(),
        prio: task.priority(),
        status: task.status,
        assigned_users: task.assigned_users.clone(),
        subtasks: task
            .subtasks
            .iter()
            .enumerate()
            .map(|(i, text)| SubtaskJson {
                text: text.clone(),
                done: task.subtask_done.get(i).copied().unwrap_or(false),
            })
            .collect(),
        progress: p.has_bar().then_some(ProgressJson {
            done: p.done,
            total: p.total,
            percent: p.percent,
        }),
    }
}

pub fn user_to_json(user: &User) -> UserJson {
    UserJson {
        id: user.id.clone(),
        name: user.full_name.clone(),
        initials: user.initials.clone(),
        color: user.color_class.clone(),
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

pub fn format_column_header(status: Status, count: usize) -> String {
    format!("== {} ({}) ==", status.label(), count)
}

/// One line per task: `[id] title  ⇈ Urgent  1/2  AB CD`
pub fn format_task_line(task: &Task, users: &UserDirectory) -> String {
    let mut line = format!(
        "[{}] {}  {} {}",
        task.id,
        task.title,
        priority_icon(task.priority().as_str()).glyph,
        task.priority().as_str()
    );
    let p = progress(task);
    if p.has_bar() {
        line.push_str(&format!("  {}/{}", p.done, p.total));
    }
    let initials: Vec<String> = task
        .unique_assignees()
        .into_iter()
        .map(|name| users.avatar(name).initials)
        .collect();
    if !initials.is_empty() {
        line.push_str("  ");
        line.push_str(&initials.join(" "));
    }
    line
}

pub fn format_task_detail(task: &Task, users: &UserDirectory) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push(format!("[{}] {}", task.id, task.title));
    lines.push(format!("status: {}", task.status.label()));
    lines.push(format!("category: {}", task.category.label()));
    lines.push(format!("priority: {}", task.priority().as_str()));
    if let Some(date) = task.due() {
        lines.push(format!("due: {}", date.format("%d/%m/%Y")));
    } else if let Some(raw) = task.due_date.as_deref().filter(|d| !d.trim().is_empty()) {
        lines.push(format!("due: {}", raw));
    }

    let assignees = task.unique_assignees();
    if !assignees.is_empty() {
        lines.push("assigned:".to_string());
        for name in assignees {
            let avatar = users.avatar(name);
            lines.push(format!("  {} {}", avatar.initials, avatar.name));
        }
    }

    if !task.description.is_empty() {
        lines.push("description:".to_string());
        for line in task.description.lines() {
            lines.push(format!("  {}", line));
        }
    }

    if !task.subtasks.is_empty() {
        let p = progress(task);
        lines.push(format!("subtasks: {}/{}", p.done, p.total));
        for (i, text) in task.subtasks.iter().enumerate() {
            let done = task.subtask_done.get(i).copied().unwrap_or(false);
            let mark = if done { 'x' } else { ' ' };
            lines.push(format!("  {}. [{}] {}", i + 1, mark, text));
        }
    }
    lines
}

pub fn parse_status(s: &str) -> Result<Status, String> {
    Status::parse(s).ok_or_else(|| {
        format!(
            "invalid status: {} (expected todo, in-progress, await, done)",
            s
        )
    })
}
