use serde::Serialize;

use crate::model::task::{Category, Priority, Task, TaskId};
use crate::model::user::{Avatar, UserDirectory};
use crate::ops::progress::{Progress, progress};

use super::view::Display;

/// Icon reference: an asset path for graphical front-ends and a glyph for
/// the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Icon {
    pub path: &'static str,
    pub glyph: &'static str,
}

const CATEGORY_ICONS: [(&str, Icon); 2] = [
    (
        "User_Story",
        Icon {
            path: "assets/img/category-user-story.svg",
            glyph: "◆",
        },
    ),
    (
        "Technical_Task",
        Icon {
            path: "assets/img/category-technical-task.svg",
            glyph: "⚙",
        },
    ),
];

const DEFAULT_CATEGORY_ICON: Icon = Icon {
    path: "assets/img/category-default.svg",
    glyph: "●",
};

const PRIORITY_ICONS: [(&str, Icon); 3] = [
    (
        "urgent",
        Icon {
            path: "assets/img/prio-urgent.svg",
            glyph: "⇈",
        },
    ),
    (
        "medium",
        Icon {
            path: "assets/img/prio-medium.svg",
            glyph: "=",
        },
    ),
    (
        "low",
        Icon {
            path: "assets/img/prio-low.svg",
            glyph: "⇊",
        },
    ),
];

/// Icon for a category; unknown categories get the default icon
pub fn category_icon(category: &Category) -> Icon {
    CATEGORY_ICONS
        .iter()
        .find(|(key, _)| *key == category.as_str())
        .map(|(_, icon)| *icon)
        .unwrap_or(DEFAULT_CATEGORY_ICON)
}

/// Icon for a priority string, compared case-insensitively, `medium` when
/// unrecognized
pub fn priority_icon(prio: &str) -> Icon {
    let key = prio.trim().to_ascii_lowercase();
    PRIORITY_ICONS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, icon)| *icon)
        .unwrap_or(PRIORITY_ICONS[1].1)
}

/// One rendered task card
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardNode {
    /// `task-<id>`
    pub element_id: String,
    pub task_id: TaskId,
    pub category_label: String,
    pub category_icon: Icon,
    pub title: String,
    pub description: String,
    /// Absent when the task has no subtasks
    pub progress: Option<Progress>,
    pub avatars: Vec<Avatar>,
    pub priority: Priority,
    pub priority_icon: Icon,
    pub draggable: bool,
    pub display: Display,
}

impl CardNode {
    pub fn is_visible(&self) -> bool {
        self.display == Display::Flex
    }
}

/// Build the card for a task. Reads the task and the directory only.
pub fn render_card(task: &Task, users: &UserDirectory) -> CardNode {
    let p = progress(task);
    CardNode {
        element_id: task.id.dom_id(),
        task_id: task.id.clone(),
        category_label: task.category.label(),
        category_icon: category_icon(&task.category),
        title: task.title.clone(),
        description: task.description.clone(),
        progress: p.has_bar().then_some(p),
        avatars: task
            .unique_assignees()
            .into_iter()
            .map(|name| users.avatar(name))
            .collect(),
        priority: task.priority(),
        priority_icon: priority_icon(task.priority().as_str()),
        draggable: true,
        display: Display::Flex,
    }
}
