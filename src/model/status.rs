use std::fmt;

use serde::{Deserialize, Serialize};

/// Workflow stage a task occupies. Wire strings are `todo`, `in-progress`,
/// `await` and `done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "todo")]
    Todo,
    #[serde(rename = "in-progress")]
    InProgress,
    #[serde(rename = "await")]
    AwaitFeedback,
    #[serde(rename = "done")]
    Done,
}

/// Direction for the one-column convenience move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Back,
}

impl Status {
    /// All statuses in board order (left to right)
    pub const ALL: [Status; 4] = [
        Status::Todo,
        Status::InProgress,
        Status::AwaitFeedback,
        Status::Done,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Todo => "todo",
            Status::InProgress => "in-progress",
            Status::AwaitFeedback => "await",
            Status::Done => "done",
        }
    }

    /// Parse a wire string. Also accepts a few spellings people type on the
    /// command line (`in_progress`, `inprogress`, `await-feedback`).
    pub fn parse(s: &str) -> Option<Status> {
        match s.trim().to_ascii_lowercase().as_str() {
            "todo" | "to-do" => Some(Status::Todo),
            "in-progress" | "in_progress" | "inprogress" => Some(Status::InProgress),
            "await" | "await-feedback" | "await_feedback" => Some(Status::AwaitFeedback),
            "done" => Some(Status::Done),
            _ => None,
        }
    }

    /// Board position, 0 = leftmost
    pub fn index(self) -> usize {
        match self {
            Status::Todo => 0,
            Status::InProgress => 1,
            Status::AwaitFeedback => 2,
            Status::Done => 3,
        }
    }

    pub fn from_index(i: usize) -> Option<Status> {
        Status::ALL.get(i).copied()
    }

    /// The adjacent status in `dir`, clamped at both ends.
    pub fn step(self, dir: Direction) -> Status {
        let i = self.index();
        let next = match dir {
            Direction::Forward => (i + 1).min(Status::ALL.len() - 1),
            Direction::Back => i.saturating_sub(1),
        };
        Status::ALL[next]
    }

    pub fn column(self) -> ColumnId {
        ColumnId(self)
    }

    /// Human label used as column title
    pub fn label(self) -> &'static str {
        match self {
            Status::Todo => "To do",
            Status::InProgress => "In progress",
            Status::AwaitFeedback => "Await feedback",
            Status::Done => "Done",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A column container. One per status; the bijection lives here and nowhere
/// else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColumnId(Status);

impl ColumnId {
    pub const ALL: [ColumnId; 4] = [
        ColumnId(Status::Todo),
        ColumnId(Status::InProgress),
        ColumnId(Status::AwaitFeedback),
        ColumnId(Status::Done),
    ];

    /// Fixed element id exposed to collaborators
    pub fn dom_id(self) -> &'static str {
        match self.0 {
            Status::Todo => "todoList",
            Status::InProgress => "inProgressList",
            Status::AwaitFeedback => "awaitFeedbackList",
            Status::Done => "doneList",
        }
    }

    /// Resolve a column element id. Unknown ids map to nothing.
    pub fn from_dom_id(id: &str) -> Option<ColumnId> {
        ColumnId::ALL.into_iter().find(|c| c.dom_id() == id)
    }

    pub fn status(self) -> Status {
        self.0
    }

    pub fn index(self) -> usize {
        self.0.index()
    }
}

impl From<Status> for ColumnId {
    fn from(status: Status) -> Self {
        ColumnId(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dom_ids_round_trip() {
        for status in Status::ALL {
            let col = status.column();
            assert_eq!(ColumnId::from_dom_id(col.dom_id()), Some(col));
            assert_eq!(col.status(), status);
        }
    }

    #[test]
    fn unknown_column_id() {
        assert_eq!(ColumnId::from_dom_id("backlogList"), None);
        assert_eq!(ColumnId::from_dom_id(""), None);
        assert_eq!(ColumnId::from_dom_id("DONELIST"), None);
    }

    #[test]
    fn step_is_clamped() {
        assert_eq!(Status::Todo.step(Direction::Back), Status::Todo);
        assert_eq!(Status::Todo.step(Direction::Forward), Status::InProgress);
        assert_eq!(
            Status::InProgress.step(Direction::Forward),
            Status::AwaitFeedback
        );
        assert_eq!(Status::AwaitFeedback.step(Direction::Forward), Status::Done);
        assert_eq!(Status::Done.step(Direction::Forward), Status::Done);
        assert_eq!(Status::Done.step(Direction::Back), Status::AwaitFeedback);
    }

    #[test]
    fn parse_wire_and_aliases() {
        assert_eq!(Status::parse("todo"), Some(Status::Todo));
        assert_eq!(Status::parse("In-Progress"), Some(Status::InProgress));
        assert_eq!(Status::parse("in_progress"), Some(Status::InProgress));
        assert_eq!(Status::parse("await"), Some(Status::AwaitFeedback));
        assert_eq!(Status::parse(" done "), Some(Status::Done));
        assert_eq!(Status::parse("blocked"), None);
    }

    #[test]
    fn serde_uses_wire_strings() {
        let json = serde_json::to_string(&Status::InProgress).unwrap();
        assert_eq!(json, "\"in-progress\"");
        let s: Status = serde_json::from_str("\"await\"").unwrap();
        assert_eq!(s, Status::AwaitFeedback);
    }
}
