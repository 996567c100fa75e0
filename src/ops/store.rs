use indexmap::IndexMap;

use crate::model::status::Status;
use crate::model::task::{Category, Priority, Task, TaskId, TaskRaw};

/// Normalize a backend snapshot keyed by id.
///
/// Malformed entries are repaired, never rejected: the map key becomes the
/// task id, a missing or misaligned `subtaskDone` is reset to all-false of
/// the right length, and an unknown status becomes `todo`.
pub fn normalize(raw_by_id: &IndexMap<String, TaskRaw>) -> IndexMap<TaskId, Task> {
    raw_by_id
        .iter()
        .map(|(key, raw)| {
            let task = normalize_task(key, raw);
            (task.id.clone(), task)
        })
        .collect()
}

/// Normalize a single entry under the given key
pub fn normalize_task(key: &str, raw: &TaskRaw) -> Task {
    let subtask_count = raw.subtasks.len();
    let subtask_done = match &raw.subtask_done {
        Some(done) if done.len() == subtask_count => done.clone(),
        _ => vec![false; subtask_count],
    };

    Task {
        id: TaskId::new(key),
        title: raw.title.clone().unwrap_or_default(),
        description: raw.description.clone().unwrap_or_default(),
        due_date: raw.due_date.clone(),
        category: raw.category.as_deref().map(Category::parse).unwrap_or_default(),
        prio: raw.prio.as_deref().map(Priority::parse),
        assigned_users: raw.assigned_users.clone(),
        subtasks: raw.subtasks.clone(),
        subtask_done,
        status: raw
            .status
            .as_deref()
            .and_then(Status::parse)
            .unwrap_or(Status::Todo),
        extra: raw.extra.clone(),
    }
}

/// The authoritative in-memory task map for one board session.
///
/// Insertion order follows the backend snapshot, which is also the order
/// cards appear within a column.
#[derive(Debug, Clone, Default)]
pub struct TaskStore {
    tasks: IndexMap<TaskId, Task>,
}

impl TaskStore {
    pub fn new() -> Self {
        TaskStore::default()
    }

    pub fn from_snapshot(raw_by_id: &IndexMap<String, TaskRaw>) -> Self {
        TaskStore {
            tasks: normalize(raw_by_id),
        }
    }

    /// Drop everything and take the given snapshot
    pub fn replace_all(&mut self, raw_by_id: &IndexMap<String, TaskRaw>) {
        self.tasks = normalize(raw_by_id);
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.get(id)
    }

    pub fn contains(&self, id: &TaskId) -> bool {
        self.tasks.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.values()
    }

    /// Tasks currently in `status`, in store order
    pub fn in_status(&self, status: Status) -> impl Iterator<Item = &Task> {
        self.tasks.values().filter(move |t| t.status == status)
    }

    /// Insert or replace a task under its own id
    pub fn insert(&mut self, task: Task) {
        self.tasks.insert(task.id.clone(), task);
    }

    /// Remove a task, keeping the order of the rest
    pub fn remove(&mut self, id: &TaskId) -> Option<Task> {
        self.tasks.shift_remove(id)
    }

    /// Set a task's status. Returns the previous status, or `None` when the
    /// id is not in the store.
    pub fn set_status(&mut self, id: &TaskId, status: Status) -> Option<Status> {
        let task = self.tasks.get_mut(id)?;
        let previous = task.status;
        task.status = status;
        Some(previous)
    }

    /// Flip one subtask's completion flag. Returns the new value, or `None`
    /// when the task or index does not exist.
    pub fn toggle_subtask(&mut self, id: &TaskId, index: usize) -> Option<bool> {
        let task = self.tasks.get_mut(id)?;
        let flag = task.subtask_done.get_mut(index)?;
        *flag = !*flag;
        Some(*flag)
    }

    /// Overwrite the mutable fields of a task (status and completion flags).
    /// Used to revert an optimistic change.
    pub fn restore(&mut self, id: &TaskId, status: Status, subtask_done: &[bool]) -> bool {
        match self.tasks.get_mut(id) {
            Some(task) if task.subtasks.len() == subtask_done.len() => {
                task.status = status;
                task.subtask_done = subtask_done.to_vec();
                true
            }
            _ => false,
        }
    }
}
