use serde::Serialize;

use crate::model::task::Task;

/// Subtask completion summary for one task
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Progress {
    pub done: usize,
    pub total: usize,
    /// 0.0 ..= 100.0
    pub percent: f64,
}

impl Progress {
    /// Whether a progress bar is drawn at all
    pub fn has_bar(&self) -> bool {
        self.total > 0
    }
}

/// Compute progress from a task's subtask arrays. Recomputed on every use;
/// never cache the result.
pub fn progress(task: &Task) -> Progress {
    let total = task.subtasks.len();
    let done = task
        .subtask_done
        .iter()
        .take(total)
        .filter(|done| **done)
        .count();
    let percent = if total == 0 {
        0.0
    } else {
        (done as f64 / total as f64) * 100.0
    };
    Progress {
        done,
        total,
        percent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, Priority, Status, TaskId};

    fn task_with(subtasks: usize, done: Vec<bool>) -> Task {
        Task {
            id: TaskId::new("1"),
            title: "t".into(),
            description: "d".into(),
            due_date: None,
            category: Category::Unset,
            prio: Some(Priority::Medium),
            assigned_users: vec![],
            subtasks: (0..subtasks).map(|i| format!("sub {}", i)).collect(),
            subtask_done: done,
            status: Status::Todo,
            extra: Default::default(),
        }
    }

    #[test]
    fn no_subtasks_means_no_bar() {
        let p = progress(&task_with(0, vec![]));
        assert_eq!(
            p,
            Progress {
                done: 0,
                total: 0,
                percent: 0.0
            }
        );
        assert!(!p.has_bar());
    }

    #[test]
    fn percent_follows_done_over_total() {
        for total in 1..=6usize {
            for done in 0..=total {
                let flags: Vec<bool> = (0..total).map(|i| i < done).collect();
                let p = progress(&task_with(total, flags));
                assert_eq!(p.done, done);
                assert_eq!(p.total, total);
                assert!((p.percent - 100.0 * done as f64 / total as f64).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn short_completion_array_does_not_overindex() {
        let p = progress(&task_with(3, vec![true]));
        assert_eq!(p.done, 1);
        assert_eq!(p.total, 3);
    }

    #[test]
    fn long_completion_array_is_capped_at_total() {
        let p = progress(&task_with(1, vec![true, true, true]));
        assert_eq!(p.done, 1);
        assert_eq!(p.percent, 100.0);
    }
}
