//! Fire-and-forget persistence of optimistic task changes.
//!
//! A mutation hands a `PersistRequest` to a `Persister` and returns at once.
//! Every write ends in exactly one `PersistReport` on the report channel;
//! the board drains that channel on its own schedule.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use crate::model::status::Status;
use crate::model::task::{Task, TaskId};

use super::remote::{Backend, RemoteError};

/// A full-task write plus the state it replaced, so a failed write can be
/// reverted
#[derive(Debug, Clone, PartialEq)]
pub struct PersistRequest {
    /// The task as it should be stored after the write
    pub task: Task,
    pub previous_status: Status,
    pub previous_subtask_done: Vec<bool>,
}

impl PersistRequest {
    pub fn new(task: Task, previous_status: Status, previous_subtask_done: Vec<bool>) -> Self {
        PersistRequest {
            task,
            previous_status,
            previous_subtask_done,
        }
    }

    pub fn task_id(&self) -> &TaskId {
        &self.task.id
    }

    /// Whether the write changes nothing compared to the previous state
    pub fn is_unchanged(&self) -> bool {
        self.task.status == self.previous_status && self.task.subtask_done == self.previous_subtask_done
    }
}

/// Outcome of one write
#[derive(Debug)]
pub struct PersistReport {
    pub request: PersistRequest,
    pub outcome: Result<(), RemoteError>,
}

impl PersistReport {
    pub fn is_failure(&self) -> bool {
        self.outcome.is_err()
    }
}

/// Accepts writes without blocking the caller on their result
pub trait Persister {
    fn submit(&self, request: PersistRequest);
}

/// Channel pair for persistence reports
pub fn report_channel() -> (Sender<PersistReport>, Receiver<PersistReport>) {
    mpsc::channel()
}

fn run(backend: &dyn Backend, request: PersistRequest) -> PersistReport {
    let outcome = backend.put_task(&request.task);
    match &outcome {
        Ok(()) => tracing::debug!(task = %request.task.id, status = %request.task.status, "persisted"),
        Err(e) => tracing::warn!(task = %request.task.id, error = %e, "persist failed"),
    }
    PersistReport { request, outcome }
}

/// Runs each write on its own thread. Writes are neither queued nor
/// cancelled; two writes to the same task race and the backend keeps
/// whichever arrives last.
pub struct ThreadedPersister {
    backend: Arc<dyn Backend>,
    reports: Sender<PersistReport>,
}

impl ThreadedPersister {
    pub fn new(backend: Arc<dyn Backend>, reports: Sender<PersistReport>) -> Self {
        ThreadedPersister { backend, reports }
    }
}

impl Persister for ThreadedPersister {
    fn submit(&self, request: PersistRequest) {
        let backend = Arc::clone(&self.backend);
        let reports = self.reports.clone();
        thread::spawn(move || {
            let report = run(backend.as_ref(), request);
            // The board may already be gone; nobody is left to tell.
            let _ = reports.send(report);
        });
    }
}

/// Performs the write before `submit` returns. Used by the CLI, where the
/// process must not exit ahead of its write, and by tests.
pub struct InlinePersister {
    backend: Arc<dyn Backend>,
    reports: Sender<PersistReport>,
}

impl InlinePersister {
    pub fn new(backend: Arc<dyn Backend>, reports: Sender<PersistReport>) -> Self {
        InlinePersister { backend, reports }
    }
}

impl Persister for InlinePersister {
    fn submit(&self, request: PersistRequest) {
        let report = run(self.backend.as_ref(), request);
        let _ = self.reports.send(report);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::{Category, Priority, TaskDraft};
    use crate::model::user::UserRaw;
    use crate::io::remote::RemoteError;
    use crate::io::http::Method;
    use indexmap::IndexMap;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct Recorder {
        puts: Mutex<Vec<Task>>,
        fail: bool,
    }

    impl Backend for Recorder {
        fn fetch_tasks(&self) -> Result<IndexMap<String, crate::model::task::TaskRaw>, RemoteError> {
            Ok(IndexMap::new())
        }
        fn fetch_users(&self) -> Result<IndexMap<String, UserRaw>, RemoteError> {
            Ok(IndexMap::new())
        }
        fn put_task(&self, task: &Task) -> Result<(), RemoteError> {
            self.puts.lock().unwrap().push(task.clone());
            if self.fail {
                return Err(RemoteError::Status {
                    method: Method::Put,
                    path: format!("/tasks/{}", task.id),
                    status: 503,
                });
            }
            Ok(())
        }
        fn delete_task(&self, _id: &TaskId) -> Result<(), RemoteError> {
            Ok(())
        }
        fn create_task(&self, _draft: &TaskDraft) -> Result<TaskId, RemoteError> {
            Err(RemoteError::MissingId)
        }
        fn put_user(&self, _id: &str, _user: &UserRaw) -> Result<(), RemoteError> {
            Ok(())
        }
    }

    fn task(status: Status) -> Task {
        Task {
            id: TaskId::new("1"),
            title: "t".into(),
            description: "d".into(),
            due_date: None,
            category: Category::Unset,
            prio: Some(Priority::Medium),
            assigned_users: vec![],
            subtasks: vec![],
            subtask_done: vec![],
            status,
            extra: Default::default(),
        }
    }

    #[test]
    fn inline_reports_before_returning() {
        let backend = Arc::new(Recorder::default());
        let (tx, rx) = report_channel();
        let persister = InlinePersister::new(backend.clone(), tx);

        persister.submit(PersistRequest::new(task(Status::Done), Status::Todo, vec![]));

        let report = rx.try_recv().unwrap();
        assert!(!report.is_failure());
        assert_eq!(backend.puts.lock().unwrap()[0].status, Status::Done);
    }

    #[test]
    fn threaded_failure_arrives_as_report() {
        let backend = Arc::new(Recorder {
            fail: true,
            ..Default::default()
        });
        let (tx, rx) = report_channel();
        let persister = ThreadedPersister::new(backend, tx);

        persister.submit(PersistRequest::new(task(Status::Done), Status::Todo, vec![]));

        let report = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(report.is_failure());
        assert_eq!(report.request.previous_status, Status::Todo);
    }

    #[test]
    fn unchanged_request() {
        assert!(PersistRequest::new(task(Status::Todo), Status::Todo, vec![]).is_unchanged());
        assert!(!PersistRequest::new(task(Status::Done), Status::Todo, vec![]).is_unchanged());
    }
}
