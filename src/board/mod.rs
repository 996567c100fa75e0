//! The board session.
//!
//! `Board` owns the task store, the view projection, the user directory and
//! the persistence plumbing for one session. Everything that mutates task
//! state goes through it.

pub mod card;
pub mod dnd;
pub mod placeholder;
pub mod transition;
pub mod view;

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};

use chrono::NaiveDate;

use crate::io::persist::{
    InlinePersister, PersistReport, Persister, ThreadedPersister, report_channel,
};
use crate::io::remote::{Backend, RemoteError};
use crate::model::config::BoardConfig;
use crate::model::task::{DraftError, Task, TaskDraft, TaskId};
use crate::model::user::UserDirectory;
use crate::ops::search;
use crate::ops::store::TaskStore;

use self::card::render_card;
use self::dnd::DragController;
use self::placeholder::refresh_placeholders;
use self::view::BoardView;

pub use self::transition::{Abort, Transition};

/// Notifications from outside the board that its data changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardEvent {
    TaskCreated(TaskId),
    TaskUpdated(TaskId),
    /// Explicit refresh request (the `r` key)
    Refresh,
}

/// Cloneable sender half handed to collaborators
#[derive(Debug, Clone)]
pub struct BoardEvents {
    tx: Sender<BoardEvent>,
}

impl BoardEvents {
    pub fn emit(&self, event: BoardEvent) {
        tracing::debug!(?event, "board event");
        // A closed channel means the board is gone; nothing to notify.
        let _ = self.tx.send(event);
    }
}

/// How task writes are carried out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistMode {
    /// One background thread per write; the caller never waits
    Background,
    /// The write completes before the mutating call returns
    Inline,
}

/// Error type for board operations that report failures to the caller
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error(transparent)]
    Draft(#[from] DraftError),
    #[error(transparent)]
    Remote(#[from] RemoteError),
}

/// A write that did not make it to the backend
#[derive(Debug)]
pub struct PersistFailure {
    pub task_id: TaskId,
    pub error: RemoteError,
    /// The optimistic change was reverted locally
    pub rolled_back: bool,
}

pub struct Board {
    store: TaskStore,
    view: BoardView,
    users: UserDirectory,
    backend: Arc<dyn Backend>,
    persister: Box<dyn Persister>,
    reports: Receiver<PersistReport>,
    events_tx: Sender<BoardEvent>,
    events_rx: Receiver<BoardEvent>,
    drag: DragController,
    settings: BoardConfig,
    filter: String,
}

impl Board {
    pub fn new(backend: Arc<dyn Backend>, settings: BoardConfig, mode: PersistMode) -> Self {
        let (report_tx, reports) = report_channel();
        let persister: Box<dyn Persister> = match mode {
            PersistMode::Background => Box::new(ThreadedPersister::new(Arc::clone(&backend), report_tx)),
            PersistMode::Inline => Box::new(InlinePersister::new(Arc::clone(&backend), report_tx)),
        };
        let (events_tx, events_rx) = mpsc::channel();
        let mut board = Board {
            store: TaskStore::new(),
            view: BoardView::new(),
            users: UserDirectory::default(),
            backend,
            persister,
            reports,
            events_tx,
            events_rx,
            drag: DragController::default(),
            settings,
            filter: String::new(),
        };
        refresh_placeholders(&mut board.view, &board.settings.placeholders);
        board
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn view(&self) -> &BoardView {
        &self.view
    }

    pub fn users(&self) -> &UserDirectory {
        &self.users
    }

    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.store.get(id)
    }

    pub fn settings(&self) -> &BoardConfig {
        &self.settings
    }

    /// Sender for collaborators that change tasks behind the board's back
    pub fn events(&self) -> BoardEvents {
        BoardEvents {
            tx: self.events_tx.clone(),
        }
    }

    /// Fetch tasks and users and repaint the whole board.
    ///
    /// On failure nothing is replaced: the board keeps whatever it showed
    /// before (an empty board on first load).
    pub fn load(&mut self) -> Result<(), RemoteError> {
        let raw_tasks = self.backend.fetch_tasks()?;
        let raw_users = self.backend.fetch_users()?;

        let (users, assignments) = UserDirectory::from_raw(&raw_users);
        for assignment in &assignments {
            match self.backend.put_user(&assignment.user_id, &assignment.record) {
                Ok(()) => tracing::info!(user = %assignment.user_id, color = ?assignment.record.user_color, "assigned user color"),
                Err(e) => tracing::warn!(user = %assignment.user_id, error = %e, "could not save user color"),
            }
        }

        self.store.replace_all(&raw_tasks);
        self.users = users;
        self.repaint();
        tracing::info!(tasks = self.store.len(), users = self.users.len(), "board loaded");
        Ok(())
    }

    /// React to a change notification: every event triggers a full reload
    pub fn handle_event(&mut self, event: BoardEvent) -> Result<(), RemoteError> {
        tracing::debug!(?event, "reloading board");
        self.load()
    }

    /// Handle all queued events with a single reload. Returns how many
    /// events were queued.
    pub fn process_events(&mut self) -> Result<usize, RemoteError> {
        let events: Vec<BoardEvent> = self.events_rx.try_iter().collect();
        if let Some(last) = events.last().cloned() {
            self.handle_event(last)?;
        }
        Ok(events.len())
    }

    /// Rebuild the view from the store
    fn repaint(&mut self) {
        self.drag.cancel(&mut self.view);
        self.view.clear();
        for task in self.store.iter() {
            self.view
                .append_card(task.status.column(), render_card(task, &self.users));
        }
        refresh_placeholders(&mut self.view, &self.settings.placeholders);
        if !self.filter.is_empty() {
            search::apply_filter(&self.filter, &self.store, &mut self.view);
        }
    }

    /// Active search term
    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Filter the rendered cards. Returns whether anything matched.
    pub fn set_filter(&mut self, term: &str) -> bool {
        self.filter = term.trim().to_string();
        search::apply_filter(&self.filter, &self.store, &mut self.view)
    }

    /// Delete a task on the backend, then drop it from the store and the
    /// view
    pub fn delete_task(&mut self, id: &TaskId) -> Result<(), RemoteError> {
        self.backend.delete_task(id)?;
        if self.store.remove(id).is_some() {
            self.view.remove_card(&id.dom_id());
            refresh_placeholders(&mut self.view, &self.settings.placeholders);
        }
        tracing::info!(task = %id, "deleted task");
        Ok(())
    }

    /// Create a task on the backend. The board reloads through the emitted
    /// `TaskCreated` event.
    pub fn create_task(&self, draft: &TaskDraft, today: NaiveDate) -> Result<TaskId, BoardError> {
        draft.validate(today)?;
        let id = self.backend.create_task(draft)?;
        tracing::info!(task = %id, title = %draft.title, "created task");
        self.events().emit(BoardEvent::TaskCreated(id.clone()));
        Ok(id)
    }

    /// Collect finished writes. Failures are logged and returned; with
    /// `rollback_on_failure` a failed change that is still the current local
    /// state is reverted.
    pub fn drain_reports(&mut self) -> Vec<PersistFailure> {
        let reports: Vec<PersistReport> = self.reports.try_iter().collect();
        let mut failures = Vec::new();
        for report in reports {
            let PersistReport { request, outcome } = report;
            let Err(error) = outcome else {
                continue;
            };
            tracing::warn!(task = %request.task.id, error = %error, "task write failed");

            let rolled_back = self.settings.rollback_on_failure && self.revert(&request);
            failures.push(PersistFailure {
                task_id: request.task.id.clone(),
                error,
                rolled_back,
            });
        }
        failures
    }

    /// Undo an optimistic change if nothing newer replaced it
    fn revert(&mut self, request: &crate::io::persist::PersistRequest) -> bool {
        let id = request.task_id();
        let still_current = self.store.get(id).is_some_and(|t| {
            t.status == request.task.status && t.subtask_done == request.task.subtask_done
        });
        if !still_current || request.is_unchanged() {
            return false;
        }
        if !self
            .store
            .restore(id, request.previous_status, &request.previous_subtask_done)
        {
            return false;
        }
        if let Some(task) = self.store.get(id) {
            let dom_id = id.dom_id();
            self.view.move_card(&dom_id, task.status.column());
            self.view.replace_card(render_card(task, &self.users));
        }
        refresh_placeholders(&mut self.view, &self.settings.placeholders);
        tracing::info!(task = %id, status = %request.previous_status, "reverted failed change");
        true
    }
}
