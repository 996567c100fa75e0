//! Status transitions: drag-and-drop drops, the one-column move and subtask
//! toggles.
//!
//! Every change follows the same order: the store is mutated first, the view
//! is patched to match, placeholders are recomputed, and only then is the
//! write handed to the persister. Nothing here waits for the backend.

use crate::io::persist::PersistRequest;
use crate::model::status::{ColumnId, Direction, Status};
use crate::model::task::TaskId;
use crate::ops::progress::progress;

use super::Board;
use super::dnd::DataTransfer;
use super::placeholder::refresh_placeholders;

/// Why a transition did nothing. None of these are errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Abort {
    /// The drop carried no payload
    NoPayload,
    /// The payload is not a card element id
    NotACard(String),
    /// The card's task is no longer in the store
    UnknownTask(TaskId),
    /// The target is not one of the four columns
    UnknownColumn(String),
    /// A one-column move at the first or last column
    AtBoundary(Status),
}

/// Result of a transition attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Status changed and a write was submitted
    Moved { id: TaskId, from: Status, to: Status },
    /// Dropped on its own column: nothing changed, the write still went out
    Unchanged { id: TaskId, status: Status },
    Aborted(Abort),
}

impl Transition {
    pub fn is_aborted(&self) -> bool {
        matches!(self, Transition::Aborted(_))
    }
}

impl Board {
    /// Start dragging the card with this element id
    pub fn drag_start(&mut self, element_id: &str) -> bool {
        self.drag.start(&self.view, element_id)
    }

    pub fn drag_over(&mut self, column: ColumnId) {
        self.drag.over(&mut self.view, column);
    }

    pub fn drag_leave(&mut self, column: ColumnId) {
        self.drag.leave(&mut self.view, column);
    }

    pub fn drag_cancel(&mut self) {
        self.drag.cancel(&mut self.view);
    }

    /// Element id of the card being dragged
    pub fn dragging(&self) -> Option<&str> {
        self.drag.dragged()
    }

    /// Column currently showing the drag-over hint
    pub fn drag_target(&self) -> Option<ColumnId> {
        self.drag.hovered()
    }

    /// Finish the current drag on a column element id
    pub fn drop_on(&mut self, target_dom_id: &str) -> Transition {
        let payload = self.drag.finish();
        self.handle_drop(&payload, target_dom_id)
    }

    /// The drop handler.
    ///
    /// Clears the drag-over hint, resolves the card from the payload and the
    /// status from the target column, then moves the task. Unknown cards and
    /// columns abort without touching anything.
    pub fn handle_drop(&mut self, payload: &DataTransfer, target_dom_id: &str) -> Transition {
        self.view.clear_drag_over();

        let Some(element_id) = payload.get_data() else {
            return aborted(Abort::NoPayload);
        };
        let Some(id) = TaskId::from_dom_id(element_id) else {
            return aborted(Abort::NotACard(element_id.to_string()));
        };
        if !self.store.contains(&id) {
            return aborted(Abort::UnknownTask(id));
        }
        let Some(column) = ColumnId::from_dom_id(target_dom_id) else {
            return aborted(Abort::UnknownColumn(target_dom_id.to_string()));
        };

        self.apply_status(&id, column.status())
    }

    /// Move a task to a status directly, as a drop onto that column would
    pub fn move_to(&mut self, id: &TaskId, status: Status) -> Transition {
        if !self.store.contains(id) {
            return aborted(Abort::UnknownTask(id.clone()));
        }
        self.apply_status(id, status)
    }

    /// Move a task one column forward or back. Clamped: at the first or last
    /// column this is a no-op and nothing is written.
    pub fn move_one_column(&mut self, id: &TaskId, direction: Direction) -> Transition {
        let Some(current) = self.store.get(id).map(|t| t.status) else {
            return aborted(Abort::UnknownTask(id.clone()));
        };
        let next = current.step(direction);
        if next == current {
            return aborted(Abort::AtBoundary(current));
        }
        self.apply_status(id, next)
    }

    /// Flip one subtask's completion flag and write the task. Patches only
    /// the card's progress bar. Returns the new flag, or `None` for an
    /// unknown task or index.
    pub fn toggle_subtask(&mut self, id: &TaskId, index: usize) -> Option<bool> {
        let previous = self.store.get(id)?.subtask_done.clone();
        let done = self.store.toggle_subtask(id, index)?;
        let task = self.store.get(id)?.clone();

        if let Some(card) = self.view.card_mut(&id.dom_id()) {
            let p = progress(&task);
            card.progress = p.has_bar().then_some(p);
        }
        tracing::debug!(task = %id, index, done, "toggled subtask");

        let status = task.status;
        self.persister
            .submit(PersistRequest::new(task, status, previous));
        Some(done)
    }

    /// Store, view, placeholders, write. The task must exist.
    fn apply_status(&mut self, id: &TaskId, to: Status) -> Transition {
        let Some(from) = self.store.set_status(id, to) else {
            return aborted(Abort::UnknownTask(id.clone()));
        };
        self.view.move_card(&id.dom_id(), to.column());
        refresh_placeholders(&mut self.view, &self.settings.placeholders);

        if let Some(task) = self.store.get(id) {
            let previous_done = task.subtask_done.clone();
            self.persister
                .submit(PersistRequest::new(task.clone(), from, previous_done));
        }

        if from == to {
            tracing::debug!(task = %id, status = %to, "dropped on own column");
            Transition::Unchanged {
                id: id.clone(),
                status: to,
            }
        } else {
            tracing::info!(task = %id, %from, %to, "moved task");
            Transition::Moved {
                id: id.clone(),
                from,
                to,
            }
        }
    }
}

fn aborted(reason: Abort) -> Transition {
    tracing::debug!(?reason, "transition aborted");
    Transition::Aborted(reason)
}
