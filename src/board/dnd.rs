use crate::model::status::ColumnId;

use super::view::BoardView;

/// Drag payload, the terminal counterpart of a browser `DataTransfer`.
/// Holds the dragged element's id as plain text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataTransfer {
    data: Option<String>,
}

impl DataTransfer {
    pub fn with_data(data: impl Into<String>) -> Self {
        DataTransfer {
            data: Some(data.into()),
        }
    }

    pub fn set_data(&mut self, data: impl Into<String>) {
        self.data = Some(data.into());
    }

    pub fn get_data(&self) -> Option<&str> {
        self.data.as_deref()
    }

    pub fn clear(&mut self) {
        self.data = None;
    }
}

/// Tracks one drag gesture from start to drop. Mouse drags and the keyboard
/// grab mode both drive it.
#[derive(Debug, Default)]
pub struct DragController {
    transfer: DataTransfer,
    hovered: Option<ColumnId>,
}

impl DragController {
    /// Begin dragging a card. Only draggable cards can be picked up; the
    /// card's element id goes into the payload.
    pub fn start(&mut self, view: &BoardView, element_id: &str) -> bool {
        match view.card(element_id) {
            Some(card) if card.draggable => {
                self.transfer.set_data(card.element_id.clone());
                self.hovered = None;
                true
            }
            _ => false,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.transfer.get_data().is_some()
    }

    /// Element id being dragged
    pub fn dragged(&self) -> Option<&str> {
        self.transfer.get_data()
    }

    pub fn hovered(&self) -> Option<ColumnId> {
        self.hovered
    }

    /// Pointer entered or moved over a column: only that column shows the
    /// drag-over hint
    pub fn over(&mut self, view: &mut BoardView, column: ColumnId) {
        if !self.is_dragging() {
            return;
        }
        if let Some(prev) = self.hovered
            && prev != column
        {
            view.set_drag_over(prev, false);
        }
        view.set_drag_over(column, true);
        self.hovered = Some(column);
    }

    /// Pointer left a column
    pub fn leave(&mut self, view: &mut BoardView, column: ColumnId) {
        view.set_drag_over(column, false);
        if self.hovered == Some(column) {
            self.hovered = None;
        }
    }

    /// End the gesture and hand over the payload for the drop handler
    pub fn finish(&mut self) -> DataTransfer {
        self.hovered = None;
        std::mem::take(&mut self.transfer)
    }

    /// Abandon the gesture without dropping
    pub fn cancel(&mut self, view: &mut BoardView) {
        view.clear_drag_over();
        self.transfer.clear();
        self.hovered = None;
    }
}
