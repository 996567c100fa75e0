//! The board's view projection.
//!
//! A disposable tree of column containers holding card and placeholder
//! nodes. It is rebuilt from the task store on every full load and patched
//! in place on mutation. Business logic never reads task data from here;
//! the only things owned by the view are presentation state (visibility,
//! placeholders, drag-over hints, the no-results banner).

use serde::Serialize;

use crate::model::status::ColumnId;

use super::card::CardNode;

/// Card visibility set by the search overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Display {
    Flex,
    None,
}

/// Empty-column message node
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaceholderNode {
    pub message: String,
}

/// A child of a column container
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Node {
    Card(CardNode),
    Placeholder(PlaceholderNode),
}

impl Node {
    pub fn as_card(&self) -> Option<&CardNode> {
        match self {
            Node::Card(card) => Some(card),
            Node::Placeholder(_) => None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Node::Placeholder(_))
    }
}

/// One column container
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnNode {
    #[serde(serialize_with = "serialize_column_id")]
    pub id: ColumnId,
    pub children: Vec<Node>,
    /// The static "empty" hint in the column header
    pub header_hint_visible: bool,
    /// Visual hint while a card is dragged over this column
    pub drag_over: bool,
}

fn serialize_column_id<S: serde::Serializer>(id: &ColumnId, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(id.dom_id())
}

impl ColumnNode {
    fn new(id: ColumnId) -> Self {
        ColumnNode {
            id,
            children: Vec::new(),
            header_hint_visible: false,
            drag_over: false,
        }
    }

    pub fn cards(&self) -> impl Iterator<Item = &CardNode> {
        self.children.iter().filter_map(Node::as_card)
    }

    pub fn visible_cards(&self) -> impl Iterator<Item = &CardNode> {
        self.cards().filter(|c| c.is_visible())
    }

    pub fn placeholder(&self) -> Option<&PlaceholderNode> {
        self.children.iter().find_map(|n| match n {
            Node::Placeholder(p) => Some(p),
            Node::Card(_) => None,
        })
    }

    fn position(&self, element_id: &str) -> Option<usize> {
        self.children
            .iter()
            .position(|n| n.as_card().is_some_and(|c| c.element_id == element_id))
    }
}

/// The whole board: four columns plus the search banner
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardView {
    columns: Vec<ColumnNode>,
    pub no_results_visible: bool,
}

impl Default for BoardView {
    fn default() -> Self {
        BoardView::new()
    }
}

impl BoardView {
    pub fn new() -> Self {
        BoardView {
            columns: ColumnId::ALL.into_iter().map(ColumnNode::new).collect(),
            no_results_visible: false,
        }
    }

    pub fn columns(&self) -> &[ColumnNode] {
        &self.columns
    }

    pub fn column(&self, id: ColumnId) -> &ColumnNode {
        &self.columns[id.index()]
    }

    pub fn column_mut(&mut self, id: ColumnId) -> &mut ColumnNode {
        &mut self.columns[id.index()]
    }

    /// Resolve a column element id, e.g. `doneList`
    pub fn column_by_dom_id(&self, dom_id: &str) -> Option<&ColumnNode> {
        ColumnId::from_dom_id(dom_id).map(|id| self.column(id))
    }

    /// Remove every child node from every column
    pub fn clear(&mut self) {
        for col in &mut self.columns {
            col.children.clear();
            col.drag_over = false;
        }
        self.no_results_visible = false;
    }

    /// All cards with the column they sit in
    pub fn cards(&self) -> impl Iterator<Item = (ColumnId, &CardNode)> {
        self.columns
            .iter()
            .flat_map(|col| col.cards().map(move |c| (col.id, c)))
    }

    pub fn cards_mut(&mut self) -> impl Iterator<Item = &mut CardNode> {
        self.columns
            .iter_mut()
            .flat_map(|col| col.children.iter_mut())
            .filter_map(|n| match n {
                Node::Card(card) => Some(card),
                Node::Placeholder(_) => None,
            })
    }

    /// Locate a card by element id
    pub fn find_card(&self, element_id: &str) -> Option<(ColumnId, usize)> {
        self.columns
            .iter()
            .find_map(|col| col.position(element_id).map(|i| (col.id, i)))
    }

    pub fn card(&self, element_id: &str) -> Option<&CardNode> {
        let (col, i) = self.find_card(element_id)?;
        self.column(col).children[i].as_card()
    }

    pub fn card_mut(&mut self, element_id: &str) -> Option<&mut CardNode> {
        let (col, i) = self.find_card(element_id)?;
        match &mut self.column_mut(col).children[i] {
            Node::Card(card) => Some(card),
            Node::Placeholder(_) => None,
        }
    }

    pub fn append_card(&mut self, column: ColumnId, card: CardNode) {
        self.column_mut(column).children.push(Node::Card(card));
    }

    /// Move a card node into `target`. A card already in `target` stays where
    /// it is. Returns false when no card has that element id.
    pub fn move_card(&mut self, element_id: &str, target: ColumnId) -> bool {
        let Some((from, i)) = self.find_card(element_id) else {
            return false;
        };
        if from == target {
            return true;
        }
        let node = self.column_mut(from).children.remove(i);
        self.column_mut(target).children.push(node);
        true
    }

    pub fn remove_card(&mut self, element_id: &str) -> Option<CardNode> {
        let (col, i) = self.find_card(element_id)?;
        match self.column_mut(col).children.remove(i) {
            Node::Card(card) => Some(card),
            Node::Placeholder(_) => None,
        }
    }

    /// Replace a card in place, keeping its visibility. Returns false when no
    /// card with the same element id exists.
    pub fn replace_card(&mut self, mut card: CardNode) -> bool {
        match self.card_mut(&card.element_id) {
            Some(existing) => {
                card.display = existing.display;
                *existing = card;
                true
            }
            None => false,
        }
    }

    pub fn set_drag_over(&mut self, column: ColumnId, over: bool) {
        self.column_mut(column).drag_over = over;
    }

    pub fn clear_drag_over(&mut self) {
        for col in &mut self.columns {
            col.drag_over = false;
        }
    }

    pub fn visible_card_count(&self) -> usize {
        self.cards().filter(|(_, c)| c.is_visible()).count()
    }
}
