use crate::model::config::PlaceholderConfig;
use crate::model::status::ColumnId;

use super::view::{BoardView, Node, PlaceholderNode};

/// Recompute the empty-column state of all four columns.
///
/// A column with any card child (visible or hidden by search) loses its
/// placeholder and hides the header hint. An empty column gets exactly one
/// placeholder with its configured message and shows the header hint. Run
/// after every structural change; search filtering does not need it.
pub fn refresh_placeholders(view: &mut BoardView, messages: &PlaceholderConfig) {
    for id in ColumnId::ALL {
        let message = messages.message(id.status());
        let column = view.column_mut(id);
        let has_cards = column.children.iter().any(|n| !n.is_placeholder());

        if has_cards {
            column.children.retain(|n| !n.is_placeholder());
            column.header_hint_visible = false;
        } else {
            column.children.clear();
            column.children.push(Node::Placeholder(PlaceholderNode {
                message: message.to_string(),
            }));
            column.header_hint_visible = true;
        }
    }
}
