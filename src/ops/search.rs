use regex::Regex;

use crate::board::view::{BoardView, Display};
use crate::model::task::Task;
use crate::ops::store::TaskStore;

/// Whether a task matches a search term: case-insensitive substring of the
/// title or the description. `needle` must already be lowercased.
fn task_matches(task: &Task, needle: &str) -> bool {
    task.title.to_lowercase().contains(needle) || task.description.to_lowercase().contains(needle)
}

/// Show or hide rendered cards by a search term.
///
/// Text is always read from the store, never from the cards. Nodes are only
/// shown or hidden, never removed or reordered, and every call recomputes
/// visibility over all cards. Returns whether at least one card matched; the
/// no-results banner is shown exactly when it returns false.
///
/// A blank term clears the filter: every card is shown and the banner hidden.
pub fn apply_filter(term: &str, store: &TaskStore, view: &mut BoardView) -> bool {
    let needle = term.trim().to_lowercase();

    if needle.is_empty() {
        for card in view.cards_mut() {
            card.display = Display::Flex;
        }
        view.no_results_visible = false;
        return true;
    }

    let mut matched_any = false;
    for card in view.cards_mut() {
        let hit = store
            .get(&card.task_id)
            .is_some_and(|task| task_matches(task, &needle));
        card.display = if hit { Display::Flex } else { Display::None };
        matched_any |= hit;
    }
    view.no_results_visible = !matched_any;
    matched_any
}

/// Case-insensitive literal regex for highlighting a term in rendered text
pub fn highlight_regex(term: &str) -> Option<Regex> {
    let term = term.trim();
    if term.is_empty() {
        return None;
    }
    Regex::new(&format!("(?i){}", regex::escape(term))).ok()
}

/// Ids of tasks matching a term, in store order (used by the CLI)
pub fn matching_tasks<'a>(term: &str, store: &'a TaskStore) -> Vec<&'a Task> {
    let needle = term.trim().to_lowercase();
    store
        .iter()
        .filter(|t| needle.is_empty() || task_matches(t, &needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::card::render_card;
    use crate::model::{TaskRaw, UserDirectory};
    use indexmap::IndexMap;
    use serde_json::json;

    fn setup() -> (TaskStore, BoardView) {
        let mut snap = IndexMap::new();
        snap.insert(
            "1".to_string(),
            TaskRaw::from_value(&json!({"title": "Design login", "description": "Mockups"})),
        );
        snap.insert(
            "2".to_string(),
            TaskRaw::from_value(&json!({"title": "Write API", "description": "LOGIN endpoint", "status": "done"})),
        );
        snap.insert(
            "3".to_string(),
            TaskRaw::from_value(&json!({"title": "Deploy", "description": "prod"})),
        );
        let store = TaskStore::from_snapshot(&snap);
        let mut view = BoardView::new();
        let users = UserDirectory::default();
        for task in store.iter() {
            view.append_card(task.status.column(), render_card(task, &users));
        }
        (store, view)
    }

    fn visible_ids(view: &BoardView) -> Vec<String> {
        view.cards()
            .filter(|(_, c)| c.is_visible())
            .map(|(_, c)| c.task_id.to_string())
            .collect()
    }

    #[test]
    fn matches_title_and_description_case_insensitively() {
        let (store, mut view) = setup();
        assert!(apply_filter("login", &store, &mut view));
        assert_eq!(visible_ids(&view), vec!["1", "2"]);
        assert!(!view.no_results_visible);
    }

    #[test]
    fn no_match_hides_everything_and_shows_banner() {
        let (store, mut view) = setup();
        assert!(!apply_filter("xyz-no-match", &store, &mut view));
        assert!(visible_ids(&view).is_empty());
        assert!(view.no_results_visible);
        // nodes are hidden, not removed
        assert_eq!(view.cards().count(), 3);
    }

    #[test]
    fn each_call_starts_from_scratch() {
        let (store, mut view) = setup();
        apply_filter("deploy", &store, &mut view);
        assert_eq!(visible_ids(&view), vec!["3"]);
        apply_filter("mock", &store, &mut view);
        assert_eq!(visible_ids(&view), vec!["1"]);
        assert!(apply_filter("  ", &store, &mut view));
        assert_eq!(visible_ids(&view).len(), 3);
        assert!(!view.no_results_visible);
    }

    #[test]
    fn reads_text_from_store_not_cards() {
        let (store, mut view) = setup();
        view.card_mut("task-3").unwrap().title = "login".into();
        apply_filter("login", &store, &mut view);
        assert_eq!(visible_ids(&view), vec!["1", "2"]);
    }

    #[test]
    fn highlight_regex_is_literal() {
        let re = highlight_regex("a.b").unwrap();
        assert!(re.is_match("xA.By"));
        assert!(!re.is_match("axb"));
        assert!(highlight_regex(" ").is_none());
    }

    #[test]
    fn matching_tasks_in_store_order() {
        let (store, _) = setup();
        let ids: Vec<String> = matching_tasks("LOGIN", &store)
            .iter()
            .map(|t| t.id.to_string())
            .collect();
        assert_eq!(ids, vec!["1", "2"]);
    }
}
