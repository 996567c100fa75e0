use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::status::Status;

/// Configuration from tack.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub board: BoardConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Root URL of the document store, e.g. `https://example.firebaseio.com`
    #[serde(default)]
    pub base_url: String,
    /// Appended to every resource path (`.json` for Firebase-style stores)
    #[serde(default)]
    pub path_suffix: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        BackendConfig {
            base_url: String::new(),
            path_suffix: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Revert an optimistic change when its write fails
    #[serde(default)]
    pub rollback_on_failure: bool,
    #[serde(default)]
    pub placeholders: PlaceholderConfig,
}

/// Messages shown in empty columns
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceholderConfig {
    #[serde(default = "default_todo_msg")]
    pub todo: String,
    #[serde(default = "default_in_progress_msg")]
    pub in_progress: String,
    #[serde(default = "default_await_msg", rename = "await")]
    pub await_feedback: String,
    #[serde(default = "default_done_msg")]
    pub done: String,
}

impl Default for PlaceholderConfig {
    fn default() -> Self {
        PlaceholderConfig {
            todo: default_todo_msg(),
            in_progress: default_in_progress_msg(),
            await_feedback: default_await_msg(),
            done: default_done_msg(),
        }
    }
}

impl PlaceholderConfig {
    pub fn message(&self, status: Status) -> &str {
        match status {
            Status::Todo => &self.todo,
            Status::InProgress => &self.in_progress,
            Status::AwaitFeedback => &self.await_feedback,
            Status::Done => &self.done,
        }
    }
}

fn default_todo_msg() -> String {
    "No tasks To do".into()
}

fn default_in_progress_msg() -> String {
    "No tasks In progress".into()
}

fn default_await_msg() -> String {
    "No tasks Await feedback".into()
}

fn default_done_msg() -> String {
    "No tasks Done".into()
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UiConfig {
    /// Hex overrides for theme slots (`background`, `text`, ...)
    #[serde(default)]
    pub colors: HashMap<String, String>,
    /// Hex overrides for user color classes (`user-color-3 = "#FF8800"`)
    #[serde(default)]
    pub user_colors: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log file for the TUI. Default: `tack.log` in the system temp dir.
    #[serde(default)]
    pub file: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: default_log_level(),
            file: None,
        }
    }
}

fn default_log_level() -> String {
    "info".into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gets_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.backend.timeout_secs, 10);
        assert!(!config.board.rollback_on_failure);
        assert_eq!(
            config.board.placeholders.message(Status::AwaitFeedback),
            "No tasks Await feedback"
        );
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn overrides_are_read() {
        let config: Config = toml::from_str(
            r##"
[backend]
base_url = "https://board.example.com"
path_suffix = ".json"

[board]
rollback_on_failure = true

[board.placeholders]
await = "Nothing waiting"

[ui.user_colors]
user-color-1 = "#112233"
"##,
        )
        .unwrap();
        assert_eq!(config.backend.base_url, "https://board.example.com");
        assert_eq!(config.backend.path_suffix, ".json");
        assert!(config.board.rollback_on_failure);
        assert_eq!(
            config.board.placeholders.message(Status::AwaitFeedback),
            "Nothing waiting"
        );
        assert_eq!(config.board.placeholders.message(Status::Done), "No tasks Done");
        assert_eq!(
            config.ui.user_colors.get("user-color-1").map(String::as_str),
            Some("#112233")
        );
    }
}
