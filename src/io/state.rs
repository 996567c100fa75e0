use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

/// File name of the persisted UI state, kept next to `tack.toml`
pub const STATE_FILE: &str = ".tack-state.json";

/// Persisted TUI state
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct UiState {
    /// Column the cursor was in (0 = To do)
    #[serde(default)]
    pub focused_column: usize,
    /// Card element id under the cursor
    #[serde(default)]
    pub focused_card: Option<String>,
    /// Last search term
    #[serde(default)]
    pub last_search: Option<String>,
}

/// Read the state file from `dir`. Missing or malformed files give `None`.
pub fn read_ui_state(dir: &Path) -> Option<UiState> {
    let content = fs::read_to_string(dir.join(STATE_FILE)).ok()?;
    serde_json::from_str(&content).ok()
}

/// Write the state file into `dir`
pub fn write_ui_state(dir: &Path, state: &UiState) -> io::Result<()> {
    let content = serde_json::to_string_pretty(state)?;
    atomic_write(&dir.join(STATE_FILE), content.as_bytes())
}

/// Write via a temp file in the same directory and rename over the target,
/// so readers never see a half-written file
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
