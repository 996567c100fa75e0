use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::Config;

/// File name searched for when no config path is given
pub const CONFIG_FILE: &str = "tack.toml";

/// Environment variable naming a config file
pub const CONFIG_ENV: &str = "TACK_CONFIG";

/// Error type for config discovery and loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    Missing(PathBuf),
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// A parsed config and the file it came from (`None` when running on
/// defaults)
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    pub config: Config,
    pub path: Option<PathBuf>,
}

impl LoadedConfig {
    /// Directory holding the config file; UI state is kept next to it
    pub fn dir(&self) -> Option<&Path> {
        self.path.as_deref().and_then(Path::parent)
    }
}

/// Walk up from `start` looking for `tack.toml`
pub fn discover_config(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(CONFIG_FILE);
        if candidate.is_file() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Pick the config file: an explicit path first, then the environment
/// variable, then discovery from `cwd`. Explicitly named files must exist.
pub fn locate_config(
    explicit: Option<&Path>,
    env: Option<OsString>,
    cwd: &Path,
) -> Result<Option<PathBuf>, ConfigError> {
    let named = explicit
        .map(Path::to_path_buf)
        .or_else(|| env.filter(|v| !v.is_empty()).map(PathBuf::from));
    match named {
        Some(path) if path.is_file() => Ok(Some(path)),
        Some(path) => Err(ConfigError::Missing(path)),
        None => Ok(discover_config(cwd)),
    }
}

/// Read and parse one config file
pub fn read_config(path: &Path) -> Result<Config, ConfigError> {
    let text = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Locate and load the config. Without any file the defaults are used.
/// `base_url` overrides the backend URL from the file.
pub fn load_config(explicit: Option<&Path>, base_url: Option<&str>) -> Result<LoadedConfig, ConfigError> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let path = locate_config(explicit, std::env::var_os(CONFIG_ENV), &cwd)?;
    let mut config = match &path {
        Some(p) => read_config(p)?,
        None => Config::default(),
    };
    if let Some(url) = base_url.map(str::trim).filter(|u| !u.is_empty()) {
        config.backend.base_url = url.to_string();
    }
    tracing::debug!(path = ?path, base_url = %config.backend.base_url, "config loaded");
    Ok(LoadedConfig { config, path })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn discovery_walks_up() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "").unwrap();
        let nested = tmp.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(discover_config(&nested), Some(tmp.path().join(CONFIG_FILE)));
    }

    #[test]
    fn explicit_path_wins_and_must_exist() {
        let tmp = TempDir::new().unwrap();
        let explicit = tmp.path().join("custom.toml");
        fs::write(&explicit, "").unwrap();
        let env_path = OsString::from(tmp.path().join("env.toml"));

        let found = locate_config(Some(&explicit), Some(env_path.clone()), tmp.path()).unwrap();
        assert_eq!(found, Some(explicit));

        // env path does not exist
        let err = locate_config(None, Some(env_path), tmp.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(_)));
    }

    #[test]
    fn empty_env_falls_back_to_discovery() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "").unwrap();
        let sub = tmp.path().join("sub");
        fs::create_dir(&sub).unwrap();
        let found = locate_config(None, Some(OsString::new()), &sub).unwrap();
        assert_eq!(found, Some(tmp.path().join(CONFIG_FILE)));
    }

    #[test]
    fn parse_errors_name_the_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILE);
        fs::write(&path, "[backend\nbase_url = 1").unwrap();
        let err = read_config(&path).unwrap_err();
        assert!(err.to_string().contains("tack.toml"));
    }

    #[test]
    fn read_valid_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILE);
        fs::write(&path, "[backend]\nbase_url = \"http://127.0.0.1:9000\"\n").unwrap();
        let loaded = LoadedConfig {
            config: read_config(&path).unwrap(),
            path: Some(path),
        };
        assert_eq!(loaded.config.backend.base_url, "http://127.0.0.1:9000");
        assert_eq!(loaded.dir(), Some(tmp.path()));
    }
}
