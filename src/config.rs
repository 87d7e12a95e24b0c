// Runtime configuration.
//
// Defaults put every file in the working directory. A JSON file or the
// `TODO_DATA_DIR` environment variable can move them. The password hashing
// cost is not configurable.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data_dir: PathBuf,
    pub users_file: String,
    pub tasks_file: String,
    pub auth_status_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: PathBuf::from("."),
            users_file: "users.txt".into(),
            tasks_file: "tasks.txt".into(),
            auth_status_file: "auth_status.txt".into(),
        }
    }
}

impl Config {
    /// Build the configuration from `TODO_CONFIG` (or the per-user config
    /// file) and the `TODO_DATA_DIR` override.
    pub fn load() -> Result<Self> {
        let path = std::env::var_os("TODO_CONFIG")
            .map(PathBuf::from)
            .or_else(default_config_path);

        let mut config = match path {
            Some(path) => Config::from_file(&path)?.unwrap_or_default(),
            None => Config::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Parse a JSON config file. A missing file is `Ok(None)`.
    pub fn from_file(path: &Path) -> Result<Option<Self>> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("Reading config {}", path.display()))
            }
        };
        let config: Config = serde_json::from_str(&raw)
            .with_context(|| format!("Parsing config {}", path.display()))?;
        debug!(path = %path.display(), "loaded config file");
        Ok(Some(config))
    }

    /// Apply environment overrides through `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = lookup("TODO_DATA_DIR").filter(|d| !d.is_empty()) {
            self.data_dir = PathBuf::from(dir);
        }
    }

    pub fn users_path(&self) -> PathBuf {
        self.data_dir.join(&self.users_file)
    }

    pub fn tasks_path(&self) -> PathBuf {
        self.data_dir.join(&self.tasks_file)
    }

    pub fn auth_status_path(&self) -> PathBuf {
        self.data_dir.join(&self.auth_status_file)
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("todo-cli").join("config.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_use_working_directory() {
        let config = Config::default();
        assert_eq!(config.users_path(), PathBuf::from("./users.txt"));
        assert_eq!(config.tasks_path(), PathBuf::from("./tasks.txt"));
        assert_eq!(config.auth_status_path(), PathBuf::from("./auth_status.txt"));
    }

    #[test]
    fn missing_file_is_none() {
        let tmp = TempDir::new().unwrap();
        assert!(Config::from_file(&tmp.path().join("nope.json")).unwrap().is_none());
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.json");
        fs::write(&path, r#"{ "data_dir": "/var/todo", "tasks_file": "todo.txt" }"#).unwrap();

        let config = Config::from_file(&path).unwrap().unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/var/todo"));
        assert_eq!(config.tasks_path(), PathBuf::from("/var/todo/todo.txt"));
        assert_eq!(config.users_file, "users.txt");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let err = Config::from_file(&path).unwrap_err();
        assert!(format!("{err:#}").contains("Parsing config"));
    }

    #[test]
    fn data_dir_env_override_applies() {
        let mut config = Config::default();
        config.apply_env(env(&[("TODO_DATA_DIR", "/tmp/x")]));
        assert_eq!(config.data_dir, PathBuf::from("/tmp/x"));

        let mut config = Config::default();
        config.apply_env(env(&[("TODO_DATA_DIR", "")]));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn hashing_cost_is_not_configurable() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.json");
        fs::write(&path, r#"{ "hash_rounds": 10 }"#).unwrap();

        let config = Config::from_file(&path).unwrap().unwrap();
        assert_eq!(config, Config::default());

        let mut config = Config::default();
        config.apply_env(env(&[("TODO_HASH_ROUNDS", "10")]));
        assert_eq!(config, Config::default());
    }
}
