use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::storage::StoreOptions;
use crate::{Error, Result};

/// Environment variable naming the storage root
pub const ROOT_ENV: &str = "GAMEDATA_ROOT";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct GameDataConfig {
    /// Directory holding the game's persistent data
    pub data_root: Option<String>,
    /// Database file, relative to `data_root` unless absolute
    pub database: Option<String>,
    /// Create the database file (and its directory) on first open
    pub create_if_missing: Option<bool>,
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("gamedata.toml")
}

pub fn default_database_path_in(root: &Path) -> PathBuf {
    root.join("Databases").join("GameData.db")
}

pub fn load_config(path: Option<&Path>) -> Result<Option<GameDataConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: GameDataConfig = toml::from_str(&contents)
        .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &GameDataConfig, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(Error::Config(format!(
            "config already exists at {} (use --force to overwrite)",
            path.display()
        )));
    }

    let contents = toml::to_string_pretty(config).map_err(|e| Error::Config(e.to_string()))?;
    std::fs::write(path, contents)?;
    Ok(())
}

pub fn ensure_db_dir(db_path: &Path) -> Result<()> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

impl GameDataConfig {
    pub fn with_data_root(mut self, root: impl Into<String>) -> Self {
        self.data_root = Some(root.into());
        self
    }

    /// Database location under the given storage root
    pub fn database_path_in(&self, root: &Path) -> PathBuf {
        match &self.database {
            Some(database) => root.join(database),
            None => default_database_path_in(root),
        }
    }

    pub fn store_options_in(&self, root: &Path) -> StoreOptions {
        StoreOptions::new(self.database_path_in(root))
            .create_if_missing(self.create_if_missing.unwrap_or(true))
    }
}

/// Pick the storage root: explicit override, then environment, then config, then cwd.
pub fn resolve_root(
    root_override: Option<&Path>,
    env_root: Option<String>,
    config: &GameDataConfig,
) -> PathBuf {
    if let Some(root) = root_override {
        return root.to_path_buf();
    }
    if let Some(root) = env_root.filter(|r| !r.is_empty()) {
        return PathBuf::from(root);
    }
    if let Some(root) = &config.data_root {
        return PathBuf::from(root);
    }
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// Resolve the options the process-wide store handle is built from.
///
/// Never fails: an unreadable config file is logged and ignored.
pub fn resolve_options(root_override: Option<&Path>, config_path: Option<&Path>) -> StoreOptions {
    let config = match load_config(config_path) {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            tracing::warn!("Ignoring config: {}", e);
            GameDataConfig::default()
        }
    };

    let root = resolve_root(root_override, std::env::var(ROOT_ENV).ok(), &config);
    config.store_options_in(&root)
}
