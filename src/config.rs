use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::connection::Connection;
use crate::logger::debug;

const APP_NAME: &str = "pguserdemo";
const CONNECTIONS_FILE: &str = "connections.yaml";
pub const LOG_FILE: &str = "pguserdemo.log";

/// Return the application config directory path, creating it if missing.
pub fn get_app_config_path() -> Result<PathBuf> {
    let mut path = if cfg!(target_os = "macos") {
        dirs_next::home_dir().map(|h| h.join(".config"))
    } else {
        dirs_next::config_dir()
    }
    .ok_or_else(|| anyhow::anyhow!("failed to find os config dir."))?;

    path.push(APP_NAME);
    fs::create_dir_all(&path)
        .with_context(|| format!("failed to create config dir {}", path.display()))?;
    Ok(path)
}

/// Load the connections list from `path`. Fails if the file is missing.
pub fn load_connections_from(path: &Path) -> Result<Vec<Connection>> {
    let data = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let list: Vec<Connection> = serde_yaml::from_slice(&data)
        .with_context(|| format!("failed to parse YAML at {}", path.display()))?;
    Ok(list)
}

/// Load connections from the default location. Returns empty list if the
/// config dir or the file does not exist.
pub fn load_connections() -> Result<Vec<Connection>> {
    match get_app_config_path() {
        Ok(dir) => load_connections_in(&dir),
        Err(err) => {
            debug(&format!("no config dir, using defaults: {:#}", err));
            Ok(Vec::new())
        }
    }
}

fn load_connections_in(dir: &Path) -> Result<Vec<Connection>> {
    let path = dir.join(CONNECTIONS_FILE);
    if !path.exists() {
        return Ok(Vec::new());
    }
    load_connections_from(&path)
}

/// Pick the connection to use: the entry called `name` when given, else the
/// first entry, else the built-in placeholder connection.
pub fn select_connection(list: Vec<Connection>, name: Option<&str>) -> Result<Connection> {
    match name {
        Some(name) => list
            .into_iter()
            .find(|c| c.name.as_deref() == Some(name))
            .ok_or_else(|| anyhow::anyhow!("no connection named {:?} in config", name)),
        None => Ok(list.into_iter().next().unwrap_or_default()),
    }
}
