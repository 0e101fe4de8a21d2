// src/core/paths.rs

use crate::constants::{USER_CONFIG_FILENAME, WORKSPACE_CONFIG_FILENAME};
use lazy_static::lazy_static;
use std::path::{Component, Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;

lazy_static! {
    static ref RIGGING_CONFIG_DIR: Mutex<Option<PathBuf>> = Mutex::new(None);
}

#[derive(Error, Debug)]
pub enum PathError {
    #[error("Could not find system config directory.")]
    ConfigDirNotFound,
    #[error("Failed to expand path template '{template}': {message}")]
    Expansion { template: String, message: String },
}

/// Returns the path to the user-level configuration directory (`~/.config/rigging`).
///
/// Memoized: the first call computes the path, later calls return the cached value.
/// Unlike the workspace, this directory is never created implicitly.
pub fn get_rigging_config_dir() -> Result<PathBuf, PathError> {
    let mut cached = RIGGING_CONFIG_DIR
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    if let Some(path) = &*cached {
        return Ok(path.clone());
    }
    let config_path = dirs::config_dir()
        .ok_or(PathError::ConfigDirNotFound)?
        .join("rigging");
    *cached = Some(config_path.clone());
    Ok(config_path)
}

/// Path of the user-level `config.toml`.
pub fn get_user_config_path() -> Result<PathBuf, PathError> {
    get_rigging_config_dir().map(|dir| dir.join(USER_CONFIG_FILENAME))
}

/// Expands `~` and environment variables (`$VAR`, `${VAR}`) in a path template.
pub fn expand_path_template(template: &str) -> Result<PathBuf, PathError> {
    let expanded = shellexpand::full(template).map_err(|e| PathError::Expansion {
        template: template.to_string(),
        message: e.to_string(),
    })?;
    Ok(PathBuf::from(expanded.into_owned()))
}

/// Walks up from `start` looking for a directory containing `rigging.toml`.
pub fn find_workspace_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(WORKSPACE_CONFIG_FILENAME).is_file())
        .map(Path::to_path_buf)
}

/// Renders a relative path with forward slashes, as stored in `project.json`
/// and `rigging.toml`.
pub fn to_slash(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Computes `to` relative to the directory `from`. Both must be relative to the
/// same base (here: the workspace root).
pub fn relative_path(from: &Path, to: &Path) -> PathBuf {
    let from: Vec<_> = from.components().filter(|c| matches!(c, Component::Normal(_))).collect();
    let to: Vec<_> = to.components().filter(|c| matches!(c, Component::Normal(_))).collect();
    let common = from.iter().zip(to.iter()).take_while(|(a, b)| a == b).count();

    let mut result = PathBuf::new();
    for _ in common..from.len() {
        result.push("..");
    }
    for component in to.iter().skip(common) {
        result.push(component.as_os_str());
    }
    result
}
