//! # Workspace
//!
//! The project-configuration store. A workspace is a directory holding a
//! `rigging.toml` that lists every project by name and root; each project
//! keeps its targets in `<root>/project.json`. Reads and writes go through
//! [`Workspace`], which also owns the one persistence rule every caller relies
//! on: target maps are written with their keys sorted.
use crate::{
    constants::{PROJECT_CONFIG_FILENAME, WORKSPACE_CONFIG_FILENAME, WORKSPACE_ENV_VAR},
    core::{
        chain_merger::{self, MergeError},
        paths::{self, PathError},
    },
    models::{DefaultsConfig, ProjectConfiguration, TargetMap, UserConfig, WorkspaceConfig},
};
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Represents errors that can occur while reading or writing workspace state.
#[derive(Error, Debug)]
pub enum WorkspaceError {
    /// A filesystem I/O error occurred.
    #[error("Filesystem Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Path error: {0}")]
    Path(#[from] PathError),
    /// No `rigging.toml` between the start directory and the filesystem root.
    #[error("No 'rigging.toml' found in '{start}' or any of its parents. Run `rig init` first.")]
    NotFound { start: PathBuf },
    #[error("A workspace already exists at '{0}'.")]
    AlreadyInitialized(PathBuf),
    #[error("Failed to parse '{path}': {source}")]
    TomlParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Failed to serialize to TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    #[error("Failed to parse '{path}': {source}")]
    JsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to serialize to JSON: {0}")]
    JsonSerialize(#[from] serde_json::Error),
    #[error("Project '{name}' not found in workspace.")]
    ProjectNotFound { name: String },
    #[error("A project named '{name}' already exists at '{root}'.")]
    ProjectExists { name: String, root: String },
    #[error(transparent)]
    Merge(#[from] MergeError),
}

type WorkspaceResult<T> = Result<T, WorkspaceError>;

/// An opened workspace: its root, its `rigging.toml` and the effective defaults.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
    config: WorkspaceConfig,
    defaults: DefaultsConfig,
}

impl Workspace {
    /// Finds and opens the workspace for `start`.
    ///
    /// `RIGGING_WORKSPACE` takes priority (with `~` and `$VAR` expansion);
    /// otherwise the nearest ancestor holding a `rigging.toml` is used.
    pub fn locate(start: &Path) -> WorkspaceResult<Self> {
        if let Ok(template) = env::var(WORKSPACE_ENV_VAR) {
            let root = paths::expand_path_template(&template)?;
            log::debug!("Using workspace from {}: {}", WORKSPACE_ENV_VAR, root.display());
            return Self::open(&root);
        }
        let root = paths::find_workspace_root(start).ok_or_else(|| WorkspaceError::NotFound {
            start: start.to_path_buf(),
        })?;
        Self::open(&root)
    }

    /// Opens the workspace rooted at `root`, layering its defaults over the
    /// user-level `config.toml`.
    pub fn open(root: &Path) -> WorkspaceResult<Self> {
        Self::load(root, load_user_defaults()?)
    }

    pub(crate) fn load(root: &Path, user_defaults: DefaultsConfig) -> WorkspaceResult<Self> {
        let root = dunce::canonicalize(root)?;
        let config_path = root.join(WORKSPACE_CONFIG_FILENAME);
        if !config_path.is_file() {
            return Err(WorkspaceError::NotFound { start: root });
        }
        let content = fs::read_to_string(&config_path)?;
        let config: WorkspaceConfig = toml::from_str(&content).map_err(|source| WorkspaceError::TomlParse {
            path: config_path.clone(),
            source,
        })?;
        log::debug!(
            "Loaded workspace at '{}' with {} project(s).",
            root.display(),
            config.projects.len()
        );
        let defaults = config.defaults.clone().layered_over(user_defaults);
        Ok(Self { root, config, defaults })
    }

    /// Creates a new `rigging.toml` at `root`. Refuses to overwrite an existing one.
    pub fn init(root: &Path, config: WorkspaceConfig) -> WorkspaceResult<Self> {
        fs::create_dir_all(root)?;
        let root = dunce::canonicalize(root)?;
        if root.join(WORKSPACE_CONFIG_FILENAME).exists() {
            return Err(WorkspaceError::AlreadyInitialized(root));
        }
        let workspace = Self {
            defaults: config.defaults.clone(),
            root,
            config,
        };
        workspace.save_config()?;
        Ok(workspace)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &WorkspaceConfig {
        &self.config
    }

    /// Effective defaults: workspace `[defaults]` over the user-level ones.
    pub fn defaults(&self) -> &DefaultsConfig {
        &self.defaults
    }

    pub fn project_names(&self) -> impl Iterator<Item = &str> {
        self.config.projects.keys().map(String::as_str)
    }

    pub fn contains_project(&self, name: &str) -> bool {
        self.config.projects.contains_key(name)
    }

    /// Absolute path of a project's root directory.
    pub fn project_root(&self, name: &str) -> WorkspaceResult<PathBuf> {
        self.config
            .projects
            .get(name)
            .map(|root| self.root.join(root))
            .ok_or_else(|| WorkspaceError::ProjectNotFound { name: name.to_string() })
    }

    /// Reads a project's `project.json`.
    pub fn read_project(&self, name: &str) -> WorkspaceResult<ProjectConfiguration> {
        let path = self.project_root(name)?.join(PROJECT_CONFIG_FILENAME);
        let content = fs::read_to_string(&path)?;
        let project: ProjectConfiguration =
            serde_json::from_str(&content).map_err(|source| WorkspaceError::JsonParse { path, source })?;
        if project.name != name {
            log::warn!(
                "Project registered as '{}' declares the name '{}' in its {}.",
                name,
                project.name,
                PROJECT_CONFIG_FILENAME
            );
        }
        Ok(project)
    }

    /// Writes a project's `project.json`, with its target keys sorted.
    pub fn write_project(&self, project: &ProjectConfiguration) -> WorkspaceResult<()> {
        let dir = self.project_root(&project.name)?;
        let mut sorted = project.clone();
        sorted.targets = chain_merger::sort_target_map(sorted.targets);

        fs::create_dir_all(&dir)?;
        let path = dir.join(PROJECT_CONFIG_FILENAME);
        let mut json = serde_json::to_string_pretty(&sorted)?;
        json.push('\n');
        fs::write(&path, json)?;
        log::debug!("Wrote {}", path.display());
        Ok(())
    }

    /// Registers a new project in `rigging.toml` and writes its `project.json`.
    pub fn add_project(&mut self, project: &ProjectConfiguration) -> WorkspaceResult<()> {
        if let Some(root) = self.config.projects.get(&project.name) {
            return Err(WorkspaceError::ProjectExists {
                name: project.name.clone(),
                root: root.clone(),
            });
        }
        self.config
            .projects
            .insert(project.name.clone(), project.root.clone());
        self.write_project(project)?;
        self.save_config()?;
        log::info!("Registered project '{}' at '{}'.", project.name, project.root);
        Ok(())
    }

    /// Read-modify-write of one project's targets.
    ///
    /// `update` receives the current map and returns the new one; the result
    /// is sorted and persisted. Nothing is written if `update` fails.
    pub fn update_targets<F, E>(&self, name: &str, update: F) -> Result<ProjectConfiguration, E>
    where
        F: FnOnce(&ProjectConfiguration, TargetMap) -> Result<TargetMap, E>,
        E: From<WorkspaceError>,
    {
        let mut project = self.read_project(name)?;
        let targets = std::mem::take(&mut project.targets);
        project.targets = chain_merger::sort_target_map(update(&project, targets)?);
        self.write_project(&project)?;
        Ok(project)
    }

    fn save_config(&self) -> WorkspaceResult<()> {
        let path = self.root.join(WORKSPACE_CONFIG_FILENAME);
        fs::write(&path, toml::to_string_pretty(&self.config)?)?;
        log::debug!("Wrote {}", path.display());
        Ok(())
    }
}

/// Loads `[defaults]` from the user-level `config.toml`, if there is one.
fn load_user_defaults() -> WorkspaceResult<DefaultsConfig> {
    let path = match paths::get_user_config_path() {
        Ok(path) => path,
        Err(PathError::ConfigDirNotFound) => return Ok(DefaultsConfig::default()),
        Err(e) => return Err(e.into()),
    };
    if !path.is_file() {
        return Ok(DefaultsConfig::default());
    }
    let content = fs::read_to_string(&path)?;
    let user: UserConfig =
        toml::from_str(&content).map_err(|source| WorkspaceError::TomlParse { path, source })?;
    Ok(user.defaults)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::chain_merger::{Additions, ChainAddition};
    use crate::models::{ProjectType, Target};
    use serde_json::json;

    fn new_workspace() -> (tempfile::TempDir, Workspace) {
        let dir = tempfile::tempdir().unwrap();
        let workspace = Workspace::init(dir.path(), WorkspaceConfig::default()).unwrap();
        (dir, workspace)
    }

    fn sample_project() -> ProjectConfiguration {
        let mut project = ProjectConfiguration::new("api", "apps/api", ProjectType::Application);
        project
            .targets
            .insert("version".to_string(), Target::new("rigging:set-version", json!({})));
        project
            .targets
            .insert("build".to_string(), Target::new("rigging:dotnet-build", json!({})));
        project
    }

    #[test]
    fn test_init_refuses_existing_workspace() {
        let (dir, _workspace) = new_workspace();
        let result = Workspace::init(dir.path(), WorkspaceConfig::default());
        assert!(matches!(result, Err(WorkspaceError::AlreadyInitialized(_))));
    }

    #[test]
    fn test_add_and_read_project_round_trip() {
        let (dir, mut workspace) = new_workspace();
        workspace.add_project(&sample_project()).unwrap();

        let reopened = Workspace::load(dir.path(), DefaultsConfig::default()).unwrap();
        assert!(reopened.contains_project("api"));
        let project = reopened.read_project("api").unwrap();
        assert_eq!(project.root, "apps/api");
        // Persisted in sorted order regardless of insertion order.
        assert_eq!(project.targets.keys().collect::<Vec<_>>(), vec!["build", "version"]);
    }

    #[test]
    fn test_add_project_refuses_duplicates() {
        let (_dir, mut workspace) = new_workspace();
        workspace.add_project(&sample_project()).unwrap();
        let result = workspace.add_project(&sample_project());
        assert!(matches!(result, Err(WorkspaceError::ProjectExists { name, .. }) if name == "api"));
    }

    #[test]
    fn test_read_unknown_project_fails() {
        let (_dir, workspace) = new_workspace();
        let result = workspace.read_project("ghost");
        assert!(matches!(result, Err(WorkspaceError::ProjectNotFound { name }) if name == "ghost"));
    }

    #[test]
    fn test_update_targets_merges_and_persists_sorted() {
        let (_dir, mut workspace) = new_workspace();
        workspace.add_project(&sample_project()).unwrap();

        workspace
            .update_targets::<_, WorkspaceError>("api", |_, targets| {
                let mut additions = Additions::new();
                additions.insert("build".to_string(), ChainAddition::targets(["test"]));
                Ok(chain_merger::merge_additions(targets, additions)?)
            })
            .unwrap();

        let project = workspace.read_project("api").unwrap();
        assert_eq!(
            project.targets.keys().collect::<Vec<_>>(),
            vec!["build", "buildSrc", "version"]
        );
        assert!(project.targets.get("build").unwrap().is_chain());
    }

    #[test]
    fn test_failed_update_writes_nothing() {
        let (_dir, mut workspace) = new_workspace();
        workspace.add_project(&sample_project()).unwrap();
        let before = workspace.read_project("api").unwrap();

        let result = workspace.update_targets("api", |project, _| {
            Err(WorkspaceError::ProjectExists {
                name: project.name.clone(),
                root: project.root.clone(),
            })
        });

        assert!(result.is_err());
        assert_eq!(workspace.read_project("api").unwrap(), before);
    }
}
