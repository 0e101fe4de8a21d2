// src/models.rs

use crate::constants::CHAIN_EXECUTOR;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

// --- TARGET MODELS (what lives under `targets` in project.json) ---

/// All named targets of one project, in insertion order.
pub type TargetMap = IndexMap<String, Target>;

/// A named build step. `options` is deliberately loose: only the executor
/// that runs the target knows its shape.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Target {
    pub executor: String,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub options: Map<String, Value>,
    /// Any other keys (`dependsOn`, `outputs`, ...), carried through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Target {
    /// Creates a target for `executor`. Non-object `options` are treated as empty.
    pub fn new(executor: impl Into<String>, options: Value) -> Self {
        let options = match options {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            executor: executor.into(),
            options,
            extra: Map::new(),
        }
    }

    /// A fresh, empty chain target.
    pub fn chain() -> Self {
        Self::new(CHAIN_EXECUTOR, Value::Null)
    }

    pub fn is_chain(&self) -> bool {
        self.executor == CHAIN_EXECUTOR
    }

    /// Reads the chain options of this target without consuming it.
    /// Returns `None` for leaf targets.
    pub fn chain_options(&self) -> Option<Result<ChainOptions, serde_json::Error>> {
        if !self.is_chain() {
            return None;
        }
        Some(serde_json::from_value(Value::Object(self.options.clone())))
    }

    /// Classifies the target as a leaf or a chain step.
    pub fn into_step(self) -> Result<Step, serde_json::Error> {
        if !self.is_chain() {
            return Ok(Step::Leaf(self));
        }
        let options = serde_json::from_value(Value::Object(self.options))?;
        Ok(Step::Chain(ChainStep {
            options,
            extra: self.extra,
        }))
    }
}

/// The two shapes a target can take from the point of view of composition.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Any executor other than the chain executor.
    Leaf(Target),
    /// A target that only runs other targets.
    Chain(ChainStep),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChainStep {
    pub options: ChainOptions,
    pub extra: Map<String, Value>,
}

impl ChainStep {
    /// Writes the step back into its persisted `Target` form.
    pub fn into_target(self) -> Result<Target, serde_json::Error> {
        let options = match serde_json::to_value(&self.options)? {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Ok(Target {
            executor: CHAIN_EXECUTOR.to_string(),
            options,
            extra: self.extra,
        })
    }
}

/// The options understood by the chain executor.
/// `None` and `Some(vec![])` are kept distinct so that a merge never invents
/// keys it was not asked to touch.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChainOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub targets: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_targets: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_targets: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_targets: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stages: Option<IndexMap<String, Stage>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A named sub-grouping of a chain, runnable on its own with `--stage`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Stage {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub targets: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pre_targets: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub post_targets: Vec<String>,
}

// --- PROJECT MODELS (project.json) ---

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    #[default]
    Application,
    Library,
}

/// The deserialized structure of a `project.json` file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfiguration {
    pub name: String,
    /// Project root, relative to the workspace root, with forward slashes.
    pub root: String,
    #[serde(default)]
    pub project_type: ProjectType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub targets: TargetMap,
}

impl ProjectConfiguration {
    pub fn new(name: &str, root: &str, project_type: ProjectType) -> Self {
        Self {
            name: name.to_string(),
            root: root.to_string(),
            project_type,
            tags: Vec::new(),
            targets: TargetMap::new(),
        }
    }
}

// --- `rigging.toml` MODELS ---

/// The deserialized structure of the workspace's `rigging.toml`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct WorkspaceConfig {
    #[serde(default)]
    pub workspace: WorkspaceSection,
    #[serde(default)]
    pub defaults: DefaultsConfig,
    /// Project name to project root (relative to the workspace root).
    #[serde(default)]
    pub projects: BTreeMap<String, String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WorkspaceSection {
    /// Solution file that new .NET projects are spliced into.
    pub solution: Option<String>,
    #[serde(default = "default_apps_dir")]
    pub apps_dir: String,
    #[serde(default = "default_libs_dir")]
    pub libs_dir: String,
}

fn default_apps_dir() -> String {
    "apps".to_string()
}

fn default_libs_dir() -> String {
    "libs".to_string()
}

impl Default for WorkspaceSection {
    fn default() -> Self {
        Self {
            solution: None,
            apps_dir: default_apps_dir(),
            libs_dir: default_libs_dir(),
        }
    }
}

/// Tool defaults. Every field is optional so that layers can be merged.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct DefaultsConfig {
    pub framework: Option<String>,
    pub configuration: Option<String>,
    pub output_dir: Option<String>,
    pub docker_registry: Option<String>,
}

impl DefaultsConfig {
    /// Fills every unset field of `self` from `lower`.
    pub fn layered_over(self, lower: Self) -> Self {
        Self {
            framework: self.framework.or(lower.framework),
            configuration: self.configuration.or(lower.configuration),
            output_dir: self.output_dir.or(lower.output_dir),
            docker_registry: self.docker_registry.or(lower.docker_registry),
        }
    }

    pub fn framework(&self) -> &str {
        self.framework.as_deref().unwrap_or("net8.0")
    }

    pub fn configuration(&self) -> &str {
        self.configuration.as_deref().unwrap_or("Debug")
    }

    pub fn output_dir(&self) -> &str {
        self.output_dir.as_deref().unwrap_or("dist")
    }
}

/// The user-level `config.toml`, layered under every workspace.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct UserConfig {
    #[serde(default)]
    pub defaults: DefaultsConfig,
}
