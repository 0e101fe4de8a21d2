// src/generators/docker.rs

use super::{GeneratorError, GeneratorReport, ensure_targets_free};
use crate::{
    constants::*,
    core::{
        chain_merger::{self, Additions, ChainAddition},
        workspace::Workspace,
    },
    executors::find_csproj_files,
    models::{ProjectConfiguration, Target},
    scaffold::{self, GeneratedFile, TemplateVars, templates},
};
use serde_json::{Map, Value, json};

pub const DOCKER_TARGETS: [&str; 3] = ["dockerBuild", "dockerPublish", "dockerRun"];

#[derive(Debug, Clone, Default)]
pub struct DockerGeneratorOptions {
    pub project: String,
    /// Image name; defaults to the lower-cased project name.
    pub image: Option<String>,
    /// Registry for `dockerPublish`; otherwise the workspace default applies at run time.
    pub registry: Option<String>,
    /// `host:container` mapping for `dockerRun`.
    pub port: Option<String>,
}

/// Adds a Dockerfile and the `dockerBuild`/`dockerPublish`/`dockerRun`
/// targets, and hooks them into `build` and `publish`.
pub fn generate(workspace: &Workspace, options: &DockerGeneratorOptions) -> Result<GeneratorReport, GeneratorError> {
    let project = workspace.read_project(&options.project)?;
    ensure_targets_free(&project, &DOCKER_TARGETS)?;

    let project_root = workspace.project_root(&project.name)?;
    let image = options
        .image
        .clone()
        .unwrap_or_else(|| project.name.to_lowercase());

    let mut vars = TemplateVars::new();
    vars.insert("projectName", project.name.clone());
    let dockerfile = match find_csproj_files(&project_root).first() {
        Some(csproj) => {
            let pascal = csproj
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();
            vars.insert("pascalName", pascal);
            templates::DOTNET_DOCKERFILE
        }
        None => templates::GENERIC_DOCKERFILE,
    };
    let files = [
        GeneratedFile::new("Dockerfile", dockerfile, &vars),
        GeneratedFile::new(".dockerignore", templates::DOCKERIGNORE, &vars),
    ];

    let mut publish_options = Map::new();
    publish_options.insert("image".into(), json!(image));
    if let Some(registry) = &options.registry {
        publish_options.insert("registry".into(), json!(registry));
    }
    let run_options = match &options.port {
        Some(port) => json!({ "image": image, "ports": [port] }),
        None => json!({ "image": image }),
    };

    let mut targets = project.targets.clone();
    targets.insert(
        "dockerBuild".into(),
        Target::new(DOCKER_BUILD_EXECUTOR, json!({ "image": image, "tags": ["latest"] })),
    );
    targets.insert(
        "dockerPublish".into(),
        Target::new(DOCKER_PUBLISH_EXECUTOR, Value::Object(publish_options)),
    );
    targets.insert("dockerRun".into(), Target::new(DOCKER_RUN_EXECUTOR, run_options));
    let mut additions = Additions::new();
    additions.insert("build".into(), ChainAddition::targets(["dockerBuild"]));
    additions.insert("publish".into(), ChainAddition::targets(["dockerPublish"]));
    // Merged up front so a malformed hook chain fails before any file exists.
    let merged = chain_merger::merge_additions(targets, additions)?;

    let mut report = GeneratorReport {
        created: scaffold::write_tree(&project_root, &files)?,
        ..Default::default()
    };
    workspace.write_project(&ProjectConfiguration {
        targets: merged,
        ..project
    })?;

    report.updated.push(project_root.join(PROJECT_CONFIG_FILENAME));
    report.targets.extend(DOCKER_TARGETS.iter().map(|t| t.to_string()));
    Ok(report)
}
