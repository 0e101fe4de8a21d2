// src/generators/dotnet_project.rs

use super::{
    GeneratorError, GeneratorReport,
    test_project::{self, TestFramework, TestProjectOptions},
};
use crate::{
    constants::*,
    core::{names, paths, workspace::Workspace, workspace::WorkspaceError},
    models::{ProjectConfiguration, ProjectType, Target, TargetMap},
    scaffold::{self, GeneratedFile, TemplateVars, solution, templates},
};
use clap::ValueEnum;
use serde_json::json;
use std::{fs, path::Path};
use uuid::Uuid;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DotnetProjectKind {
    #[default]
    Console,
    Classlib,
    Webapi,
}

impl DotnetProjectKind {
    fn project_type(self) -> ProjectType {
        match self {
            DotnetProjectKind::Classlib => ProjectType::Library,
            DotnetProjectKind::Console | DotnetProjectKind::Webapi => ProjectType::Application,
        }
    }

    fn is_runnable(self) -> bool {
        self != DotnetProjectKind::Classlib
    }
}

#[derive(Debug, Clone, Default)]
pub struct DotnetProjectOptions {
    pub name: String,
    pub kind: DotnetProjectKind,
    /// Parent directory for the project; defaults to `apps_dir` or `libs_dir`.
    pub directory: Option<String>,
    pub framework: Option<String>,
    pub tags: Vec<String>,
    /// Also generate a test project with this framework.
    pub with_tests: Option<TestFramework>,
    pub skip_solution: bool,
}

/// Creates a new .NET project: sources, `project.json` with its standard
/// targets, registration in `rigging.toml` and in the workspace solution.
pub fn generate(workspace: &mut Workspace, options: &DotnetProjectOptions) -> Result<GeneratorReport, GeneratorError> {
    let name = names::validate_project_name(&options.name)?;
    if let Some(root) = workspace.config().projects.get(&name) {
        return Err(WorkspaceError::ProjectExists {
            name,
            root: root.clone(),
        }
        .into());
    }

    let parent = options.directory.clone().unwrap_or_else(|| {
        let section = &workspace.config().workspace;
        match options.kind.project_type() {
            ProjectType::Library => section.libs_dir.clone(),
            ProjectType::Application => section.apps_dir.clone(),
        }
    });
    let root = paths::to_slash(&Path::new(&parent).join(&name));
    let pascal = names::pascal_case(&name);
    let csproj_file = format!("{}.csproj", pascal);
    let framework = options
        .framework
        .clone()
        .unwrap_or_else(|| workspace.defaults().framework().to_string());

    let mut vars = TemplateVars::new();
    vars.insert("projectName", name.clone());
    vars.insert("pascalName", pascal.clone());
    vars.insert("framework", framework.clone());

    let files = match options.kind {
        DotnetProjectKind::Console => vec![
            GeneratedFile::new(&csproj_file, templates::CONSOLE_CSPROJ, &vars),
            GeneratedFile::new("Program.cs", templates::CONSOLE_PROGRAM, &vars),
        ],
        DotnetProjectKind::Classlib => vec![
            GeneratedFile::new(&csproj_file, templates::CLASSLIB_CSPROJ, &vars),
            GeneratedFile::new("Class1.cs", templates::CLASSLIB_CLASS, &vars),
        ],
        DotnetProjectKind::Webapi => vec![
            GeneratedFile::new(&csproj_file, templates::WEBAPI_CSPROJ, &vars),
            GeneratedFile::new("Program.cs", templates::WEBAPI_PROGRAM, &vars),
            GeneratedFile::new("appsettings.json", templates::WEBAPI_APPSETTINGS, &vars),
        ],
    };

    let project_dir = workspace.root().join(&root);
    let mut report = GeneratorReport {
        created: scaffold::write_tree(&project_dir, &files)?,
        ..Default::default()
    };

    let mut project = ProjectConfiguration::new(&name, &root, options.kind.project_type());
    project.tags = options.tags.clone();
    project.targets = standard_targets(options.kind, &csproj_file);
    report.targets.extend(project.targets.keys().cloned());
    workspace.add_project(&project)?;
    report.created.push(project_dir.join(PROJECT_CONFIG_FILENAME));
    report
        .updated
        .push(workspace.root().join(WORKSPACE_CONFIG_FILENAME));

    if !options.skip_solution {
        if let Some(sln) = workspace.config().workspace.solution.clone() {
            let sln_path = workspace.root().join(sln);
            let relative = paths::to_slash(&paths::relative_path(
                sln_path.parent().unwrap_or(workspace.root()),
                &project_dir.join(&csproj_file),
            ));
            let (existing, created) = match fs::read_to_string(&sln_path) {
                Ok(text) => (text, false),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => (solution::new_solution(), true),
                Err(e) => return Err(e.into()),
            };
            fs::write(
                &sln_path,
                solution::add_project(&existing, &pascal, &relative, Uuid::new_v4())?,
            )?;
            if created {
                report.created.push(sln_path);
            } else {
                report.updated.push(sln_path);
            }
        }
    }

    if let Some(framework) = options.with_tests {
        let tests = test_project::generate(
            workspace,
            &TestProjectOptions {
                project: name.clone(),
                framework,
                target_framework: options.framework.clone(),
            },
        )?;
        report.absorb(tests);
    }

    log::info!("Generated {:?} project '{}' at '{}'.", options.kind, name, root);
    Ok(report)
}

/// The targets every new project starts with.
fn standard_targets(kind: DotnetProjectKind, csproj_file: &str) -> TargetMap {
    let src = json!({ "srcPath": csproj_file });
    let mut targets = TargetMap::new();
    targets.insert("build".into(), Target::new(DOTNET_BUILD_EXECUTOR, src.clone()));
    targets.insert("clean".into(), Target::new(DOTNET_CLEAN_EXECUTOR, src.clone()));
    let package = match kind {
        DotnetProjectKind::Classlib => DOTNET_PACK_EXECUTOR,
        DotnetProjectKind::Console | DotnetProjectKind::Webapi => DOTNET_PUBLISH_EXECUTOR,
    };
    targets.insert("package".into(), Target::new(package, src.clone()));
    targets.insert(
        "version".into(),
        Target::new(SET_VERSION_EXECUTOR, json!({ "files": [csproj_file] })),
    );
    if kind.is_runnable() {
        targets.insert("run".into(), Target::new(DOTNET_RUN_EXECUTOR, src));
    }
    targets
}
