// src/generators/helm.rs

use super::{GeneratorError, GeneratorReport, ensure_targets_free};
use crate::{
    constants::*,
    core::{
        chain_merger::{self, Additions, ChainAddition},
        workspace::Workspace,
    },
    models::{ProjectConfiguration, Target},
    scaffold::{self, GeneratedFile, TemplateVars, templates},
};
use clap::ValueEnum;
use serde_json::{Map, Value, json};

pub const HELM_TARGETS: [&str; 2] = ["helmPackage", "helmInstall"];

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HelmMode {
    /// Scaffold a chart inside the project.
    #[default]
    Local,
    /// Install a chart from a remote repository with local values.
    Repo,
}

#[derive(Debug, Clone, Default)]
pub struct HelmGeneratorOptions {
    pub project: String,
    pub mode: HelmMode,
    /// Local mode: the chart name (defaults to the project name).
    /// Repo mode: `repo/chart`, required.
    pub chart: Option<String>,
    /// Repo mode: URL of the chart repository, required.
    pub repo_url: Option<String>,
    pub namespace: Option<String>,
}

/// Adds Helm deployment to a project: `helmInstall` (hooked into `deploy`)
/// and, for local charts, `helmPackage` (hooked into `package`).
pub fn generate(workspace: &Workspace, options: &HelmGeneratorOptions) -> Result<GeneratorReport, GeneratorError> {
    let project = workspace.read_project(&options.project)?;
    ensure_targets_free(&project, &HELM_TARGETS)?;
    let project_root = workspace.project_root(&project.name)?;
    let release = project.name.to_lowercase();

    let mut vars = TemplateVars::new();
    vars.insert("projectName", release.clone());

    let mut install = Map::new();
    install.insert("release".into(), json!(release));
    if let Some(namespace) = &options.namespace {
        install.insert("namespace".into(), json!(namespace));
        install.insert("createNamespace".into(), json!(true));
    }

    let (files, package) = match options.mode {
        HelmMode::Local => {
            let chart = options.chart.clone().unwrap_or_else(|| release.clone());
            crate::core::names::validate_project_name(&chart)?;
            let chart_dir = format!("helm/{}", chart);
            vars.insert("chartName", chart);
            install.insert("chart".into(), json!(chart_dir));
            let files = vec![
                GeneratedFile::new(format!("{}/Chart.yaml", chart_dir), templates::HELM_CHART, &vars),
                GeneratedFile::new(format!("{}/values.yaml", chart_dir), templates::HELM_VALUES, &vars),
                GeneratedFile::new(
                    format!("{}/templates/deployment.yaml", chart_dir),
                    templates::HELM_DEPLOYMENT,
                    &vars,
                ),
                GeneratedFile::new(
                    format!("{}/templates/service.yaml", chart_dir),
                    templates::HELM_SERVICE,
                    &vars,
                ),
                GeneratedFile::new(format!("{}/.helmignore", chart_dir), templates::HELMIGNORE, &vars),
            ];
            let package = Target::new(HELM_PACKAGE_EXECUTOR, json!({ "chart": chart_dir }));
            (files, Some(package))
        }
        HelmMode::Repo => {
            let chart = options
                .chart
                .clone()
                .filter(|chart| chart.split_once('/').is_some_and(|(r, c)| !r.is_empty() && !c.is_empty()))
                .ok_or_else(|| {
                    GeneratorError::InvalidOptions("Repo mode needs --chart in the form 'repo/chart'.".to_string())
                })?;
            let repo_url = options.repo_url.clone().ok_or_else(|| {
                GeneratorError::InvalidOptions("Repo mode needs --repo-url.".to_string())
            })?;
            let repo_name = chart.split('/').next().unwrap_or_default().to_string();
            vars.insert("chartName", chart.clone());
            install.insert("chart".into(), json!(chart));
            install.insert("repoName".into(), json!(repo_name));
            install.insert("repoUrl".into(), json!(repo_url));
            install.insert("valuesFiles".into(), json!(["helm/values.yaml"]));
            let files = vec![GeneratedFile::new(
                "helm/values.yaml",
                templates::HELM_REPO_VALUES,
                &vars,
            )];
            (files, None)
        }
    };

    let has_package = package.is_some();
    let mut targets = project.targets.clone();
    let mut additions = Additions::new();
    if let Some(package) = package {
        targets.insert("helmPackage".into(), package);
        additions.insert("package".into(), ChainAddition::targets(["helmPackage"]));
    }
    targets.insert(
        "helmInstall".into(),
        Target::new(HELM_INSTALL_EXECUTOR, Value::Object(install)),
    );
    additions.insert("deploy".into(), ChainAddition::targets(["helmInstall"]));
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
    if has_package {
        report.targets.push("helmPackage".into());
    }
    report.targets.push("helmInstall".into());
    Ok(report)
}
