// src/executors/common.rs

use super::{ExecutorContext, ExecutorError, ExecutorResult, find_csproj_files, parse_options};
use crate::{constants::*, scaffold::csproj, system::executor::CommandLine};
use lazy_static::lazy_static;
use regex::{NoExpand, Regex};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};
use walkdir::WalkDir;

lazy_static! {
    static ref CHART_VERSION: Regex = Regex::new(r"(?m)^version:.*$").expect("valid chart version regex");
    static ref CHART_APP_VERSION: Regex =
        Regex::new(r"(?m)^appVersion:.*$").expect("valid chart appVersion regex");
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
struct RunCommandsOptions {
    commands: Vec<String>,
    cwd: Option<String>,
    env: BTreeMap<String, String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
struct SetVersionOptions {
    version: Option<String>,
    files: Vec<String>,
}

/// Runs each command in order, stopping at the first failure.
pub fn run_commands(ctx: &ExecutorContext<'_>, options: &Map<String, Value>) -> ExecutorResult {
    let opts: RunCommandsOptions = parse_options(RUN_COMMANDS_EXECUTOR, options)?;
    if opts.commands.is_empty() {
        log::warn!(
            "Target '{}:{}' has no commands to run.",
            ctx.project.name,
            ctx.target_name
        );
        return Ok(());
    }
    let cwd = opts
        .cwd
        .as_deref()
        .map(|cwd| ctx.resolve(cwd))
        .unwrap_or_else(|| ctx.project_root());

    for line in &opts.commands {
        let mut command = CommandLine::parse(line, &cwd)?;
        for (key, value) in &opts.env {
            command = command.env(key, value);
        }
        ctx.run(command)?;
    }
    Ok(())
}

/// Writes `version` into the listed files, or into the project's `.csproj`
/// and any `helm/*/Chart.yaml` when no files are listed.
pub fn set_version(ctx: &ExecutorContext<'_>, options: &Map<String, Value>) -> ExecutorResult {
    let opts: SetVersionOptions = parse_options(SET_VERSION_EXECUTOR, options)?;
    let version = opts
        .version
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(ExecutorError::MissingOption {
            executor: SET_VERSION_EXECUTOR,
            option: "version",
        })?;

    let files: Vec<PathBuf> = if opts.files.is_empty() {
        discover_version_files(&ctx.project_root())
    } else {
        opts.files.iter().map(|file| ctx.resolve(file)).collect()
    };
    if files.is_empty() {
        log::warn!("No versioned files found for '{}'.", ctx.project.name);
    }

    for file in files {
        let content = fs::read_to_string(&file)?;
        let updated = if file.extension().is_some_and(|ext| ext == "csproj") {
            csproj::set_version(&content, version)?
        } else if file.file_name().is_some_and(|name| name == "Chart.yaml") {
            set_chart_version(&content, version)
        } else {
            return Err(ExecutorError::UnsupportedVersionFile(file));
        };
        fs::write(&file, updated)?;
        println!("Set version {} in {}", version, file.display());
    }
    Ok(())
}

fn discover_version_files(project_root: &Path) -> Vec<PathBuf> {
    let mut files = find_csproj_files(project_root);
    let helm_dir = project_root.join("helm");
    if helm_dir.is_dir() {
        let mut charts: Vec<PathBuf> = WalkDir::new(&helm_dir)
            .min_depth(2)
            .max_depth(2)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_name() == "Chart.yaml")
            .map(|entry| entry.into_path())
            .collect();
        charts.sort();
        files.extend(charts);
    }
    files
}

fn set_chart_version(chart: &str, version: &str) -> String {
    let version_line = format!("version: {}", version);
    let app_line = format!("appVersion: \"{}\"", version);
    let chart = CHART_VERSION.replace(chart, NoExpand(&version_line));
    CHART_APP_VERSION.replace(&chart, NoExpand(&app_line)).into_owned()
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::system::testing::RecordingRunner;
    use serde_json::json;

    #[test]
    fn test_run_commands_in_order_with_env() {
        let (_dir, workspace, project) = workspace_with_project();
        let runner = RecordingRunner::new();
        let ctx = context(&workspace, &project, &runner);

        run_commands(
            &ctx,
            &options(json!({
                "commands": ["npm ci", "npm run build -- --prod"],
                "cwd": "web",
                "env": { "CI": "1" }
            })),
        )
        .unwrap();

        let calls = runner.calls();
        assert_eq!(runner.lines(), vec!["npm ci", "npm run build -- --prod"]);
        assert_eq!(calls[0].cwd, ctx.project_root().join("web"));
        assert_eq!(calls[1].env.get("CI").map(String::as_str), Some("1"));
    }

    #[test]
    fn test_run_commands_stops_at_first_failure() {
        let (_dir, workspace, project) = workspace_with_project();
        let runner = RecordingRunner::failing_when("lint");
        let ctx = context(&workspace, &project, &runner);

        let result = run_commands(&ctx, &options(json!({ "commands": ["lint", "build"] })));
        assert!(result.is_err());
        assert_eq!(runner.lines(), vec!["lint"]);
    }

    #[test]
    fn test_set_version_updates_csproj_and_charts() {
        let (_dir, workspace, project) = workspace_with_project();
        let runner = RecordingRunner::new();
        let ctx = context(&workspace, &project, &runner);
        let root = ctx.project_root();
        fs::write(
            root.join("Api.csproj"),
            "<Project>\n  <PropertyGroup>\n    <Version>0.1.0</Version>\n  </PropertyGroup>\n</Project>\n",
        )
        .unwrap();
        fs::create_dir_all(root.join("helm/api")).unwrap();
        fs::write(
            root.join("helm/api/Chart.yaml"),
            "apiVersion: v2\nname: api\nversion: 0.1.0\nappVersion: \"0.1.0\"\n",
        )
        .unwrap();

        set_version(&ctx, &options(json!({ "version": "2.0.0" }))).unwrap();

        let csproj = fs::read_to_string(root.join("Api.csproj")).unwrap();
        assert!(csproj.contains("<Version>2.0.0</Version>"));
        let chart = fs::read_to_string(root.join("helm/api/Chart.yaml")).unwrap();
        assert_eq!(chart, "apiVersion: v2\nname: api\nversion: 2.0.0\nappVersion: \"2.0.0\"\n");
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_set_version_requires_a_version() {
        let (_dir, workspace, project) = workspace_with_project();
        let runner = RecordingRunner::new();
        let ctx = context(&workspace, &project, &runner);

        let result = set_version(&ctx, &options(json!({ "version": "  " })));
        assert!(matches!(
            result,
            Err(ExecutorError::MissingOption { option: "version", .. })
        ));
    }

    #[test]
    fn test_set_version_rejects_unknown_files() {
        let (_dir, workspace, project) = workspace_with_project();
        let runner = RecordingRunner::new();
        let ctx = context(&workspace, &project, &runner);
        fs::write(ctx.project_root().join("package.json"), "{}").unwrap();

        let result = set_version(&ctx, &options(json!({ "version": "1.0.0", "files": ["package.json"] })));
        assert!(matches!(result, Err(ExecutorError::UnsupportedVersionFile(_))));
    }
}
