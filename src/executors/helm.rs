// src/executors/helm.rs

use super::{ExecutorContext, ExecutorError, ExecutorResult, parse_options};
use crate::constants::*;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
struct HelmPackageOptions {
    chart: Option<String>,
    output_path: Option<String>,
    version: Option<String>,
    app_version: Option<String>,
    update_dependencies: bool,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
struct HelmInstallOptions {
    release: Option<String>,
    chart: Option<String>,
    repo_name: Option<String>,
    repo_url: Option<String>,
    version: Option<String>,
    namespace: Option<String>,
    create_namespace: bool,
    values_files: Vec<String>,
    set: BTreeMap<String, String>,
    kube_context: Option<String>,
    wait: bool,
    additional_args: Vec<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
struct KubectlApplyOptions {
    manifests: Vec<String>,
    namespace: Option<String>,
    kube_context: Option<String>,
}

/// Local charts live at `helm/<project>` unless the target says otherwise.
fn default_chart(ctx: &ExecutorContext<'_>) -> String {
    format!("helm/{}", ctx.project.name)
}

pub fn package(ctx: &ExecutorContext<'_>, options: &Map<String, Value>) -> ExecutorResult {
    let opts: HelmPackageOptions = parse_options(HELM_PACKAGE_EXECUTOR, options)?;
    let chart = opts.chart.clone().unwrap_or_else(|| default_chart(ctx));
    let destination = match &opts.output_path {
        Some(path) => ctx.resolve(path),
        None => ctx.default_output("helm"),
    }
    .display()
    .to_string();

    let command = ctx
        .command("helm")
        .arg("package")
        .arg(chart)
        .opt("--destination", Some(destination.as_str()))
        .opt("--version", opts.version.as_deref())
        .opt("--app-version", opts.app_version.as_deref())
        .flag("--dependency-update", opts.update_dependencies);
    ctx.run(command)?;
    Ok(())
}

/// `helm upgrade --install`, adding the chart repository first when one is given.
pub fn install(ctx: &ExecutorContext<'_>, options: &Map<String, Value>) -> ExecutorResult {
    let opts: HelmInstallOptions = parse_options(HELM_INSTALL_EXECUTOR, options)?;

    if let Some(url) = &opts.repo_url {
        let repo = opts.repo_name.as_deref().ok_or(ExecutorError::MissingOption {
            executor: HELM_INSTALL_EXECUTOR,
            option: "repoName",
        })?;
        ctx.run(
            ctx.command("helm")
                .args(["repo", "add", "--force-update", repo])
                .arg(url),
        )?;
        ctx.run(ctx.command("helm").args(["repo", "update", repo]))?;
    }

    let release = opts.release.clone().unwrap_or_else(|| ctx.project.name.to_lowercase());
    let chart = opts.chart.clone().unwrap_or_else(|| default_chart(ctx));
    let mut command = ctx
        .command("helm")
        .args(["upgrade", "--install"])
        .arg(release)
        .arg(chart)
        .opt("--version", opts.version.as_deref())
        .opt("--namespace", opts.namespace.as_deref())
        .flag("--create-namespace", opts.create_namespace)
        .opt("--kube-context", opts.kube_context.as_deref());
    for file in &opts.values_files {
        command = command.arg("-f").arg(file);
    }
    for (key, value) in &opts.set {
        command = command.arg("--set").arg(format!("{}={}", key, value));
    }
    let command = command.flag("--wait", opts.wait).args(&opts.additional_args);
    ctx.run(command)?;
    Ok(())
}

pub fn kubectl_apply(ctx: &ExecutorContext<'_>, options: &Map<String, Value>) -> ExecutorResult {
    let opts: KubectlApplyOptions = parse_options(KUBECTL_APPLY_EXECUTOR, options)?;
    if opts.manifests.is_empty() {
        return Err(ExecutorError::MissingOption {
            executor: KUBECTL_APPLY_EXECUTOR,
            option: "manifests",
        });
    }
    let mut command = ctx
        .command("kubectl")
        .arg("apply")
        .opt("--namespace", opts.namespace.as_deref())
        .opt("--context", opts.kube_context.as_deref());
    for manifest in &opts.manifests {
        command = command.arg("-f").arg(manifest);
    }
    ctx.run(command)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::system::testing::RecordingRunner;
    use serde_json::json;

    #[test]
    fn test_package_defaults_to_project_chart_and_dist() {
        let (_dir, workspace, project) = workspace_with_project();
        let runner = RecordingRunner::new();
        let ctx = context(&workspace, &project, &runner);

        package(&ctx, &options(json!({ "version": "0.2.0" }))).unwrap();

        let destination = ctx.default_output("helm").display().to_string();
        assert_eq!(
            runner.calls()[0].args,
            vec!["package", "helm/api", "--destination", destination.as_str(), "--version", "0.2.0"]
        );
    }

    #[test]
    fn test_install_from_repository_adds_repo_first() {
        let (_dir, workspace, project) = workspace_with_project();
        let runner = RecordingRunner::new();
        let ctx = context(&workspace, &project, &runner);

        install(
            &ctx,
            &options(json!({
                "chart": "bitnami/redis",
                "repoName": "bitnami",
                "repoUrl": "https://charts.bitnami.com/bitnami",
                "namespace": "cache",
                "valuesFiles": ["helm/values.yaml"]
            })),
        )
        .unwrap();

        assert_eq!(
            runner.lines(),
            vec![
                "helm repo add --force-update bitnami https://charts.bitnami.com/bitnami",
                "helm repo update bitnami",
                "helm upgrade --install api bitnami/redis --namespace cache -f helm/values.yaml",
            ]
        );
    }

    #[test]
    fn test_install_with_repo_url_requires_repo_name() {
        let (_dir, workspace, project) = workspace_with_project();
        let runner = RecordingRunner::new();
        let ctx = context(&workspace, &project, &runner);

        let result = install(&ctx, &options(json!({ "repoUrl": "https://example.com/charts" })));
        assert!(matches!(
            result,
            Err(ExecutorError::MissingOption { option: "repoName", .. })
        ));
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_kubectl_apply_requires_manifests() {
        let (_dir, workspace, project) = workspace_with_project();
        let runner = RecordingRunner::new();
        let ctx = context(&workspace, &project, &runner);

        assert!(kubectl_apply(&ctx, &Map::new()).is_err());

        kubectl_apply(&ctx, &options(json!({ "manifests": ["k8s/a.yaml", "k8s/b.yaml"] }))).unwrap();
        assert_eq!(runner.lines(), vec!["kubectl apply -f k8s/a.yaml -f k8s/b.yaml"]);
    }
}
