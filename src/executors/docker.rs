// src/executors/docker.rs

use super::{ExecutorContext, ExecutorError, ExecutorResult, parse_options};
use crate::constants::*;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
struct DockerOptions {
    dockerfile: Option<String>,
    context: Option<String>,
    image: Option<String>,
    tags: Vec<String>,
    registry: Option<String>,
    build_args: BTreeMap<String, String>,
    ports: Vec<String>,
    env: BTreeMap<String, String>,
    additional_args: Vec<String>,
}

impl DockerOptions {
    /// Image name, defaulting to the project name.
    fn image(&self, ctx: &ExecutorContext<'_>) -> String {
        self.image
            .clone()
            .unwrap_or_else(|| ctx.project.name.to_lowercase())
    }

    fn tags(&self) -> Vec<String> {
        if self.tags.is_empty() {
            vec!["latest".to_string()]
        } else {
            self.tags.clone()
        }
    }
}

pub fn build(ctx: &ExecutorContext<'_>, options: &Map<String, Value>) -> ExecutorResult {
    let opts: DockerOptions = parse_options(DOCKER_BUILD_EXECUTOR, options)?;
    let image = opts.image(ctx);
    let mut command = ctx
        .command("docker")
        .arg("build")
        .opt("-f", Some(opts.dockerfile.as_deref().unwrap_or("Dockerfile")));
    for tag in opts.tags() {
        command = command.arg("-t").arg(format!("{}:{}", image, tag));
    }
    for (key, value) in &opts.build_args {
        command = command.arg("--build-arg").arg(format!("{}={}", key, value));
    }
    let command = command
        .args(&opts.additional_args)
        .arg(opts.context.as_deref().unwrap_or("."));
    ctx.run(command)?;
    Ok(())
}

/// Tags every local `image:tag` for the registry and pushes it.
pub fn publish(ctx: &ExecutorContext<'_>, options: &Map<String, Value>) -> ExecutorResult {
    let opts: DockerOptions = parse_options(DOCKER_PUBLISH_EXECUTOR, options)?;
    let registry = opts
        .registry
        .clone()
        .or_else(|| ctx.defaults().docker_registry.clone())
        .ok_or(ExecutorError::MissingOption {
            executor: DOCKER_PUBLISH_EXECUTOR,
            option: "registry",
        })?;
    let registry = registry.trim_end_matches('/');
    let image = opts.image(ctx);

    for tag in opts.tags() {
        let local = format!("{}:{}", image, tag);
        let remote = format!("{}/{}", registry, local);
        ctx.run(ctx.command("docker").arg("tag").arg(&local).arg(&remote))?;
        ctx.run(
            ctx.command("docker")
                .arg("push")
                .args(&opts.additional_args)
                .arg(&remote),
        )?;
    }
    Ok(())
}

pub fn run(ctx: &ExecutorContext<'_>, options: &Map<String, Value>) -> ExecutorResult {
    let opts: DockerOptions = parse_options(DOCKER_RUN_EXECUTOR, options)?;
    let image = opts.image(ctx);
    let tag = opts.tags().into_iter().next().unwrap_or_else(|| "latest".to_string());

    let mut command = ctx.command("docker").arg("run").arg("--rm");
    for port in &opts.ports {
        command = command.arg("-p").arg(port);
    }
    for (key, value) in &opts.env {
        command = command.arg("-e").arg(format!("{}={}", key, value));
    }
    let command = command
        .args(&opts.additional_args)
        .arg(format!("{}:{}", image, tag))
        .inherit_output();
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
    fn test_build_tags_and_build_args() {
        let (_dir, workspace, project) = workspace_with_project();
        let runner = RecordingRunner::new();
        let ctx = context(&workspace, &project, &runner);

        build(
            &ctx,
            &options(json!({
                "image": "orders",
                "tags": ["1.0.0", "latest"],
                "buildArgs": { "CONFIG": "Release" }
            })),
        )
        .unwrap();

        let call = &runner.calls()[0];
        assert_eq!(call.program, "docker");
        assert_eq!(
            call.args,
            vec![
                "build", "-f", "Dockerfile", "-t", "orders:1.0.0", "-t", "orders:latest", "--build-arg",
                "CONFIG=Release", ".",
            ]
        );
    }

    #[test]
    fn test_publish_tags_and_pushes_each_tag() {
        let (_dir, workspace, project) = workspace_with_project();
        let runner = RecordingRunner::new();
        let ctx = context(&workspace, &project, &runner);

        publish(&ctx, &options(json!({ "registry": "registry.local:5000/" }))).unwrap();

        assert_eq!(
            runner.lines(),
            vec![
                "docker tag api:latest registry.local:5000/api:latest",
                "docker push registry.local:5000/api:latest",
            ]
        );
    }

    #[test]
    fn test_publish_without_registry_fails_before_running() {
        let (_dir, workspace, project) = workspace_with_project();
        let runner = RecordingRunner::new();
        let ctx = context(&workspace, &project, &runner);

        let result = publish(&ctx, &Map::new());
        assert!(matches!(
            result,
            Err(ExecutorError::MissingOption { option: "registry", .. })
        ));
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_run_maps_ports_and_env() {
        let (_dir, workspace, project) = workspace_with_project();
        let runner = RecordingRunner::new();
        let ctx = context(&workspace, &project, &runner);

        run(&ctx, &options(json!({ "ports": ["8080:80"], "env": { "MODE": "dev" } }))).unwrap();

        let call = &runner.calls()[0];
        assert_eq!(call.args, vec!["run", "--rm", "-p", "8080:80", "-e", "MODE=dev", "api:latest"]);
        assert!(call.inherit_output);
    }
}
