// src/executors/dotnet.rs

use super::{ExecutorContext, ExecutorResult, parse_options};
use crate::constants::*;
use serde::Deserialize;
use serde_json::{Map, Value};

/// Options shared by every `dotnet` verb. Each verb reads the ones it needs.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
struct DotnetOptions {
    src_path: Option<String>,
    configuration: Option<String>,
    output_path: Option<String>,
    framework: Option<String>,
    runtime: Option<String>,
    no_restore: bool,
    self_contained: bool,
    version: Option<String>,
    filter: Option<String>,
    collect: Option<String>,
    args: Vec<String>,
    additional_args: Vec<String>,
}

impl DotnetOptions {
    fn configuration<'a>(&'a self, ctx: &'a ExecutorContext<'_>) -> &'a str {
        self.configuration
            .as_deref()
            .unwrap_or_else(|| ctx.defaults().configuration())
    }

    /// `outputPath` resolved from the project root, or the workspace default.
    fn output(&self, ctx: &ExecutorContext<'_>, kind: &str) -> String {
        let path = match &self.output_path {
            Some(path) => ctx.resolve(path),
            None => ctx.default_output(kind),
        };
        path.display().to_string()
    }
}

pub fn build(ctx: &ExecutorContext<'_>, options: &Map<String, Value>) -> ExecutorResult {
    let opts: DotnetOptions = parse_options(DOTNET_BUILD_EXECUTOR, options)?;
    let src = ctx.project_file(opts.src_path.as_deref())?;
    let output = opts.output_path.as_ref().map(|_| opts.output(ctx, "build"));
    let command = ctx
        .command("dotnet")
        .arg("build")
        .arg(src)
        .opt("-c", Some(opts.configuration(ctx)))
        .opt("-o", output.as_deref())
        .opt("-f", opts.framework.as_deref())
        .opt("-r", opts.runtime.as_deref())
        .flag("--no-restore", opts.no_restore)
        .args(&opts.additional_args);
    ctx.run(command)?;
    Ok(())
}

pub fn clean(ctx: &ExecutorContext<'_>, options: &Map<String, Value>) -> ExecutorResult {
    let opts: DotnetOptions = parse_options(DOTNET_CLEAN_EXECUTOR, options)?;
    let src = ctx.project_file(opts.src_path.as_deref())?;
    let output = opts.output_path.as_ref().map(|_| opts.output(ctx, "build"));
    let command = ctx
        .command("dotnet")
        .arg("clean")
        .arg(src)
        .opt("-c", Some(opts.configuration(ctx)))
        .opt("-o", output.as_deref())
        .args(&opts.additional_args);
    ctx.run(command)?;
    Ok(())
}

pub fn pack(ctx: &ExecutorContext<'_>, options: &Map<String, Value>) -> ExecutorResult {
    let opts: DotnetOptions = parse_options(DOTNET_PACK_EXECUTOR, options)?;
    let src = ctx.project_file(opts.src_path.as_deref())?;
    let version = opts.version.as_ref().map(|v| format!("-p:PackageVersion={}", v));
    let output = opts.output(ctx, "nuget");
    let command = ctx
        .command("dotnet")
        .arg("pack")
        .arg(src)
        .opt("-c", Some(opts.configuration(ctx)))
        .opt("-o", Some(output.as_str()))
        .args(version)
        .flag("--no-restore", opts.no_restore)
        .args(&opts.additional_args);
    ctx.run(command)?;
    Ok(())
}

pub fn publish(ctx: &ExecutorContext<'_>, options: &Map<String, Value>) -> ExecutorResult {
    let opts: DotnetOptions = parse_options(DOTNET_PUBLISH_EXECUTOR, options)?;
    let src = ctx.project_file(opts.src_path.as_deref())?;
    let output = opts.output(ctx, "publish");
    let command = ctx
        .command("dotnet")
        .arg("publish")
        .arg(src)
        .opt("-c", Some(opts.configuration(ctx)))
        .opt("-o", Some(output.as_str()))
        .opt("-f", opts.framework.as_deref())
        .opt("-r", opts.runtime.as_deref())
        .flag("--self-contained", opts.self_contained)
        .flag("--no-restore", opts.no_restore)
        .args(&opts.additional_args);
    ctx.run(command)?;
    Ok(())
}

pub fn test(ctx: &ExecutorContext<'_>, options: &Map<String, Value>) -> ExecutorResult {
    let opts: DotnetOptions = parse_options(DOTNET_TEST_EXECUTOR, options)?;
    let src = ctx.project_file(opts.src_path.as_deref())?;
    let command = ctx
        .command("dotnet")
        .arg("test")
        .arg(src)
        .opt("-c", Some(opts.configuration(ctx)))
        .opt("--filter", opts.filter.as_deref())
        .opt("--collect", opts.collect.as_deref())
        .flag("--no-restore", opts.no_restore)
        .args(&opts.additional_args);
    ctx.run(command)?;
    Ok(())
}

/// `dotnet run` hands the terminal to the program, so its output is not captured.
pub fn run(ctx: &ExecutorContext<'_>, options: &Map<String, Value>) -> ExecutorResult {
    let opts: DotnetOptions = parse_options(DOTNET_RUN_EXECUTOR, options)?;
    let src = ctx.project_file(opts.src_path.as_deref())?;
    let mut command = ctx
        .command("dotnet")
        .arg("run")
        .opt("--project", Some(src.as_str()))
        .opt("-c", Some(opts.configuration(ctx)))
        .opt("-f", opts.framework.as_deref())
        .args(&opts.additional_args)
        .inherit_output();
    if !opts.args.is_empty() {
        command = command.arg("--").args(&opts.args);
    }
    ctx.run(command)?;
    Ok(())
}
