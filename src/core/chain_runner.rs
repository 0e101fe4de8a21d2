//! # Chain Runner
//!
//! Runs a target by name. Leaf targets are handed to their executor; chain
//! targets are expanded into their ordered lists and each entry is run in
//! turn, recursively. Everything is sequential and stops at the first failure.
use crate::{
    core::{names, workspace::Workspace, workspace::WorkspaceError},
    executors::{self, ExecutorContext, ExecutorError},
    models::{ChainOptions, ProjectConfiguration, Target},
    system::executor::CommandRunner,
};
use colored::*;
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChainError {
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),
    #[error("Project '{project}' has no target named '{target}'.")]
    TargetNotFound { project: String, target: String },
    #[error("Target '{project}:{target}' uses unknown executor '{executor}'.")]
    UnknownExecutor {
        project: String,
        target: String,
        executor: String,
    },
    #[error("Chain '{project}:{target}' has no stage named '{stage}'.")]
    StageNotFound {
        project: String,
        target: String,
        stage: String,
    },
    #[error("Chain target '{project}:{target}' has malformed options: {source}")]
    MalformedChain {
        project: String,
        target: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid target reference '{0}' in a chain.")]
    InvalidReference(String),
    #[error("Circular chain detected: {}", .0.join(" -> "))]
    Cycle(Vec<String>),
    #[error("Target '{project}:{target}' failed: {source}")]
    Executor {
        project: String,
        target: String,
        #[source]
        source: ExecutorError,
    },
}

/// What the caller asked for on top of the target name.
#[derive(Debug, Clone, Default)]
pub struct RunRequest {
    /// Run only this stage of a chain target.
    pub stage: Option<String>,
    /// Option overrides for the requested target. Not applied to chain members.
    pub overrides: Map<String, Value>,
}

/// The ordered references a chain runs, either whole or for one stage.
/// Returns `None` if `stage` names a stage the chain does not have.
pub fn chain_sequence(options: &ChainOptions, stage: Option<&str>) -> Option<Vec<String>> {
    match stage {
        Some(stage) => {
            let stage = options.stages.as_ref()?.get(stage)?;
            Some(
                stage
                    .pre_targets
                    .iter()
                    .chain(&stage.targets)
                    .chain(&stage.post_targets)
                    .cloned()
                    .collect(),
            )
        }
        None => {
            let lists = [
                &options.pre_targets,
                &options.targets,
                &options.additional_targets,
                &options.post_targets,
            ];
            Some(lists.into_iter().flatten().flatten().cloned().collect())
        }
    }
}

/// Splits `project:target` or a bare `target` (resolved against `current`).
pub fn split_reference<'a>(current: &'a str, reference: &'a str) -> Result<(&'a str, &'a str), ChainError> {
    names::validate_target_ref(reference).map_err(|_| ChainError::InvalidReference(reference.to_string()))?;
    Ok(match reference.split_once(':') {
        Some((project, target)) => (project, target),
        None => (current, reference),
    })
}

/// Runs targets of one workspace through a [`CommandRunner`].
pub struct TargetRunner<'a> {
    workspace: &'a Workspace,
    runner: &'a dyn CommandRunner,
}

impl<'a> TargetRunner<'a> {
    pub fn new(workspace: &'a Workspace, runner: &'a dyn CommandRunner) -> Self {
        Self { workspace, runner }
    }

    pub fn run(&self, project: &str, target: &str, request: &RunRequest) -> Result<(), ChainError> {
        let mut stack = Vec::new();
        self.run_inner(project, target, Some(request), &mut stack)
    }

    fn run_inner(
        &self,
        project: &str,
        target: &str,
        request: Option<&RunRequest>,
        stack: &mut Vec<String>,
    ) -> Result<(), ChainError> {
        let key = format!("{}:{}", project, target);
        if stack.contains(&key) {
            let mut cycle = stack.clone();
            cycle.push(key);
            return Err(ChainError::Cycle(cycle));
        }

        let config = self.workspace.read_project(project)?;
        let definition = config
            .targets
            .get(target)
            .cloned()
            .ok_or_else(|| ChainError::TargetNotFound {
                project: project.to_string(),
                target: target.to_string(),
            })?;

        let chain = definition
            .chain_options()
            .transpose()
            .map_err(|source| ChainError::MalformedChain {
                project: project.to_string(),
                target: target.to_string(),
                source,
            })?;

        stack.push(key);
        let result = match chain {
            Some(options) => self.run_chain(&config, target, &options, request, stack),
            None => self.run_leaf(&config, target, &definition, request),
        };
        stack.pop();
        result
    }

    fn run_chain(
        &self,
        config: &ProjectConfiguration,
        target: &str,
        options: &ChainOptions,
        request: Option<&RunRequest>,
        stack: &mut Vec<String>,
    ) -> Result<(), ChainError> {
        let stage = request.and_then(|r| r.stage.as_deref());
        if request.is_some_and(|r| !r.overrides.is_empty()) {
            log::warn!("Option overrides are ignored for chain target '{}:{}'.", config.name, target);
        }
        let sequence = chain_sequence(options, stage).ok_or_else(|| ChainError::StageNotFound {
            project: config.name.clone(),
            target: target.to_string(),
            stage: stage.unwrap_or_default().to_string(),
        })?;

        let label = match stage {
            Some(stage) => format!("{}:{} [{}]", config.name, target, stage),
            None => format!("{}:{}", config.name, target),
        };
        println!(
            "{}",
            format!("┌─ {} ({} step(s))", label, sequence.len()).dimmed()
        );
        for reference in &sequence {
            let (project, member) = split_reference(&config.name, reference)?;
            log::debug!("Chain {} -> {}:{}", label, project, member);
            self.run_inner(project, member, None, stack)?;
        }
        println!("{}", format!("└─ {} done.", label).dimmed());
        Ok(())
    }

    fn run_leaf(
        &self,
        config: &ProjectConfiguration,
        target: &str,
        definition: &Target,
        request: Option<&RunRequest>,
    ) -> Result<(), ChainError> {
        let executor =
            executors::find_executor(&definition.executor).ok_or_else(|| ChainError::UnknownExecutor {
                project: config.name.clone(),
                target: target.to_string(),
                executor: definition.executor.clone(),
            })?;

        let mut options = definition.options.clone();
        if let Some(request) = request {
            if let Some(stage) = &request.stage {
                log::warn!(
                    "Ignoring stage '{}': '{}:{}' is not a chain target.",
                    stage,
                    config.name,
                    target
                );
            }
            options.extend(request.overrides.clone());
        }

        println!("{} {}:{}", "▶".cyan(), config.name.bold(), target.bold());
        let context = ExecutorContext {
            workspace: self.workspace,
            project: config,
            target_name: target,
            runner: self.runner,
        };
        (executor.handler)(&context, &options).map_err(|source| ChainError::Executor {
            project: config.name.clone(),
            target: target.to_string(),
            source,
        })
    }
}
