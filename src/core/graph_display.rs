// src/core/graph_display.rs

use crate::{
    core::{
        chain_runner::split_reference,
        workspace::{Workspace, WorkspaceError},
    },
    models::{ChainOptions, ProjectConfiguration, Target, TargetMap},
};
use std::{collections::HashMap, fmt::Write};

/// Controls what `render_target_tree` includes.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisplayOptions {
    /// Print each leaf target's options next to it.
    pub show_options: bool,
    /// Stop expanding chains below this depth.
    pub max_depth: Option<usize>,
}

/// Prints the target tree of a project, or of one of its targets.
pub fn display_target_tree(
    workspace: &Workspace,
    project: &ProjectConfiguration,
    only: Option<&str>,
    options: DisplayOptions,
) -> Result<(), WorkspaceError> {
    print!("{}", render_target_tree(workspace, project, only, options)?);
    Ok(())
}

/// Renders the target tree as plain text: chains are expanded into their
/// members (in execution order), leaves show their executor.
pub fn render_target_tree(
    workspace: &Workspace,
    project: &ProjectConfiguration,
    only: Option<&str>,
    options: DisplayOptions,
) -> Result<String, WorkspaceError> {
    let mut renderer = TreeRenderer {
        workspace,
        options,
        maps: HashMap::new(),
        out: String::new(),
    };
    renderer.maps.insert(project.name.clone(), project.targets.clone());

    let _ = writeln!(renderer.out, "{} [{}]", project.name, project.root);
    let names: Vec<&String> = match only {
        Some(name) => project.targets.keys().filter(|key| key.as_str() == name).collect(),
        None => project.targets.keys().collect(),
    };
    if names.is_empty() {
        let _ = writeln!(renderer.out, "└─ (no targets)");
    }
    for (i, name) in names.iter().enumerate() {
        let is_last = i == names.len() - 1;
        let mut path = Vec::new();
        renderer.node(&project.name, name, None, "", is_last, &mut path)?;
    }
    Ok(renderer.out)
}

struct TreeRenderer<'a> {
    workspace: &'a Workspace,
    options: DisplayOptions,
    maps: HashMap<String, TargetMap>,
    out: String,
}

impl TreeRenderer<'_> {
    fn lookup(&mut self, project: &str, target: &str) -> Result<Option<Target>, WorkspaceError> {
        if !self.maps.contains_key(project) {
            if !self.workspace.contains_project(project) {
                return Ok(None);
            }
            let config = self.workspace.read_project(project)?;
            self.maps.insert(project.to_string(), config.targets);
        }
        Ok(self.maps.get(project).and_then(|map| map.get(target)).cloned())
    }

    fn node(
        &mut self,
        project: &str,
        label: &str,
        role: Option<&str>,
        prefix: &str,
        is_last: bool,
        path: &mut Vec<String>,
    ) -> Result<(), WorkspaceError> {
        let connector = if is_last { "└─ " } else { "├─ " };
        let child_prefix = format!("{}{}", prefix, if is_last { "   " } else { "│  " });
        let role = role.map(|r| format!(" ({})", r)).unwrap_or_default();

        let (ref_project, target_name) = match split_reference(project, label) {
            Ok(parts) => parts,
            Err(_) => {
                let _ = writeln!(self.out, "{}{}{}{} (invalid reference)", prefix, connector, label, role);
                return Ok(());
            }
        };
        let key = format!("{}:{}", ref_project, target_name);
        let Some(target) = self.lookup(ref_project, target_name)? else {
            let _ = writeln!(self.out, "{}{}{}{} (missing)", prefix, connector, label, role);
            return Ok(());
        };
        if path.contains(&key) {
            let _ = writeln!(self.out, "{}{}{}{} (cycle)", prefix, connector, label, role);
            return Ok(());
        }

        let chain = match target.chain_options() {
            None => {
                let options = if self.options.show_options && !target.options.is_empty() {
                    format!(" {}", serde_json::Value::Object(target.options.clone()))
                } else {
                    String::new()
                };
                let _ = writeln!(
                    self.out,
                    "{}{}{}{} [{}]{}",
                    prefix, connector, label, role, target.executor, options
                );
                return Ok(());
            }
            Some(Ok(chain)) => chain,
            Some(Err(e)) => {
                let _ = writeln!(self.out, "{}{}{}{} (malformed chain: {})", prefix, connector, label, role, e);
                return Ok(());
            }
        };

        let _ = writeln!(self.out, "{}{}{}{} (chain)", prefix, connector, label, role);
        if self.options.max_depth.is_some_and(|max| path.len() + 1 >= max) {
            return Ok(());
        }

        path.push(key);
        let children = chain_children(&chain);
        for (i, (member, member_role)) in children.iter().enumerate() {
            let is_last_child = i == children.len() - 1;
            match member {
                Child::Target(name) => {
                    self.node(ref_project, name, *member_role, &child_prefix, is_last_child, path)?
                }
                Child::Stage(stage, members) => {
                    let stage_connector = if is_last_child { "└─ " } else { "├─ " };
                    let _ = writeln!(self.out, "{}{}stage {}", child_prefix, stage_connector, stage);
                    let stage_prefix =
                        format!("{}{}", child_prefix, if is_last_child { "   " } else { "│  " });
                    for (j, (name, stage_role)) in members.iter().enumerate() {
                        self.node(
                            ref_project,
                            name,
                            *stage_role,
                            &stage_prefix,
                            j == members.len() - 1,
                            path,
                        )?;
                    }
                }
            }
        }
        path.pop();
        Ok(())
    }
}

enum Child<'a> {
    Target(&'a str),
    Stage(&'a str, Vec<(&'a str, Option<&'static str>)>),
}

/// A chain's members in execution order, followed by its stages.
fn chain_children(chain: &ChainOptions) -> Vec<(Child<'_>, Option<&'static str>)> {
    let lists: [(&Option<Vec<String>>, Option<&'static str>); 4] = [
        (&chain.pre_targets, Some("pre")),
        (&chain.targets, None),
        (&chain.additional_targets, Some("additional")),
        (&chain.post_targets, Some("post")),
    ];
    let mut children: Vec<(Child<'_>, Option<&'static str>)> = lists
        .into_iter()
        .flat_map(|(list, role)| {
            list.iter()
                .flatten()
                .map(move |name| (Child::Target(name.as_str()), role))
        })
        .collect();

    for (name, stage) in chain.stages.iter().flatten() {
        let members = stage
            .pre_targets
            .iter()
            .map(|t| (t.as_str(), Some("pre")))
            .chain(stage.targets.iter().map(|t| (t.as_str(), None)))
            .chain(stage.post_targets.iter().map(|t| (t.as_str(), Some("post"))))
            .collect();
        children.push((Child::Stage(name.as_str(), members), None));
    }
    children
}
