// src/generators/chain.rs

use super::{GeneratorError, GeneratorReport};
use crate::{
    constants::PROJECT_CONFIG_FILENAME,
    core::{
        chain_merger::{self, Additions, ChainAddition, Demotion},
        names,
        workspace::Workspace,
    },
    models::Stage,
};

#[derive(Debug, Clone, Default)]
pub struct ChainGeneratorOptions {
    pub project: String,
    pub target: String,
    /// Put the lists into this stage instead of the chain's top level.
    pub stage: Option<String>,
    pub targets: Vec<String>,
    pub pre_targets: Vec<String>,
    pub post_targets: Vec<String>,
    pub additional_targets: Vec<String>,
    /// Leave a demoted target out of the new chain's `targets`.
    pub legacy_demotion: bool,
}

impl ChainGeneratorOptions {
    fn references(&self) -> impl Iterator<Item = &String> {
        self.targets
            .iter()
            .chain(&self.pre_targets)
            .chain(&self.post_targets)
            .chain(&self.additional_targets)
    }

    fn into_addition(self) -> ChainAddition {
        let demotion = if self.legacy_demotion {
            Demotion::Legacy
        } else {
            Demotion::SpliceSource
        };
        let mut addition = match self.stage {
            Some(stage) => ChainAddition::default().with_stage(
                stage,
                Stage {
                    targets: self.targets,
                    pre_targets: self.pre_targets,
                    post_targets: self.post_targets,
                },
            ),
            None => ChainAddition::targets(self.targets)
                .with_pre_targets(self.pre_targets)
                .with_post_targets(self.post_targets),
        };
        addition.additional_targets = self.additional_targets;
        addition.with_demotion(demotion)
    }
}

/// Composes a chain target from explicit lists, merging into whatever the
/// project already has under that name.
pub fn generate(workspace: &Workspace, options: &ChainGeneratorOptions) -> Result<GeneratorReport, GeneratorError> {
    names::validate_target_name(&options.target)?;
    if let Some(stage) = &options.stage {
        names::validate_target_name(stage)?;
    }
    for reference in options.references() {
        names::validate_target_ref(reference)?;
    }
    if options.references().next().is_none() && options.stage.is_none() {
        return Err(GeneratorError::InvalidOptions(
            "Nothing to add: give at least one of --targets, --pre-targets, --post-targets, --additional-targets or --stage."
                .to_string(),
        ));
    }
    if options.legacy_demotion {
        log::warn!(
            "Legacy demotion: if '{}' is demoted, it will not run as part of the new chain.",
            options.target
        );
    }

    let project = workspace.read_project(&options.project)?;
    for reference in options.references().filter(|r| !r.contains(':')) {
        if !project.targets.contains_key(reference) && *reference != options.target {
            log::warn!("'{}' has no target named '{}' yet.", project.name, reference);
        }
    }

    let mut additions = Additions::new();
    additions.insert(options.target.clone(), options.clone().into_addition());
    let updated = workspace.update_targets(&project.name, |_, targets| {
        chain_merger::merge_additions(targets, additions).map_err(GeneratorError::from)
    })?;

    let mut report = GeneratorReport {
        updated: vec![workspace.project_root(&project.name)?.join(PROJECT_CONFIG_FILENAME)],
        targets: vec![options.target.clone()],
        ..Default::default()
    };
    let demoted = chain_merger::demoted_name(&options.target);
    if updated.targets.contains_key(&demoted) && !project.targets.contains_key(&demoted) {
        report.targets.push(demoted);
    }
    Ok(report)
}
