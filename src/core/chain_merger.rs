//! # Chain Merger
//!
//! Composes a project's targets into chains. Several generators may each want
//! to put a step before, inside or after a shared target such as `build`
//! without knowing about one another. `merge_additions` makes that safe: a
//! non-chain target that is in the way is demoted to `<name>Src` and wrapped
//! by a fresh chain, and everything else is appended in order.
use crate::{
    constants::DEMOTED_SUFFIX,
    models::{ChainStep, Stage, Step, Target, TargetMap},
};
use indexmap::IndexMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MergeError {
    /// An existing chain target whose options do not have the chain shape.
    #[error("Target '{target}' uses the chain executor but its options are malformed: {source}")]
    MalformedChain {
        target: String,
        #[source]
        source: serde_json::Error,
    },
}

/// How an existing non-chain target is treated when a chain takes its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Demotion {
    /// Move the target to `<name>Src` and run it first in the new chain.
    #[default]
    SpliceSource,
    /// Move the target to `<name>Src` but leave the chain's `targets` exactly
    /// as requested. The demoted step is no longer executed by the chain.
    Legacy,
}

/// What one caller wants added to one chain target.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChainAddition {
    pub targets: Vec<String>,
    pub pre_targets: Vec<String>,
    pub post_targets: Vec<String>,
    pub additional_targets: Vec<String>,
    pub stages: IndexMap<String, Stage>,
    pub demotion: Demotion,
}

impl ChainAddition {
    pub fn targets<I, S>(targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            targets: targets.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn with_pre_targets<I, S>(mut self, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pre_targets = targets.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_post_targets<I, S>(mut self, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.post_targets = targets.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_stage(mut self, name: impl Into<String>, stage: Stage) -> Self {
        self.stages.insert(name.into(), stage);
        self
    }

    pub fn with_demotion(mut self, demotion: Demotion) -> Self {
        self.demotion = demotion;
        self
    }
}

/// Additions keyed by the chain target they apply to, processed in order.
pub type Additions = IndexMap<String, ChainAddition>;

/// The name a demoted target is moved to.
pub fn demoted_name(target: &str) -> String {
    format!("{}{}", target, DEMOTED_SUFFIX)
}

/// Merges `additions` into `targets`, turning every addressed target into a chain.
///
/// Existing list entries always come first and nothing is de-duplicated, so
/// applying the same additions twice appends twice. Map keys are unique by
/// construction and an existing key keeps its position. Callers persisting
/// the result are expected to run it through [`sort_target_map`].
pub fn merge_additions(mut targets: TargetMap, additions: Additions) -> Result<TargetMap, MergeError> {
    for (name, mut addition) in additions {
        let step = match targets.get(&name).cloned() {
            None => ChainStep::default(),
            Some(existing) => match existing.into_step() {
                Ok(Step::Chain(step)) => step,
                Ok(Step::Leaf(leaf)) => {
                    let src_name = demote(&mut targets, &name, leaf);
                    match addition.demotion {
                        Demotion::SpliceSource => addition.targets.insert(0, src_name),
                        Demotion::Legacy => log::warn!(
                            "Legacy demotion for '{}': '{}' will no longer run as part of the chain.",
                            name,
                            src_name
                        ),
                    }
                    ChainStep::default()
                }
                Err(source) => return Err(MergeError::MalformedChain { target: name, source }),
            },
        };
        let target = apply(step, addition)
            .map_err(|source| MergeError::MalformedChain { target: name.clone(), source })?;
        log::debug!("Merged additions into chain target '{}'.", name);
        targets.insert(name, target);
    }
    Ok(targets)
}

/// Rebuilds the map with its keys in lexicographic order.
pub fn sort_target_map(mut targets: TargetMap) -> TargetMap {
    targets.sort_keys();
    targets
}

fn demote(targets: &mut TargetMap, name: &str, leaf: Target) -> String {
    let src_name = demoted_name(name);
    log::info!(
        "Demoting target '{}' ({}) to '{}' under a new chain.",
        name,
        leaf.executor,
        src_name
    );
    if targets.insert(src_name.clone(), leaf).is_some() {
        log::warn!("Target '{}' already existed and was overwritten by the demoted '{}'.", src_name, name);
    }
    src_name
}

fn apply(mut step: ChainStep, addition: ChainAddition) -> Result<Target, serde_json::Error> {
    let options = &mut step.options;
    append(&mut options.targets, addition.targets);
    append(&mut options.pre_targets, addition.pre_targets);
    append(&mut options.post_targets, addition.post_targets);
    append(&mut options.additional_targets, addition.additional_targets);
    if !addition.stages.is_empty() {
        // Shallow: an incoming stage replaces a stage of the same name wholesale.
        options.stages.get_or_insert_with(IndexMap::new).extend(addition.stages);
    }
    step.into_target()
}

fn append(list: &mut Option<Vec<String>>, additions: Vec<String>) {
    if additions.is_empty() {
        return;
    }
    list.get_or_insert_with(Vec::new).extend(additions);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::CHAIN_EXECUTOR;
    use crate::models::ChainOptions;
    use serde_json::json;

    fn leaf(executor: &str) -> Target {
        Target::new(executor, json!({ "commands": ["echo hi"] }))
    }

    fn chain_with_targets(names: &[&str]) -> Target {
        Target::new(CHAIN_EXECUTOR, json!({ "targets": names }))
    }

    fn options_of(map: &TargetMap, name: &str) -> ChainOptions {
        map.get(name).unwrap().chain_options().unwrap().unwrap()
    }

    fn additions(name: &str, addition: ChainAddition) -> Additions {
        let mut additions = Additions::new();
        additions.insert(name.to_string(), addition);
        additions
    }

    fn strings(items: &[&str]) -> Option<Vec<String>> {
        Some(items.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_fresh_name_becomes_chain() {
        let merged = merge_additions(TargetMap::new(), additions("deploy", ChainAddition::targets(["helmInstall"]))).unwrap();
        let target = merged.get("deploy").unwrap();
        assert_eq!(target.executor, CHAIN_EXECUTOR);
        assert_eq!(options_of(&merged, "deploy").targets, strings(&["helmInstall"]));
        assert!(!merged.contains_key("deploySrc"));
    }

    #[test]
    fn test_fresh_name_with_empty_addition_has_no_lists() {
        let merged = merge_additions(TargetMap::new(), additions("build", ChainAddition::default())).unwrap();
        let target = merged.get("build").unwrap();
        assert!(target.is_chain());
        assert!(target.options.is_empty());
    }

    #[test]
    fn test_demotion_preserves_original_and_runs_it_first() {
        let mut map = TargetMap::new();
        let original = leaf("rigging:run-commands");
        map.insert("build".to_string(), original.clone());

        let merged = merge_additions(map, additions("build", ChainAddition::targets(["dockerBuild"]))).unwrap();

        assert_eq!(merged.get("buildSrc"), Some(&original));
        assert_eq!(options_of(&merged, "build").targets, strings(&["buildSrc", "dockerBuild"]));
    }

    #[test]
    fn test_additive_merge_on_existing_chain() {
        let mut map = TargetMap::new();
        map.insert("build".to_string(), chain_with_targets(&["a", "b"]));

        let merged = merge_additions(map, additions("build", ChainAddition::targets(["c"]))).unwrap();

        assert_eq!(options_of(&merged, "build").targets, strings(&["a", "b", "c"]));
        assert!(!merged.contains_key("buildSrc"));
    }

    #[test]
    fn test_list_fields_are_independent() {
        let mut map = TargetMap::new();
        map.insert("build".to_string(), chain_with_targets(&["buildSrc", "test"]));
        let addition = ChainAddition {
            pre_targets: vec!["restore".to_string()],
            post_targets: vec!["report".to_string()],
            additional_targets: vec!["lint".to_string()],
            ..Default::default()
        };

        let merged = merge_additions(map, additions("build", addition)).unwrap();
        let options = options_of(&merged, "build");

        assert_eq!(options.targets, strings(&["buildSrc", "test"]));
        assert_eq!(options.pre_targets, strings(&["restore"]));
        assert_eq!(options.post_targets, strings(&["report"]));
        assert_eq!(options.additional_targets, strings(&["lint"]));
    }

    #[test]
    fn test_additional_targets_twice_appends_duplicates() {
        let mut map = TargetMap::new();
        map.insert("build".to_string(), chain_with_targets(&["buildSrc", "test"]));
        let addition = ChainAddition {
            additional_targets: vec!["lint".to_string()],
            ..Default::default()
        };

        let once = merge_additions(map, additions("build", addition.clone())).unwrap();
        let twice = merge_additions(once, additions("build", addition)).unwrap();
        let options = options_of(&twice, "build");

        assert_eq!(options.targets, strings(&["buildSrc", "test"]));
        assert_eq!(options.additional_targets, strings(&["lint", "lint"]));
    }

    #[test]
    fn test_rerun_does_not_duplicate_keys_but_appends_entries() {
        let mut map = TargetMap::new();
        map.insert("build".to_string(), leaf("rigging:dotnet-build"));
        let addition = ChainAddition::targets(["test"]);

        let once = merge_additions(map, additions("build", addition.clone())).unwrap();
        let twice = merge_additions(once.clone(), additions("build", addition)).unwrap();

        assert_eq!(once.len(), twice.len());
        assert_eq!(twice.get("buildSrc"), once.get("buildSrc"));
        assert_eq!(options_of(&twice, "build").targets, strings(&["buildSrc", "test", "test"]));
    }

    #[test]
    fn test_stage_shallow_merge_replaces_whole_stage() {
        let mut map = TargetMap::new();
        map.insert(
            "build".to_string(),
            Target::new(
                CHAIN_EXECUTOR,
                json!({ "stages": {
                    "src": { "targets": ["a"], "postTargets": ["p"] },
                    "docs": { "targets": ["d"] }
                }}),
            ),
        );
        let incoming = Stage {
            targets: vec!["x".to_string(), "y".to_string()],
            ..Default::default()
        };

        let merged = merge_additions(map, additions("build", ChainAddition::default().with_stage("src", incoming.clone()))).unwrap();
        let stages = options_of(&merged, "build").stages.unwrap();

        assert_eq!(stages.get("src"), Some(&incoming));
        assert_eq!(stages.get("docs").unwrap().targets, vec!["d".to_string()]);
        assert_eq!(stages.keys().collect::<Vec<_>>(), vec!["docs", "src"]);
    }

    #[test]
    fn test_legacy_demotion_leaves_targets_as_given() {
        let mut map = TargetMap::new();
        let original = Target::new("rigging:run-commands", json!({ "commands": ["echo hi"] }));
        map.insert("build".to_string(), original.clone());
        let addition = ChainAddition::targets(["target1"])
            .with_pre_targets(["pre1", "pre2"])
            .with_post_targets(["post1", "post2"])
            .with_demotion(Demotion::Legacy);

        let merged = merge_additions(map, additions("build", addition)).unwrap();
        let options = options_of(&merged, "build");

        assert_eq!(merged.get("buildSrc"), Some(&original));
        assert_eq!(options.pre_targets, strings(&["pre1", "pre2"]));
        assert_eq!(options.targets, strings(&["target1"]));
        assert_eq!(options.post_targets, strings(&["post1", "post2"]));
    }

    #[test]
    fn test_default_demotion_splices_source_with_pre_and_post() {
        let mut map = TargetMap::new();
        map.insert("build".to_string(), leaf("rigging:run-commands"));
        let addition = ChainAddition::targets(["target1"])
            .with_pre_targets(["pre1", "pre2"])
            .with_post_targets(["post1", "post2"]);

        let merged = merge_additions(map, additions("build", addition)).unwrap();
        let options = options_of(&merged, "build");

        assert_eq!(options.targets, strings(&["buildSrc", "target1"]));
        assert_eq!(options.pre_targets, strings(&["pre1", "pre2"]));
    }

    #[test]
    fn test_existing_key_keeps_position_and_sort_orders_keys() {
        let mut map = TargetMap::new();
        map.insert("version".to_string(), leaf("rigging:set-version"));
        map.insert("build".to_string(), leaf("rigging:dotnet-build"));
        map.insert("clean".to_string(), leaf("rigging:dotnet-clean"));

        let merged = merge_additions(map, additions("build", ChainAddition::targets(["test"]))).unwrap();
        assert_eq!(merged.keys().collect::<Vec<_>>(), vec!["version", "build", "clean", "buildSrc"]);

        let sorted = sort_target_map(merged.clone());
        assert_eq!(sorted.keys().collect::<Vec<_>>(), vec!["build", "buildSrc", "clean", "version"]);
        assert_eq!(sort_target_map(sorted.clone()), sorted);
    }

    #[test]
    fn test_unknown_chain_options_survive_merge() {
        let mut map = TargetMap::new();
        map.insert(
            "build".to_string(),
            Target::new(CHAIN_EXECUTOR, json!({ "targets": ["a"], "note": "keep me" })),
        );
        let merged = merge_additions(map, additions("build", ChainAddition::targets(["b"]))).unwrap();
        assert_eq!(merged.get("build").unwrap().options.get("note"), Some(&json!("keep me")));
    }

    #[test]
    fn test_malformed_chain_is_an_error() {
        let mut map = TargetMap::new();
        map.insert("build".to_string(), Target::new(CHAIN_EXECUTOR, json!({ "targets": 3 })));
        let result = merge_additions(map, additions("build", ChainAddition::targets(["b"])));
        assert!(matches!(result, Err(MergeError::MalformedChain { target, .. }) if target == "build"));
    }

    #[test]
    fn test_multiple_additions_are_processed_in_order() {
        let mut map = TargetMap::new();
        map.insert("build".to_string(), leaf("rigging:dotnet-build"));
        let mut all = Additions::new();
        all.insert("build".to_string(), ChainAddition::targets(["dockerBuild"]));
        all.insert("publish".to_string(), ChainAddition::targets(["dockerPublish"]));

        let merged = merge_additions(map, all).unwrap();

        assert_eq!(options_of(&merged, "build").targets, strings(&["buildSrc", "dockerBuild"]));
        assert_eq!(options_of(&merged, "publish").targets, strings(&["dockerPublish"]));
    }
}
