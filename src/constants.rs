// src/constants.rs

/// The name of the workspace configuration file, found at the workspace root.
pub const WORKSPACE_CONFIG_FILENAME: &str = "rigging.toml";

/// The name of the per-project configuration file (inside the project root).
pub const PROJECT_CONFIG_FILENAME: &str = "project.json";

/// The name of the user-level defaults file (in `~/.config/rigging/`).
pub const USER_CONFIG_FILENAME: &str = "config.toml";

/// Environment variable that overrides workspace discovery.
pub const WORKSPACE_ENV_VAR: &str = "RIGGING_WORKSPACE";

/// Suffix appended to a target name when it is demoted under a new chain.
pub const DEMOTED_SUFFIX: &str = "Src";

/// The executor identifier of a target whose only job is to run other targets.
pub const CHAIN_EXECUTOR: &str = "rigging:chain-execute";

pub const RUN_COMMANDS_EXECUTOR: &str = "rigging:run-commands";
pub const SET_VERSION_EXECUTOR: &str = "rigging:set-version";

pub const DOTNET_BUILD_EXECUTOR: &str = "rigging:dotnet-build";
pub const DOTNET_CLEAN_EXECUTOR: &str = "rigging:dotnet-clean";
pub const DOTNET_PACK_EXECUTOR: &str = "rigging:dotnet-pack";
pub const DOTNET_PUBLISH_EXECUTOR: &str = "rigging:dotnet-publish";
pub const DOTNET_TEST_EXECUTOR: &str = "rigging:dotnet-test";
pub const DOTNET_RUN_EXECUTOR: &str = "rigging:dotnet-run";

pub const DOCKER_BUILD_EXECUTOR: &str = "rigging:docker-build";
pub const DOCKER_PUBLISH_EXECUTOR: &str = "rigging:docker-publish";
pub const DOCKER_RUN_EXECUTOR: &str = "rigging:docker-run";

pub const HELM_PACKAGE_EXECUTOR: &str = "rigging:helm-package";
pub const HELM_INSTALL_EXECUTOR: &str = "rigging:helm-install";
pub const KUBECTL_APPLY_EXECUTOR: &str = "rigging:kubectl-apply";
