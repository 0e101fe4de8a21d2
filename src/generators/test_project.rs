// src/generators/test_project.rs

use super::{GeneratorError, GeneratorReport, ensure_targets_free};
use crate::{
    constants::DOTNET_TEST_EXECUTOR,
    core::{
        chain_merger::{self, Additions, ChainAddition},
        paths,
        workspace::Workspace,
    },
    executors::find_csproj_files,
    models::{ProjectConfiguration, Target},
    scaffold::{self, GeneratedFile, TemplateVars, csproj, solution, templates},
};
use clap::ValueEnum;
use serde_json::json;
use std::fs;
use uuid::Uuid;

pub const TEST_TARGET: &str = "test";

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TestFramework {
    #[default]
    Xunit,
    Nunit,
    Mstest,
}

impl TestFramework {
    fn templates(self) -> (&'static str, &'static str) {
        match self {
            TestFramework::Xunit => (templates::XUNIT_CSPROJ, templates::XUNIT_TEST),
            TestFramework::Nunit => (templates::NUNIT_CSPROJ, templates::NUNIT_TEST),
            TestFramework::Mstest => (templates::MSTEST_CSPROJ, templates::MSTEST_TEST),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TestProjectOptions {
    pub project: String,
    pub framework: TestFramework,
    /// Target framework moniker; defaults to the workspace's.
    pub target_framework: Option<String>,
}

/// Adds a `test/<Pascal>.Tests` project next to a project's `.csproj`, a
/// `test` target that runs it, and `test` as a step of `build`.
pub fn generate(workspace: &Workspace, options: &TestProjectOptions) -> Result<GeneratorReport, GeneratorError> {
    let project = workspace.read_project(&options.project)?;
    ensure_targets_free(&project, &[TEST_TARGET])?;

    let project_root = workspace.project_root(&project.name)?;
    let main_csproj = find_csproj_files(&project_root)
        .into_iter()
        .next()
        .ok_or_else(|| GeneratorError::MissingCsproj {
            project: project.name.clone(),
            root: project_root.clone(),
        })?;
    let pascal = main_csproj
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let main_file = main_csproj
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let test_dir = format!("test/{}.Tests", pascal);
    let test_csproj_path = format!("{}/{}.Tests.csproj", test_dir, pascal);

    let mut vars = TemplateVars::new();
    vars.insert("projectName", project.name.clone());
    vars.insert("pascalName", pascal.clone());
    vars.insert(
        "framework",
        options
            .target_framework
            .clone()
            .unwrap_or_else(|| workspace.defaults().framework().to_string()),
    );
    let (csproj_template, test_template) = options.framework.templates();
    let mut test_csproj = GeneratedFile::new(&test_csproj_path, csproj_template, &vars);
    test_csproj.content = csproj::add_project_reference(&test_csproj.content, &format!("../../{}", main_file))?;
    let files = vec![
        test_csproj,
        GeneratedFile::new(format!("{}/UnitTest1.cs", test_dir), test_template, &vars),
    ];

    let mut targets = project.targets.clone();
    targets.insert(
        TEST_TARGET.to_string(),
        Target::new(DOTNET_TEST_EXECUTOR, json!({ "srcPath": test_csproj_path })),
    );
    let mut additions = Additions::new();
    additions.insert("build".to_string(), ChainAddition::targets([TEST_TARGET]));
    let merged = chain_merger::merge_additions(targets, additions)?;

    let solution_path = workspace
        .config()
        .workspace
        .solution
        .as_ref()
        .map(|sln| workspace.root().join(sln))
        .filter(|path| path.is_file());
    let solution_update = match solution_path {
        Some(sln_path) => {
            let sln_dir = sln_path.parent().unwrap_or(workspace.root());
            let relative = paths::to_slash(&paths::relative_path(sln_dir, &project_root.join(&test_csproj_path)));
            let updated = solution::add_project(
                &fs::read_to_string(&sln_path)?,
                &format!("{}.Tests", pascal),
                &relative,
                Uuid::new_v4(),
            )?;
            Some((sln_path, updated))
        }
        None => None,
    };

    let mut report = GeneratorReport {
        created: scaffold::write_tree(&project_root, &files)?,
        ..Default::default()
    };
    if let Some((sln_path, updated)) = solution_update {
        fs::write(&sln_path, updated)?;
        report.updated.push(sln_path);
    }
    let name = project.name.clone();
    workspace.write_project(&ProjectConfiguration {
        targets: merged,
        ..project
    })?;
    report.updated.push(project_root.join(crate::constants::PROJECT_CONFIG_FILENAME));
    report.targets.push(TEST_TARGET.to_string());

    log::info!("Added {} tests to '{}'.", pascal, name);
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::constants::*;
    use crate::core::chain_merger::MergeError;
    use crate::models::{ProjectConfiguration, ProjectType};

    fn project_with_csproj(workspace: &mut Workspace) -> std::path::PathBuf {
        let mut project = ProjectConfiguration::new("orders", "apps/orders", ProjectType::Application);
        project.targets.insert(
            "build".into(),
            Target::new(DOTNET_BUILD_EXECUTOR, json!({ "srcPath": "Orders.csproj" })),
        );
        workspace.add_project(&project).unwrap();
        let root = workspace.project_root("orders").unwrap();
        fs::write(root.join("Orders.csproj"), templates::CONSOLE_CSPROJ).unwrap();
        root
    }

    fn options() -> TestProjectOptions {
        TestProjectOptions {
            project: "orders".into(),
            framework: TestFramework::Xunit,
            target_framework: None,
        }
    }

    #[test]
    fn test_scaffolds_tests_and_demotes_build() {
        let (_dir, mut workspace) = empty_workspace();
        let root = project_with_csproj(&mut workspace);

        let report = generate(&workspace, &options()).unwrap();

        let test_csproj = read(&root.join("test/Orders.Tests/Orders.Tests.csproj"));
        assert!(test_csproj.contains(r#"<ProjectReference Include="..\..\Orders.csproj" />"#));
        assert!(test_csproj.contains("<TargetFramework>net8.0</TargetFramework>"));
        assert!(root.join("test/Orders.Tests/UnitTest1.cs").is_file());
        assert_eq!(report.targets, vec!["test"]);

        let targets = targets_of(&workspace, "orders");
        let keys: Vec<_> = targets.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["build", "buildSrc", "test"]);
        assert_eq!(targets["test"].executor, DOTNET_TEST_EXECUTOR);
        assert_eq!(
            targets["test"].options["srcPath"],
            json!("test/Orders.Tests/Orders.Tests.csproj")
        );
        let chain = targets["build"].chain_options().unwrap().unwrap();
        assert_eq!(chain.targets, Some(vec!["buildSrc".to_string(), "test".to_string()]));
        assert_eq!(targets["buildSrc"].executor, DOTNET_BUILD_EXECUTOR);
    }

    #[test]
    fn test_refuses_existing_test_target_without_writing() {
        let (_dir, mut workspace) = empty_workspace();
        let root = project_with_csproj(&mut workspace);
        workspace
            .update_targets("orders", |_, mut targets| {
                targets.insert("test".into(), Target::new(RUN_COMMANDS_EXECUTOR, json!({})));
                Ok::<_, GeneratorError>(targets)
            })
            .unwrap();

        let result = generate(&workspace, &options());
        assert!(matches!(result, Err(GeneratorError::TargetExists { .. })));
        assert!(!root.join("test").exists());
    }

    #[test]
    fn test_requires_a_csproj() {
        let (_dir, mut workspace) = empty_workspace();
        workspace
            .add_project(&ProjectConfiguration::new("orders", "apps/orders", ProjectType::Application))
            .unwrap();
        assert!(matches!(
            generate(&workspace, &options()),
            Err(GeneratorError::MissingCsproj { .. })
        ));
    }

    #[test]
    fn test_adds_test_project_to_solution() {
        let (_dir, mut workspace) = workspace_with_solution();
        fs::write(workspace.root().join("Workspace.sln"), solution::new_solution()).unwrap();
        project_with_csproj(&mut workspace);

        let report = generate(
            &workspace,
            &TestProjectOptions {
                framework: TestFramework::Nunit,
                ..options()
            },
        )
        .unwrap();

        let sln = read(&workspace.root().join("Workspace.sln"));
        assert!(sln.contains(r#""Orders.Tests", "apps\orders\test\Orders.Tests\Orders.Tests.csproj""#));
        assert!(report.updated.contains(&workspace.root().join("Workspace.sln")));
    }

    #[test]
    fn test_malformed_build_chain_leaves_solution_and_files_untouched() {
        let (_dir, mut workspace) = workspace_with_solution();
        let sln_path = workspace.root().join("Workspace.sln");
        fs::write(&sln_path, solution::new_solution()).unwrap();
        let root = project_with_csproj(&mut workspace);
        workspace
            .update_targets("orders", |_, mut targets| {
                targets.insert("build".into(), Target::new(CHAIN_EXECUTOR, json!({ "targets": "oops" })));
                Ok::<_, GeneratorError>(targets)
            })
            .unwrap();
        let before = targets_of(&workspace, "orders");

        let result = generate(&workspace, &options());

        assert!(matches!(
            result,
            Err(GeneratorError::Merge(MergeError::MalformedChain { ref target, .. })) if target == "build"
        ));
        assert!(!root.join("test").exists());
        assert_eq!(read(&sln_path), solution::new_solution());
        assert_eq!(targets_of(&workspace, "orders"), before);
    }
}
