//! Splicing of Visual Studio solution (`.sln`) files.
//!
//! Only two parts of the format are touched: the `Project(...)`/`EndProject`
//! blocks and the `ProjectConfigurationPlatforms` global section. Everything
//! else is preserved byte for byte.
use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;
use uuid::Uuid;

/// Project type GUID for C# projects.
pub const CSHARP_PROJECT_TYPE_GUID: &str = "FAE04EC0-301F-11D3-BF4B-00C04F79EFBC";

const CONFIGURATIONS: [&str; 2] = ["Debug|Any CPU", "Release|Any CPU"];

lazy_static! {
    static ref GLOBAL_LINE: Regex = Regex::new(r"(?m)^Global\r?\n").expect("valid Global regex");
    static ref PROJECT_CONFIG_HEADER: Regex =
        Regex::new(r"(?m)^[ \t]*GlobalSection\(ProjectConfigurationPlatforms\) = postSolution\r?\n")
            .expect("valid section header regex");
    static ref SOLUTION_CONFIG_SECTION: Regex =
        Regex::new(r"(?ms)^[ \t]*GlobalSection\(SolutionConfigurationPlatforms\).*?^[ \t]*EndGlobalSection\r?\n")
            .expect("valid solution config regex");
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SolutionError {
    #[error("The solution file has no 'Global' section.")]
    MissingGlobal,
}

/// An empty solution with Debug and Release configurations.
pub fn new_solution() -> String {
    let mut sln = String::from(
        "\nMicrosoft Visual Studio Solution File, Format Version 12.00\n\
         # Visual Studio Version 17\n\
         VisualStudioVersion = 17.0.31903.59\n\
         MinimumVisualStudioVersion = 10.0.40219.1\n\
         Global\n\
         \tGlobalSection(SolutionConfigurationPlatforms) = preSolution\n",
    );
    for configuration in CONFIGURATIONS {
        sln.push_str(&format!("\t\t{0} = {0}\n", configuration));
    }
    sln.push_str(
        "\tEndGlobalSection\n\
         \tGlobalSection(SolutionProperties) = preSolution\n\
         \t\tHideSolutionNode = FALSE\n\
         \tEndGlobalSection\n\
         EndGlobal\n",
    );
    sln
}

/// Formats a GUID the way solution files write them: `{UPPER-CASE}`.
pub fn format_guid(guid: Uuid) -> String {
    format!("{{{}}}", guid.hyphenated().to_string().to_uppercase())
}

/// Adds a C# project to `sln`. `relative_path` is relative to the solution's
/// directory; it is written with backslashes as Visual Studio does.
///
/// Returns the input unchanged if the project path is already listed.
pub fn add_project(sln: &str, name: &str, relative_path: &str, guid: Uuid) -> Result<String, SolutionError> {
    let path = relative_path.replace('/', "\\");
    if sln.contains(&format!("\"{}\"", path)) {
        log::debug!("Solution already references '{}'.", path);
        return Ok(sln.to_string());
    }
    let newline = if sln.contains("\r\n") { "\r\n" } else { "\n" };
    let guid = format_guid(guid);

    // 1. Project block, right before `Global`.
    let global_at = GLOBAL_LINE.find(sln).ok_or(SolutionError::MissingGlobal)?.start();
    let (head, tail) = sln.split_at(global_at);
    let mut text = String::with_capacity(sln.len() + 512);
    text.push_str(head);
    text.push_str(&format!(
        "Project(\"{{{}}}\") = \"{}\", \"{}\", \"{}\"{nl}EndProject{nl}",
        CSHARP_PROJECT_TYPE_GUID,
        name,
        path,
        guid,
        nl = newline
    ));
    text.push_str(tail);

    // 2. Configuration lines, creating the section if the solution has none.
    let config_lines: String = CONFIGURATIONS
        .iter()
        .flat_map(|configuration| {
            [
                format!("\t\t{}.{1}.ActiveCfg = {1}{2}", guid, configuration, newline),
                format!("\t\t{}.{1}.Build.0 = {1}{2}", guid, configuration, newline),
            ]
        })
        .collect();

    if let Some(header) = PROJECT_CONFIG_HEADER.find(&text) {
        text.insert_str(header.end(), &config_lines);
    } else {
        let section = format!(
            "\tGlobalSection(ProjectConfigurationPlatforms) = postSolution{nl}{}\tEndGlobalSection{nl}",
            config_lines,
            nl = newline
        );
        let insert_at = match SOLUTION_CONFIG_SECTION.find(&text) {
            Some(found) => found.end(),
            None => GLOBAL_LINE.find(&text).ok_or(SolutionError::MissingGlobal)?.end(),
        };
        text.insert_str(insert_at.min(text.len()), &section);
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guid() -> Uuid {
        Uuid::parse_str("0b6f6d0e-3f1c-4c2e-9d8a-1b2c3d4e5f60").unwrap()
    }

    #[test]
    fn test_add_project_to_new_solution() {
        let sln = add_project(&new_solution(), "Orders", "apps/orders/Orders.csproj", guid()).unwrap();

        let project_line = "Project(\"{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}\") = \"Orders\", \"apps\\orders\\Orders.csproj\", \"{0B6F6D0E-3F1C-4C2E-9D8A-1B2C3D4E5F60}\"";
        assert!(sln.contains(project_line));
        assert!(sln.find(project_line).unwrap() < sln.find("\nGlobal\n").unwrap());
        assert!(sln.contains("GlobalSection(ProjectConfigurationPlatforms) = postSolution"));
        assert!(sln.contains("{0B6F6D0E-3F1C-4C2E-9D8A-1B2C3D4E5F60}.Release|Any CPU.Build.0 = Release|Any CPU"));
        // The new section follows the solution configurations.
        let solution_configs = sln.find("SolutionConfigurationPlatforms").unwrap();
        let project_configs = sln.find("ProjectConfigurationPlatforms").unwrap();
        assert!(solution_configs < project_configs);
        assert!(project_configs < sln.find("SolutionProperties").unwrap());
    }

    #[test]
    fn test_add_second_project_reuses_section() {
        let first = add_project(&new_solution(), "Orders", "apps/orders/Orders.csproj", guid()).unwrap();
        let second = add_project(&first, "Billing", "libs/billing/Billing.csproj", Uuid::new_v4()).unwrap();
        assert_eq!(second.matches("GlobalSection(ProjectConfigurationPlatforms)").count(), 1);
        assert_eq!(second.matches("EndProject").count(), 2);
        assert_eq!(second.matches(".ActiveCfg = ").count(), 4);
    }

    #[test]
    fn test_add_project_is_idempotent() {
        let once = add_project(&new_solution(), "Orders", "apps/orders/Orders.csproj", guid()).unwrap();
        let twice = add_project(&once, "Orders", "apps/orders/Orders.csproj", Uuid::new_v4()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_add_project_keeps_crlf_line_endings() {
        let crlf = new_solution().replace('\n', "\r\n");
        let sln = add_project(&crlf, "Orders", "apps/orders/Orders.csproj", guid()).unwrap();
        assert!(sln.contains("\r\nEndProject\r\n"));
        assert!(!sln.replace("\r\n", "").contains('\n'));
    }

    #[test]
    fn test_add_project_requires_global_section() {
        let result = add_project("Microsoft Visual Studio Solution File\n", "Orders", "Orders.csproj", guid());
        assert_eq!(result, Err(SolutionError::MissingGlobal));
    }
}
