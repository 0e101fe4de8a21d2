// src/core/names.rs

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

lazy_static! {
    static ref TARGET_NAME: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_.-]*$").expect("valid target name regex");
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum NameError {
    #[error("Name cannot be empty.")]
    Empty,
    #[error("Name '{0}' cannot contain whitespace.")]
    Whitespace(String),
    #[error("Name '{0}' cannot contain path separators or ':'.")]
    InvalidChars(String),
    #[error("'{0}' is a reserved name.")]
    Reserved(String),
    #[error("'{0}' is not a valid target name (letters, digits, '_', '.', '-'; must not start with a digit).")]
    InvalidTarget(String),
}

/// Validates a project name, returning it trimmed.
pub fn validate_project_name(raw_name: &str) -> Result<String, NameError> {
    let name = raw_name.trim();

    if name.is_empty() {
        return Err(NameError::Empty);
    }
    if name.contains(char::is_whitespace) {
        return Err(NameError::Whitespace(name.to_string()));
    }
    if name.contains(['/', '\\', ':']) {
        return Err(NameError::InvalidChars(name.to_string()));
    }
    let reserved = ["..", ".", "*", "**", "_"];
    if reserved.contains(&name) {
        return Err(NameError::Reserved(name.to_string()));
    }
    if !name.starts_with(char::is_alphanumeric) {
        log::warn!(
            "The name '{}' starts with a non-alphanumeric character. This is allowed but may produce odd .NET identifiers.",
            name
        );
    }

    Ok(name.to_string())
}

/// Validates a bare target name (no `project:` prefix).
pub fn validate_target_name(name: &str) -> Result<(), NameError> {
    if name.is_empty() {
        return Err(NameError::Empty);
    }
    if !TARGET_NAME.is_match(name) {
        return Err(NameError::InvalidTarget(name.to_string()));
    }
    Ok(())
}

/// Validates an entry of a chain list: `target` or `project:target`.
pub fn validate_target_ref(reference: &str) -> Result<(), NameError> {
    match reference.split_once(':') {
        Some((project, target)) => {
            // Stored as written, so padding would never match a project at run time.
            if validate_project_name(project)? != project {
                return Err(NameError::Whitespace(project.to_string()));
            }
            validate_target_name(target)
        }
        None => validate_target_name(reference),
    }
}

/// Converts a project name to a .NET-style identifier: `orders-api.core` -> `OrdersApi.Core`.
pub fn pascal_case(name: &str) -> String {
    name.split('.')
        .map(|segment| {
            segment
                .split(['-', '_', ' '])
                .filter(|word| !word.is_empty())
                .map(capitalize)
                .collect::<String>()
        })
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join(".")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pascal_case() {
        assert_eq!(pascal_case("orders-api"), "OrdersApi");
        assert_eq!(pascal_case("orders_api.core"), "OrdersApi.Core");
        assert_eq!(pascal_case("Billing"), "Billing");
        assert_eq!(pascal_case("a--b"), "AB");
    }

    #[test]
    fn test_validate_project_name() {
        assert_eq!(validate_project_name("  my-api "), Ok("my-api".to_string()));
        assert_eq!(validate_project_name(""), Err(NameError::Empty));
        assert!(matches!(validate_project_name("my api"), Err(NameError::Whitespace(_))));
        assert!(matches!(validate_project_name("apps/api"), Err(NameError::InvalidChars(_))));
        assert!(matches!(validate_project_name("api:build"), Err(NameError::InvalidChars(_))));
        assert!(matches!(validate_project_name(".."), Err(NameError::Reserved(_))));
    }

    #[test]
    fn test_validate_target_names_and_refs() {
        assert!(validate_target_name("dockerBuild").is_ok());
        assert!(validate_target_name("build-src").is_ok());
        assert_eq!(validate_target_name(""), Err(NameError::Empty));
        assert!(validate_target_name("1build").is_err());
        assert!(validate_target_name("api:build").is_err());
        assert!(validate_target_ref("api:build").is_ok());
        assert!(validate_target_ref("api:").is_err());
    }

    #[test]
    fn test_target_ref_rejects_padded_project() {
        assert_eq!(
            validate_target_ref("api :build"),
            Err(NameError::Whitespace("api ".to_string()))
        );
        assert!(validate_target_ref(" api:build").is_err());
        assert!(validate_target_ref("api: build").is_err());
    }
}
