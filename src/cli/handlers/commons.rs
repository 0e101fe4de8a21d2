// src/cli/handlers/commons.rs

use crate::core::{names, workspace::Workspace};
use anyhow::{Result, anyhow};
use serde_json::{Map, Value};
use std::env;

/// Opens the workspace for the current directory (or `RIGGING_WORKSPACE`).
pub fn current_workspace() -> Result<Workspace> {
    let cwd = env::current_dir()?;
    Ok(Workspace::locate(&cwd)?)
}

/// Parses a vector of "KEY=VALUE" strings, keeping their order.
pub fn parse_key_value_pairs(pairs: &[String]) -> Result<Vec<(String, String)>> {
    pairs
        .iter()
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => Ok((key.trim().to_string(), value.trim().to_string())),
            _ => Err(anyhow!(
                "Invalid format for key-value pair: '{}'. Expected 'KEY=VALUE'.",
                pair
            )),
        })
        .collect()
}

/// Turns `--opt` pairs into target option overrides. A value that parses as
/// JSON (`true`, `3`, `["a"]`) is used as such; anything else is a string.
pub fn parse_overrides(pairs: &[String]) -> Result<Map<String, Value>> {
    Ok(parse_key_value_pairs(pairs)?
        .into_iter()
        .map(|(key, raw)| {
            let value = serde_json::from_str(&raw).unwrap_or(Value::String(raw));
            (key, value)
        })
        .collect())
}

/// Resolves `project:target`, or `project` plus a separate `target`.
pub fn split_target_ref(reference: &str, target: Option<&str>) -> Result<(String, String)> {
    let (project, target) = match (reference.split_once(':'), target) {
        (Some(_), Some(extra)) => {
            return Err(anyhow!(
                "'{}' already names a target; unexpected extra argument '{}'.",
                reference,
                extra
            ));
        }
        (Some((project, target)), None) => (project, target),
        (None, Some(target)) => (reference, target),
        (None, None) => {
            return Err(anyhow!(
                "Missing target: use `<project>:<target>` or `<project> <target>`."
            ));
        }
    };
    names::validate_target_name(target)?;
    Ok((project.to_string(), target.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_overrides_json_or_string() {
        let overrides = parse_overrides(&[
            "version=1.2.0".to_string(),
            "noRestore=true".to_string(),
            "tags=[\"a\",\"b\"]".to_string(),
            "filter=Category=Unit".to_string(),
        ])
        .unwrap();
        assert_eq!(overrides["version"], json!("1.2.0"));
        assert_eq!(overrides["noRestore"], json!(true));
        assert_eq!(overrides["tags"], json!(["a", "b"]));
        assert_eq!(overrides["filter"], json!("Category=Unit"));
    }

    #[test]
    fn test_parse_key_value_pairs_rejects_missing_equals() {
        assert!(parse_key_value_pairs(&["novalue".to_string()]).is_err());
        assert!(parse_key_value_pairs(&["=value".to_string()]).is_err());
    }

    #[test]
    fn test_split_target_ref_forms() {
        assert_eq!(
            split_target_ref("api:build", None).unwrap(),
            ("api".to_string(), "build".to_string())
        );
        assert_eq!(
            split_target_ref("api", Some("build")).unwrap(),
            ("api".to_string(), "build".to_string())
        );
        assert!(split_target_ref("api", None).is_err());
        assert!(split_target_ref("api:build", Some("test")).is_err());
        assert!(split_target_ref("api:bad target", None).is_err());
    }
}
