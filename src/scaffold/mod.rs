//! # Scaffolding
//!
//! File generation for the generators: `__token__` substitution over the
//! embedded templates, plus the two text splicers for solution and project
//! files.
//!
//! - **`templates`**: the embedded file templates.
//! - **`solution`**: adds projects to a `.sln`.
//! - **`csproj`**: adds project references and versions to a `.csproj`.

pub mod csproj;
pub mod solution;
pub mod templates;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScaffoldError {
    #[error("Filesystem Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Refusing to overwrite existing file '{0}'.")]
    FileExists(PathBuf),
}

/// Values substituted for `__key__` tokens.
pub type TemplateVars = BTreeMap<&'static str, String>;

/// Replaces every `__key__` token in `template` with its value.
/// Unknown tokens are left untouched.
pub fn render(template: &str, vars: &TemplateVars) -> String {
    vars.iter().fold(template.to_string(), |text, (key, value)| {
        text.replace(&format!("__{}__", key), value)
    })
}

/// A file to generate, relative to the scaffolding root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub content: String,
}

impl GeneratedFile {
    pub fn new(path: impl Into<PathBuf>, template: &str, vars: &TemplateVars) -> Self {
        Self {
            path: path.into(),
            content: render(template, vars),
        }
    }
}

/// Writes `files` under `root`. Every destination is checked first, so either
/// all files are written or none are.
pub fn write_tree(root: &Path, files: &[GeneratedFile]) -> Result<Vec<PathBuf>, ScaffoldError> {
    if let Some(existing) = files.iter().map(|f| root.join(&f.path)).find(|p| p.exists()) {
        return Err(ScaffoldError::FileExists(existing));
    }
    let mut written = Vec::with_capacity(files.len());
    for file in files {
        let path = root.join(&file.path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, &file.content)?;
        log::debug!("Created {}", path.display());
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars() -> TemplateVars {
        let mut vars = TemplateVars::new();
        vars.insert("pascalName", "OrdersApi".to_string());
        vars.insert("framework", "net8.0".to_string());
        vars
    }

    #[test]
    fn test_render_replaces_known_tokens_only() {
        let text = render("<RootNamespace>__pascalName__</RootNamespace> __unknown__ __framework__", &vars());
        assert_eq!(text, "<RootNamespace>OrdersApi</RootNamespace> __unknown__ net8.0");
    }

    #[test]
    fn test_write_tree_creates_nested_files() {
        let dir = tempfile::tempdir().unwrap();
        let files = vec![
            GeneratedFile::new("src/Program.cs", "// __pascalName__", &vars()),
            GeneratedFile::new("Orders.csproj", "<Project />", &vars()),
        ];
        let written = write_tree(dir.path(), &files).unwrap();
        assert_eq!(written.len(), 2);
        assert_eq!(fs::read_to_string(dir.path().join("src/Program.cs")).unwrap(), "// OrdersApi");
    }

    #[test]
    fn test_write_tree_writes_nothing_when_a_file_exists() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Dockerfile"), "FROM scratch").unwrap();
        let files = vec![
            GeneratedFile::new(".dockerignore", "bin/", &vars()),
            GeneratedFile::new("Dockerfile", "FROM alpine", &vars()),
        ];
        let result = write_tree(dir.path(), &files);
        assert!(matches!(result, Err(ScaffoldError::FileExists(_))));
        assert!(!dir.path().join(".dockerignore").exists());
        assert_eq!(fs::read_to_string(dir.path().join("Dockerfile")).unwrap(), "FROM scratch");
    }
}
