// src/system/executor.rs

use std::collections::BTreeMap;
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command as StdCommand, Stdio};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Command could not be parsed: {0}")]
    CommandParse(String),
    #[error("No command specified to run.")]
    EmptyCommand,
    #[error("Command '{0}' could not be executed: {1}")]
    CommandFailed(String, std::io::Error),
    #[error("Command '{command}' exited with {}.{}", exit_label(.code), output_tail(.output))]
    NonZeroExitStatus {
        command: String,
        code: Option<i32>,
        output: String,
    },
    #[error("Command '{command}' produced output that was not valid UTF-8")]
    InvalidUtf8Output {
        command: String,
        #[source]
        source: std::string::FromUtf8Error,
    },
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "no exit code (terminated by a signal)".to_string(),
    }
}

fn output_tail(output: &str) -> String {
    let trimmed = output.trim_end();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("\n{}", trimmed)
    }
}

/// A fully specified external command: program, arguments, working directory
/// and extra environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    pub env: BTreeMap<String, String>,
    /// Stream output straight to the terminal instead of capturing it.
    /// Used by long-running commands such as `dotnet run`.
    pub inherit_output: bool,
}

impl CommandLine {
    pub fn new(program: impl Into<String>, cwd: &Path) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.to_path_buf(),
            env: BTreeMap::new(),
            inherit_output: false,
        }
    }

    /// Splits a shell-style line (`docker build -t "my image" .`) into a command.
    pub fn parse(line: &str, cwd: &Path) -> Result<Self, ExecutionError> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Err(ExecutionError::EmptyCommand);
        }
        let mut parts = shlex::split(trimmed)
            .ok_or_else(|| ExecutionError::CommandParse(trimmed.to_string()))?
            .into_iter();
        let program = parts.next().ok_or(ExecutionError::EmptyCommand)?;
        Ok(Self::new(program, cwd).args(parts))
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Appends `flag value` when `value` is present.
    pub fn opt(self, flag: &str, value: Option<&str>) -> Self {
        match value {
            Some(value) => self.arg(flag).arg(value),
            None => self,
        }
    }

    /// Appends `flag` when `enabled`.
    pub fn flag(self, flag: &str, enabled: bool) -> Self {
        if enabled { self.arg(flag) } else { self }
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn inherit_output(mut self) -> Self {
        self.inherit_output = true;
        self
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let words = std::iter::once(self.program.as_str()).chain(self.args.iter().map(String::as_str));
        match shlex::try_join(words) {
            Ok(joined) => f.write_str(&joined),
            Err(_) => write!(f, "{} {}", self.program, self.args.join(" ")),
        }
    }
}

/// The subprocess service. Implementations run one command to completion and
/// return its combined stdout/stderr; a non-zero exit is an error.
pub trait CommandRunner {
    fn run(&self, command: &CommandLine) -> Result<String, ExecutionError>;
}

/// Runs commands as real child processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, command: &CommandLine) -> Result<String, ExecutionError> {
        let rendered = command.to_string();
        log::debug!("Spawning '{}' in {}", rendered, command.cwd.display());
        let clean_cwd = dunce::simplified(&command.cwd);

        let build = |program: &str, args: &[String]| {
            let mut std_command = StdCommand::new(program);
            std_command
                .args(args)
                .current_dir(clean_cwd)
                .envs(&command.env)
                .stdin(Stdio::null());
            if command.inherit_output {
                std_command.stdout(Stdio::inherit()).stderr(Stdio::inherit());
            }
            std_command
        };

        // Fallback for Windows: tools shipped as `.cmd` shims are only found through `cmd /C`.
        let output = match build(&command.program, &command.args).output() {
            Ok(output) => output,
            Err(e) if e.kind() == ErrorKind::NotFound && cfg!(target_os = "windows") => {
                log::debug!("Command '{}' not found. Retrying with cmd /C.", command.program);
                let mut cmd_args = vec!["/C".to_string(), command.program.clone()];
                cmd_args.extend(command.args.iter().cloned());
                build("cmd", &cmd_args)
                    .output()
                    .map_err(|e| ExecutionError::CommandFailed(rendered.clone(), e))?
            }
            Err(e) => return Err(ExecutionError::CommandFailed(rendered, e)),
        };

        let mut combined = String::from_utf8(output.stdout).map_err(|source| ExecutionError::InvalidUtf8Output {
            command: rendered.clone(),
            source,
        })?;
        let stderr = String::from_utf8(output.stderr).map_err(|source| ExecutionError::InvalidUtf8Output {
            command: rendered.clone(),
            source,
        })?;
        combined.push_str(&stderr);

        if !output.status.success() {
            return Err(ExecutionError::NonZeroExitStatus {
                command: rendered,
                code: output.status.code(),
                output: combined,
            });
        }
        Ok(combined)
    }
}

/// Runs nothing. The executors still echo each command,
/// so this shows what a target would do.
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunRunner;

impl CommandRunner for DryRunRunner {
    fn run(&self, command: &CommandLine) -> Result<String, ExecutionError> {
        log::debug!("Dry run, skipping '{}'", command);
        Ok(String::new())
    }
}
