//! Command-runner port and model-defaults client adapter
//!
//! `CommandRunner` abstracts the orchestrator CLI so that scenarios can
//! run against the real binary or an in-memory fake. The adapter
//! functions translate scope + key into argument vectors, invoke the
//! runner, and decode YAML responses into [`ModelDefault`] values.

use std::path::PathBuf;
use std::process::Command;

use serde_yaml_ng::Value;

use crate::error::{AssayError, AssayResult};
use crate::models::ModelDefault;
use crate::scope::Scope;

/// Subcommand carrying the whole defaults surface
const MODEL_DEFAULTS: &str = "model-defaults";

/// Abstract interface to the orchestrator CLI
///
/// Implementations:
/// - `ProcessRunner` - spawns the configured binary
/// - `FakeController` (test suite) - in-memory layered store
pub trait CommandRunner {
    /// Run a subcommand and capture its stdout
    fn get_output(&self, command: &str, args: &[String]) -> AssayResult<String>;

    /// Run a subcommand for its side effect only
    fn run(&self, command: &str, args: &[String]) -> AssayResult<()>;
}

/// Command runner that spawns the real orchestrator binary
///
/// Every invocation is a blocking child process. A non-zero exit maps to
/// [`AssayError::CommandFailed`] carrying the rendered command line and
/// stderr; no retries.
pub struct ProcessRunner {
    binary: PathBuf,
}

impl ProcessRunner {
    /// Create a runner for the given executable name or path
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// The executable this runner spawns
    pub fn binary(&self) -> &PathBuf {
        &self.binary
    }

    fn invoke(&self, command: &str, args: &[String]) -> AssayResult<std::process::Output> {
        let output = Command::new(&self.binary).arg(command).args(args).output()?;

        if !output.status.success() {
            return Err(AssayError::CommandFailed {
                command: self.render(command, args),
                status: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(output)
    }

    fn render(&self, command: &str, args: &[String]) -> String {
        let mut line = format!("{} {}", self.binary.display(), command);
        for arg in args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

impl CommandRunner for ProcessRunner {
    fn get_output(&self, command: &str, args: &[String]) -> AssayResult<String> {
        let output = self.invoke(command, args)?;
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    fn run(&self, command: &str, args: &[String]) -> AssayResult<()> {
        self.invoke(command, args).map(|_| ())
    }
}

/// Read the layered value of one key at the given scope
///
/// Issues `model-defaults --format yaml [scope] key` and decodes the
/// single-entry response mapping. A malformed body or a mapping with
/// zero or several entries is an error.
pub fn get_model_defaults(
    runner: &dyn CommandRunner,
    key: &str,
    scope: &Scope,
) -> AssayResult<ModelDefault> {
    let mut args = vec!["--format".to_string(), "yaml".to_string()];
    args.extend(scope.to_args());
    args.push(key.to_string());
    let raw = runner.get_output(MODEL_DEFAULTS, &args)?;
    ModelDefault::from_mapping(serde_yaml_ng::from_str(&raw)?)
}

/// Set `key=value` at the given scope
///
/// No local verification that the mutation took effect; callers re-read
/// to confirm, which is what the scenario driver does.
pub fn set_model_defaults(
    runner: &dyn CommandRunner,
    key: &str,
    value: &str,
    scope: &Scope,
) -> AssayResult<()> {
    let mut args = scope.to_args();
    args.push(format!("{}={}", key, value));
    runner.run(MODEL_DEFAULTS, &args)
}

/// Reset the key at the given scope back to its inherited value
pub fn unset_model_defaults(
    runner: &dyn CommandRunner,
    key: &str,
    scope: &Scope,
) -> AssayResult<()> {
    let mut args = scope.to_args();
    args.push("--reset".to_string());
    args.push(key.to_string());
    runner.run(MODEL_DEFAULTS, &args)
}

/// Read every model default visible at the given scope
///
/// Issues the bare listing form of the command and decodes the full
/// mapping, preserving the CLI's reported order.
pub fn list_model_defaults(
    runner: &dyn CommandRunner,
    scope: &Scope,
) -> AssayResult<Vec<ModelDefault>> {
    let mut args = vec!["--format".to_string(), "yaml".to_string()];
    args.extend(scope.to_args());
    let raw = runner.get_output(MODEL_DEFAULTS, &args)?;
    let doc: Value = serde_yaml_ng::from_str(&raw)?;
    let map = match doc {
        Value::Mapping(map) => map,
        _ => return Err(AssayError::NotAMapping),
    };

    let mut all = Vec::with_capacity(map.len());
    for (key, layers) in map {
        let key = match key {
            Value::String(key) => key,
            _ => return Err(AssayError::KeyNotString),
        };
        all.push(ModelDefault::new(key, serde_yaml_ng::from_value(layers)?));
    }
    Ok(all)
}
