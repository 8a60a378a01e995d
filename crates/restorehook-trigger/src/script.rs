use async_trait::async_trait;
use restorehook_core::TriggerConfig;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use crate::traits::{Trigger, TriggerError, TriggerOutput};

/// Runs a fixed script with no arguments taken from the request
///
/// The process is waited on until it exits, with both output streams
/// buffered in full. Dropping the `run` future does not kill the child.
#[derive(Debug, Clone)]
pub struct ScriptTrigger {
    script_path: PathBuf,
    interpreter: Option<String>,
}

impl ScriptTrigger {
    /// Execute `script_path` directly
    pub fn new(script_path: impl Into<PathBuf>) -> Self {
        Self {
            script_path: script_path.into(),
            interpreter: None,
        }
    }

    /// Run `script_path` through `interpreter`, e.g. `bash`
    pub fn with_interpreter(script_path: impl Into<PathBuf>, interpreter: impl Into<String>) -> Self {
        Self {
            script_path: script_path.into(),
            interpreter: Some(interpreter.into()),
        }
    }

    pub fn from_config(config: &TriggerConfig) -> Self {
        Self {
            script_path: config.script_path.clone(),
            interpreter: config.interpreter().map(str::to_string),
        }
    }

    pub fn script_path(&self) -> &Path {
        &self.script_path
    }

    fn command(&self) -> Command {
        let mut command = match &self.interpreter {
            Some(interpreter) => {
                let mut command = Command::new(interpreter);
                command.arg(&self.script_path);
                command
            }
            None => Command::new(&self.script_path),
        };

        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        command
    }
}

#[async_trait]
impl Trigger for ScriptTrigger {
    async fn run(&self) -> Result<TriggerOutput, TriggerError> {
        // Checked up front so a missing script fails the same way with or
        // without an interpreter.
        if !tokio::fs::try_exists(&self.script_path)
            .await
            .unwrap_or(false)
        {
            return Err(TriggerError::ScriptNotFound(self.script_path.clone()));
        }

        debug!("Launching {}", self.describe());

        let output = self
            .command()
            .output()
            .await
            .map_err(|source| TriggerError::Spawn {
                path: self.script_path.clone(),
                source,
            })?;

        Ok(TriggerOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn describe(&self) -> String {
        match &self.interpreter {
            Some(interpreter) => format!("{} {}", interpreter, self.script_path.display()),
            None => self.script_path.display().to_string(),
        }
    }
}
