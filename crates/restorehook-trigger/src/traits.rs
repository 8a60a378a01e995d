use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Captured result of a trigger process that ran to completion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerOutput {
    /// Exit code; `None` if the process was terminated by a signal
    pub exit_code: Option<i32>,
    /// Everything written to standard output
    pub stdout: String,
    /// Everything written to standard error
    pub stderr: String,
}

impl TriggerOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// The restore action run for each accepted push
#[async_trait]
pub trait Trigger: Send + Sync {
    /// Launch the action once and wait for it to finish
    ///
    /// A process that starts and exits non-zero is `Ok`; `Err` means it never ran.
    async fn run(&self) -> Result<TriggerOutput, TriggerError>;

    /// Human-readable description for logs
    fn describe(&self) -> String;
}

/// Errors that prevent the trigger from running
#[derive(Debug, thiserror::Error)]
pub enum TriggerError {
    #[error("Trigger script not found: {}", .0.display())]
    ScriptNotFound(PathBuf),

    #[error("Failed to start trigger script {}: {source}", .path.display())]
    Spawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
