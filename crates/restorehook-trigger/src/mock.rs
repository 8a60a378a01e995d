use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::traits::{Trigger, TriggerError, TriggerOutput};

/// Mock trigger for testing that records how often it ran
#[derive(Debug)]
pub struct MockTrigger {
    /// `None` simulates a script that cannot be started
    output: Option<TriggerOutput>,
    runs: AtomicUsize,
}

impl MockTrigger {
    /// A trigger that always exits 0 with no output
    pub fn new() -> Self {
        Self::with_exit_code(0)
    }

    /// A trigger that always exits with `code`
    pub fn with_exit_code(code: i32) -> Self {
        Self::with_output(TriggerOutput {
            exit_code: Some(code),
            stdout: String::new(),
            stderr: String::new(),
        })
    }

    pub fn with_output(output: TriggerOutput) -> Self {
        Self {
            output: Some(output),
            runs: AtomicUsize::new(0),
        }
    }

    /// A trigger whose script is missing
    pub fn failing() -> Self {
        Self {
            output: None,
            runs: AtomicUsize::new(0),
        }
    }

    /// Number of times `run` was called
    pub fn runs(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Trigger for MockTrigger {
    async fn run(&self) -> Result<TriggerOutput, TriggerError> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        self.output
            .clone()
            .ok_or_else(|| TriggerError::ScriptNotFound(PathBuf::from("/mock/missing.sh")))
    }

    fn describe(&self) -> String {
        "mock".to_string()
    }
}
