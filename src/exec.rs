//! Process-execution collaborator.
//!
//! Probes never talk to `tokio::process` directly; they go through the
//! [`CommandRunner`] seam so diagnostics can be exercised against canned
//! command output. A non-zero exit is a normal, inspectable outcome — only
//! failing to spawn the process at all is an error.

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

/// Captured output of one external command invocation.
#[derive(Debug, Clone)]
pub struct CmdOutput {
    pub stdout: String,
    pub exit_code: i32,
}

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("failed to spawn {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, program: &str, args: &[&str]) -> Result<CmdOutput, ExecError>;
}

/// Production runner backed by `tokio::process`.
pub struct SystemRunner;

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<CmdOutput, ExecError> {
        // Probes can be dropped mid-flight on timeout; take the child with us.
        let output = Command::new(program)
            .args(args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| ExecError::Spawn {
                command: program.to_string(),
                source,
            })?;

        let out = CmdOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            exit_code: output.status.code().unwrap_or(-1),
        };
        debug!(program, code = out.exit_code, "command exited");
        Ok(out)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::HashMap;

    /// Canned-output runner for probe tests.
    ///
    /// Responses are keyed by program name; unknown programs behave like a
    /// missing binary.
    #[derive(Default)]
    pub struct FakeRunner {
        responses: HashMap<String, CmdOutput>,
    }

    impl FakeRunner {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_stdout(mut self, program: &str, stdout: &str) -> Self {
            self.responses.insert(
                program.to_string(),
                CmdOutput {
                    stdout: stdout.to_string(),
                    exit_code: 0,
                },
            );
            self
        }

        pub fn with_exit(mut self, program: &str, stdout: &str, exit_code: i32) -> Self {
            self.responses.insert(
                program.to_string(),
                CmdOutput {
                    stdout: stdout.to_string(),
                    exit_code,
                },
            );
            self
        }
    }

    #[async_trait]
    impl CommandRunner for FakeRunner {
        async fn run(&self, program: &str, _args: &[&str]) -> Result<CmdOutput, ExecError> {
            match self.responses.get(program) {
                Some(output) => Ok(output.clone()),
                None => Err(ExecError::Spawn {
                    command: program.to_string(),
                    source: std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        "No such file or directory",
                    ),
                }),
            }
        }
    }
}
