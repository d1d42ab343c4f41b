//! Version-control command execution.
//!
//! The pipeline only cares whether a command exited cleanly and what it
//! printed, so git is reached through [`VcsExecutor`]. [`GitCli`] shells out
//! to the `git` binary in the workspace.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

/// Captured result of one version-control invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Stderr when present, otherwise stdout, trimmed.
    pub fn diagnostic(&self) -> String {
        let text = if self.stderr.trim().is_empty() {
            &self.stdout
        } else {
            &self.stderr
        };
        text.trim().to_string()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    #[error("Failed to spawn git: {0}")]
    Spawn(String),
    #[error("git {command} timed out after {secs}s")]
    Timeout { command: String, secs: u64 },
}

/// Runs version-control subcommands against a working tree.
#[async_trait]
pub trait VcsExecutor: Send + Sync {
    /// Run one subcommand, e.g. `["add", "-A"]`.
    async fn run(&self, args: &[String]) -> Result<CommandOutput, ExecError>;
}

/// `git` subprocess runner rooted at a working tree.
pub struct GitCli {
    root: PathBuf,
    timeout: Duration,
}

impl GitCli {
    pub fn new(root: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            root: root.into(),
            timeout,
        }
    }
}

#[async_trait]
impl VcsExecutor for GitCli {
    async fn run(&self, args: &[String]) -> Result<CommandOutput, ExecError> {
        let subcommand = args.first().cloned().unwrap_or_default();
        let output = tokio::time::timeout(
            self.timeout,
            Command::new("git")
                .args(args)
                .current_dir(&self.root)
                // Never block on an interactive credential prompt.
                .env("GIT_TERMINAL_PROMPT", "0")
                .kill_on_drop(true)
                .output(),
        )
        .await
        .map_err(|_| ExecError::Timeout {
            command: subcommand,
            secs: self.timeout.as_secs(),
        })?
        .map_err(|e| ExecError::Spawn(e.to_string()))?;

        Ok(CommandOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_prefers_stderr() {
        let out = CommandOutput {
            exit_code: 1,
            stdout: "partial\n".into(),
            stderr: "  fatal: no remote\n".into(),
        };
        assert!(!out.success());
        assert_eq!(out.diagnostic(), "fatal: no remote");

        let out = CommandOutput {
            exit_code: 1,
            stdout: "nothing to commit, working tree clean\n".into(),
            stderr: String::new(),
        };
        assert_eq!(out.diagnostic(), "nothing to commit, working tree clean");
    }

    #[tokio::test]
    async fn test_git_cli_reports_nonzero_outside_repo() {
        let dir = tempfile::tempdir().unwrap();
        let git = GitCli::new(dir.path(), Duration::from_secs(30));
        match git.run(&["status".to_string()]).await {
            Ok(out) => assert!(!out.success()),
            // No git binary on this machine.
            Err(ExecError::Spawn(_)) => {}
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
}
