//! Best-effort deployment of an approved artifact.
//!
//! Persist, stage+commit, push. Only a failed persist stops the pipeline;
//! commit and push failures are recorded and local work is kept.

mod credentials;
mod git;

pub use credentials::{
    CredentialSource, Credentials, EnvCredentials, PushTarget, StaticCredentials,
    REMOTE_URL_ENV, TOKEN_ENV, USERNAME_ENV,
};
pub use git::{CommandOutput, ExecError, GitCli, VcsExecutor};

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::workspace::Workspace;

/// Canonical file name of the deployed artifact in the workspace root.
pub const ARTIFACT_FILE: &str = "index.html";

pub const COMMIT_MESSAGE: &str = "Auto-commit: HTML code approved and deployed";

/// Deployment settings.
#[derive(Debug, Clone)]
pub struct DeployConfig {
    /// Git working tree the artifact is written into.
    pub workspace: PathBuf,
    /// Remote alias used when no token credentials are available.
    pub remote: String,
    /// Branch pushed to on the remote.
    pub branch: String,
    pub commit_message: String,
    pub git_timeout: Duration,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            workspace: PathBuf::from("."),
            remote: "origin".to_string(),
            branch: "main".to_string(),
            commit_message: COMMIT_MESSAGE.to_string(),
            git_timeout: Duration::from_secs(120),
        }
    }
}

/// What happened at each of the three stages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeploymentResult {
    pub persisted: bool,
    pub committed: bool,
    pub pushed: bool,
    /// Where the artifact landed, when persisted.
    pub path: Option<PathBuf>,
    /// Per-step failure notes. Token-free.
    pub diagnostics: Vec<String>,
}

/// Persists, commits and pushes artifacts into one workspace.
pub struct DeploymentPipeline {
    config: DeployConfig,
    workspace: Workspace,
    vcs: Arc<dyn VcsExecutor>,
    credentials: Arc<dyn CredentialSource>,
}

impl DeploymentPipeline {
    pub fn new(
        config: DeployConfig,
        vcs: Arc<dyn VcsExecutor>,
        credentials: Arc<dyn CredentialSource>,
    ) -> Self {
        let workspace = Workspace::new(config.workspace.clone());
        Self {
            config,
            workspace,
            vcs,
            credentials,
        }
    }

    /// Pipeline using the `git` binary in the workspace and environment credentials.
    pub fn with_git(config: DeployConfig) -> Self {
        let git = GitCli::new(config.workspace.clone(), config.git_timeout);
        Self::new(config, Arc::new(git), Arc::new(EnvCredentials))
    }

    pub async fn deploy(&self, artifact: &str) -> DeploymentResult {
        let mut result = DeploymentResult::default();

        match self.workspace.write_file(ARTIFACT_FILE, artifact).await {
            Ok(path) => {
                tracing::info!(path = %path.display(), bytes = artifact.len(), "Artifact persisted");
                result.persisted = true;
                result.path = Some(path);
            }
            Err(e) => {
                tracing::error!(error = %format!("{e:#}"), "Failed to persist artifact");
                result.diagnostics.push(format!("persist: {e:#}"));
                return result;
            }
        }

        result.committed = self.commit(&mut result.diagnostics).await;

        let creds = self.credentials.credentials();
        let target = PushTarget::resolve(creds.as_ref(), &self.config.remote);
        result.pushed = self.push(&target, &mut result.diagnostics).await;

        tracing::info!(
            persisted = result.persisted,
            committed = result.committed,
            pushed = result.pushed,
            "Deployment finished"
        );
        result
    }

    async fn commit(&self, diagnostics: &mut Vec<String>) -> bool {
        let stage = args(&["add", "-A"]);
        if !self.step("stage", &stage, None, diagnostics).await {
            return false;
        }
        let commit = args(&["commit", "-m", self.config.commit_message.as_str()]);
        self.step("commit", &commit, None, diagnostics).await
    }

    async fn push(&self, target: &PushTarget, diagnostics: &mut Vec<String>) -> bool {
        tracing::info!(
            strategy = target.strategy(),
            target = %target.describe(),
            branch = %self.config.branch,
            "Pushing"
        );
        let refspec = format!("HEAD:{}", self.config.branch);
        let push = vec!["push".to_string(), target.repository_arg(), refspec];
        self.step("push", &push, Some(target), diagnostics).await
    }

    /// Run one git step. Output is redacted through `target` when given.
    async fn step(
        &self,
        name: &str,
        args: &[String],
        target: Option<&PushTarget>,
        diagnostics: &mut Vec<String>,
    ) -> bool {
        let redact = |text: &str| match target {
            Some(t) => t.redact(text),
            None => text.to_string(),
        };
        match self.vcs.run(args).await {
            Ok(out) if out.success() => {
                tracing::info!(step = name, "git step succeeded");
                true
            }
            Ok(out) => {
                let detail = redact(&out.diagnostic());
                tracing::warn!(step = name, exit_code = out.exit_code, detail = %detail, "git step failed");
                diagnostics.push(format!("{name}: exit {}: {detail}", out.exit_code));
                false
            }
            Err(e) => {
                let detail = redact(&e.to_string());
                tracing::warn!(step = name, error = %detail, "git step could not run");
                diagnostics.push(format!("{name}: {detail}"));
                false
            }
        }
    }
}

fn args(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}
