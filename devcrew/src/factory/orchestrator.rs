//! Factory orchestrator: runs the team conversation until approval, then ships.

use std::fmt;
use std::path::PathBuf;

use super::chat::{ChatError, ChatService};
use crate::conversation::{History, Message, Role, Roster, Turn};
use crate::deploy::{DeploymentPipeline, DeploymentResult};
use crate::extract::extract_artifact;
use crate::signal::should_terminate;

/// Where a conversation is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Seeded,
    Running,
    Terminated,
    Exhausted,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Seeded => write!(f, "seeded"),
            Phase::Running => write!(f, "running"),
            Phase::Terminated => write!(f, "terminated"),
            Phase::Exhausted => write!(f, "exhausted"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum OrchestratorError {
    #[error("conversation aborted after {turns} turns: {source}")]
    ChatUnavailable {
        turns: usize,
        #[source]
        source: ChatError,
    },
}

/// How the post-approval deployment went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Persisted, committed and pushed to the remote.
    Pushed { path: PathBuf },
    /// Persisted and the push went through, but the commit did not, so the
    /// remote only received commits that were already there.
    Uncommitted {
        path: PathBuf,
        diagnostics: Vec<String>,
    },
    /// Persisted locally; the push did not go through.
    SavedOnly {
        path: PathBuf,
        committed: bool,
        diagnostics: Vec<String>,
    },
    /// Approval arrived but no ```html block was anywhere in the transcript.
    NoArtifact,
    /// The artifact could not be written.
    PersistFailed { diagnostics: Vec<String> },
    /// Deployment disabled; the artifact was found but not written.
    Skipped { bytes: usize },
}

impl Outcome {
    pub fn from_result(result: DeploymentResult) -> Self {
        match (result.persisted, result.path) {
            (true, Some(path)) if result.pushed && result.committed => Outcome::Pushed { path },
            (true, Some(path)) if result.pushed => Outcome::Uncommitted {
                path,
                diagnostics: result.diagnostics,
            },
            (true, Some(path)) => Outcome::SavedOnly {
                path,
                committed: result.committed,
                diagnostics: result.diagnostics,
            },
            _ => Outcome::PersistFailed {
                diagnostics: result.diagnostics,
            },
        }
    }

    /// Text of the synthetic system message reporting this outcome.
    pub fn summary(&self) -> String {
        match self {
            Outcome::Pushed { path } => format!(
                "✅ Code approved and successfully pushed! HTML saved as {}",
                path.display()
            ),
            Outcome::Uncommitted { path, diagnostics } => {
                let mut text = format!(
                    "⚠️ Code approved and saved locally as {}, but the commit failed so the new HTML was not pushed.",
                    path.display()
                );
                if !diagnostics.is_empty() {
                    text.push_str(&format!(" Details: {}", diagnostics.join("; ")));
                }
                text
            }
            Outcome::SavedOnly {
                path,
                committed,
                diagnostics,
            } => {
                let commit = if *committed {
                    "committed locally"
                } else {
                    "not committed"
                };
                let mut text = format!(
                    "✅ Code approved and saved locally! HTML saved as {} ({commit}). Note: git push failed.",
                    path.display()
                );
                if !diagnostics.is_empty() {
                    text.push_str(&format!(" Details: {}", diagnostics.join("; ")));
                }
                text
            }
            Outcome::NoArtifact => "❌ No HTML code found in conversation history".to_string(),
            Outcome::PersistFailed { diagnostics } => {
                let mut text = "❌ Failed to save HTML file".to_string();
                if !diagnostics.is_empty() {
                    text.push_str(&format!(": {}", diagnostics.join("; ")));
                }
                text
            }
            Outcome::Skipped { bytes } => {
                format!("⏭️ Code approved ({bytes} bytes of HTML found); deployment skipped")
            }
        }
    }
}

/// Drives one conversation per call; holds no per-request state itself.
pub struct Orchestrator {
    pipeline: Option<DeploymentPipeline>,
    roster: Roster,
}

impl Orchestrator {
    pub fn new(pipeline: DeploymentPipeline) -> Self {
        Self {
            pipeline: Some(pipeline),
            roster: Roster::default(),
        }
    }

    /// Runs conversations and reports approvals without deploying.
    pub fn dry_run() -> Self {
        Self {
            pipeline: None,
            roster: Roster::default(),
        }
    }

    /// Seed the chat, pump turns until approval or the stream ends, and
    /// return every message after the seed in order.
    pub async fn run_conversation(
        &self,
        chat: &mut dyn ChatService,
        seed: &str,
    ) -> Result<Vec<Message>, OrchestratorError> {
        let mut history = History::new();
        history.push(Message::user(seed));
        let mut phase = Phase::Seeded;
        tracing::info!(phase = %phase, bytes = seed.len(), "Conversation seeded");

        chat.seed(seed)
            .await
            .map_err(|source| OrchestratorError::ChatUnavailable { turns: 0, source })?;
        phase = Phase::Running;
        tracing::debug!(phase = %phase, "Requesting turns");

        loop {
            let turns = history.len() - 1;
            let message = match chat.next_turn().await {
                Ok(Some(turn)) => self.to_message(turn),
                Ok(None) => {
                    phase = Phase::Exhausted;
                    break;
                }
                Err(ChatError::Malformed(detail)) => {
                    tracing::warn!(turn = turns + 1, detail = %detail, "Malformed turn");
                    Message::system(format!("[unreadable turn: {detail}]"))
                }
                Err(source) => {
                    tracing::error!(turn = turns + 1, error = %source, "Chat service failed");
                    return Err(OrchestratorError::ChatUnavailable { turns, source });
                }
            };
            tracing::info!(
                turn = turns + 1,
                role = %message.role,
                name = %message.name,
                bytes = message.text.len(),
                "Turn received"
            );
            history.push(message);

            if should_terminate(history.messages()) {
                phase = Phase::Terminated;
                tracing::info!(turn = turns + 1, "Approval detected");
                let outcome = self.ship(history.messages()).await;
                history.push(Message::system(outcome.summary()));
                break;
            }
        }

        tracing::info!(phase = %phase, messages = history.len(), "Conversation finished");
        Ok(history.messages()[1..].to_vec())
    }

    fn to_message(&self, turn: Turn) -> Message {
        let Turn { participant, text } = turn;
        let resolved = participant
            .as_deref()
            .and_then(|p| self.roster.resolve(p));
        match (resolved, text) {
            (Some(role), Some(text)) => {
                Message::new(role, participant.unwrap_or_default(), text)
            }
            (None, Some(text)) => {
                if let Some(p) = &participant {
                    tracing::debug!(participant = %p, "Unknown participant, treating as system");
                }
                Message::new(
                    Role::System,
                    participant.unwrap_or_else(|| "System".to_string()),
                    text,
                )
            }
            (_, None) => {
                let who = participant.as_deref().unwrap_or("unknown participant");
                Message::system(format!("[unreadable turn from {who}: no text]"))
            }
        }
    }

    async fn ship(&self, history: &[Message]) -> Outcome {
        let Some(artifact) = extract_artifact(history) else {
            tracing::warn!("Approval without an html block");
            return Outcome::NoArtifact;
        };
        match &self.pipeline {
            Some(pipeline) => Outcome::from_result(pipeline.deploy(&artifact).await),
            None => Outcome::Skipped {
                bytes: artifact.len(),
            },
        }
    }
}
