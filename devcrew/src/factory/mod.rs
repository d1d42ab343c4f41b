//! Channel-free software factory.
//!
//! A business analyst, a software engineer and a product owner talk in turn
//! until the product owner (or anyone) signals approval. The latest html
//! page in the transcript is then written to the workspace and pushed.

mod chat;
mod group_chat;
mod orchestrator;
pub mod personas;

pub use chat::{ChatError, ChatService};
pub use group_chat::{GroupChat, GroupChatConfig};
pub use orchestrator::{Orchestrator, OrchestratorError, Outcome, Phase};
