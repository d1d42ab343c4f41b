//! Round-robin group chat over an LLM.
//!
//! Every persona sees the whole transcript and answers in turn. The stream
//! ends after `max_turns` turns.

use std::sync::Arc;

use async_trait::async_trait;

use super::chat::{ChatError, ChatService};
use super::personas::Persona;
use crate::conversation::Turn;
use crate::llm::Completion;

#[derive(Debug, Clone)]
pub struct GroupChatConfig {
    /// Turn budget for one conversation.
    pub max_turns: usize,
}

impl Default for GroupChatConfig {
    fn default() -> Self {
        Self { max_turns: 30 }
    }
}

pub struct GroupChat {
    llm: Arc<dyn Completion>,
    team: Vec<Persona>,
    config: GroupChatConfig,
    /// (speaker name, text) in order, seed included.
    transcript: Vec<(String, String)>,
    turns: usize,
}

impl GroupChat {
    pub fn new(llm: Arc<dyn Completion>, team: Vec<Persona>, config: GroupChatConfig) -> Self {
        Self {
            llm,
            team,
            config,
            transcript: Vec::new(),
            turns: 0,
        }
    }

    fn prompt_for(&self, persona: &Persona) -> String {
        let mut prompt = String::from("Conversation so far:\n\n");
        for (speaker, text) in &self.transcript {
            prompt.push_str(&format!("[{speaker}]\n{text}\n\n"));
        }
        prompt.push_str(&format!(
            "You are {}. Write your next message to the team.",
            persona.name
        ));
        prompt
    }
}

#[async_trait]
impl ChatService for GroupChat {
    async fn seed(&mut self, text: &str) -> Result<(), ChatError> {
        self.transcript.push(("User".to_string(), text.to_string()));
        Ok(())
    }

    async fn next_turn(&mut self) -> Result<Option<Turn>, ChatError> {
        if self.team.is_empty() || self.turns >= self.config.max_turns {
            return Ok(None);
        }
        let persona = self.team[self.turns % self.team.len()].clone();
        self.turns += 1;

        tracing::debug!(turn = self.turns, persona = %persona.name, "Requesting turn");
        let prompt = self.prompt_for(&persona);
        let text = self
            .llm
            .complete(&persona.instructions, &prompt)
            .await
            .map_err(|e| ChatError::Unavailable(format!("{e:#}")))?;

        if text.trim().is_empty() {
            tracing::warn!(persona = %persona.name, "Empty completion");
            return Ok(Some(Turn {
                participant: Some(persona.name),
                text: None,
            }));
        }

        self.transcript.push((persona.name.clone(), text.clone()));
        Ok(Some(Turn::new(persona.name, text)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::personas::default_team;
    use std::sync::Mutex;

    /// Replies from a fixed script and remembers the prompts it saw.
    struct Scripted {
        replies: Mutex<Vec<anyhow::Result<String>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl Scripted {
        fn new(replies: Vec<anyhow::Result<String>>) -> Self {
            Self {
                replies: Mutex::new(replies.into_iter().rev().collect()),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Completion for Scripted {
        async fn complete(&self, _system: &str, prompt: &str) -> anyhow::Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.replies
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Ok("...".to_string()))
        }
    }

    #[tokio::test]
    async fn test_round_robin_and_budget() {
        let llm = Arc::new(Scripted::new(vec![]));
        let mut chat = GroupChat::new(llm, default_team(), GroupChatConfig { max_turns: 4 });
        chat.seed("make a page").await.unwrap();

        let mut speakers = Vec::new();
        while let Some(turn) = chat.next_turn().await.unwrap() {
            speakers.push(turn.participant.unwrap());
        }
        assert_eq!(
            speakers,
            vec!["BusinessAnalyst", "SoftwareEngineer", "ProductOwner", "BusinessAnalyst"]
        );
    }

    #[tokio::test]
    async fn test_transcript_feeds_next_prompt() {
        let llm = Arc::new(Scripted::new(vec![Ok("the plan".to_string())]));
        let mut chat = GroupChat::new(llm.clone(), default_team(), GroupChatConfig::default());
        chat.seed("make a page").await.unwrap();
        chat.next_turn().await.unwrap();
        chat.next_turn().await.unwrap();

        let prompts = llm.prompts.lock().unwrap();
        assert!(prompts[1].contains("[User]\nmake a page"));
        assert!(prompts[1].contains("[BusinessAnalyst]\nthe plan"));
        assert!(prompts[1].ends_with("You are SoftwareEngineer. Write your next message to the team."));
    }

    #[tokio::test]
    async fn test_empty_completion_is_textless_turn() {
        let llm = Arc::new(Scripted::new(vec![Ok("  ".to_string())]));
        let mut chat = GroupChat::new(llm, default_team(), GroupChatConfig::default());
        let turn = chat.next_turn().await.unwrap().unwrap();
        assert_eq!(turn.participant.as_deref(), Some("BusinessAnalyst"));
        assert!(turn.text.is_none());
    }

    #[tokio::test]
    async fn test_backend_error_is_unavailable() {
        let llm = Arc::new(Scripted::new(vec![Err(anyhow::anyhow!("503"))]));
        let mut chat = GroupChat::new(llm, default_team(), GroupChatConfig::default());
        let err = chat.next_turn().await.unwrap_err();
        assert!(matches!(err, ChatError::Unavailable(_)));
    }
}
