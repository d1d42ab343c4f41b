//! Conversation data model: roles, messages, turns and the per-request history.

use std::fmt;

/// Who produced a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// The human who seeded the request.
    User,
    /// Turns requirements into a plan.
    Analyst,
    /// Writes the page.
    Engineer,
    /// Reviews the page and signals approval.
    ProductOwner,
    /// Synthetic notices: diagnostics and the deployment outcome.
    System,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Analyst => "analyst",
            Role::Engineer => "engineer",
            Role::ProductOwner => "product_owner",
            Role::System => "system",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One turn in the conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    /// Display name of the participant, e.g. "SoftwareEngineer".
    pub name: String,
    pub text: String,
}

impl Message {
    pub fn new(role: Role, name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            role,
            name: name.into(),
            text: text.into(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, "User", text)
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::new(Role::System, "System", text)
    }
}

/// A raw turn as emitted by a chat service. Either field may be missing when
/// the backend hands back something the service could not fully interpret.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Turn {
    pub participant: Option<String>,
    pub text: Option<String>,
}

impl Turn {
    pub fn new(participant: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            participant: Some(participant.into()),
            text: Some(text.into()),
        }
    }
}

/// Append-only message log for a single request.
#[derive(Debug, Clone, Default)]
pub struct History {
    messages: Vec<Message>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }
}

/// Maps chat participant ids onto conversation roles.
#[derive(Debug, Clone)]
pub struct Roster {
    entries: Vec<(String, Role)>,
}

impl Roster {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn with(mut self, participant: impl Into<String>, role: Role) -> Self {
        self.entries.push((participant.into(), role));
        self
    }

    /// Case-insensitive lookup. Unknown participants resolve to `None`.
    pub fn resolve(&self, participant: &str) -> Option<Role> {
        self.entries
            .iter()
            .find(|(id, _)| id.eq_ignore_ascii_case(participant))
            .map(|(_, role)| *role)
    }
}

impl Default for Roster {
    /// The three personas of the software team.
    fn default() -> Self {
        Self::new()
            .with("BusinessAnalyst", Role::Analyst)
            .with("SoftwareEngineer", Role::Engineer)
            .with("ProductOwner", Role::ProductOwner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_is_append_only_and_ordered() {
        let mut history = History::new();
        assert!(history.is_empty());
        history.push(Message::user("build me a page"));
        history.push(Message::new(Role::Analyst, "BusinessAnalyst", "plan"));
        assert_eq!(history.len(), 2);
        assert_eq!(history.messages()[0].role, Role::User);
        assert_eq!(history.last().unwrap().text, "plan");
    }

    #[test]
    fn test_roster_resolution() {
        let roster = Roster::default();
        assert_eq!(roster.resolve("SoftwareEngineer"), Some(Role::Engineer));
        assert_eq!(roster.resolve("productowner"), Some(Role::ProductOwner));
        assert_eq!(roster.resolve("Stranger"), None);
    }
}
