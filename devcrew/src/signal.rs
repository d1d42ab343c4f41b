//! Approval detection over the tail of the conversation.

use crate::conversation::Message;

/// Number of trailing messages inspected for an approval token.
pub const APPROVAL_WINDOW: usize = 10;

/// Tokens that end the conversation, matched against upper-cased text.
pub const APPROVAL_TOKENS: [&str; 2] = ["APPROVED", "READY FOR USER APPROVAL"];

/// True when any of the last [`APPROVAL_WINDOW`] messages carries an approval token.
pub fn should_terminate(history: &[Message]) -> bool {
    should_terminate_within(history, APPROVAL_WINDOW)
}

/// Same check with an explicit window. Older messages are never looked at.
pub fn should_terminate_within(history: &[Message], window: usize) -> bool {
    let start = history.len().saturating_sub(window);
    history[start..]
        .iter()
        .filter(|m| !m.text.is_empty())
        .any(|m| contains_approval(&m.text))
}

fn contains_approval(text: &str) -> bool {
    let upper = text.to_uppercase();
    APPROVAL_TOKENS.iter().any(|token| upper.contains(token))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::Role;

    fn msg(text: &str) -> Message {
        Message::new(Role::ProductOwner, "ProductOwner", text)
    }

    fn filler(n: usize) -> Vec<Message> {
        (0..n).map(|i| msg(&format!("revision {i}"))).collect()
    }

    #[test]
    fn test_no_token_no_termination() {
        assert!(!should_terminate(&[]));
        assert!(!should_terminate(&filler(15)));
        assert!(!should_terminate(&[msg(""), msg("needs more work")]));
    }

    #[test]
    fn test_token_any_case() {
        for text in [
            "APPROVED - looks good!",
            "approved",
            "This is ApPrOvEd.",
            "Ready For User Approval",
            "status: ready for user approval",
        ] {
            let mut history = filler(3);
            history.push(msg(text));
            assert!(should_terminate(&history), "{text}");
        }
    }

    #[test]
    fn test_token_in_middle_of_window() {
        let history = vec![msg("This is a test"), msg("APPROVED - looks good!"), msg("Another message")];
        assert!(should_terminate(&history));
    }

    #[test]
    fn test_stale_token_outside_window() {
        let mut history = vec![msg("APPROVED")];
        history.extend(filler(APPROVAL_WINDOW));
        assert_eq!(history.len(), APPROVAL_WINDOW + 1);
        assert!(!should_terminate(&history));

        // Oldest message still inside the window counts.
        let mut history = vec![msg("APPROVED")];
        history.extend(filler(APPROVAL_WINDOW - 1));
        assert!(should_terminate(&history));
    }

    #[test]
    fn test_custom_window() {
        let history = vec![msg("approved"), msg("a"), msg("b")];
        assert!(!should_terminate_within(&history, 2));
        assert!(should_terminate_within(&history, 3));
        assert!(!should_terminate_within(&history, 0));
    }
}
