//! Artifact extraction: pull the latest ```html block out of a transcript.

use std::sync::LazyLock;

use regex::Regex;

use crate::conversation::Message;

static HTML_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)```html\s*(.*?)\s*```").expect("html fence pattern is valid")
});

/// Find the artifact the team most recently produced.
///
/// Walks messages newest-first. The first message with at least one fenced
/// html block wins, and within it the last block is taken. Messages without a
/// block are skipped rather than ending the search.
pub fn extract_artifact(history: &[Message]) -> Option<String> {
    history
        .iter()
        .rev()
        .filter(|m| !m.text.is_empty())
        .find_map(|m| last_block(&m.text))
}

fn last_block(text: &str) -> Option<String> {
    HTML_FENCE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .last()
        .map(|body| body.as_str().trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::Role;

    fn engineer(text: &str) -> Message {
        Message::new(Role::Engineer, "SoftwareEngineer", text)
    }

    #[test]
    fn test_last_block_of_newest_message() {
        let history = vec![
            engineer("```html\n<p>old</p>\n```"),
            engineer("First try:\n```html\n<p>A</p>\n```\nBetter:\n```HTML\n  <p>B</p>\n\n```\n"),
        ];
        assert_eq!(extract_artifact(&history).as_deref(), Some("<p>B</p>"));
    }

    #[test]
    fn test_skips_recent_message_without_block() {
        let history = vec![
            Message::user("make a page"),
            engineer("Here it is:\n```html\n<!DOCTYPE html>\n<html>\n<body>hi</body>\n</html>\n```"),
            Message::new(Role::ProductOwner, "ProductOwner", "READY FOR USER APPROVAL"),
        ];
        assert_eq!(
            extract_artifact(&history).as_deref(),
            Some("<!DOCTYPE html>\n<html>\n<body>hi</body>\n</html>")
        );
    }

    #[test]
    fn test_absent_when_no_block() {
        let history = vec![
            Message::user("make a page"),
            engineer("```js\nconsole.log(1)\n```"),
            engineer("```html but never closed"),
        ];
        assert_eq!(extract_artifact(&history), None);
        assert_eq!(extract_artifact(&[]), None);
    }

    #[test]
    fn test_block_content_is_non_greedy() {
        let history = vec![engineer(
            "```html\n<a></a>\n```\ntext between\n```css\nbody {}\n```",
        )];
        assert_eq!(extract_artifact(&history).as_deref(), Some("<a></a>"));
    }

    #[test]
    fn test_idempotent() {
        let history = vec![engineer("```html <b>x</b> ```")];
        let first = extract_artifact(&history);
        let second = extract_artifact(&history);
        assert_eq!(first, second);
        assert_eq!(first.as_deref(), Some("<b>x</b>"));
    }
}
