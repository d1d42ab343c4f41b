//! Transcript formatting for the terminal.
//!
//! Each turn prints as `# <role> - <name>: '<text>'`, wrapped so long
//! lines stay readable.

use std::io::{self, Write};

use crate::conversation::{Message, Role};

/// Wrap width for turn bodies.
pub const WRAP_WIDTH: usize = 100;

/// One turn rendered as lines.
pub fn render(message: &Message, width: usize) -> Vec<String> {
    let body = format!("# {} - {}: '{}'", message.role, message.name, message.text);
    wrap_lines(&body, width)
}

/// Print a whole transcript to `out`.
pub fn print_transcript(out: &mut impl Write, messages: &[Message]) -> io::Result<()> {
    for message in messages {
        for line in render(message, WRAP_WIDTH) {
            writeln!(out, "{line}")?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// How many turns each role took.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub analyst: usize,
    pub engineer: usize,
    pub product_owner: usize,
    pub system: usize,
}

impl Tally {
    pub fn count(messages: &[Message]) -> Self {
        let mut tally = Self::default();
        for m in messages {
            match m.role {
                Role::Analyst => tally.analyst += 1,
                Role::Engineer => tally.engineer += 1,
                Role::ProductOwner => tally.product_owner += 1,
                Role::System => tally.system += 1,
                Role::User => {}
            }
        }
        tally
    }

    pub fn summary(&self) -> String {
        format!(
            "analyst: {} | engineer: {} | product owner: {} | system: {}",
            self.analyst, self.engineer, self.product_owner, self.system
        )
    }
}

/// Wrap text into lines of max_len, breaking on word boundaries.
///
/// Lines inside a ``` fence, and the fence lines themselves, are kept
/// verbatim so code keeps its indentation.
pub fn wrap_lines(text: &str, max_len: usize) -> Vec<String> {
    let mut result = Vec::new();
    let mut in_fence = false;
    for line in text.lines() {
        let fences = line.matches("```").count();
        let verbatim = in_fence || fences > 0;
        if fences % 2 == 1 {
            in_fence = !in_fence;
        }
        if verbatim || line.chars().count() <= max_len {
            result.push(line.to_string());
            continue;
        }
        let mut current = String::new();
        for word in line.split_whitespace() {
            let needed = current.chars().count() + word.chars().count() + 1;
            if needed > max_len && !current.is_empty() {
                result.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
        if !current.is_empty() {
            result.push(current);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_format() {
        let m = Message::new(Role::Engineer, "SoftwareEngineer", "done");
        assert_eq!(render(&m, 80), vec!["# engineer - SoftwareEngineer: 'done'"]);
    }

    #[test]
    fn test_wrap_lines() {
        let wrapped = wrap_lines("alpha beta gamma delta", 11);
        assert_eq!(wrapped, vec!["alpha beta", "gamma delta"]);
        assert_eq!(wrap_lines("a\n\nb", 10), vec!["a", "", "b"]);
        // A single over-long word stays on its own line.
        assert_eq!(wrap_lines("abcdefghijkl x", 5), vec!["abcdefghijkl", "x"]);
    }

    #[test]
    fn test_fenced_code_keeps_indentation() {
        let code = "      <button class=\"primary\" onclick=\"addTodo(document.getElementById('new').value)\">Add</button>";
        let text = format!("Here it is:\n```html\n<div>\n{code}\n</div>\n```\nafter the fence the text wraps again");
        let m = Message::new(Role::Engineer, "SoftwareEngineer", text);

        let lines = render(&m, 30);
        assert!(lines.contains(&code.to_string()), "{lines:#?}");
        assert!(lines.contains(&"```html".to_string()));
        let tail: Vec<&str> = lines[lines.len() - 3..].iter().map(String::as_str).collect();
        assert_eq!(tail, vec!["```", "after the fence the text wraps", "again'"]);
    }

    #[test]
    fn test_tally_and_print() {
        let messages = vec![
            Message::new(Role::Analyst, "BusinessAnalyst", "plan"),
            Message::new(Role::Engineer, "SoftwareEngineer", "code"),
            Message::new(Role::Engineer, "SoftwareEngineer", "fix"),
            Message::system("shipped"),
        ];
        let tally = Tally::count(&messages);
        assert_eq!(tally.engineer, 2);
        assert_eq!(
            tally.summary(),
            "analyst: 1 | engineer: 2 | product owner: 0 | system: 1"
        );

        let mut buf = Vec::new();
        print_transcript(&mut buf, &messages).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("# analyst - BusinessAnalyst: 'plan'\n\n"));
        assert!(text.contains("# system - System: 'shipped'"));
    }
}
