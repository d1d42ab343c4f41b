//! devcrew: a three-persona software team that ships a single HTML page.
//!
//! - `signal`: approval detection over the trailing window of the chat
//! - `extract`: pulls the newest ```html block out of the transcript
//! - `deploy`: persist, commit and push with token or default-remote auth
//! - `factory`: the conversation loop tying it together

pub mod conversation;
pub mod deploy;
pub mod extract;
pub mod factory;
pub mod llm;
pub mod output;
pub mod signal;
pub mod workspace;
