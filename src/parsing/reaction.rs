//! Reaction lines.
//!
//! Some exports record reactions as standalone lines:
//!
//! ```text
//! Bob reacted 👍 to "Nice photo!"
//! ```
//!
//! These are collected during reconstruction and attached afterwards to the
//! first message (in chronological order) whose text starts with the quoted
//! snippet. Reactions that match nothing are dropped and counted.

use std::sync::OnceLock;

use regex::Regex;

use crate::message::{Message, Reaction};

use super::sender::clean_sender;

fn reaction_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"^(.+?)\s+reacted\s+(.+?)\s+to\s+["“](.+)["”]$"#).expect("valid regex")
    })
}

/// A reaction seen in the transcript but not yet attached to a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingReaction {
    pub reactor: String,
    pub reaction: String,
    /// Start of the reacted-to message, at most the configured snippet length.
    pub snippet: String,
    /// Zero-based line the reaction was read from.
    pub line_index: usize,
}

/// Parses a reaction line.
///
/// The reactor is cleaned like a sender and the snippet is cut to
/// `snippet_len` characters.
pub fn parse_reaction_line(
    line: &str,
    line_index: usize,
    snippet_len: usize,
    mask_phones: bool,
) -> Option<PendingReaction> {
    let caps = reaction_regex().captures(line)?;
    let reactor = clean_sender(&caps[1], mask_phones);
    let snippet: String = caps[3].chars().take(snippet_len).collect();
    if reactor.is_empty() || snippet.is_empty() {
        return None;
    }
    Some(PendingReaction {
        reactor,
        reaction: caps[2].trim().to_string(),
        snippet,
        line_index,
    })
}

/// What happened to the pending reactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReactionOutcome {
    pub attached: usize,
    pub dropped: usize,
}

fn starts_with_snippet(text: &str, snippet: &str) -> bool {
    let mut text = text.chars();
    snippet.chars().all(|c| text.next() == Some(c))
}

/// Attaches reactions to `messages`, which must already be in chronological order.
///
/// A duplicate `(reactor, reaction)` pair on the same message counts as
/// attached but is stored once.
pub fn attach_reactions(messages: &mut [Message], pending: Vec<PendingReaction>) -> ReactionOutcome {
    let mut outcome = ReactionOutcome::default();
    for reaction in pending {
        let target = messages
            .iter_mut()
            .find(|msg| starts_with_snippet(msg.text(), &reaction.snippet));
        match target {
            Some(msg) => {
                msg.add_reaction(Reaction::new(reaction.reactor, reaction.reaction));
                outcome.attached += 1;
            }
            None => {
                tracing::debug!(
                    line = reaction.line_index,
                    snippet = %reaction.snippet,
                    "reaction matched no message"
                );
                outcome.dropped += 1;
            }
        }
    }
    outcome
}
