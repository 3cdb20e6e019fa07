//! Message reconstruction.
//!
//! A transcript is read line by line with a two-state machine:
//!
//! ```text
//!             header (kept)
//!   NoOpen ───────────────────► Open(draft)
//!     ▲  ◄─────────────────────   │  │
//!     │   header (system or bad   │  │ continuation:
//!     │   timestamp): emit draft  │  │ append to draft
//!     │                           │◄─┘
//!     └── orphan line: dropped    └── header (kept): emit draft, open next
//! ```
//!
//! Each line is tried in a fixed order: header of the detected grammar,
//! reaction line, continuation of the open message, and finally orphan.
//! Continuation lines are joined to the open message with a single space.
//! Blank lines are skipped.

use chrono::NaiveDateTime;

use crate::config::ParserConfig;

use super::clean_line;
use super::grammar::LineGrammar;
use super::reaction::{PendingReaction, parse_reaction_line};
use super::sender::clean_sender;
use super::system::{is_system_body, is_system_message};
use super::timestamp::TimestampParser;

/// A message under construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    /// Zero-based line of the header.
    pub line_index: usize,
    pub timestamp: NaiveDateTime,
    pub sender: String,
    pub text: String,
}

/// Per-line knobs of the reconstructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconstructOptions {
    pub skip_system_messages: bool,
    pub mask_phone_numbers: bool,
    pub snippet_len: usize,
}

impl Default for ReconstructOptions {
    fn default() -> Self {
        Self::from(&ParserConfig::default())
    }
}

impl From<&ParserConfig> for ReconstructOptions {
    fn from(config: &ParserConfig) -> Self {
        Self {
            skip_system_messages: config.skip_system_messages,
            mask_phone_numbers: config.mask_phone_numbers,
            snippet_len: config.snippet_len,
        }
    }
}

/// Line counters gathered during reconstruction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconstructStats {
    pub lines: usize,
    pub blank_lines: usize,
    pub header_lines: usize,
    pub continuation_lines: usize,
    pub system_filtered: usize,
    pub malformed_timestamps: usize,
    pub orphan_lines: usize,
    pub reaction_lines: usize,
}

/// Output of a reconstruction run.
#[derive(Debug, Clone, Default)]
pub struct Reconstruction {
    /// Messages in transcript order.
    pub drafts: Vec<Draft>,
    pub reactions: Vec<PendingReaction>,
    pub stats: ReconstructStats,
}

#[derive(Debug)]
enum State {
    NoOpenMessage,
    MessageOpen(Draft),
}

/// The line state machine.
///
/// ```
/// use chatlens::parsing::{LineGrammar, ReconstructOptions, Reconstructor, TimestampParser};
///
/// let timestamps = TimestampParser::new();
/// let mut rec = Reconstructor::new(LineGrammar::Dashed12h, &timestamps, ReconstructOptions::default());
/// rec.feed(0, "8/1/25, 9:00 AM - John: Anyone up");
/// rec.feed(1, "for lunch?");
/// let out = rec.finish();
///
/// assert_eq!(out.drafts[0].text, "Anyone up for lunch?");
/// ```
#[derive(Debug)]
pub struct Reconstructor<'a> {
    grammar: LineGrammar,
    timestamps: &'a TimestampParser,
    options: ReconstructOptions,
    state: State,
    out: Reconstruction,
}

impl<'a> Reconstructor<'a> {
    pub fn new(grammar: LineGrammar, timestamps: &'a TimestampParser, options: ReconstructOptions) -> Self {
        Self {
            grammar,
            timestamps,
            options,
            state: State::NoOpenMessage,
            out: Reconstruction::default(),
        }
    }

    /// Feeds one raw line.
    pub fn feed(&mut self, index: usize, raw: &str) {
        self.out.stats.lines += 1;
        let line = clean_line(raw);
        if line.is_empty() {
            self.out.stats.blank_lines += 1;
            return;
        }

        if let Some(header) = self.grammar.captures(line) {
            self.out.stats.header_lines += 1;
            self.emit();
            self.open(index, header.timestamp, header.sender, header.body);
            return;
        }

        if let Some(reaction) = parse_reaction_line(
            line,
            index,
            self.options.snippet_len,
            self.options.mask_phone_numbers,
        ) {
            self.out.stats.reaction_lines += 1;
            self.out.reactions.push(reaction);
            return;
        }

        match &mut self.state {
            State::MessageOpen(draft) => {
                self.out.stats.continuation_lines += 1;
                if !draft.text.is_empty() {
                    draft.text.push(' ');
                }
                draft.text.push_str(line);
            }
            State::NoOpenMessage => {
                self.out.stats.orphan_lines += 1;
                tracing::trace!(line = index, "orphan line dropped");
            }
        }
    }

    /// Emits the open message, if any, and returns everything collected.
    pub fn finish(mut self) -> Reconstruction {
        self.emit();
        self.out
    }

    fn emit(&mut self) {
        if let State::MessageOpen(draft) = std::mem::replace(&mut self.state, State::NoOpenMessage) {
            self.out.drafts.push(draft);
        }
    }

    fn open(&mut self, index: usize, timestamp: &str, raw_sender: &str, body: &str) {
        let sender = clean_sender(raw_sender, self.options.mask_phone_numbers);

        if self.options.skip_system_messages && is_system_header(raw_sender, &sender, body) {
            self.out.stats.system_filtered += 1;
            return;
        }

        match self.timestamps.parse(timestamp, self.grammar) {
            Ok(timestamp) => {
                self.state = State::MessageOpen(Draft {
                    line_index: index,
                    timestamp,
                    sender,
                    text: body.to_string(),
                });
            }
            Err(err) => {
                self.out.stats.malformed_timestamps += 1;
                tracing::debug!(line = index, error = %err, "skipping line with malformed timestamp");
            }
        }
    }
}

/// An event line with a colon in its text is split into a bogus sender and
/// body, so the phrase check also runs on the rejoined line.
fn is_system_header(raw_sender: &str, sender: &str, body: &str) -> bool {
    is_system_message(sender, body)
        || (!raw_sender.is_empty() && is_system_body(&format!("{raw_sender}: {body}")))
}

/// Runs the state machine over every line of `text`.
pub fn reconstruct(
    text: &str,
    grammar: LineGrammar,
    timestamps: &TimestampParser,
    options: ReconstructOptions,
) -> Reconstruction {
    let mut reconstructor = Reconstructor::new(grammar, timestamps, options);
    for (index, line) in text.lines().enumerate() {
        reconstructor.feed(index, line);
    }
    reconstructor.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(text: &str) -> Reconstruction {
        run_with(text, ReconstructOptions::default())
    }

    fn run_with(text: &str, options: ReconstructOptions) -> Reconstruction {
        reconstruct(text, LineGrammar::Dashed12h, &TimestampParser::new(), options)
    }

    #[test]
    fn test_single_message() {
        let out = run("8/1/25, 9:00 AM - John: Anyone up for lunch?");
        assert_eq!(out.drafts.len(), 1);
        assert_eq!(out.drafts[0].sender, "John");
        assert_eq!(out.drafts[0].text, "Anyone up for lunch?");
        assert_eq!(out.drafts[0].line_index, 0);
    }

    #[test]
    fn test_continuation_joined_with_space() {
        let out = run("8/1/25, 9:00 AM - John: first\nsecond line\n\n   third  \n8/1/25, 9:01 AM - Jane: next");
        assert_eq!(out.drafts.len(), 2);
        assert_eq!(out.drafts[0].text, "first second line third");
        assert_eq!(out.stats.continuation_lines, 2);
        assert_eq!(out.stats.blank_lines, 1);
    }

    #[test]
    fn test_orphan_lines_dropped() {
        let out = run("no header yet\n8/1/25, 9:00 AM - John: hi");
        assert_eq!(out.drafts.len(), 1);
        assert_eq!(out.stats.orphan_lines, 1);
    }

    #[test]
    fn test_system_line_closes_open_message() {
        let text = "\
8/1/25, 9:00 AM - John: hi
8/1/25, 9:01 AM - Bob joined using this group's invite link
stray text after a system line";
        let out = run(text);
        assert_eq!(out.drafts.len(), 1);
        assert_eq!(out.drafts[0].text, "hi");
        assert_eq!(out.stats.system_filtered, 1);
        assert_eq!(out.stats.orphan_lines, 1);
    }

    #[test]
    fn test_system_lines_kept_when_not_skipping() {
        let options = ReconstructOptions {
            skip_system_messages: false,
            ..ReconstructOptions::default()
        };
        let out = run_with("8/1/25, 9:01 AM - Bob joined using this group's invite link", options);
        assert_eq!(out.drafts.len(), 1);
        assert_eq!(out.drafts[0].sender, "");
    }

    #[test]
    fn test_event_line_with_colon_filtered() {
        let text = "\
8/1/25, 9:00 AM - John: hi
8/1/25, 9:01 AM - John changed the subject to \"Trip: Day 1\"";
        let out = run(text);
        assert_eq!(out.drafts.len(), 1);
        assert_eq!(out.drafts[0].text, "hi");
        assert_eq!(out.stats.system_filtered, 1);
    }

    #[test]
    fn test_colon_in_real_message_kept() {
        let out = run("8/1/25, 9:00 AM - John: Meeting at 10:30: room B");
        assert_eq!(out.drafts.len(), 1);
        assert_eq!(out.drafts[0].text, "Meeting at 10:30: room B");
    }

    #[test]
    fn test_senderless_media_filtered() {
        let out = run("8/1/25, 9:00 AM - John: hi\n8/1/25, 9:01 AM - <Media omitted>");
        assert_eq!(out.drafts.len(), 1);
        assert_eq!(out.stats.system_filtered, 1);
    }

    #[test]
    fn test_malformed_timestamp_skips_message() {
        let text = "\
13/45/25, 9:00 AM - John: bad date
continuation of the bad one
8/1/25, 9:01 AM - Jane: good";
        let out = run(text);
        assert_eq!(out.drafts.len(), 1);
        assert_eq!(out.drafts[0].sender, "Jane");
        assert_eq!(out.stats.malformed_timestamps, 1);
        assert_eq!(out.stats.orphan_lines, 1);
    }

    #[test]
    fn test_reaction_lines_collected() {
        let text = "\
8/1/25, 9:00 AM - John: Nice photo!
Bob reacted 👍 to \"Nice photo!\"
still part of John's message";
        let out = run(text);
        assert_eq!(out.reactions.len(), 1);
        assert_eq!(out.reactions[0].line_index, 1);
        assert_eq!(out.drafts[0].text, "Nice photo! still part of John's message");
    }

    #[test]
    fn test_continuation_onto_empty_body() {
        let out = run("8/1/25, 9:00 AM - John:\nactual text");
        assert_eq!(out.drafts[0].text, "actual text");
    }

    #[test]
    fn test_phone_sender_masked() {
        let out = run("8/1/25, 9:00 AM - +1 555 123 4567: hello");
        assert_eq!(out.drafts[0].sender, "+1*****4567");
    }

    #[test]
    fn test_crlf_and_bom() {
        let out = run("\u{feff}8/1/25, 9:00 AM - John: hi\r\nthere\r\n");
        assert_eq!(out.drafts[0].text, "hi there");
    }
}
