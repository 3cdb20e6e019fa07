//! The parsing pipeline.
//!
//! [`ChatParser`] runs every stage in order:
//!
//! 1. resolve the text encoding (files only)
//! 2. detect the line grammar from a sample
//! 3. reconstruct messages line by line
//! 4. derive features, sort by timestamp, attach reactions
//!
//! The result is a [`ParsedChat`]: an immutable, shareable message sequence
//! plus a [`ParseReport`].
//!
//! # Example
//!
//! ```rust
//! use chatlens::ChatParser;
//!
//! let text = "\
//! 8/1/25, 9:00 AM - John: Hello
//! this is more
//! 8/1/25, 9:01 AM - Jane: Hi";
//!
//! let chat = ChatParser::new().parse_str(text)?;
//! assert_eq!(chat.len(), 2);
//! assert_eq!(chat.messages()[0].text(), "Hello this is more");
//! # Ok::<(), chatlens::ChatlensError>(())
//! ```

use std::ops::Deref;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use crate::Message;
use crate::config::ParserConfig;
use crate::core::report::{ParseReport, StageTimings};
use crate::encoding::{self, TextEncoding};
use crate::error::{ChatlensError, Result};
use crate::features;
use crate::parsing::reconstruct::{self, ReconstructOptions};
use crate::parsing::{TimestampParser, attach_reactions, detect_grammar};

/// Parses WhatsApp TXT exports into typed messages.
///
/// A parser can be reused for many files. Unless built with
/// [`ParserConfig::with_shared_cache`], each call starts with a cold layout
/// cache so results never depend on what was parsed before.
///
/// Clones get a cache of their own unless the cache is shared, so a clone
/// per thread keeps every [`ParseReport`]'s cache counters to its own run.
#[derive(Debug)]
pub struct ChatParser {
    config: ParserConfig,
    timestamps: TimestampParser,
}

impl Clone for ChatParser {
    fn clone(&self) -> Self {
        if self.config.shared_cache {
            Self {
                config: self.config.clone(),
                timestamps: self.timestamps.clone(),
            }
        } else {
            Self::with_config(self.config.clone())
        }
    }
}

impl Default for ChatParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatParser {
    /// Creates a parser with default configuration.
    pub fn new() -> Self {
        Self::with_config(ParserConfig::default())
    }

    /// Creates a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        let timestamps = if config.layout_cache {
            TimestampParser::new()
        } else {
            TimestampParser::uncached()
        };
        Self { config, timestamps }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Reads, decodes and parses an export file.
    ///
    /// # Errors
    ///
    /// - [`ChatlensError::Io`] if the file cannot be read
    /// - [`ChatlensError::Encoding`] if no candidate encoding decodes it
    /// - [`ChatlensError::FormatDetection`] if no grammar matches
    /// - [`ChatlensError::NoMessages`] if nothing survives reconstruction
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<ParsedChat> {
        let path = path.as_ref();
        let start = Instant::now();
        let decoded = encoding::read_file(path, &self.config.encodings)?;
        let decode = start.elapsed();
        tracing::info!(path = %path.display(), encoding = decoded.encoding.name(), "decoded export");

        let mut chat = self.parse_text(&decoded.text, Some(decoded.encoding))?;
        chat.report.timings.decode = decode;
        Ok(chat)
    }

    /// Parses already-decoded transcript text.
    ///
    /// # Errors
    ///
    /// Same as [`parse_file`](Self::parse_file), minus the I/O and encoding errors.
    pub fn parse_str(&self, text: &str) -> Result<ParsedChat> {
        self.parse_text(text, None)
    }

    fn parse_text(&self, text: &str, encoding: Option<TextEncoding>) -> Result<ParsedChat> {
        if !self.config.shared_cache {
            self.timestamps.reset();
        }
        let cache_before = self.timestamps.stats();
        let mut timings = StageTimings::default();

        let start = Instant::now();
        let grammar = detect_grammar(text, &self.config.detector())?;
        timings.detect = start.elapsed();
        tracing::info!(grammar = grammar.name(), "detected format");

        let start = Instant::now();
        let reconstruction = reconstruct::reconstruct(
            text,
            grammar,
            &self.timestamps,
            ReconstructOptions::from(&self.config),
        );
        timings.reconstruct = start.elapsed();
        let stats = reconstruction.stats;

        if reconstruction.drafts.is_empty() {
            return Err(ChatlensError::no_messages(grammar.name()));
        }

        let start = Instant::now();
        let mut messages = features::map_ordered(
            reconstruction.drafts,
            self.config.parallel_threshold,
            |draft| Message::new(draft.timestamp, draft.sender, draft.text),
        );
        messages.sort_by_key(Message::timestamp);
        let reactions = attach_reactions(&mut messages, reconstruction.reactions);
        timings.assemble = start.elapsed();

        let cache = self.timestamps.stats().since(cache_before);
        let report = ParseReport {
            encoding,
            grammar,
            total_lines: stats.lines,
            messages: messages.len(),
            continuation_lines: stats.continuation_lines,
            system_filtered: stats.system_filtered,
            malformed_timestamps: stats.malformed_timestamps,
            orphan_lines: stats.orphan_lines,
            reactions_attached: reactions.attached,
            reactions_dropped: reactions.dropped,
            cache_hits: cache.hits,
            cache_misses: cache.misses,
            timings,
        };
        tracing::info!(
            messages = report.messages,
            system = report.system_filtered,
            malformed = report.malformed_timestamps,
            reactions = report.reactions_attached,
            "parsed chat"
        );

        Ok(ParsedChat {
            messages: messages.into(),
            report,
        })
    }
}

/// A fully assembled, chronologically ordered message sequence.
///
/// The sequence is frozen: it can be borrowed through [`messages`](Self::messages)
/// or handed to other threads through [`shared`](Self::shared), but not changed.
#[derive(Debug, Clone)]
pub struct ParsedChat {
    messages: Arc<[Message]>,
    report: ParseReport,
}

impl ParsedChat {
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// A cheap handle to the same messages for concurrent readers.
    pub fn shared(&self) -> Arc<[Message]> {
        Arc::clone(&self.messages)
    }

    pub fn report(&self) -> &ParseReport {
        &self.report
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Distinct senders in order of first appearance.
    pub fn senders(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for msg in self.messages.iter() {
            if !seen.contains(&msg.sender()) {
                seen.push(msg.sender());
            }
        }
        seen
    }

    /// Splits into the message sequence and the report.
    pub fn into_parts(self) -> (Arc<[Message]>, ParseReport) {
        (self.messages, self.report)
    }
}

impl Deref for ParsedChat {
    type Target = [Message];

    fn deref(&self) -> &[Message] {
        &self.messages
    }
}

impl<'a> IntoIterator for &'a ParsedChat {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Reaction;
    use crate::parsing::LineGrammar;

    const SAMPLE: &str = "\
8/1/25, 9:00 AM - Messages and calls are end-to-end encrypted. No one outside of this chat can read them.
8/1/25, 9:00 AM - John: Hello
this is more
8/1/25, 9:01 AM - Jane: Nice photo! 📸
8/1/25, 9:02 AM - +1 555 123 4567: who is this?
Bob reacted 👍 to \"Nice photo!\"
8/1/25, 9:03 AM - John: <Media omitted>";

    #[test]
    fn test_parse_str_pipeline() {
        let chat = ChatParser::new().parse_str(SAMPLE).unwrap();

        assert_eq!(chat.len(), 4);
        assert_eq!(chat[0].sender(), "John");
        assert_eq!(chat[0].text(), "Hello this is more");
        assert_eq!(chat[1].reactions(), &[Reaction::new("Bob", "👍")]);
        assert_eq!(chat[2].sender(), "+1*****4567");
        assert!(chat[2].is_question());
        assert!(chat[3].is_media());
        assert_eq!(chat.senders(), vec!["John", "Jane", "+1*****4567"]);
    }

    #[test]
    fn test_report_counts() {
        let chat = ChatParser::new().parse_str(SAMPLE).unwrap();
        let report = chat.report();

        assert_eq!(report.encoding, None);
        assert_eq!(report.grammar, LineGrammar::Dashed12h);
        assert_eq!(report.total_lines, 7);
        assert_eq!(report.messages, 4);
        assert_eq!(report.continuation_lines, 1);
        assert_eq!(report.system_filtered, 1);
        assert_eq!(report.reactions_attached, 1);
        assert_eq!(report.reactions_dropped, 0);
        assert_eq!(report.cache_hits + report.cache_misses, 4);
    }

    #[test]
    fn test_messages_sorted_by_timestamp() {
        let text = "\
8/1/25, 9:05 AM - John: later
8/1/25, 9:00 AM - Jane: earlier
8/1/25, 9:05 AM - Jane: same minute, second";
        let chat = ChatParser::new().parse_str(text).unwrap();
        let texts: Vec<_> = chat.iter().map(Message::text).collect();
        assert_eq!(texts, vec!["earlier", "later", "same minute, second"]);
    }

    #[test]
    fn test_only_system_lines_is_no_messages() {
        let text = "8/1/25, 9:00 AM - Messages and calls are end-to-end encrypted.";
        let err = ChatParser::new().parse_str(text).unwrap_err();
        assert!(err.is_no_messages());
    }

    #[test]
    fn test_unrecognized_text_is_format_error() {
        let err = ChatParser::new()
            .parse_str("Dear diary, today nothing happened at all.")
            .unwrap_err();
        assert!(err.is_format_detection());
    }

    #[test]
    fn test_cache_reset_between_runs() {
        let parser = ChatParser::new();
        let first = parser.parse_str(SAMPLE).unwrap();
        let second = parser.parse_str(SAMPLE).unwrap();
        assert_eq!(first.messages(), second.messages());
        assert_eq!(first.report().cache_misses, second.report().cache_misses);
    }

    #[test]
    fn test_shared_cache_stays_warm() {
        let parser = ChatParser::with_config(ParserConfig::new().with_shared_cache(true));
        parser.parse_str(SAMPLE).unwrap();
        let second = parser.parse_str(SAMPLE).unwrap();
        assert_eq!(second.report().cache_misses, 0);
    }

    #[test]
    fn test_clone_gets_own_cache() {
        let parser = ChatParser::new();
        let clone = parser.clone();
        assert!(!Arc::ptr_eq(
            parser.timestamps.cache().unwrap(),
            clone.timestamps.cache().unwrap()
        ));

        let first = clone.parse_str(SAMPLE).unwrap();
        assert_eq!(parser.timestamps.stats().hits + parser.timestamps.stats().misses, 0);
        let second = parser.parse_str(SAMPLE).unwrap();
        assert_eq!(first.report().cache_hits, second.report().cache_hits);
        assert_eq!(first.report().cache_misses, second.report().cache_misses);
    }

    #[test]
    fn test_clone_shares_cache_when_shared() {
        let parser = ChatParser::with_config(ParserConfig::new().with_shared_cache(true));
        let clone = parser.clone();
        assert!(Arc::ptr_eq(
            parser.timestamps.cache().unwrap(),
            clone.timestamps.cache().unwrap()
        ));

        parser.parse_str(SAMPLE).unwrap();
        assert_eq!(clone.parse_str(SAMPLE).unwrap().report().cache_misses, 0);
    }

    #[test]
    fn test_clone_keeps_uncached_mode() {
        let parser = ChatParser::with_config(ParserConfig::new().with_layout_cache(false));
        assert!(parser.clone().timestamps.cache().is_none());
    }

    #[test]
    fn test_uncached_matches_cached() {
        let cached = ChatParser::new().parse_str(SAMPLE).unwrap();
        let uncached = ChatParser::with_config(ParserConfig::new().with_layout_cache(false))
            .parse_str(SAMPLE)
            .unwrap();
        assert_eq!(cached.messages(), uncached.messages());
        assert_eq!(uncached.report().cache_hits, 0);
    }

    #[test]
    fn test_shared_handle_points_to_same_messages() {
        let chat = ChatParser::new().parse_str(SAMPLE).unwrap();
        let shared = chat.shared();
        assert!(Arc::ptr_eq(&shared, &chat.shared()));
        assert_eq!(&*shared, chat.messages());
    }
}
