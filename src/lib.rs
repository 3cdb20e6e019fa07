//! # chatlens
//!
//! Parses WhatsApp chat transcripts (the TXT file produced by "Export chat")
//! into a chronologically ordered sequence of typed, feature-enriched
//! [`Message`] records.
//!
//! ## Overview
//!
//! Exports differ by platform and locale: bracketed iOS headers versus dashed
//! Android ones, 12h or 24h clocks, slash or dot dates, day-first or
//! month-first order, several text encodings. chatlens detects the layout
//! from a sample of the file and then:
//!
//! - joins multi-line messages back together
//! - drops administrative lines (encryption notices, joins, missed calls)
//! - normalizes sender names and masks phone numbers
//! - attaches reaction lines to the messages they refer to
//! - derives per-message text and calendar features
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chatlens::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let chat = ChatParser::new().parse_file("WhatsApp Chat with Team.txt")?;
//!
//!     for msg in chat.messages() {
//!         println!("{} {}: {}", msg.timestamp(), msg.sender(), msg.text());
//!     }
//!     println!("{}", chat.report());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Failures
//!
//! A parse fails as a whole only when the file cannot be decoded
//! ([`ChatlensError::Encoding`]), matches no known layout
//! ([`ChatlensError::FormatDetection`]), or yields no messages
//! ([`ChatlensError::NoMessages`]). Bad lines inside an otherwise valid export
//! are skipped and counted in the [`ParseReport`](core::ParseReport).
//!
//! ## Module Structure
//!
//! - [`parser`]: [`ChatParser`] and [`ParsedChat`], the full pipeline
//! - [`parsing`]: the individual stages (grammars, detection, timestamps,
//!   system filter, senders, reactions, reconstruction)
//! - [`encoding`]: text encoding resolution
//! - [`features`]: per-message text features
//! - [`message`]: [`Message`], [`Reaction`], [`TimePeriod`]
//! - [`config`]: [`ParserConfig`](config::ParserConfig)
//! - [`core`]: filtering, output writers, parse report
//! - [`format`]: [`OutputFormat`](format::OutputFormat) and dispatch
//! - [`error`]: [`ChatlensError`], [`Result`]
//! - [`prelude`]: convenient re-exports

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod encoding;
pub mod error;
pub mod features;
pub mod format;
pub mod message;
pub mod parser;
pub mod parsing;

pub use error::{ChatlensError, Result};
pub use message::{Message, Reaction, TimePeriod};
pub use parser::{ChatParser, ParsedChat};

/// Parses an export file with the default configuration.
///
/// # Errors
///
/// See [`ChatParser::parse_file`].
pub fn parse_chat(path: impl AsRef<std::path::Path>) -> Result<ParsedChat> {
    ChatParser::new().parse_file(path)
}

/// Convenient re-exports for common usage.
///
/// ```rust
/// use chatlens::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{ChatlensError, Result};
    pub use crate::message::{Message, Reaction, TimePeriod};
    pub use crate::parser::{ChatParser, ParsedChat};

    pub use crate::config::ParserConfig;
    pub use crate::encoding::TextEncoding;
    pub use crate::parsing::LineGrammar;

    pub use crate::core::filter::{FilterConfig, apply_filters};
    pub use crate::core::report::ParseReport;

    pub use crate::format::{OutputFormat, to_format_string, write_to_format};

    #[cfg(feature = "csv-output")]
    pub use crate::core::output::{to_csv, write_csv};
    #[cfg(feature = "json-output")]
    pub use crate::core::output::{to_json, to_jsonl, write_json, write_jsonl};
}
