//! The typed message record produced by the parser.
//!
//! A [`Message`] is created from a timestamp, a sender and the reconstructed
//! text. Every text feature (word/char/emoji counts, media, URL and question
//! flags) is derived at construction, and every calendar field is computed
//! from the timestamp on demand, so a record can never carry features that
//! disagree with its text or time.
//!
//! # Example
//!
//! ```
//! use chatlens::Message;
//! use chrono::NaiveDate;
//!
//! let ts = NaiveDate::from_ymd_opt(2025, 8, 1).unwrap().and_hms_opt(9, 0, 0).unwrap();
//! let msg = Message::new(ts, "John", "Anyone up for lunch? 🍕");
//!
//! assert!(msg.is_question());
//! assert_eq!(msg.word_count(), 5);
//! assert_eq!(msg.emojis(), &['🍕']);
//! assert_eq!(msg.day_of_week(), "Friday");
//! assert_eq!(msg.time_period().to_string(), "Morning");
//! ```

use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize, Serializer};

use crate::features::{self, TextFeatures};

/// One of five fixed hour-of-day buckets used for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TimePeriod {
    /// 00:00–05:59
    #[serde(rename = "Late Night")]
    LateNight,
    /// 06:00–11:59
    Morning,
    /// 12:00–16:59
    Afternoon,
    /// 17:00–20:59
    Evening,
    /// 21:00–23:59
    Night,
}

impl TimePeriod {
    /// Buckets an hour of the day (0–23).
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            0..=5 => TimePeriod::LateNight,
            6..=11 => TimePeriod::Morning,
            12..=16 => TimePeriod::Afternoon,
            17..=20 => TimePeriod::Evening,
            _ => TimePeriod::Night,
        }
    }

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            TimePeriod::LateNight => "Late Night",
            TimePeriod::Morning => "Morning",
            TimePeriod::Afternoon => "Afternoon",
            TimePeriod::Evening => "Evening",
            TimePeriod::Night => "Night",
        }
    }
}

impl fmt::Display for TimePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A reaction attached to a message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reaction {
    /// Who reacted (normalized like a sender).
    pub reactor: String,
    /// The reaction symbol or text.
    pub reaction: String,
}

impl Reaction {
    pub fn new(reactor: impl Into<String>, reaction: impl Into<String>) -> Self {
        Self {
            reactor: reactor.into(),
            reaction: reaction.into(),
        }
    }
}

/// A single reconstructed chat message.
///
/// Fields are private; the record is read through accessors so that
/// consumers sharing an assembled sequence can't change it.
///
/// Serializes to the full record schema, including the derived calendar
/// fields (`date`, `hour`, `day_of_week`, `month`, `year`, `month_year`,
/// `time_period`). Deserialization ignores those and re-derives them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "StoredMessage")]
pub struct Message {
    timestamp: NaiveDateTime,
    sender: String,
    text: String,
    features: TextFeatures,
    reactions: Vec<Reaction>,
}

impl Message {
    /// Creates a message and derives its text features.
    pub fn new(timestamp: NaiveDateTime, sender: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        let features = features::derive(&text);
        Self {
            timestamp,
            sender: sender.into(),
            text,
            features,
            reactions: Vec::new(),
        }
    }

    /// Builder method adding a reaction (set semantics).
    #[must_use]
    pub fn with_reaction(mut self, reaction: Reaction) -> Self {
        self.add_reaction(reaction);
        self
    }

    /// Adds a reaction unless the same `(reactor, reaction)` pair is already present.
    ///
    /// Returns `true` if it was added.
    pub(crate) fn add_reaction(&mut self, reaction: Reaction) -> bool {
        if self.reactions.contains(&reaction) {
            return false;
        }
        self.reactions.push(reaction);
        true
    }

    // =========================================================================
    // Core fields
    // =========================================================================

    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn reactions(&self) -> &[Reaction] {
        &self.reactions
    }

    pub fn reaction_count(&self) -> usize {
        self.reactions.len()
    }

    // =========================================================================
    // Text features
    // =========================================================================

    pub fn is_media(&self) -> bool {
        self.features.is_media
    }

    pub fn contains_url(&self) -> bool {
        self.features.contains_url
    }

    pub fn is_question(&self) -> bool {
        self.features.is_question
    }

    pub fn word_count(&self) -> usize {
        self.features.word_count
    }

    pub fn char_count(&self) -> usize {
        self.features.char_count
    }

    pub fn emoji_count(&self) -> usize {
        self.features.emojis.len()
    }

    /// Emoji characters in order of appearance, duplicates kept.
    pub fn emojis(&self) -> &[char] {
        &self.features.emojis
    }

    // =========================================================================
    // Calendar fields, always computed from the timestamp
    // =========================================================================

    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    pub fn hour(&self) -> u32 {
        self.timestamp.hour()
    }

    /// Full weekday name, e.g. "Monday".
    pub fn day_of_week(&self) -> String {
        self.timestamp.format("%A").to_string()
    }

    /// Full month name, e.g. "January".
    pub fn month(&self) -> String {
        self.timestamp.format("%B").to_string()
    }

    pub fn year(&self) -> i32 {
        self.timestamp.year()
    }

    /// Month and year, e.g. "January 2025".
    pub fn month_year(&self) -> String {
        self.timestamp.format("%B %Y").to_string()
    }

    pub fn time_period(&self) -> TimePeriod {
        TimePeriod::from_hour(self.hour())
    }
}

/// Flat serialized form of a [`Message`].
#[derive(Serialize)]
struct MessageRecord<'a> {
    timestamp: NaiveDateTime,
    sender: &'a str,
    text: &'a str,
    is_media: bool,
    contains_url: bool,
    is_question: bool,
    word_count: usize,
    char_count: usize,
    emoji_count: usize,
    emojis: &'a [char],
    reactions: &'a [Reaction],
    date: NaiveDate,
    hour: u32,
    day_of_week: String,
    month: String,
    year: i32,
    month_year: String,
    time_period: TimePeriod,
}

impl Serialize for Message {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        MessageRecord {
            timestamp: self.timestamp,
            sender: &self.sender,
            text: &self.text,
            is_media: self.is_media(),
            contains_url: self.contains_url(),
            is_question: self.is_question(),
            word_count: self.word_count(),
            char_count: self.char_count(),
            emoji_count: self.emoji_count(),
            emojis: self.emojis(),
            reactions: &self.reactions,
            date: self.date(),
            hour: self.hour(),
            day_of_week: self.day_of_week(),
            month: self.month(),
            year: self.year(),
            month_year: self.month_year(),
            time_period: self.time_period(),
        }
        .serialize(serializer)
    }
}

/// What deserialization reads back; everything else is re-derived.
#[derive(Deserialize)]
struct StoredMessage {
    timestamp: NaiveDateTime,
    sender: String,
    text: String,
    #[serde(default)]
    reactions: Vec<Reaction>,
}

impl From<StoredMessage> for Message {
    fn from(stored: StoredMessage) -> Self {
        let mut msg = Message::new(stored.timestamp, stored.sender, stored.text);
        for reaction in stored.reactions {
            msg.add_reaction(reaction);
        }
        msg
    }
}
