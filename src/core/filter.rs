//! Filter messages by date range and sender.
//!
//! | Filter | Method | Description |
//! |--------|--------|-------------|
//! | Date from | [`after_date`](FilterConfig::after_date) | Messages on or after date |
//! | Date to | [`before_date`](FilterConfig::before_date) | Messages on or before date |
//! | Sender | [`with_sender`](FilterConfig::with_sender) | Messages from specific user |
//!
//! Filtering never touches the parsed sequence; [`apply_filters`] returns a
//! new vector.
//!
//! # Example
//!
//! ```
//! use chatlens::core::filter::{FilterConfig, apply_filters};
//! use chatlens::Message;
//! use chrono::NaiveDate;
//!
//! # fn main() -> chatlens::Result<()> {
//! let day = |d| NaiveDate::from_ymd_opt(2024, 6, d).unwrap().and_hms_opt(12, 0, 0).unwrap();
//! let messages = vec![
//!     Message::new(day(1), "Alice", "Old"),
//!     Message::new(day(15), "Bob", "New"),
//!     Message::new(day(20), "alice", "Newer"),
//! ];
//!
//! let config = FilterConfig::new()
//!     .after_date("2024-06-10")?
//!     .with_sender("ALICE");
//!
//! let filtered = apply_filters(&messages, &config);
//! assert_eq!(filtered.len(), 1);
//! assert_eq!(filtered[0].text(), "Newer");
//! # Ok(())
//! # }
//! ```
//!
//! Multiple filters are combined with AND logic. Sender matching ignores case.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::Message;
use crate::error::{ChatlensError, Result};

/// Criteria for selecting messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterConfig {
    /// Include only messages at or after this time.
    pub after: Option<NaiveDateTime>,

    /// Include only messages at or before this time.
    pub before: Option<NaiveDateTime>,

    /// Include only messages from this sender (case-insensitive).
    pub sender: Option<String>,
}

impl FilterConfig {
    /// Creates an empty filter; every message passes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps messages on or after `YYYY-MM-DD`.
    ///
    /// # Errors
    ///
    /// Returns [`ChatlensError::InvalidDate`] if the date cannot be parsed.
    pub fn after_date(mut self, date: &str) -> Result<Self> {
        self.after = Some(parse_date(date)?.and_time(NaiveTime::MIN));
        Ok(self)
    }

    /// Keeps messages on or before `YYYY-MM-DD` (the whole day included).
    ///
    /// # Errors
    ///
    /// Returns [`ChatlensError::InvalidDate`] if the date cannot be parsed.
    pub fn before_date(mut self, date: &str) -> Result<Self> {
        let end = parse_date(date)?
            .and_hms_nano_opt(23, 59, 59, 999_999_999)
            .ok_or_else(|| ChatlensError::invalid_date(date))?;
        self.before = Some(end);
        Ok(self)
    }

    /// Sets the lower bound directly.
    #[must_use]
    pub fn with_after(mut self, after: NaiveDateTime) -> Self {
        self.after = Some(after);
        self
    }

    /// Sets the upper bound directly.
    #[must_use]
    pub fn with_before(mut self, before: NaiveDateTime) -> Self {
        self.before = Some(before);
        self
    }

    #[must_use]
    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = Some(sender.into());
        self
    }

    /// Returns `true` if any filter is active.
    pub fn is_active(&self) -> bool {
        self.after.is_some() || self.before.is_some() || self.sender.is_some()
    }

    /// Returns `true` if `msg` passes every active filter.
    pub fn matches(&self, msg: &Message) -> bool {
        let ts = msg.timestamp();
        if self.after.is_some_and(|after| ts < after) {
            return false;
        }
        if self.before.is_some_and(|before| ts > before) {
            return false;
        }
        match &self.sender {
            Some(sender) => msg.sender().to_lowercase() == sender.to_lowercase(),
            None => true,
        }
    }
}

fn parse_date(date: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").map_err(|_| ChatlensError::invalid_date(date))
}

/// Returns copies of the messages that pass `config`, in their original order.
pub fn apply_filters(messages: &[Message], config: &FilterConfig) -> Vec<Message> {
    if !config.is_active() {
        return messages.to_vec();
    }
    messages
        .iter()
        .filter(|msg| config.matches(msg))
        .cloned()
        .collect()
}
