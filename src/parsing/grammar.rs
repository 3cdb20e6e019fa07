//! Line grammars for WhatsApp TXT exports.
//!
//! Exports vary by platform and locale. Each [`LineGrammar`] variant pairs a
//! header regex with the ordered timestamp layouts used to parse it.
//!
//! | Grammar | Example |
//! |---------|---------|
//! | `bracketed-12h` | `[1/15/24, 10:30:45 AM] Alice: Hello` |
//! | `bracketed-24h` | `[15/01/2024, 10:30:45] Alice: Hello` |
//! | `bracketed-dot-24h` | `[15.01.24, 10:30:45] Alice: Hello` |
//! | `dashed-12h` | `8/1/25, 9:00 AM - Alice: Hello` |
//! | `dashed-24h` | `15/01/2024, 10:30 - Alice: Hello` |
//! | `dashed-dot-24h` | `26.10.2025, 20:40 - Alice: Hello` |
//! | `iso-24h` | `2024-01-15 10:30:00 - Alice: Hello` |
//!
//! The headers are mutually exclusive: 12h grammars require an AM/PM marker,
//! 24h grammars reject one, and the bracket and date separators tell the rest
//! apart. Lines whose header has no `Sender:` part (membership events in
//! Android exports) still match, with an empty sender.
//!
//! Layout order resolves day/month ambiguity. 12h grammars try month-first
//! layouts before day-first; slash-dated 24h grammars try day-first first.
//! Two-digit-year layouts always precede four-digit ones, since `%Y` would
//! happily read `25` as the year 25.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// A supported line grammar.
///
/// Variants are listed in registration order, which is also the detector's
/// tie-break order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LineGrammar {
    /// iOS, US locale: `[M/D/YY, h:mm:ss AM] Sender: text`
    Bracketed12h,
    /// iOS, 24h clock: `[D/M/YYYY, HH:mm:ss] Sender: text`
    Bracketed24h,
    /// iOS, dotted date: `[D.M.YY, HH:mm:ss] Sender: text`
    BracketedDot24h,
    /// Android, 12h clock: `M/D/YY, h:mm AM - Sender: text`
    Dashed12h,
    /// Android, 24h clock: `D/M/YY, HH:mm - Sender: text`
    Dashed24h,
    /// Android, dotted date: `D.M.YYYY, HH:mm - Sender: text`
    DashedDot24h,
    /// ISO-like: `YYYY-MM-DD HH:mm:ss - Sender: text`
    Iso24h,
}

/// Fields extracted from a header line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineMatch<'a> {
    pub timestamp: &'a str,
    pub sender: &'a str,
    pub body: &'a str,
}

const MONTH_FIRST_12H: &[&str] = &[
    "%m/%d/%y, %I:%M:%S %p",
    "%m/%d/%y, %I:%M %p",
    "%m/%d/%Y, %I:%M:%S %p",
    "%m/%d/%Y, %I:%M %p",
    "%d/%m/%y, %I:%M:%S %p",
    "%d/%m/%y, %I:%M %p",
    "%d/%m/%Y, %I:%M:%S %p",
    "%d/%m/%Y, %I:%M %p",
];

const DAY_FIRST_24H: &[&str] = &[
    "%d/%m/%y, %H:%M:%S",
    "%d/%m/%y, %H:%M",
    "%d/%m/%Y, %H:%M:%S",
    "%d/%m/%Y, %H:%M",
    "%m/%d/%y, %H:%M:%S",
    "%m/%d/%y, %H:%M",
    "%m/%d/%Y, %H:%M:%S",
    "%m/%d/%Y, %H:%M",
];

const DOT_24H: &[&str] = &[
    "%d.%m.%y, %H:%M:%S",
    "%d.%m.%y, %H:%M",
    "%d.%m.%Y, %H:%M:%S",
    "%d.%m.%Y, %H:%M",
];

const ISO_24H: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];

impl LineGrammar {
    /// All grammars in registration order.
    pub const ALL: [LineGrammar; 7] = [
        LineGrammar::Bracketed12h,
        LineGrammar::Bracketed24h,
        LineGrammar::BracketedDot24h,
        LineGrammar::Dashed12h,
        LineGrammar::Dashed24h,
        LineGrammar::DashedDot24h,
        LineGrammar::Iso24h,
    ];

    /// Returns all grammars in registration order.
    pub fn all() -> &'static [LineGrammar] {
        &Self::ALL
    }

    /// Stable grammar name, e.g. `"dashed-12h"`.
    pub fn name(self) -> &'static str {
        match self {
            LineGrammar::Bracketed12h => "bracketed-12h",
            LineGrammar::Bracketed24h => "bracketed-24h",
            LineGrammar::BracketedDot24h => "bracketed-dot-24h",
            LineGrammar::Dashed12h => "dashed-12h",
            LineGrammar::Dashed24h => "dashed-24h",
            LineGrammar::DashedDot24h => "dashed-dot-24h",
            LineGrammar::Iso24h => "iso-24h",
        }
    }

    /// Header regex. Group 1 is the timestamp, 2 the (optional) sender, 3 the body.
    pub fn pattern(self) -> &'static str {
        match self {
            // [1/15/24, 10:30:45 AM] Alice: Hello
            LineGrammar::Bracketed12h => {
                r"^\[(\d{1,2}/\d{1,2}/\d{2,4},\s\d{1,2}:\d{2}(?::\d{2})?\s?[APap][Mm])\]\s(?:([^:]+?):\s?)?(.*)$"
            }
            // [15/01/2024, 10:30:45] Alice: Hello
            LineGrammar::Bracketed24h => {
                r"^\[(\d{1,2}/\d{1,2}/\d{2,4},\s\d{1,2}:\d{2}(?::\d{2})?)\]\s(?:([^:]+?):\s?)?(.*)$"
            }
            // [15.01.24, 10:30:45] Alice: Hello
            LineGrammar::BracketedDot24h => {
                r"^\[(\d{1,2}\.\d{1,2}\.\d{2,4},\s\d{1,2}:\d{2}(?::\d{2})?)\]\s(?:([^:]+?):\s?)?(.*)$"
            }
            // 8/1/25, 9:00 AM - Alice: Hello
            LineGrammar::Dashed12h => {
                r"^(\d{1,2}/\d{1,2}/\d{2,4},\s\d{1,2}:\d{2}(?::\d{2})?\s?[APap][Mm])\s-\s(?:([^:]+?):\s?)?(.*)$"
            }
            // 15/01/2024, 10:30 - Alice: Hello
            LineGrammar::Dashed24h => {
                r"^(\d{1,2}/\d{1,2}/\d{2,4},\s\d{1,2}:\d{2}(?::\d{2})?)\s-\s(?:([^:]+?):\s?)?(.*)$"
            }
            // 26.10.2025, 20:40 - Alice: Hello
            LineGrammar::DashedDot24h => {
                r"^(\d{1,2}\.\d{1,2}\.\d{2,4},\s\d{1,2}:\d{2}(?::\d{2})?)\s-\s(?:([^:]+?):\s?)?(.*)$"
            }
            // 2024-01-15 10:30:00 - Alice: Hello
            LineGrammar::Iso24h => {
                r"^(\d{4}-\d{2}-\d{2}\s\d{2}:\d{2}(?::\d{2})?)\s-\s(?:([^:]+?):\s?)?(.*)$"
            }
        }
    }

    /// Ordered chrono layouts for this grammar's timestamps.
    pub fn layouts(self) -> &'static [&'static str] {
        match self {
            LineGrammar::Bracketed12h | LineGrammar::Dashed12h => MONTH_FIRST_12H,
            LineGrammar::Bracketed24h | LineGrammar::Dashed24h => DAY_FIRST_24H,
            LineGrammar::BracketedDot24h | LineGrammar::DashedDot24h => DOT_24H,
            LineGrammar::Iso24h => ISO_24H,
        }
    }

    /// The compiled header regex.
    pub fn regex(self) -> &'static Regex {
        static COMPILED: OnceLock<[Regex; 7]> = OnceLock::new();
        let compiled = COMPILED
            .get_or_init(|| LineGrammar::ALL.map(|g| Regex::new(g.pattern()).expect("valid regex")));
        &compiled[self as usize]
    }

    /// Returns `true` if `line` is a header line in this grammar.
    pub fn is_match(self, line: &str) -> bool {
        self.regex().is_match(line)
    }

    /// Splits a header line into timestamp, sender and body.
    pub fn captures(self, line: &str) -> Option<LineMatch<'_>> {
        let caps = self.regex().captures(line)?;
        Some(LineMatch {
            timestamp: caps.get(1).map_or("", |m| m.as_str()),
            sender: caps.get(2).map_or("", |m| m.as_str().trim()),
            body: caps.get(3).map_or("", |m| m.as_str().trim()),
        })
    }
}

/// The time-of-day part of a layout.
///
/// Layouts with different clocks never accept the same string, which is what
/// lets the layout cache skip them.
pub fn layout_clock(layout: &str) -> &str {
    layout
        .split_once(", ")
        .or_else(|| layout.split_once(' '))
        .map_or(layout, |(_, time)| time)
}

impl fmt::Display for LineGrammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
