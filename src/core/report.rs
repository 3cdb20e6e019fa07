//! Diagnostics gathered during a parse run.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::encoding::TextEncoding;
use crate::parsing::LineGrammar;

/// Wall-clock time spent in each pipeline stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageTimings {
    pub decode: Duration,
    pub detect: Duration,
    pub reconstruct: Duration,
    pub assemble: Duration,
}

impl StageTimings {
    pub fn total(&self) -> Duration {
        self.decode + self.detect + self.reconstruct + self.assemble
    }
}

/// Counters and choices made while parsing one transcript.
///
/// None of this affects the parsed messages; it is there for logging and for
/// telling the user how much of the file was understood.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseReport {
    /// Encoding the file was decoded with (`None` for in-memory input).
    pub encoding: Option<TextEncoding>,
    pub grammar: LineGrammar,
    pub total_lines: usize,
    pub messages: usize,
    pub continuation_lines: usize,
    pub system_filtered: usize,
    pub malformed_timestamps: usize,
    pub orphan_lines: usize,
    pub reactions_attached: usize,
    pub reactions_dropped: usize,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub timings: StageTimings,
}

impl ParseReport {
    /// Share of timestamp lookups answered from the layout cache, in percent.
    pub fn cache_hit_rate(&self) -> f64 {
        let lookups = self.cache_hits + self.cache_misses;
        if lookups == 0 {
            return 0.0;
        }
        self.cache_hits as f64 / lookups as f64 * 100.0
    }

    /// Lines that were neither part of a kept message nor a reaction.
    pub fn skipped_lines(&self) -> usize {
        self.system_filtered + self.malformed_timestamps + self.orphan_lines
    }
}

impl fmt::Display for ParseReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let encoding = self.encoding.map_or("in-memory", TextEncoding::name);
        writeln!(f, "Format:     {} ({encoding})", self.grammar)?;
        writeln!(f, "Lines:      {}", self.total_lines)?;
        writeln!(
            f,
            "Messages:   {} ({} continuation lines)",
            self.messages, self.continuation_lines
        )?;
        writeln!(
            f,
            "Skipped:    {} system, {} bad timestamps, {} orphan lines",
            self.system_filtered, self.malformed_timestamps, self.orphan_lines
        )?;
        writeln!(
            f,
            "Reactions:  {} attached, {} dropped",
            self.reactions_attached, self.reactions_dropped
        )?;
        write!(f, "Time:       {:.1?}", self.timings.total())
    }
}
