//! Parser configuration.
//!
//! [`ParserConfig`] gathers every tunable constant of the parsing pipeline.
//! The defaults reproduce the behavior of the WhatsApp export formats this
//! crate was built for; builder methods override individual knobs.
//!
//! # Example
//!
//! ```rust
//! use chatlens::config::ParserConfig;
//!
//! let config = ParserConfig::new()
//!     .with_skip_system_messages(true)
//!     .with_sample_lines(100);
//!
//! assert_eq!(config.sample_lines, 100);
//! ```

use serde::{Deserialize, Serialize};

use crate::encoding::TextEncoding;

/// Number of leading lines inspected by the format detector.
pub const DEFAULT_SAMPLE_LINES: usize = 200;

/// Lines shorter than this (in chars) are ignored by the format detector.
pub const DEFAULT_MIN_LINE_LEN: usize = 20;

/// Matches needed for the detector to stop early.
pub const DEFAULT_CONFIDENCE_THRESHOLD: usize = 5;

/// Length (in chars) of the snippet used to match reactions to messages.
pub const DEFAULT_SNIPPET_LEN: usize = 50;

/// Message count from which feature derivation runs in parallel.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 5000;

/// Configuration for chat transcript parsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Lines sampled for format detection (default: 200)
    pub sample_lines: usize,

    /// Minimum line length considered during detection (default: 20)
    pub min_line_len: usize,

    /// Grammar matches that end detection early (default: 5)
    pub confidence_threshold: usize,

    /// Encodings tried in order when reading a file
    pub encodings: Vec<TextEncoding>,

    /// Drop system/administrative lines (default: true)
    pub skip_system_messages: bool,

    /// Mask phone-number senders (default: true)
    pub mask_phone_numbers: bool,

    /// Reaction snippet length in chars (default: 50)
    pub snippet_len: usize,

    /// Message count from which features are derived in parallel (default: 5000)
    pub parallel_threshold: usize,

    /// Remember the last successful timestamp layout per grammar (default: true)
    pub layout_cache: bool,

    /// Keep the layout cache across parse runs instead of resetting it (default: false)
    pub shared_cache: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            sample_lines: DEFAULT_SAMPLE_LINES,
            min_line_len: DEFAULT_MIN_LINE_LEN,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            encodings: TextEncoding::DEFAULT_ORDER.to_vec(),
            skip_system_messages: true,
            mask_phone_numbers: true,
            snippet_len: DEFAULT_SNIPPET_LEN,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            layout_cache: true,
            shared_cache: false,
        }
    }
}

impl ParserConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets how many leading lines the detector samples.
    #[must_use]
    pub fn with_sample_lines(mut self, lines: usize) -> Self {
        self.sample_lines = lines;
        self
    }

    /// Sets the minimum line length considered during detection.
    #[must_use]
    pub fn with_min_line_len(mut self, len: usize) -> Self {
        self.min_line_len = len;
        self
    }

    /// Sets the early-exit match count for detection.
    #[must_use]
    pub fn with_confidence_threshold(mut self, threshold: usize) -> Self {
        self.confidence_threshold = threshold;
        self
    }

    /// Replaces the ordered list of candidate encodings.
    #[must_use]
    pub fn with_encodings(mut self, encodings: impl Into<Vec<TextEncoding>>) -> Self {
        self.encodings = encodings.into();
        self
    }

    /// Sets whether to skip system messages.
    #[must_use]
    pub fn with_skip_system_messages(mut self, skip: bool) -> Self {
        self.skip_system_messages = skip;
        self
    }

    /// Sets whether phone-number senders are masked.
    #[must_use]
    pub fn with_mask_phone_numbers(mut self, mask: bool) -> Self {
        self.mask_phone_numbers = mask;
        self
    }

    /// Sets the reaction snippet length.
    #[must_use]
    pub fn with_snippet_len(mut self, len: usize) -> Self {
        self.snippet_len = len;
        self
    }

    /// Sets the message count from which feature derivation is parallelized.
    #[must_use]
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Enables or disables the timestamp layout cache.
    #[must_use]
    pub fn with_layout_cache(mut self, enabled: bool) -> Self {
        self.layout_cache = enabled;
        self
    }

    /// Keeps the layout cache warm across parse runs.
    #[must_use]
    pub fn with_shared_cache(mut self, shared: bool) -> Self {
        self.shared_cache = shared;
        self
    }

    /// Returns the detector's view of this configuration.
    pub fn detector(&self) -> DetectorConfig {
        DetectorConfig {
            sample_lines: self.sample_lines,
            min_line_len: self.min_line_len,
            confidence_threshold: self.confidence_threshold,
        }
    }
}

/// The subset of [`ParserConfig`] used by format detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectorConfig {
    pub sample_lines: usize,
    pub min_line_len: usize,
    pub confidence_threshold: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        ParserConfig::default().detector()
    }
}
