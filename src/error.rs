//! Unified error types for chatlens.
//!
//! Parsing a transcript can fail in three distinct, user-actionable ways, and
//! each one has its own [`ChatlensError`] variant:
//!
//! | Variant | Meaning | What the user should do |
//! |---------|---------|-------------------------|
//! | [`Encoding`](ChatlensError::Encoding) | No candidate text encoding decoded the file | Re-export or re-save the file |
//! | [`FormatDetection`](ChatlensError::FormatDetection) | No line grammar matched the sampled lines | Check it really is a chat export |
//! | [`NoMessages`](ChatlensError::NoMessages) | A grammar matched but nothing survived filtering | Export a chat that has user messages |
//!
//! [`TimestampParse`](ChatlensError::TimestampParse) is raised by the
//! timestamp normalizer but recovered per line by the parser; it only reaches
//! callers who use [`TimestampParser`](crate::parsing::TimestampParser)
//! directly.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A specialized [`Result`] type for chatlens operations.
pub type Result<T> = std::result::Result<T, ChatlensError>;

/// The error type for all chatlens operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChatlensError {
    /// An I/O error occurred while reading the input or writing output.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// None of the candidate encodings could decode the file.
    #[error("Unable to decode {}: tried {}", path.as_ref().map(|p| p.display().to_string()).unwrap_or_else(|| "input".to_string()), tried.join(", "))]
    Encoding {
        /// The file path, if the input came from a file
        path: Option<PathBuf>,
        /// Names of the encodings that were attempted, in order
        tried: Vec<&'static str>,
    },

    /// No registered line grammar matched any sampled line.
    #[error("Unrecognized chat export format: no known line layout matched the first {sampled} lines")]
    FormatDetection {
        /// Number of lines that were sampled
        sampled: usize,
    },

    /// The grammar was recognized but zero messages survived reconstruction.
    #[error("No messages found in the chat export (format: {grammar})")]
    NoMessages {
        /// Name of the grammar that was chosen
        grammar: &'static str,
    },

    /// A timestamp matched a grammar syntactically but no layout parsed it.
    #[error("Unable to parse timestamp '{input}' with the {grammar} layouts")]
    TimestampParse {
        /// The timestamp text as it appeared in the line
        input: String,
        /// Name of the grammar whose layouts were tried
        grammar: &'static str,
    },

    /// Invalid date in filter configuration.
    ///
    /// Date filters expect YYYY-MM-DD format.
    #[error("Invalid date '{input}'. Expected format: {expected}")]
    InvalidDate {
        /// The invalid date string that was provided
        input: String,
        /// Expected format description
        expected: &'static str,
    },

    /// An output format or extension was not recognized.
    #[error("Invalid {format} format: {message}")]
    InvalidFormat {
        /// What kind of format was expected
        format: &'static str,
        /// Description of what's wrong
        message: String,
    },

    /// CSV writing error.
    #[cfg(feature = "csv-output")]
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[cfg(feature = "json-output")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl ChatlensError {
    /// Creates an encoding error.
    pub fn encoding(path: Option<PathBuf>, tried: Vec<&'static str>) -> Self {
        ChatlensError::Encoding { path, tried }
    }

    /// Creates a format detection error.
    pub fn format_detection(sampled: usize) -> Self {
        ChatlensError::FormatDetection { sampled }
    }

    /// Creates a "no messages" error.
    pub fn no_messages(grammar: &'static str) -> Self {
        ChatlensError::NoMessages { grammar }
    }

    /// Creates a timestamp parse error.
    pub fn timestamp_parse(input: impl Into<String>, grammar: &'static str) -> Self {
        ChatlensError::TimestampParse {
            input: input.into(),
            grammar,
        }
    }

    /// Creates an invalid date error.
    pub fn invalid_date(input: impl Into<String>) -> Self {
        ChatlensError::InvalidDate {
            input: input.into(),
            expected: "YYYY-MM-DD",
        }
    }

    /// Creates an invalid format error.
    pub fn invalid_format(format: &'static str, message: impl Into<String>) -> Self {
        ChatlensError::InvalidFormat {
            format,
            message: message.into(),
        }
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, ChatlensError::Io(_))
    }

    /// Returns `true` if no encoding could decode the input.
    pub fn is_encoding(&self) -> bool {
        matches!(self, ChatlensError::Encoding { .. })
    }

    /// Returns `true` if the export format was not recognized.
    pub fn is_format_detection(&self) -> bool {
        matches!(self, ChatlensError::FormatDetection { .. })
    }

    /// Returns `true` if parsing produced zero messages.
    pub fn is_no_messages(&self) -> bool {
        matches!(self, ChatlensError::NoMessages { .. })
    }

    /// Returns `true` if this is a timestamp parse error.
    pub fn is_timestamp_parse(&self) -> bool {
        matches!(self, ChatlensError::TimestampParse { .. })
    }

    /// Short, user-facing category for the failure.
    pub fn user_hint(&self) -> &'static str {
        match self {
            ChatlensError::Io(_) => "file could not be read",
            ChatlensError::Encoding { .. } => "file unreadable: unsupported text encoding",
            ChatlensError::FormatDetection { .. } => "unrecognized export format",
            ChatlensError::NoMessages { .. } => "no messages found",
            ChatlensError::TimestampParse { .. } => "malformed timestamp",
            ChatlensError::InvalidDate { .. } => "invalid date filter",
            ChatlensError::InvalidFormat { .. } => "invalid output format",
            #[cfg(feature = "csv-output")]
            ChatlensError::Csv(_) => "failed to write CSV output",
            #[cfg(feature = "json-output")]
            ChatlensError::Json(_) => "failed to write JSON output",
        }
    }
}
