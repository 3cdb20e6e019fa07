//! Post-parse processing.
//!
//! - [`filter`]: message selection by date range and sender
//! - [`output`]: format writers (CSV, JSON, JSONL)
//! - [`report`]: diagnostics of a parse run
//!
//! # Quick Start
//!
//! ```rust
//! # #[cfg(all(feature = "csv-output", feature = "json-output"))]
//! # fn example() {
//! use chatlens::core::{
//!     FilterConfig, ParseReport,
//!     apply_filters,
//!     write_csv, write_json, write_jsonl,
//! };
//! # }
//! ```

pub mod filter;
pub mod output;
pub mod report;

pub use filter::{FilterConfig, apply_filters};
pub use report::{ParseReport, StageTimings};

pub use crate::Message;

#[cfg(feature = "csv-output")]
pub use output::{to_csv, write_csv};
#[cfg(feature = "json-output")]
pub use output::{to_json, to_jsonl, write_json, write_jsonl};
