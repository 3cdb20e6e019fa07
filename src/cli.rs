//! Command-line interface definition using clap.
//!
//! [`Args`] is shared by the `chatlens` binary and its tests.

use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser};
use tracing::Level;

use crate::config::ParserConfig;
use crate::core::filter::FilterConfig;
use crate::error::Result;
use crate::format::OutputFormat;

/// Default output path stem; the extension follows `--format`.
pub const DEFAULT_OUTPUT_STEM: &str = "messages";

/// Parse a WhatsApp chat export into typed, feature-enriched message records.
#[derive(Parser, Debug, Clone)]
#[command(name = "chatlens")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    chatlens 'WhatsApp Chat with Team.txt'
    chatlens chat.txt -o team.csv
    chatlens chat.txt --format jsonl --after 2024-01-01
    chatlens chat.txt --from Alice --keep-system -vv")]
pub struct Args {
    /// Path to the exported chat (.txt)
    pub input: PathBuf,

    /// Path to output file [default: messages.<format extension>]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format (inferred from --output's extension when omitted)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Keep messages on or after this date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub after: Option<String>,

    /// Keep messages on or before this date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub before: Option<String>,

    /// Keep messages from this sender only (case-insensitive)
    #[arg(long, value_name = "USER")]
    pub from: Option<String>,

    /// Keep system lines (encryption notices, joins, missed calls, ...)
    #[arg(long)]
    pub keep_system: bool,

    /// Do not mask phone-number senders
    #[arg(long)]
    pub no_mask: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Log level selected by `-v` flags.
    pub fn log_level(&self) -> Level {
        match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }

    pub fn parser_config(&self) -> ParserConfig {
        ParserConfig::new()
            .with_skip_system_messages(!self.keep_system)
            .with_mask_phone_numbers(!self.no_mask)
    }

    /// Builds the selection filter from `--after`, `--before` and `--from`.
    ///
    /// # Errors
    ///
    /// Returns [`ChatlensError::InvalidDate`](crate::ChatlensError::InvalidDate)
    /// for malformed dates.
    pub fn filter_config(&self) -> Result<FilterConfig> {
        let mut filter = FilterConfig::new();
        if let Some(after) = &self.after {
            filter = filter.after_date(after)?;
        }
        if let Some(before) = &self.before {
            filter = filter.before_date(before)?;
        }
        if let Some(from) = &self.from {
            filter = filter.with_sender(from.clone());
        }
        Ok(filter)
    }

    /// Resolves the output path and format.
    ///
    /// An explicit `--format` wins; otherwise the output extension decides,
    /// and without either the default format is used.
    ///
    /// # Errors
    ///
    /// Returns [`ChatlensError::InvalidFormat`](crate::ChatlensError::InvalidFormat)
    /// if the format has to come from an unknown extension.
    pub fn output_target(&self) -> Result<(PathBuf, OutputFormat)> {
        match (&self.output, self.format) {
            (Some(path), Some(format)) => Ok((path.clone(), format)),
            (Some(path), None) => Ok((path.clone(), OutputFormat::from_path(path)?)),
            (None, format) => {
                let format = format.unwrap_or_default();
                let path = Path::new(DEFAULT_OUTPUT_STEM).with_extension(format.extension());
                Ok((path, format))
            }
        }
    }
}
