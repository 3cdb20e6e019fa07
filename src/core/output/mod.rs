//! Output format writers.
//!
//! - [`write_csv`] / [`to_csv`]: one `;`-delimited row per message (`csv-output` feature)
//! - [`write_json`] / [`to_json`]: pretty JSON array (`json-output` feature)
//! - [`write_jsonl`] / [`to_jsonl`]: one JSON object per line (`json-output` feature)
//!
//! Every format carries the full message record: the core fields, the derived
//! text features, reactions and the calendar fields.
//!
//! # Example
//!
//! ```rust,no_run
//! # #[cfg(all(feature = "csv-output", feature = "json-output"))]
//! # fn main() -> chatlens::Result<()> {
//! use chatlens::ChatParser;
//! use chatlens::core::output::{to_csv, write_jsonl};
//!
//! let chat = ChatParser::new().parse_file("WhatsApp Chat.txt")?;
//!
//! write_jsonl(chat.messages(), "messages.jsonl")?;
//! let csv = to_csv(chat.messages())?;
//! # Ok(())
//! # }
//! # #[cfg(not(all(feature = "csv-output", feature = "json-output")))]
//! # fn main() {}
//! ```

#[cfg(feature = "csv-output")]
mod csv_writer;
#[cfg(feature = "json-output")]
mod json_writer;
#[cfg(feature = "json-output")]
mod jsonl_writer;

#[cfg(feature = "csv-output")]
pub use csv_writer::{CSV_HEADER, to_csv, write_csv};
#[cfg(feature = "json-output")]
pub use json_writer::{to_json, write_json};
#[cfg(feature = "json-output")]
pub use jsonl_writer::{to_jsonl, write_jsonl};
