//! JSON Lines (JSONL) output writer.
//!
//! One message per line, which suits line-oriented tooling and loading into
//! dataframes or databases.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::Message;
use crate::error::Result;

/// Writes messages to JSONL (JSON Lines) format.
///
/// Each line is a complete JSON object with the full record schema.
pub fn write_jsonl(messages: &[Message], output_path: impl AsRef<Path>) -> Result<()> {
    let file = File::create(output_path)?;
    let mut writer = BufWriter::new(file);
    write_lines(messages, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Converts messages to a JSONL string.
pub fn to_jsonl(messages: &[Message]) -> Result<String> {
    let mut out = String::new();
    for msg in messages {
        out.push_str(&serde_json::to_string(msg)?);
        out.push('\n');
    }
    Ok(out)
}

fn write_lines<W: Write>(messages: &[Message], writer: &mut W) -> Result<()> {
    for msg in messages {
        serde_json::to_writer(&mut *writer, msg)?;
        writeln!(writer)?;
    }
    Ok(())
}
