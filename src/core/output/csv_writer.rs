//! CSV output writer.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::Message;
use crate::error::Result;

/// Column names, in order.
pub const CSV_HEADER: [&str; 18] = [
    "timestamp",
    "sender",
    "text",
    "is_media",
    "contains_url",
    "is_question",
    "word_count",
    "char_count",
    "emoji_count",
    "emojis",
    "reactions",
    "date",
    "hour",
    "day_of_week",
    "month",
    "year",
    "month_year",
    "time_period",
];

/// Writes messages to CSV with semicolon delimiter.
///
/// # Format
/// - Delimiter: `;`
/// - Columns: [`CSV_HEADER`]
/// - `emojis`: the emoji characters concatenated
/// - `reactions`: `reactor:reaction` pairs joined by `|`
pub fn write_csv(messages: &[Message], output_path: impl AsRef<Path>) -> Result<()> {
    let file = File::create(output_path)?;
    write_records(messages, file)
}

/// Converts messages to a CSV string.
///
/// Same format as [`write_csv`].
pub fn to_csv(messages: &[Message]) -> Result<String> {
    let mut buf = Vec::new();
    write_records(messages, &mut buf)?;
    // the csv writer only ever receives `&str` fields
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn write_records<W: Write>(messages: &[Message], out: W) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().delimiter(b';').from_writer(out);
    writer.write_record(CSV_HEADER)?;
    for msg in messages {
        writer.write_record(build_record(msg))?;
    }
    writer.flush()?;
    Ok(())
}

fn build_record(msg: &Message) -> [String; 18] {
    let reactions = msg
        .reactions()
        .iter()
        .map(|r| format!("{}:{}", r.reactor, r.reaction))
        .collect::<Vec<_>>()
        .join("|");

    [
        msg.timestamp().format("%Y-%m-%d %H:%M:%S").to_string(),
        msg.sender().to_string(),
        msg.text().to_string(),
        msg.is_media().to_string(),
        msg.contains_url().to_string(),
        msg.is_question().to_string(),
        msg.word_count().to_string(),
        msg.char_count().to_string(),
        msg.emoji_count().to_string(),
        msg.emojis().iter().collect(),
        reactions,
        msg.date().to_string(),
        msg.hour().to_string(),
        msg.day_of_week(),
        msg.month(),
        msg.year().to_string(),
        msg.month_year(),
        msg.time_period().to_string(),
    ]
}
