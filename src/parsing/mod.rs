//! The line-level parsing stages.
//!
//! - [`grammar`]: supported header grammars and their timestamp layouts
//! - [`detect`]: picks the grammar of a transcript from a sample
//! - [`timestamp`]: turns header timestamps into `NaiveDateTime`
//! - [`system`]: recognizes administrative lines
//! - [`sender`]: cleans and masks sender names
//! - [`reaction`]: extracts reaction lines and attaches them to messages
//! - [`reconstruct`]: the line state machine building message drafts

pub mod detect;
pub mod grammar;
pub mod reaction;
pub mod reconstruct;
pub mod sender;
pub mod system;
pub mod timestamp;

pub use detect::detect_grammar;
pub use grammar::{LineGrammar, LineMatch};
pub use reaction::{PendingReaction, ReactionOutcome, attach_reactions, parse_reaction_line};
pub use reconstruct::{Draft, ReconstructOptions, ReconstructStats, Reconstruction, Reconstructor};
pub use sender::{clean_sender, mask_phone_number};
pub use system::{is_system_body, is_system_message};
pub use timestamp::{CacheStats, LayoutCache, TimestampParser};

/// Trims a raw line and drops a leading byte-order or left-to-right mark.
pub(crate) fn clean_line(line: &str) -> &str {
    line.trim()
        .trim_start_matches(['\u{feff}', '\u{200e}'])
        .trim_start()
}
