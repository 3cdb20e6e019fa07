//! Per-message text feature derivation.
//!
//! Every function here is a pure function of the message text, so derivation
//! is order-independent and can be fanned out across threads (see
//! [`map_ordered`]) without changing the output.

use std::sync::OnceLock;

use regex::Regex;

/// Canonical marker WhatsApp writes in place of an attachment.
pub const MEDIA_OMITTED: &str = "<Media omitted>";

/// Text features of a single message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextFeatures {
    pub is_media: bool,
    pub contains_url: bool,
    pub is_question: bool,
    pub word_count: usize,
    pub char_count: usize,
    pub emojis: Vec<char>,
}

fn url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"https?://\S+|www\.\S+").expect("valid regex"))
}

/// Derives all text features of `text`.
pub fn derive(text: &str) -> TextFeatures {
    TextFeatures {
        is_media: is_media(text),
        contains_url: contains_url(text),
        is_question: text.contains('?'),
        word_count: text.split_whitespace().count(),
        char_count: text.chars().count(),
        emojis: extract_emojis(text),
    }
}

/// `true` if the text is or contains the media-omitted marker (any case).
pub fn is_media(text: &str) -> bool {
    text.to_lowercase().contains("media omitted")
}

/// `true` if the text contains an `http(s)://` or `www.` token.
pub fn contains_url(text: &str) -> bool {
    url_regex().is_match(text)
}

/// Every emoji code point in `text`, in order, duplicates kept.
pub fn extract_emojis(text: &str) -> Vec<char> {
    text.chars().filter(|&c| is_emoji(c)).collect()
}

/// Whether a single code point is an emoji.
///
/// Joiners, variation selectors and keycap combiners are glue, not emoji,
/// and are not counted.
pub fn is_emoji(c: char) -> bool {
    matches!(c,
        '\u{1F600}'..='\u{1F64F}' | // Emoticons
        '\u{1F300}'..='\u{1F5FF}' | // Misc Symbols and Pictographs
        '\u{1F680}'..='\u{1F6FF}' | // Transport and Map
        '\u{1F900}'..='\u{1F9FF}' | // Supplemental Symbols and Pictographs
        '\u{1FA70}'..='\u{1FAFF}' | // Symbols and Pictographs Extended-A
        '\u{1F1E6}'..='\u{1F1FF}' | // Regional indicators (flags)
        '\u{1F000}'..='\u{1F02F}' | // Mahjong Tiles
        '\u{1F0A0}'..='\u{1F0FF}' | // Playing Cards
        '\u{2600}'..='\u{26FF}' |   // Misc Symbols
        '\u{2700}'..='\u{27BF}' |   // Dingbats
        '\u{2B50}' | '\u{2B55}' |   // star, circle
        '\u{2B05}'..='\u{2B07}' |   // arrows
        '\u{2B1B}' | '\u{2B1C}' |   // squares
        '\u{203C}' | '\u{2049}' |   // !! ?!
        '\u{231A}' | '\u{231B}' |   // watch, hourglass
        '\u{23E9}'..='\u{23F3}' |
        '\u{23F8}'..='\u{23FA}'
    )
}

/// Maps `items` through `f`, preserving order.
///
/// With the `parallel` feature enabled and at least `parallel_threshold`
/// items, the work is spread over the rayon pool. Since `f` is expected to be
/// pure, the output is identical either way.
pub fn map_ordered<T, U, F>(items: Vec<T>, parallel_threshold: usize, f: F) -> Vec<U>
where
    T: Send,
    U: Send,
    F: Fn(T) -> U + Sync + Send,
{
    if cfg!(feature = "parallel") && items.len() >= parallel_threshold {
        tracing::debug!(count = items.len(), "deriving features in parallel");
        map_parallel(items, f)
    } else {
        items.into_iter().map(f).collect()
    }
}

#[cfg(feature = "parallel")]
fn map_parallel<T, U, F>(items: Vec<T>, f: F) -> Vec<U>
where
    T: Send,
    U: Send,
    F: Fn(T) -> U + Sync + Send,
{
    use rayon::prelude::*;
    items.into_par_iter().map(f).collect()
}

#[cfg(not(feature = "parallel"))]
fn map_parallel<T, U, F>(items: Vec<T>, f: F) -> Vec<U>
where
    F: Fn(T) -> U,
{
    items.into_iter().map(f).collect()
}
