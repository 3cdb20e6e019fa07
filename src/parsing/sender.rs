//! Sender name normalization.
//!
//! Names in exports carry invisible formatting characters, the `~` prefix
//! WhatsApp puts in front of non-contacts, and sometimes a bare phone number.
//! Phone numbers are masked down to country code and last four digits.

/// Zero-width, direction-control and byte-order characters.
fn is_invisible(c: char) -> bool {
    matches!(c,
        '\u{200b}'..='\u{200f}' |
        '\u{202a}'..='\u{202e}' |
        '\u{2066}'..='\u{2069}' |
        '\u{feff}'
    )
}

/// Cleans a raw sender name, masking phone numbers when `mask_phones` is set.
///
/// ```
/// use chatlens::parsing::clean_sender;
///
/// assert_eq!(clean_sender("~\u{202f}Alice  Smith\u{200e}", true), "Alice Smith");
/// assert_eq!(clean_sender("+1 555 123 4567", true), "+1*****4567");
/// ```
pub fn clean_sender(raw: &str, mask_phones: bool) -> String {
    let stripped: String = raw
        .chars()
        .filter(|&c| !is_invisible(c) && c != '~')
        .collect();
    let cleaned = stripped.split_whitespace().collect::<Vec<_>>().join(" ");

    if cleaned.chars().count() < 2 {
        return cleaned;
    }
    if mask_phones {
        if let Some(masked) = mask_phone_number(&cleaned) {
            return masked;
        }
    }
    cleaned
}

/// Masks a `+<digits>` phone number as `+<country>*****<last four>`.
///
/// Returns `None` if `name` does not start like a phone number, contains
/// letters, or has seven digits or fewer. The country code is whatever
/// precedes the last ten digits, clamped to one to three digits; for ten
/// digits or fewer it is the first two.
pub fn mask_phone_number(name: &str) -> Option<String> {
    let rest = name.strip_prefix('+')?;
    if !rest.starts_with(|c: char| c.is_ascii_digit()) || rest.chars().any(char::is_alphabetic) {
        return None;
    }

    let digits: String = name.chars().filter(char::is_ascii_digit).collect();
    let len = digits.len();
    if len <= 7 {
        return None;
    }

    let country_len = (if len > 10 { len - 10 } else { 2 }).clamp(1, 3);
    let country = &digits[..country_len];
    let last_four = &digits[len - 4..];
    Some(format!("+{country}*****{last_four}"))
}
