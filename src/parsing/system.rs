//! System message filtering.
//!
//! WhatsApp interleaves administrative lines (encryption notices, membership
//! changes, missed calls, deleted messages) with real messages. They are
//! recognized by full phrases only: a bare "left" or "added" is too common in
//! ordinary conversation, and dropping a real message is worse than keeping
//! an administrative one.

use crate::features::is_media;

/// English phrases, matched case-insensitively anywhere in the body.
const SYSTEM_PHRASES: &[&str] = &[
    "messages and calls are end-to-end encrypted",
    "only people in this chat can read",
    "changed the subject",
    "changed the group description",
    "changed this group's icon",
    "deleted this group's icon",
    "changed this group's settings",
    "created group",
    "created this group",
    "you were added",
    "added you",
    "you added",
    "you removed",
    "removed you",
    "you were removed",
    "was added",
    "was removed",
    "you left",
    "has left",
    "joined using this group's invite link",
    "joined using your invite link",
    "missed voice call",
    "missed video call",
    "missed group voice call",
    "missed group video call",
    "this message was deleted",
    "you deleted this message",
    "security code changed",
    "your security code with",
    "turned on disappearing messages",
    "turned off disappearing messages",
    "disappearing messages were turned",
    "changed their phone number",
    "you're now an admin",
    "is now an admin",
    "no longer an admin",
    "created a poll",
    "created poll",
    "voted in",
];

/// Russian phrases, matched case-sensitively.
const SYSTEM_PHRASES_RU: &[&str] = &[
    "Сообщения и звонки защищены сквозным шифрованием",
    "создал(а) группу",
    "изменил тему",
    "изменил иконку группы",
    "изменил описание группы",
    "удалил иконку группы",
    "изменил номер телефона",
    "присоединился по ссылке",
    "код безопасности изменён",
    "теперь администратор",
    "включил исчезающие сообщения",
    "выключил исчезающие сообщения",
];

/// Right-to-left override, used by WhatsApp to prefix some event lines.
const RTL_OVERRIDE: char = '\u{202e}';

/// Returns `true` if a header line is administrative rather than a message.
///
/// `sender` is expected to be already cleaned. A missing, `system` or
/// WhatsApp sender is always administrative; otherwise the body decides.
pub fn is_system_message(sender: &str, body: &str) -> bool {
    is_system_sender(sender) || is_system_body(body)
}

/// Body-only check: administrative phrases and the RTL-override prefix.
///
/// Media placeholders never match.
pub fn is_system_body(body: &str) -> bool {
    if is_media(body) {
        return false;
    }
    if body.starts_with(RTL_OVERRIDE) {
        return true;
    }

    let body_lower = body.to_lowercase();
    SYSTEM_PHRASES.iter().any(|phrase| body_lower.contains(phrase))
        || body_lower.starts_with("poll:")
        || SYSTEM_PHRASES_RU.iter().any(|phrase| body.contains(phrase))
}

fn is_system_sender(sender: &str) -> bool {
    let sender = sender.trim();
    let sender_lower = sender.to_lowercase();
    sender.is_empty() || sender_lower == "system" || sender_lower.contains("whatsapp")
}
