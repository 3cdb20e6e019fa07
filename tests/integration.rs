//! Integration tests for the full parsing pipeline.
//!
//! Each test writes a fixture to a temporary file and parses it through the
//! public API, the same way the binary does.

use std::fs;
use std::path::PathBuf;

use chatlens::prelude::*;
use tempfile::TempDir;

// ============================================================================
// Fixtures
// ============================================================================

fn write_fixture(dir: &TempDir, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

const ANDROID_US: &str = "\
8/1/25, 8:59 AM - Messages and calls are end-to-end encrypted. No one outside of this chat, not even WhatsApp, can read or listen to them.
8/1/25, 9:00 AM - John: Hello
this is more
8/1/25, 9:01 AM - Jane: Hi
8/1/25, 9:02 AM - Jane: Nice photo! Where was it taken?
8/1/25, 9:03 AM - Bob joined using this group's invite link
8/1/25, 9:04 AM - +1 555 123 4567: who is this? 🤔
Bob reacted 👍 to \"Nice photo!\"
8/1/25, 9:05 AM - John: <Media omitted>
8/1/25, 9:06 AM - John: see https://example.com";

/// The same conversation exported from an iPhone with a 24h clock.
const IOS_24H: &str = "\
[01/08/2025, 08:59:00] Messages and calls are end-to-end encrypted. No one outside of this chat, not even WhatsApp, can read or listen to them.
[01/08/2025, 09:00:00] John: Hello
this is more
[01/08/2025, 09:01:00] Jane: Hi
[01/08/2025, 09:02:00] Jane: Nice photo! Where was it taken?
[01/08/2025, 09:04:00] +1 555 123 4567: who is this? 🤔
[01/08/2025, 09:05:00] John: <Media omitted>
[01/08/2025, 09:06:00] John: see https://example.com";

fn parse(text: &str) -> ParsedChat {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "chat.txt", text.as_bytes());
    ChatParser::new().parse_file(&path).unwrap()
}

// ============================================================================
// Pipeline properties
// ============================================================================

#[test]
fn test_continuation_correctness() {
    let text = "\
8/1/25, 9:00 AM - John: Hello
this is more
8/1/25, 9:01 AM - Jane: Hi";
    let chat = parse(text);

    assert_eq!(chat.len(), 2);
    assert_eq!(chat[0].sender(), "John");
    assert_eq!(chat[0].text(), "Hello this is more");
    assert_eq!(chat[1].text(), "Hi");
}

#[test]
fn test_system_filtering_regardless_of_sender() {
    for sender in ["", "Alice: ", "Group Admin: "] {
        let text = format!(
            "8/1/25, 9:00 AM - {sender}Messages and calls are end-to-end encrypted\n8/1/25, 9:01 AM - Jane: Hi there"
        );
        let chat = parse(&text);
        assert_eq!(chat.len(), 1, "sender: {sender:?}");
        assert_eq!(chat[0].sender(), "Jane");
    }
}

#[test]
fn test_order_invariant() {
    let text = "\
8/2/25, 9:00 AM - John: second day
8/1/25, 11:00 PM - Jane: first day late
8/1/25, 9:00 AM - Jane: first day early
8/2/25, 9:00 AM - Bob: second day again";
    let chat = parse(text);

    for pair in chat.windows(2) {
        assert!(pair[0].timestamp() <= pair[1].timestamp());
    }
    // equal timestamps keep transcript order
    assert_eq!(chat[2].sender(), "John");
    assert_eq!(chat[3].sender(), "Bob");
}

#[test]
fn test_idempotence() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "chat.txt", ANDROID_US.as_bytes());
    let parser = ChatParser::new();

    let first = parser.parse_file(&path).unwrap();
    let second = parser.parse_file(&path).unwrap();
    let fresh = ChatParser::new().parse_file(&path).unwrap();

    assert_eq!(first.messages(), second.messages());
    assert_eq!(first.messages(), fresh.messages());
}

#[test]
fn test_grammar_independence() {
    let android = parse(ANDROID_US);
    let ios = parse(IOS_24H);

    assert_eq!(android.report().grammar, LineGrammar::Dashed12h);
    assert_eq!(ios.report().grammar, LineGrammar::Bracketed24h);

    let senders = |chat: &ParsedChat| {
        let mut s: Vec<String> = chat.senders().into_iter().map(String::from).collect();
        s.sort();
        s
    };
    assert_eq!(senders(&android), senders(&ios));

    let texts = |chat: &ParsedChat| chat.iter().map(|m| m.text().to_string()).collect::<Vec<_>>();
    assert_eq!(texts(&android), texts(&ios));

    let stamps = |chat: &ParsedChat| chat.iter().map(Message::timestamp).collect::<Vec<_>>();
    assert_eq!(stamps(&android), stamps(&ios));
}

#[test]
fn test_phone_masking() {
    let chat = parse(ANDROID_US);
    let masked = chat
        .iter()
        .find(|m| m.text().starts_with("who is this"))
        .unwrap()
        .sender();

    assert!(masked.starts_with("+1"));
    assert!(masked.ends_with("4567"));
    assert!(masked.contains('*'));
    assert!(!masked.contains("555"));
    assert!(!masked.contains("123"));
}

#[test]
fn test_reaction_attachment() {
    let chat = parse(ANDROID_US);
    let photo = chat
        .iter()
        .find(|m| m.text().starts_with("Nice photo!"))
        .unwrap();

    assert_eq!(photo.reactions(), &[Reaction::new("Bob", "👍")]);
    assert_eq!(chat.report().reactions_attached, 1);
}

#[test]
fn test_unmatched_reaction_dropped_silently() {
    let text = "\
8/1/25, 9:00 AM - John: Hello there
Bob reacted 👍 to \"Something never said\"";
    let chat = parse(text);

    assert_eq!(chat.len(), 1);
    assert!(chat[0].reactions().is_empty());
    assert_eq!(chat.report().reactions_dropped, 1);
}

#[test]
fn test_features_on_parsed_messages() {
    let chat = parse(ANDROID_US);
    let by_text = |prefix: &str| chat.iter().find(|m| m.text().starts_with(prefix)).unwrap();

    assert!(by_text("<Media").is_media());
    assert!(by_text("see https").contains_url());
    assert!(by_text("who is this").is_question());
    assert_eq!(by_text("who is this").emojis(), &['🤔']);
    assert_eq!(by_text("Hello").word_count(), 4);
    assert_eq!(by_text("Hello").day_of_week(), "Friday");
    assert_eq!(by_text("Hello").time_period(), TimePeriod::Morning);
}

#[test]
fn test_report_for_android_fixture() {
    let chat = parse(ANDROID_US);
    let report = chat.report();

    assert_eq!(report.encoding, Some(TextEncoding::Utf8));
    assert_eq!(report.total_lines, 10);
    assert_eq!(report.messages, 6);
    assert_eq!(report.system_filtered, 2);
    assert_eq!(report.continuation_lines, 1);
    assert_eq!(report.malformed_timestamps, 0);
}

#[test]
fn test_malformed_timestamp_does_not_fail_file() {
    let text = "\
8/1/25, 9:00 AM - John: Hello there
13/45/25, 9:01 AM - Jane: impossible date
8/1/25, 9:02 AM - Jane: fine again";
    let chat = parse(text);

    assert_eq!(chat.len(), 2);
    assert_eq!(chat.report().malformed_timestamps, 1);
}

// ============================================================================
// Encodings
// ============================================================================

#[test]
fn test_utf8_bom_file() {
    let dir = TempDir::new().unwrap();
    let mut bytes = b"\xEF\xBB\xBF".to_vec();
    bytes.extend_from_slice(ANDROID_US.as_bytes());
    let path = write_fixture(&dir, "bom.txt", &bytes);

    let chat = ChatParser::new().parse_file(&path).unwrap();
    assert_eq!(chat.len(), 6);
}

#[test]
fn test_latin1_file() {
    let dir = TempDir::new().unwrap();
    let mut bytes = b"15/01/2024, 10:30 - Jos\xE9: Ol\xE1, tudo bem?\n".to_vec();
    bytes.extend_from_slice(b"15/01/2024, 10:31 - Maria: Tudo \xF3timo!\n");
    let path = write_fixture(&dir, "latin1.txt", &bytes);

    let chat = ChatParser::new().parse_file(&path).unwrap();
    assert_eq!(chat.report().encoding, Some(TextEncoding::Latin1));
    assert_eq!(chat[0].sender(), "José");
    assert_eq!(chat[1].text(), "Tudo ótimo!");
}

#[test]
fn test_utf16_file_with_custom_candidates() {
    let dir = TempDir::new().unwrap();
    let mut bytes = vec![0xFF, 0xFE];
    for unit in "2024-01-15 10:30:00 - Alice: Hello from UTF-16\n".encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    let path = write_fixture(&dir, "utf16.txt", &bytes);

    let config = ParserConfig::new().with_encodings([TextEncoding::Utf16, TextEncoding::Utf8]);
    let chat = ChatParser::with_config(config).parse_file(&path).unwrap();

    assert_eq!(chat.report().encoding, Some(TextEncoding::Utf16));
    assert_eq!(chat[0].text(), "Hello from UTF-16");
}

// ============================================================================
// Fatal error distinction
// ============================================================================

#[test]
fn test_unrecognized_format_is_format_error() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(
        &dir,
        "notes.txt",
        b"Shopping list for the weekend:\n- apples and pears\n- something else entirely\n",
    );

    let err = ChatParser::new().parse_file(&path).unwrap_err();
    assert!(err.is_format_detection());
    assert!(!err.is_no_messages());
    assert_eq!(err.user_hint(), "unrecognized export format");
}

#[test]
fn test_empty_file_is_format_error() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "empty.txt", b"");
    let err = ChatParser::new().parse_file(&path).unwrap_err();
    assert!(err.is_format_detection());
}

#[test]
fn test_only_system_lines_is_no_messages() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(
        &dir,
        "system.txt",
        b"8/1/25, 9:00 AM - Messages and calls are end-to-end encrypted.\n8/1/25, 9:01 AM - Bob joined using this group's invite link\n",
    );

    let err = ChatParser::new().parse_file(&path).unwrap_err();
    assert!(err.is_no_messages());
    assert_eq!(err.user_hint(), "no messages found");
}

#[test]
fn test_undecodable_file_is_encoding_error() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "bad.txt", b"\xFF\xFE\xFD");

    let config = ParserConfig::new().with_encodings([TextEncoding::Utf8, TextEncoding::Utf8Sig]);
    let err = ChatParser::with_config(config).parse_file(&path).unwrap_err();
    assert!(err.is_encoding());
    assert!(err.user_hint().starts_with("file unreadable"));
}

#[test]
fn test_missing_file_is_io_error() {
    let err = ChatParser::new()
        .parse_file("/no/such/dir/chat.txt")
        .unwrap_err();
    assert!(err.is_io());
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_keep_system_messages() {
    let config = ParserConfig::new().with_skip_system_messages(false);
    let chat = ChatParser::with_config(config).parse_str(ANDROID_US).unwrap();

    assert_eq!(chat.len(), 8);
    assert_eq!(chat.report().system_filtered, 0);
}

#[test]
fn test_unmasked_phone_numbers() {
    let config = ParserConfig::new().with_mask_phone_numbers(false);
    let chat = ChatParser::with_config(config).parse_str(ANDROID_US).unwrap();
    assert!(chat.senders().contains(&"+1 555 123 4567"));
}

#[test]
fn test_parallel_and_serial_assembly_agree() {
    let serial = ChatParser::with_config(ParserConfig::new().with_parallel_threshold(usize::MAX))
        .parse_str(ANDROID_US)
        .unwrap();
    let parallel = ChatParser::with_config(ParserConfig::new().with_parallel_threshold(1))
        .parse_str(ANDROID_US)
        .unwrap();
    assert_eq!(serial.messages(), parallel.messages());
}

#[test]
fn test_shared_handle_across_threads() {
    let chat = parse(ANDROID_US);
    let shared = chat.shared();

    let counts: Vec<usize> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let messages = shared.clone();
                s.spawn(move || messages.iter().map(Message::word_count).sum::<usize>())
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(counts.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn test_parse_chat_convenience() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "chat.txt", ANDROID_US.as_bytes());
    let chat = chatlens::parse_chat(&path).unwrap();
    assert_eq!(chat.len(), 6);
}
