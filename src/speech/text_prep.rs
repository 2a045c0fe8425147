//! Text preparation for speech: markdown cleaning and chunking.
//!
//! Pure functions, no I/O.

use once_cell::sync::Lazy;
use regex::Regex;

static RE_FENCED_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)```.*?```").unwrap());
static RE_INLINE_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`([^`]+)`").unwrap());
static RE_HR: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\s*[-*_]{3,}\s*$").unwrap());
static RE_BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*([^*]+)\*\*").unwrap());
static RE_ITALIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*([^*\n]+)\*").unwrap());
static RE_HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\s*#{1,6}\s*").unwrap());
static RE_LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\]]+)\]\([^)]+\)").unwrap());
static RE_BULLET: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\s*[-*+]\s+").unwrap());
static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Longest chunk the speech backend accepts in one request, in characters.
pub const MAX_CHUNK_CHARS: usize = 100;

/// Strips markdown formatting so the explanation reads naturally when spoken.
///
/// Math and inline code keep their content; fenced code blocks are dropped.
pub fn clean_for_speech(text: &str) -> String {
    let mut c = RE_FENCED_CODE.replace_all(text, " ").into_owned();
    c = RE_INLINE_CODE.replace_all(&c, "$1").into_owned();
    c = RE_HR.replace_all(&c, "").into_owned();
    c = RE_BOLD.replace_all(&c, "$1").into_owned();
    c = RE_ITALIC.replace_all(&c, "$1").into_owned();
    c = RE_HEADING.replace_all(&c, "").into_owned();
    c = RE_LINK.replace_all(&c, "$1").into_owned();
    c = RE_BULLET.replace_all(&c, "").into_owned();
    c = RE_WHITESPACE.replace_all(&c, " ").into_owned();
    c.trim().to_string()
}

/// Splits text into chunks of at most `max_chars` characters.
///
/// Prefers a sentence end (`.`, `!`, `?`, `:`, `;`) in the back half of the
/// window, then the last space, then a hard split. Counts characters, not
/// bytes, so diacritics are never cut in half.
pub fn split_chunks(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut remaining = text.trim();

    while remaining.chars().count() > max_chars {
        let window_end = byte_offset(remaining, max_chars);
        let window = &remaining[..window_end];
        let split_at = sentence_boundary(window, max_chars)
            .or_else(|| word_boundary(window))
            .unwrap_or(window_end);

        let chunk = remaining[..split_at].trim();
        if !chunk.is_empty() {
            chunks.push(chunk.to_string());
        }
        remaining = remaining[split_at..].trim_start();
    }

    if !remaining.is_empty() {
        chunks.push(remaining.to_string());
    }
    chunks
}

/// Byte offset of the `n`th character of `s`.
fn byte_offset(s: &str, n: usize) -> usize {
    s.char_indices().nth(n).map(|(i, _)| i).unwrap_or(s.len())
}

/// Position just after the last sentence end that leaves at least half a
/// window of text in the chunk.
fn sentence_boundary(window: &str, max_chars: usize) -> Option<usize> {
    window
        .char_indices()
        .enumerate()
        .filter(|&(n, (_, ch))| {
            n + 1 >= max_chars / 2 && matches!(ch, '.' | '!' | '?' | ':' | ';')
        })
        .last()
        .map(|(_, (i, ch))| i + ch.len_utf8())
}

fn word_boundary(window: &str) -> Option<usize> {
    window.rfind(' ').filter(|&i| i > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_markdown_emphasis_and_headings() {
        let input = "## Pasul 1\n**Adună** cifrele *unităților*.\n- apoi zecile";
        assert_eq!(clean_for_speech(input), "Pasul 1 Adună cifrele unităților. apoi zecile");
    }

    #[test]
    fn drops_fenced_code_and_keeps_links_text() {
        let input = "Vezi [aici](https://example.com).\n```\nx = 1\n```\nGata.";
        assert_eq!(clean_for_speech(input), "Vezi aici. Gata.");
    }

    #[test]
    fn short_text_is_one_chunk() {
        assert_eq!(split_chunks("Salut!", 100), vec!["Salut!"]);
    }

    #[test]
    fn empty_text_has_no_chunks() {
        assert!(split_chunks("   ", 100).is_empty());
    }

    #[test]
    fn prefers_sentence_ends() {
        let text = "Primul pas este simplu. Al doilea pas cere atenție la detalii.";
        let chunks = split_chunks(text, 40);
        assert_eq!(chunks[0], "Primul pas este simplu.");
        assert!(chunks.iter().all(|c| c.chars().count() <= 40), "{chunks:?}");
    }

    #[test]
    fn falls_back_to_word_boundaries() {
        let text = "unu doi trei patru cinci șase șapte opt nouă zece";
        let chunks = split_chunks(text, 12);
        assert!(chunks.iter().all(|c| c.chars().count() <= 12), "{chunks:?}");
        assert_eq!(chunks.join(" "), text);
    }

    #[test]
    fn hard_splits_long_words_on_char_boundaries() {
        let text = "ăâîșț".repeat(5);
        let chunks = split_chunks(&text, 7);
        assert!(chunks.iter().all(|c| c.chars().count() <= 7), "{chunks:?}");
        assert_eq!(chunks.concat(), text);
    }
}
