//! Wire Prefix Codec
//!
//! Both directions of the replication protocol use the same bracket-prefixed
//! text format `"[n]content"`. Client-to-primary, `n` is the requested write
//! concern; primary-to-secondary, `n` is the assigned message id. The parse
//! is permissive by design: malformed prefixes fall back to defaults and are
//! never surfaced as errors.

/// Decode `"[n]content"` into its leading number and content.
///
/// - empty input -> `(0, "")`
/// - no leading `'['` -> `(0, input)`; 0 means "unspecified" to the caller
/// - `"[n]rest"` -> `(n, rest)`; a non-numeric or empty bracket parses as 0
/// - `'['` with no closing `']'` -> `(1, input)` with the brackets kept
///   as part of the content
pub fn decode(text: &str) -> (u64, &str) {
    if text.is_empty() {
        return (0, "");
    }

    if !text.starts_with('[') {
        // no prefix at all
        return (0, text);
    }

    match text.find(']') {
        Some(close) => {
            let number = text[1..close].parse::<u64>().unwrap_or_else(|_| {
                tracing::warn!(prefix = &text[1..close], "Unparseable wire prefix, defaulting to 0");
                0
            });
            (number, &text[close + 1..])
        }
        None => {
            tracing::warn!("Unterminated wire prefix, passing text through as content");
            (1, text)
        }
    }
}

/// Encode an id and content as `"[id]content"`.
///
/// Used by the primary when forwarding an entry to a secondary.
pub fn encode(id: u64, content: &str) -> String {
    format!("[{}]{}", id, content)
}
