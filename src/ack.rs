//! Acknowledgment Construction and Verification
//!
//! Both roles derive a deterministic token from message content: the
//! primary to know what ack text to expect back from a secondary, the
//! secondary to build that text after appending. The exact hash scheme is
//! not part of the wire contract; only determinism within a run matters.

/// Ack text prefix shared by all nodes
pub const ACK_PREFIX: &str = "Message received: ";

/// Compute the deterministic content hash used in acknowledgments
pub fn content_hash(content: &str) -> u32 {
    crc32fast::hash(content.as_bytes())
}

/// Construct the acknowledgment text for a message
pub fn build_ack(content: &str) -> String {
    format!("{}{}", ACK_PREFIX, content_hash(content))
}

/// Check whether a reply acknowledges the given content.
///
/// Substring containment rather than equality: transport replies may carry
/// surrounding framing text around the ack.
pub fn verify_ack(content: &str, reply: &str) -> bool {
    reply.contains(&build_ack(content))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_deterministic() {
        assert_eq!(content_hash("hello"), content_hash("hello"));
        assert_ne!(content_hash("hello"), content_hash("world"));
    }

    #[test]
    fn test_build_ack_format() {
        let ack = build_ack("hello");
        assert!(ack.starts_with("Message received: "));
        assert_eq!(ack, format!("Message received: {}", content_hash("hello")));
    }

    #[test]
    fn test_verify_ack_exact() {
        assert!(verify_ack("hello", &build_ack("hello")));
        assert!(!verify_ack("hello", &build_ack("world")));
    }

    #[test]
    fn test_verify_ack_with_framing() {
        let reply = format!("HTTP/1.1 200 OK\r\n\r\n{}\n", build_ack("hello"));
        assert!(verify_ack("hello", &reply));
    }

    #[test]
    fn test_verify_ack_rejects_garbage() {
        assert!(!verify_ack("hello", ""));
        assert!(!verify_ack("hello", "connection refused"));
    }
}
