//! Content fingerprints for duplicate suppression.
//!
//! The hash is an equality fingerprint, not a security boundary. The store
//! compares it against rows inside the dedup window
//! (see [`crate::Database::is_recent_duplicate`]).

use sha2::{Digest, Sha256};

const SEPARATOR: &str = "||";

/// SHA-256 of `event_type || "||" || details`, lowercase hex.
pub fn event_hash(event_type: &str, details: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(event_type.as_bytes());
    hasher.update(SEPARATOR.as_bytes());
    hasher.update(details.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_stable_hex() {
        let a = event_hash("file_access", "/tmp/a.txt");
        let b = event_hash("file_access", "/tmp/a.txt");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_hash_is_order_sensitive() {
        assert_ne!(event_hash("ls", "bash_command"), event_hash("bash_command", "ls"));
        assert_ne!(event_hash("file_access", "x"), event_hash("bash_command", "x"));
    }

    #[test]
    fn test_known_digest() {
        assert_eq!(
            event_hash("bash_command", "ls"),
            "757a364b356f12fdadadc34bc888fb2d4f9d4d29cb546c20d34432d63e0ee690"
        );
    }
}
