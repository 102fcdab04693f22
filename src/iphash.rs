//! One-way hashing of client addresses.
//!
//! RSVP rows keep a coarse fingerprint of the submitting address for abuse
//! and duplicate spotting, never the raw address. The digest is SHA-256 over
//! the address plus a fixed salt, truncated to its first 8 bytes and rendered
//! as lowercase hex. Within one deployment the same address always hashes to
//! the same 16 characters; the truncation keeps it useless for reversal.

use sha2::{Digest, Sha256};

/// Fixed salt appended to the address before hashing. Embedded in the binary,
/// not rotated.
const IP_HASH_SALT: &str = "wedding-salt";

/// Number of digest bytes kept (16 hex characters).
const DIGEST_BYTES: usize = 8;

/// Computes the truncated salted digest of a client address.
///
/// Callers skip this entirely when no address header is present; there is no
/// "unknown address" digest.
pub fn hash_ip(addr: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(addr.as_bytes());
    hasher.update(IP_HASH_SALT.as_bytes());
    let digest = hasher.finalize();
    hex::encode(&digest[..DIGEST_BYTES])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_16_lowercase_hex_chars() {
        let digest = hash_ip("203.0.113.7");
        assert_eq!(digest.len(), 16);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn same_address_same_digest() {
        assert_eq!(hash_ip("203.0.113.7"), hash_ip("203.0.113.7"));
    }

    #[test]
    fn different_addresses_diverge() {
        assert_ne!(hash_ip("203.0.113.7"), hash_ip("203.0.113.8"));
    }
}
