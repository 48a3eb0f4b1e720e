use sha2::Digest;
use sha2::Sha256;

/// Compute the hex-encoded SHA-256 fingerprint of a raw token.
///
/// Refresh tokens and revocation entries are stored keyed by this digest so
/// the raw bearer secret never reaches the database. The function is pure
/// and deterministic: the same token always yields the same fingerprint.
pub fn fingerprint(raw_token: &str) -> String {
    hex::encode(Sha256::digest(raw_token.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_is_deterministic() {
        assert_eq!(fingerprint("some-token"), fingerprint("some-token"));
    }

    #[test]
    fn test_fingerprint_distinguishes_tokens() {
        assert_ne!(fingerprint("token-a"), fingerprint("token-b"));
    }

    #[test]
    fn test_fingerprint_is_hex_sha256() {
        let digest = fingerprint("");
        // SHA-256 of the empty string, hex-encoded
        assert_eq!(
            digest,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(digest.len(), 64);
    }
}
