//! Opaque refresh token generation.

use rand::RngCore;
use rand::rngs::OsRng;

/// Number of random bytes in a refresh token.
const REFRESH_TOKEN_BYTES: usize = 32;

/// Generates an opaque refresh token: 32 random bytes, hex-encoded.
///
/// Refresh tokens carry no claims. They are only meaningful as cache
/// keys mapping back to a user ID.
pub fn generate_refresh_token() -> String {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_is_64_hex_chars() {
        let token = generate_refresh_token();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_tokens_are_unique() {
        let a = generate_refresh_token();
        let b = generate_refresh_token();
        assert_ne!(a, b);
    }
}
