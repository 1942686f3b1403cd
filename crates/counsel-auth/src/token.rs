//! Session identifier generation.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use counsel_core::models::session::SessionId;

/// Generate a cryptographically random session identifier
/// (32 bytes → base64url-encoded, no padding).
pub fn generate_session_id() -> SessionId {
    let mut rng = rand::rng();
    let bytes: [u8; 32] = rand::Rng::random(&mut rng);
    SessionId::new(URL_SAFE_NO_PAD.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_id_is_url_safe() {
        let id = generate_session_id();
        assert!(
            id.as_str()
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
        // 32 bytes → 43 base64url chars.
        assert_eq!(id.as_str().len(), 43);
    }

    #[test]
    fn session_ids_are_unique() {
        assert_ne!(generate_session_id(), generate_session_id());
    }
}
