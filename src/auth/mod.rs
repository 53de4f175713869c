//! Credential handling for the payments client.
//!
//! Wraps the secret key in a redacting container and validates the
//! Stripe key-shape conventions before any client is constructed.

use secrecy::{ExposeSecret, SecretString};

use crate::errors::{PaymentsError, PaymentsResult};

/// Key prefixes accepted by the payments service.
const ACCEPTED_PREFIXES: [&str; 3] = ["sk_", "pk_", "rk_"];

/// Operating mode derived from the secret key body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyMode {
    /// Live-mode key (real money movement).
    Live,
    /// Test-mode key.
    Test,
}

/// A secret key for the payments service (stored securely).
pub struct SecretKey {
    inner: SecretString,
}

impl SecretKey {
    /// Creates a new secret key from a raw string.
    pub fn new(raw: impl Into<String>) -> Self {
        Self {
            inner: SecretString::new(raw.into()),
        }
    }

    /// Returns the raw key material.
    pub(crate) fn expose(&self) -> &str {
        self.inner.expose_secret()
    }

    /// Returns a hint of the key (last 4 characters) for diagnostics.
    pub fn key_hint(&self) -> String {
        let key = self.inner.expose_secret();
        // Counted in chars, not bytes: env-supplied keys are arbitrary
        // strings and a byte slice could split a multibyte character.
        let char_count = key.chars().count();
        if char_count > 4 {
            let tail: String = key.chars().skip(char_count - 4).collect();
            format!("...{}", tail)
        } else {
            "****".to_string()
        }
    }

    /// Returns the operating mode implied by the key body.
    ///
    /// Keys follow the `sk_test_...` / `sk_live_...` convention; anything
    /// without an explicit `test` segment is treated as live.
    pub fn mode(&self) -> KeyMode {
        let key = self.inner.expose_secret();
        match key.split('_').nth(1) {
            Some("test") => KeyMode::Test,
            _ => KeyMode::Live,
        }
    }

    /// Validates the key shape.
    ///
    /// The service rejects keys that do not carry a recognized prefix;
    /// catching the malformed shape here surfaces the problem before any
    /// request is issued.
    pub fn validate(&self) -> PaymentsResult<()> {
        let key = self.inner.expose_secret();

        if key.is_empty() {
            return Err(PaymentsError::credential("secret key is empty", None));
        }

        if !ACCEPTED_PREFIXES.iter().any(|p| key.starts_with(p)) {
            return Err(PaymentsError::credential(
                "secret key does not match an accepted format (sk_*, pk_*, rk_*)",
                Some(self.key_hint()),
            ));
        }

        Ok(())
    }
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretKey")
            .field("key", &"[REDACTED]")
            .field("key_hint", &self.key_hint())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_secret_key() {
        assert!(SecretKey::new("sk_test_12345").validate().is_ok());
    }

    #[test]
    fn test_validate_accepts_publishable_key() {
        assert!(SecretKey::new("pk_live_abc").validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_key() {
        assert!(SecretKey::new("").validate().is_err());
    }

    #[test]
    fn test_validate_rejects_malformed_key() {
        let result = SecretKey::new("not-a-key").validate();
        assert!(matches!(
            result,
            Err(PaymentsError::Credential { key_hint: Some(_), .. })
        ));
    }

    #[test]
    fn test_mode_test_key() {
        assert_eq!(SecretKey::new("sk_test_12345").mode(), KeyMode::Test);
    }

    #[test]
    fn test_mode_live_key() {
        assert_eq!(SecretKey::new("pk_live_abc").mode(), KeyMode::Live);
    }

    #[test]
    fn test_key_hint() {
        assert_eq!(SecretKey::new("sk_test_12345").key_hint(), "...2345");
    }

    #[test]
    fn test_key_hint_short_key() {
        assert_eq!(SecretKey::new("abc").key_hint(), "****");
    }

    #[test]
    fn test_key_hint_multibyte_key() {
        assert_eq!(SecretKey::new("sk_test_日本語").key_hint(), "..._日本語");
    }

    #[test]
    fn test_debug_redacts_key() {
        let debug_str = format!("{:?}", SecretKey::new("sk_test_secret_12345"));
        assert!(debug_str.contains("[REDACTED]"));
        assert!(!debug_str.contains("secret"));
    }
}
