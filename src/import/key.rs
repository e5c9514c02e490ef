//! Key grammar, prefix sanitizing and key derivation.
//!
//! The EasyKey server accepts keys matching `[A-Za-z0-9_]+` and rejects
//! anything else. Keys are derived from an optional session prefix and a
//! per-session counter:
//!
//! - with a prefix: `{prefix}__{counter}` (e.g. `9f1c_..._e2__3`)
//! - without one:   `file_{counter}`
//!
//! The counter is all digits, so a prefixed key splits uniquely at its last
//! `__`, and `file_{n}` never contains `__`. Distinct prefixes therefore
//! never produce the same key.

use std::fmt;

use crate::error::{Error, Result};

/// Separator between a session prefix and the unit counter.
pub const PREFIX_SEPARATOR: &str = "__";

/// Stem used for keys when no prefix is in effect.
pub const UNPREFIXED_STEM: &str = "file";

/// Replacement for characters outside the key grammar.
const REPLACEMENT: char = '_';

/// Whether `c` is allowed inside an EasyKey key.
#[inline]
#[must_use]
pub fn is_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Whether `key` satisfies the store's key grammar (non-empty, `[A-Za-z0-9_]`).
#[must_use]
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty() && key.chars().all(is_key_char)
}

/// A session prefix that is guaranteed to satisfy the key grammar.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyPrefix(String);

impl KeyPrefix {
    /// Sanitize `raw` into a prefix.
    ///
    /// Every character outside `[A-Za-z0-9_]` is replaced with `_`, so a
    /// UUID like `1b4e28ba-2fa1-...` becomes `1b4e28ba_2fa1_...`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPrefix` if `raw` is empty or whitespace only.
    pub fn sanitize(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidPrefix {
                prefix: raw.to_string(),
                reason: "prefix must not be empty".to_string(),
            });
        }

        let sanitized: String = trimmed
            .chars()
            .map(|c| if is_key_char(c) { c } else { REPLACEMENT })
            .collect();

        if sanitized != trimmed {
            tracing::debug!(raw = trimmed, sanitized = %sanitized, "Sanitized key prefix");
        }

        Ok(Self(sanitized))
    }

    /// Generate a random prefix from a v4 UUID.
    #[must_use]
    pub fn random() -> Self {
        let id = uuid::Uuid::new_v4().to_string();
        Self(id.replace('-', "_"))
    }

    /// The sanitized prefix.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for KeyPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derive the key for the `counter`-th unit of a session.
#[must_use]
pub fn derive_key(prefix: Option<&KeyPrefix>, counter: u64) -> String {
    match prefix {
        Some(prefix) => format!("{prefix}{PREFIX_SEPARATOR}{counter}"),
        None => format!("{UNPREFIXED_STEM}_{counter}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_is_valid_key() {
        assert!(is_valid_key("file_1"));
        assert!(is_valid_key("ABC__12"));
        assert!(!is_valid_key(""));
        assert!(!is_valid_key("a-b"));
        assert!(!is_valid_key("a b"));
        assert!(!is_valid_key("naïve"));
    }

    #[test]
    fn test_sanitize_replaces_hyphens() {
        let prefix = KeyPrefix::sanitize("1b4e28ba-2fa1-11d2-883f").unwrap();
        assert_eq!(prefix.as_str(), "1b4e28ba_2fa1_11d2_883f");
    }

    #[test]
    fn test_sanitize_replaces_every_disallowed_char() {
        let prefix = KeyPrefix::sanitize("my.import/2024 run-é").unwrap();
        assert!(is_valid_key(prefix.as_str()));
        assert!(!prefix.as_str().contains('-'));
        assert!(!prefix.as_str().contains('.'));
        assert!(!prefix.as_str().contains(' '));
    }

    #[test]
    fn test_sanitize_rejects_empty() {
        assert!(matches!(
            KeyPrefix::sanitize("   "),
            Err(Error::InvalidPrefix { .. })
        ));
    }

    #[test]
    fn test_random_prefix_is_valid() {
        let prefix = KeyPrefix::random();
        assert!(is_valid_key(prefix.as_str()));
        assert_eq!(prefix.as_str().len(), 36);
        assert_ne!(prefix, KeyPrefix::random());
    }

    #[test]
    fn test_derive_key_formats() {
        assert_eq!(derive_key(None, 1), "file_1");
        let prefix = KeyPrefix::sanitize("batch-a").unwrap();
        assert_eq!(derive_key(Some(&prefix), 12), "batch_a__12");
    }

    #[test]
    fn test_keys_do_not_collide_across_prefixes() {
        let prefixes: Vec<Option<KeyPrefix>> = vec![
            None,
            Some(KeyPrefix::sanitize("a").unwrap()),
            Some(KeyPrefix::sanitize("a_").unwrap()),
            Some(KeyPrefix::sanitize("a__1").unwrap()),
            Some(KeyPrefix::sanitize("file").unwrap()),
        ];

        let mut seen = HashSet::new();
        for prefix in &prefixes {
            for counter in 1..=30 {
                let key = derive_key(prefix.as_ref(), counter);
                assert!(is_valid_key(&key), "invalid key {key}");
                assert!(seen.insert(key.clone()), "duplicate key {key}");
            }
        }
    }
}
