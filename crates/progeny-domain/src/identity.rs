//! Identity keys used to recognise the same politician across records

use serde::{Deserialize, Serialize};

/// Separator between key components
pub const KEY_SEPARATOR: char = '|';

/// Deterministic identity of a politician
///
/// Built from the lower-cased, whitespace-collapsed name, optionally salted
/// with further components (state, session) when the caller asks for
/// disambiguation. Two records with equal keys are treated as the same
/// person by the deduplicator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityKey(String);

impl IdentityKey {
    /// Build a key from a name alone
    ///
    /// Returns `None` when the name is empty after trimming.
    ///
    /// # Examples
    ///
    /// ```
    /// use progeny_domain::IdentityKey;
    ///
    /// let a = IdentityKey::from_name("  Asha   DEVI ").unwrap();
    /// let b = IdentityKey::from_name("asha devi").unwrap();
    /// assert_eq!(a, b);
    /// assert!(IdentityKey::from_name("   ").is_none());
    /// ```
    pub fn from_name(name: &str) -> Option<Self> {
        Self::salted(name, &[])
    }

    /// Build a key from a name plus salt components
    ///
    /// Missing salts are kept as empty components so that "no state" never
    /// collides with a real state label.
    pub fn salted(name: &str, salts: &[Option<&str>]) -> Option<Self> {
        let name = normalize_component(name);
        if name.is_empty() {
            return None;
        }

        let mut key = name;
        for salt in salts {
            key.push(KEY_SEPARATOR);
            if let Some(salt) = salt {
                key.push_str(&normalize_component(salt));
            }
        }
        Some(Self(key))
    }

    /// Get the key as a string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The name component of the key
    pub fn name_part(&self) -> &str {
        self.0.split(KEY_SEPARATOR).next().unwrap_or_default()
    }
}

impl std::fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lower-case and collapse all whitespace runs to single spaces
fn normalize_component(s: &str) -> String {
    s.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_and_case_collapse() {
        let key = IdentityKey::from_name("Shri  Rahul\tKUMAR\n").unwrap();
        assert_eq!(key.as_str(), "shri rahul kumar");
    }

    #[test]
    fn test_empty_name() {
        assert!(IdentityKey::from_name("").is_none());
        assert!(IdentityKey::salted(" \t ", &[Some("Kerala")]).is_none());
    }

    #[test]
    fn test_salted_keys_separate_namesakes() {
        let kerala = IdentityKey::salted("Suresh", &[Some("Kerala")]).unwrap();
        let bihar = IdentityKey::salted("Suresh", &[Some("Bihar")]).unwrap();
        let unknown = IdentityKey::salted("Suresh", &[None]).unwrap();

        assert_ne!(kerala, bihar);
        assert_ne!(kerala, unknown);
        assert_eq!(kerala.as_str(), "suresh|kerala");
        assert_eq!(unknown.as_str(), "suresh|");
        assert_eq!(kerala.name_part(), "suresh");
    }
}
