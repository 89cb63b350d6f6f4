use alloc::string::String;
use core::fmt;
use core::fmt::Display;

/// A stored key/value record.
///
/// Keeps the caller's original key next to its canonical token, so the token
/// is computed once on insertion and reused for every comparison and rehash.
/// The key is immutable once stored; only the value may change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValuePair<K, V> {
    key: K,
    token: String,
    value: V,
}

impl<K, V> ValuePair<K, V> {
    pub(crate) fn new(key: K, token: String, value: V) -> Self {
        Self { key, token, value }
    }

    /// The key as originally passed to `put`.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// The canonical token of the key.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// The stored value.
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Mutable access to the stored value.
    pub fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }

    /// Replaces the value, returning the previous one.
    pub(crate) fn replace_value(&mut self, value: V) -> V {
        core::mem::replace(&mut self.value, value)
    }

    pub(crate) fn matches(&self, token: &str) -> bool {
        self.token == token
    }

    /// Splits the record into its key and value.
    pub fn into_parts(self) -> (K, V) {
        (self.key, self.value)
    }
}

/// Renders as `[#key: value]` with the key as passed to `put`, which may
/// differ from its token under a custom canonicalizer.
impl<K: Display, V: Display> Display for ValuePair<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[#{}: {}]", self.key, self.value)
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn display_uses_original_key() {
        let pair = ValuePair::new("Arya", "arya".to_string(), 49);
        assert_eq!(pair.to_string(), "[#Arya: 49]");
        assert_eq!(pair.token(), "arya");
    }

    #[test]
    fn replace_keeps_key() {
        let mut pair = ValuePair::new("Jamie", "Jamie".to_string(), 5);
        assert_eq!(pair.replace_value(6), 5);
        *pair.value_mut() += 1;
        assert!(pair.matches("Jamie"));
        assert_eq!(pair.into_parts(), ("Jamie", 7));
    }
}
