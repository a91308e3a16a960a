//! Per-entity attribute cache

use std::collections::HashMap;

use super::Value;

/// Token → value snapshot computed by an exporter.
///
/// Owns copies of everything it holds; nothing here points back into host
/// memory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeCache {
    values: HashMap<&'static str, Value>,
}

impl AttributeCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `token`, replacing any previous value
    pub fn set(&mut self, token: &'static str, value: impl Into<Value>) {
        self.values.insert(token, value.into());
    }

    /// Builder form of [`set`](Self::set)
    #[must_use]
    pub fn with(mut self, token: &'static str, value: impl Into<Value>) -> Self {
        self.set(token, value);
        self
    }

    /// Value stored under `token`
    pub fn get(&self, token: &str) -> Option<&Value> {
        self.values.get(token)
    }

    /// Whether `token` is present
    pub fn contains(&self, token: &str) -> bool {
        self.values.contains_key(token)
    }

    /// Remove and return the value under `token`
    pub fn remove(&mut self, token: &str) -> Option<Value> {
        self.values.remove(token)
    }

    /// Number of stored attributes
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the cache is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over `(token, value)` pairs in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        self.values.iter().map(|(token, value)| (*token, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::tokens;

    #[test]
    fn test_missing_token_is_none() {
        let cache = AttributeCache::new().with(tokens::RADIUS, 0.5_f32);
        assert_eq!(cache.get(tokens::RADIUS), Some(&Value::Float(0.5)));
        assert_eq!(cache.get(tokens::WIDTH), None);
        assert_eq!(cache.get("not-a-token"), None);
    }

    #[test]
    fn test_set_replaces() {
        let mut cache = AttributeCache::new();
        cache.set(tokens::INTENSITY, 1.0_f32);
        cache.set(tokens::INTENSITY, 2.0_f32);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(tokens::INTENSITY).and_then(Value::as_float), Some(2.0));
    }
}
