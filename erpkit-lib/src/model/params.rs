//! Auxiliary filter parameters for list endpoints.

use std::collections::BTreeMap;

/// Query parameters narrowing a list endpoint, e.g. `category=tools`.
///
/// Ordered so equality and the generated query string are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterParams(BTreeMap<String, String>);

impl FilterParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert a parameter. Empty values remove the key, so an unset filter
    /// and a blank one compare equal.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        if value.is_empty() {
            self.0.remove(&key);
        } else {
            self.0.insert(key, value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Parse `key=value` pairs, as given on the command line.
    pub fn parse_pairs<'a>(pairs: impl IntoIterator<Item = &'a str>) -> Option<Self> {
        let mut params = Self::new();
        for pair in pairs {
            let (key, value) = pair.split_once('=')?;
            params.insert(key.trim(), value.trim());
        }
        Some(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_value_removes_key() {
        let params = FilterParams::new().with("category", "tools").with("category", "");
        assert!(params.is_empty());
        assert_eq!(params, FilterParams::new());
    }

    #[test]
    fn test_parse_pairs() {
        let params = FilterParams::parse_pairs(["category=tools", "type = raw"]).unwrap();
        assert_eq!(params.get("category"), Some("tools"));
        assert_eq!(params.get("type"), Some("raw"));
        assert!(FilterParams::parse_pairs(["broken"]).is_none());
    }
}
