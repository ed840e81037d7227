//! The flat key/value mapping.
//!
//! [`Properties`] is what a `.properties` file looks like once comments and
//! blank lines are gone: a set of unique string keys, each holding a string
//! value. It is the encoder's output and the decoder's input.
//!
//! ## Why IndexMap?
//!
//! Decoding never depends on entry order, but encoding does: entries are
//! inserted in traversal order, and an [`IndexMap`] keeps that order when the
//! mapping is rendered back to text.
//!
//! ## Examples
//!
//! ```rust
//! use serde_properties::Properties;
//!
//! let mut props = Properties::new();
//! props.insert("server.host".to_string(), "localhost".to_string());
//! props.insert("server.port".to_string(), "8080".to_string());
//!
//! assert_eq!(props.len(), 2);
//! assert_eq!(props.get("server.port"), Some("8080"));
//! assert_eq!(props.to_string(), "server.host=localhost\nserver.port=8080\n");
//! ```

use indexmap::IndexMap;
use std::collections::HashMap;
use std::fmt;

/// An insertion-ordered map of string keys to string values.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Properties(IndexMap<String, String>);

impl Properties {
    /// Creates an empty `Properties`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_properties::Properties;
    ///
    /// let props = Properties::new();
    /// assert!(props.is_empty());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Properties(IndexMap::new())
    }

    /// Creates an empty `Properties` with the specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Properties(IndexMap::with_capacity(capacity))
    }

    /// Inserts a key-value pair, returning the previous value for the key.
    ///
    /// A replaced key keeps its original position.
    pub fn insert(&mut self, key: String, value: String) -> Option<String> {
        self.0.insert(key, value)
    }

    /// Returns the value stored under exactly this key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Returns `true` if the key is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the keys, in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Returns an iterator over the values, in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.0.values().map(String::as_str)
    }

    /// Returns an iterator over the entries, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns a copy with entries ordered by key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_properties::properties;
    ///
    /// let props = properties! { "b" => "2", "a" => "1" };
    /// let keys: Vec<_> = props.sorted().keys().map(str::to_string).collect();
    /// assert_eq!(keys, vec!["a", "b"]);
    /// ```
    #[must_use]
    pub fn sorted(&self) -> Self {
        let mut inner = self.0.clone();
        inner.sort_keys();
        Properties(inner)
    }

    /// Returns the entries that live under `root.`, with that prefix removed.
    ///
    /// An entry whose key is exactly `root` is not part of the sub-document.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_properties::properties;
    ///
    /// let props = properties! { "db.host" => "h", "db" => "x", "port" => "1" };
    /// let db = props.restrict("db");
    /// assert_eq!(db, properties! { "host" => "h" });
    /// ```
    #[must_use]
    pub fn restrict(&self, root: &str) -> Self {
        let prefix = format!("{}.", root);
        self.iter()
            .filter_map(|(k, v)| {
                k.strip_prefix(prefix.as_str())
                    .map(|rest| (rest.to_string(), v.to_string()))
            })
            .collect()
    }

    /// Returns a copy with every key moved under `root.`.
    #[must_use]
    pub fn nest(&self, root: &str) -> Self {
        self.iter()
            .map(|(k, v)| (format!("{}.{}", root, k), v.to_string()))
            .collect()
    }
}

/// Renders one `key=value` line per entry, each terminated by `\n`.
impl fmt::Display for Properties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in self.iter() {
            writeln!(f, "{}={}", key, value)?;
        }
        Ok(())
    }
}

impl From<HashMap<String, String>> for Properties {
    fn from(map: HashMap<String, String>) -> Self {
        Properties(map.into_iter().collect())
    }
}

impl From<Properties> for HashMap<String, String> {
    fn from(props: Properties) -> Self {
        props.0.into_iter().collect()
    }
}

impl IntoIterator for Properties {
    type Item = (String, String);
    type IntoIter = indexmap::map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl FromIterator<(String, String)> for Properties {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Properties(IndexMap::from_iter(iter))
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for Properties {
    fn from_iter<T: IntoIterator<Item = (&'a str, &'a str)>>(iter: T) -> Self {
        iter.into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_position() {
        let mut props = Properties::new();
        props.insert("a".to_string(), "1".to_string());
        props.insert("b".to_string(), "2".to_string());
        assert_eq!(props.insert("a".to_string(), "3".to_string()), Some("1".to_string()));

        let entries: Vec<_> = props.iter().collect();
        assert_eq!(entries, vec![("a", "3"), ("b", "2")]);
    }

    #[test]
    fn test_restrict_and_nest() {
        let props: Properties = vec![("a.a", "hello"), ("a.b", "1"), ("a", "bye"), ("b", "2")]
            .into_iter()
            .collect();

        let sub = props.restrict("a");
        let entries: Vec<_> = sub.iter().collect();
        assert_eq!(entries, vec![("a", "hello"), ("b", "1")]);

        let back = sub.nest("a");
        assert_eq!(back.get("a.a"), Some("hello"));
        assert_eq!(back.get("a.b"), Some("1"));
        assert_eq!(back.len(), 2);
    }

    #[test]
    fn test_display() {
        let props: Properties = vec![("x", "1"), ("y", "a=b")].into_iter().collect();
        assert_eq!(props.to_string(), "x=1\ny=a=b\n");
        assert_eq!(Properties::new().to_string(), "");
    }

    #[test]
    fn test_hashmap_conversions() {
        let mut map = HashMap::new();
        map.insert("k".to_string(), "v".to_string());
        let props = Properties::from(map.clone());
        assert_eq!(props.get("k"), Some("v"));
        assert_eq!(HashMap::from(props), map);
    }
}
