//! Configuration options for properties conversion.
//!
//! [`PropertiesOptions`] applies to both directions:
//!
//! - `root` nests everything under a key prefix: encoding writes `root.key`,
//!   decoding only reads entries under `root.`
//! - `sort_keys` renders encoded lines ordered by key
//! - `comment` is the marker that starts a comment line when scanning
//!
//! ## Examples
//!
//! ```rust
//! use serde_properties::{to_string_with_options, PropertiesOptions};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Db { host: String, port: u16 }
//!
//! let db = Db { host: "localhost".to_string(), port: 5432 };
//! let options = PropertiesOptions::new().with_root("db");
//! let text = to_string_with_options(&db, options).unwrap();
//! assert_eq!(text, "db.host=localhost\ndb.port=5432\n");
//! ```

/// Configuration options for properties conversion.
///
/// # Examples
///
/// ```rust
/// use serde_properties::PropertiesOptions;
///
/// let options = PropertiesOptions::new()
///     .with_root("app")
///     .with_sorted_keys()
///     .with_comment('!');
/// assert_eq!(options.root.as_deref(), Some("app"));
/// assert!(options.sort_keys);
/// assert_eq!(options.comment, '!');
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct PropertiesOptions {
    pub root: Option<String>,
    pub sort_keys: bool,
    pub comment: char,
}

impl Default for PropertiesOptions {
    fn default() -> Self {
        PropertiesOptions {
            root: None,
            sort_keys: false,
            comment: '#',
        }
    }
}

impl PropertiesOptions {
    /// Creates default options (no root, traversal order, `#` comments).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_properties::PropertiesOptions;
    ///
    /// let options = PropertiesOptions::new();
    /// assert!(options.root.is_none());
    /// assert!(!options.sort_keys);
    /// assert_eq!(options.comment, '#');
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Nests the document under `root`.
    ///
    /// An empty root is the same as no root.
    #[must_use]
    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        let root = root.into();
        self.root = if root.is_empty() { None } else { Some(root) };
        self
    }

    /// Renders encoded lines ordered by key instead of traversal order.
    ///
    /// Useful when the source holds hash maps, whose iteration order is
    /// unspecified.
    #[must_use]
    pub fn with_sorted_keys(mut self) -> Self {
        self.sort_keys = true;
        self
    }

    /// Sets the comment marker recognised by the line scanner.
    #[must_use]
    pub fn with_comment(mut self, marker: char) -> Self {
        self.comment = marker;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_root_is_none() {
        let options = PropertiesOptions::new().with_root("");
        assert_eq!(options.root, None);
    }
}
