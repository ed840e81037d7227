//! Error types for properties serialization and deserialization.
//!
//! Every error is built at the call site that detected it and, where a key
//! path is involved, carries that path so a failure deep inside a nested
//! document points at the offending line of the file.
//!
//! ## Error Categories
//!
//! - **Shape errors**: the top-level value is not something that maps onto a
//!   flat key space ([`Error::InvalidTarget`], [`Error::InvalidSource`])
//! - **Input errors**: a line of text is not a `key=value` pair
//!   ([`Error::MalformedInput`]) or the bytes are not UTF-8
//! - **Type errors**: a shape the traversal cannot express
//!   ([`Error::UnsupportedType`]) or a value that does not parse into the
//!   requested scalar ([`Error::Conversion`])
//!
//! ## Examples
//!
//! ```rust
//! use serde::Deserialize;
//! use serde_properties::{from_str, Error};
//!
//! #[derive(Deserialize, Debug)]
//! struct Server { port: u16 }
//!
//! let result: Result<Server, Error> = from_str("port=http");
//! match result {
//!     Err(Error::Conversion { key, .. }) => assert_eq!(key, "port"),
//!     other => panic!("unexpected: {:?}", other),
//! }
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors that can occur while converting between
/// properties text and Rust values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The decode target cannot be addressed by a flat key space.
    #[error("invalid target: expected a struct or map, found {0}")]
    InvalidTarget(String),

    /// The encode source cannot be addressed by a flat key space.
    #[error("invalid source: expected a struct or map, found {0}")]
    InvalidSource(String),

    /// A non-blank, non-comment line without a `=` separator.
    #[error("malformed input at line {line}: expected `key=value`, found `{content}`")]
    MalformedInput { line: usize, content: String },

    /// A shape the key-path traversal does not know how to express.
    #[error("unsupported type at key `{key}`: {kind}")]
    UnsupportedType { key: String, kind: String },

    /// A value that cannot be parsed into the requested scalar type.
    #[error("cannot convert `{value}` at key `{key}` to {expected}")]
    Conversion {
        key: String,
        value: String,
        expected: String,
    },

    /// Input bytes are not valid UTF-8.
    #[error("invalid UTF-8: {0}")]
    InvalidUtf8(String),

    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// Error raised through serde's `custom` hooks
    #[error("{0}")]
    Custom(String),
}

impl Error {
    /// Creates an invalid target error naming the shape that was requested.
    pub fn invalid_target(found: &str) -> Self {
        Error::InvalidTarget(found.to_string())
    }

    /// Creates an invalid source error naming the shape that was supplied.
    pub fn invalid_source(found: &str) -> Self {
        Error::InvalidSource(found.to_string())
    }

    /// Creates a malformed input error for a scanner line.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_properties::Error;
    ///
    /// let err = Error::malformed_input(3, "no separator here");
    /// assert!(err.to_string().contains("line 3"));
    /// ```
    pub fn malformed_input(line: usize, content: &str) -> Self {
        Error::MalformedInput {
            line,
            content: content.to_string(),
        }
    }

    /// Creates an unsupported type error at a key path.
    pub fn unsupported_type(key: &str, kind: &str) -> Self {
        Error::UnsupportedType {
            key: key.to_string(),
            kind: kind.to_string(),
        }
    }

    /// Creates a conversion error for a value found at a key path.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_properties::Error;
    ///
    /// let err = Error::conversion("server.port", "http", "u16");
    /// assert_eq!(
    ///     err.to_string(),
    ///     "cannot convert `http` at key `server.port` to u16"
    /// );
    /// ```
    pub fn conversion(key: &str, value: &str, expected: &str) -> Self {
        Error::Conversion {
            key: key.to_string(),
            value: value.to_string(),
            expected: expected.to_string(),
        }
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for reader/writer failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Returns the key path the error is attached to, if any.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        match self {
            Error::UnsupportedType { key, .. } | Error::Conversion { key, .. } => Some(key),
            _ => None,
        }
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Every declared name of a struct is visited, so an alias collides with
    /// the field it belongs to.
    fn duplicate_field(field: &'static str) -> Self {
        Error::Custom(format!(
            "duplicate field `{}` (field aliases are not supported)",
            field
        ))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
