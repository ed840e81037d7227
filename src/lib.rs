//! # serde_properties
//!
//! A Serde-compatible library for the flat `.properties` format.
//!
//! ## What is the properties format?
//!
//! A properties document is a list of `key=value` lines. Nested data lives in
//! the keys themselves: each leaf of a value tree gets a key path built from
//! the field names, map keys and sequence indices that lead to it.
//!
//! ```text
//! # comments start with '#'
//! server.host=localhost
//! server.port=8080
//! users[0].name=alice
//! users[1].name=bob
//! labels.env=prod
//! ```
//!
//! ## Key Features
//!
//! - **Serde Compatible**: works with existing types via `#[derive(Serialize, Deserialize)]`
//! - **Forgiving Decoding**: keys missing from the input decode to zero values
//! - **Field Tags**: `#[serde(rename = "...")]` picks the key name and
//!   `#[serde(skip)]` keeps a field out of both directions
//! - **Keyed Decoding**: decode just the sub-document under a root key
//!
//! ## Quick Start
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_properties::{from_str, to_string};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Server {
//!     host: String,
//!     port: u16,
//!     tags: Vec<String>,
//! }
//!
//! let server = Server {
//!     host: "localhost".to_string(),
//!     port: 8080,
//!     tags: vec!["edge".to_string()],
//! };
//!
//! let text = to_string(&server).unwrap();
//! assert_eq!(text, "host=localhost\nport=8080\ntags[0]=edge\n");
//!
//! let back: Server = from_str(&text).unwrap();
//! assert_eq!(server, back);
//! ```
//!
//! ### Decoding a Sub-Document
//!
//! ```rust
//! use serde::Deserialize;
//! use serde_properties::from_str_keyed;
//!
//! #[derive(Deserialize, PartialEq, Debug)]
//! struct Db { host: String, port: u16 }
//!
//! let text = "db.host=localhost\ndb.port=5432\ncache.port=6379\n";
//! let db: Db = from_str_keyed("db", text).unwrap();
//! assert_eq!(db, Db { host: "localhost".to_string(), port: 5432 });
//! ```
//!
//! ## Format Notes
//!
//! - Lines are trimmed; blank lines and comment lines are ignored
//! - The first `=` splits key from value, so values may contain `=`
//! - There is no escaping: keys cannot contain `=`, values cannot span lines.
//!   Encoding such an entry fails with [`Error::UnsupportedType`]
//! - Sequence indices must be contiguous from `0`; decoding stops at the first gap
//! - Only structs and maps can be encoded or decoded at the top level. An
//!   `Option` around one is transparent in both directions
//! - `#[serde(alias)]` is not supported, and `#[serde(flatten)]` only works
//!   for members whose leaves are strings
//!
//! ## Examples
//!
//! See the `demos/` directory:
//!
//! - **`simple.rs`** - encode and decode a flat struct
//! - **`macro.rs`** - building mappings with the `properties!` macro
//! - **`collections.rs`** - maps, sequences and optional members
//! - **`flat_mapping.rs`** - working with [`Properties`] directly
//! - **`custom_options.rs`** - roots, sorted output and comment markers
//!
//! Run any example with: `cargo run --example <name>`

pub mod de;
pub mod error;
pub mod macros;
pub mod map;
pub mod options;
mod path;
mod scalar;
pub mod scanner;
pub mod ser;

pub use de::Deserializer;
pub use error::{Error, Result};
pub use map::Properties;
pub use options::PropertiesOptions;
pub use ser::Serializer;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::io;

/// Serialize any `T: Serialize` to properties text.
///
/// # Examples
///
/// ```rust
/// use serde_properties::to_string;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let point = Point { x: 1, y: 2 };
/// assert_eq!(to_string(&point).unwrap(), "x=1\ny=2\n");
/// ```
///
/// # Errors
///
/// Returns an error if the value is not a struct or map, or holds a shape
/// that has no key path (e.g. data-carrying enum variants).
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    to_string_with_options(value, PropertiesOptions::default())
}

/// Serialize any `T: Serialize` to properties text with custom options.
///
/// # Examples
///
/// ```rust
/// use serde_properties::{to_string_with_options, PropertiesOptions};
/// use std::collections::HashMap;
///
/// let mut ports = HashMap::new();
/// ports.insert("web", 80);
/// ports.insert("api", 8080);
///
/// let options = PropertiesOptions::new().with_root("ports").with_sorted_keys();
/// let text = to_string_with_options(&ports, options).unwrap();
/// assert_eq!(text, "ports.api=8080\nports.web=80\n");
/// ```
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_options<T>(value: &T, options: PropertiesOptions) -> Result<String>
where
    T: ?Sized + Serialize,
{
    Ok(to_properties_with_options(value, options)?.to_string())
}

/// Serialize any `T: Serialize` to properties text as bytes.
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_vec<T>(value: &T) -> Result<Vec<u8>>
where
    T: ?Sized + Serialize,
{
    Ok(to_string(value)?.into_bytes())
}

/// Flatten any `T: Serialize` into a [`Properties`] mapping.
///
/// # Examples
///
/// ```rust
/// use serde_properties::to_properties;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Data { name: String, scores: Vec<u8> }
///
/// let data = Data { name: "x".to_string(), scores: vec![7, 9] };
/// let props = to_properties(&data).unwrap();
/// assert_eq!(props.get("name"), Some("x"));
/// assert_eq!(props.get("scores[1]"), Some("9"));
/// ```
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_properties<T>(value: &T) -> Result<Properties>
where
    T: ?Sized + Serialize,
{
    to_properties_with_options(value, PropertiesOptions::default())
}

/// Flatten any `T: Serialize` into a [`Properties`] mapping with custom options.
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_properties_with_options<T>(value: &T, options: PropertiesOptions) -> Result<Properties>
where
    T: ?Sized + Serialize,
{
    let mut serializer = Serializer::new(options);
    value.serialize(&mut serializer)?;
    Ok(serializer.into_inner())
}

/// Serialize any `T: Serialize` to a writer as properties text.
///
/// # Examples
///
/// ```rust
/// use serde_properties::to_writer;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let mut buffer = Vec::new();
/// to_writer(&mut buffer, &Point { x: 1, y: 2 }).unwrap();
/// assert_eq!(buffer, b"x=1\ny=2\n");
/// ```
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, T>(writer: W, value: &T) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    to_writer_with_options(writer, value, PropertiesOptions::default())
}

/// Serialize any `T: Serialize` to a writer with custom options.
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer_with_options<W, T>(
    mut writer: W,
    value: &T,
    options: PropertiesOptions,
) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    let text = to_string_with_options(value, options)?;
    writer
        .write_all(text.as_bytes())
        .map_err(|e| Error::io(&e.to_string()))?;
    Ok(())
}

/// Deserialize an instance of type `T` from properties text.
///
/// Keys that `T` does not declare are ignored; members `T` declares but the
/// text lacks get their zero value.
///
/// # Examples
///
/// ```rust
/// use serde_properties::from_str;
/// use serde::Deserialize;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let point: Point = from_str("# origin\nx = 1\n").unwrap();
/// assert_eq!(point, Point { x: 1, y: 0 });
/// ```
///
/// # Errors
///
/// Returns an error if a line is malformed, `T` is not a struct or map, or a
/// value cannot be converted. Conversion errors carry the failing key path.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<T>(s: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    from_str_with_options(s, PropertiesOptions::default())
}

/// Deserialize an instance of type `T` from properties text with custom options.
///
/// `options.root` restricts decoding to the entries under `root.`, and
/// `options.comment` selects the comment marker.
///
/// # Errors
///
/// Returns an error if the text cannot be scanned or decoded into `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str_with_options<T>(s: &str, options: PropertiesOptions) -> Result<T>
where
    T: DeserializeOwned,
{
    let props = scanner::scan(s, &options)?;
    from_properties(&props)
}

/// Deserialize an instance of type `T` from the sub-document under `root`.
///
/// Only lines whose key starts with `root.` are read, with that prefix
/// stripped. An empty root reads the whole document.
///
/// # Errors
///
/// Returns an error if the text cannot be scanned or decoded into `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str_keyed<T>(root: &str, s: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    from_str_with_options(s, PropertiesOptions::new().with_root(root))
}

/// Deserialize an instance of type `T` from bytes of properties text.
///
/// # Examples
///
/// ```rust
/// use serde_properties::from_slice;
/// use serde::Deserialize;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let point: Point = from_slice(b"x=1\ny=2").unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
///
/// # Errors
///
/// Returns [`Error::InvalidUtf8`] if the bytes are not UTF-8, otherwise the
/// same errors as [`from_str`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice<T>(v: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    from_slice_with_options(v, PropertiesOptions::default())
}

/// Deserialize an instance of type `T` from bytes with custom options.
///
/// # Errors
///
/// Returns an error if the bytes are not UTF-8 or cannot be decoded.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice_with_options<T>(v: &[u8], options: PropertiesOptions) -> Result<T>
where
    T: DeserializeOwned,
{
    let s = std::str::from_utf8(v).map_err(|e| Error::InvalidUtf8(e.to_string()))?;
    from_str_with_options(s, options)
}

/// Deserialize an instance of type `T` from the sub-document under `root`,
/// reading bytes of properties text.
///
/// # Errors
///
/// Returns an error if the bytes are not UTF-8 or cannot be decoded.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice_keyed<T>(root: &str, v: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    from_slice_with_options(v, PropertiesOptions::new().with_root(root))
}

/// Deserialize an instance of type `T` from an I/O stream of properties text.
///
/// # Examples
///
/// ```rust
/// use serde_properties::from_reader;
/// use serde::Deserialize;
/// use std::io::Cursor;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let point: Point = from_reader(Cursor::new(b"x=1\ny=2")).unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
///
/// # Errors
///
/// Returns an error if reading fails, the input is not UTF-8, or the data
/// cannot be decoded into `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R, T>(reader: R) -> Result<T>
where
    R: io::Read,
    T: DeserializeOwned,
{
    from_reader_with_options(reader, PropertiesOptions::default())
}

/// Deserialize an instance of type `T` from an I/O stream with custom options.
///
/// # Errors
///
/// Returns an error if reading fails or the data cannot be decoded.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader_with_options<R, T>(mut reader: R, options: PropertiesOptions) -> Result<T>
where
    R: io::Read,
    T: DeserializeOwned,
{
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| Error::io(&e.to_string()))?;
    from_slice_with_options(&bytes, options)
}

/// Deserialize an instance of type `T` from a flat [`Properties`] mapping.
///
/// String fields may borrow from the mapping.
///
/// # Examples
///
/// ```rust
/// use serde_properties::{from_properties, properties};
/// use serde::Deserialize;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct User<'a> { name: &'a str, admin: bool }
///
/// let props = properties! { "name" => "alice", "admin" => "T" };
/// let user: User = from_properties(&props).unwrap();
/// assert_eq!(user, User { name: "alice", admin: true });
/// ```
///
/// # Errors
///
/// Returns an error if `T` is not a struct or map, or a value cannot be
/// converted.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_properties<'de, T>(props: &'de Properties) -> Result<T>
where
    T: Deserialize<'de>,
{
    let mut deserializer = Deserializer::new(props);
    T::deserialize(&mut deserializer)
}

/// Deserialize an instance of type `T` from a flat mapping with custom options.
///
/// When `options.root` is set, only the entries under `root.` are decoded.
///
/// # Errors
///
/// Returns an error if `T` is not a struct or map, or a value cannot be
/// converted.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_properties_with_options<T>(props: &Properties, options: PropertiesOptions) -> Result<T>
where
    T: DeserializeOwned,
{
    match options.root.as_deref() {
        Some(root) => from_properties(&props.restrict(root)),
        None => from_properties(props),
    }
}
