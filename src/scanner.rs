//! Line scanner: properties text to a flat [`Properties`] mapping.
//!
//! Each line is trimmed. Blank lines and lines starting with the comment
//! marker are skipped. Every other line must contain a `=`; the first one
//! separates the key from the value, and both sides are trimmed again. A
//! value may therefore contain further `=` characters.

use crate::{Error, Properties, PropertiesOptions, Result};
use tracing::trace;

/// Scans properties text into a flat mapping.
///
/// When `options.root` is set, only entries under `root.` are kept, with the
/// prefix stripped. Later duplicates overwrite earlier ones.
///
/// # Errors
///
/// Returns [`Error::MalformedInput`] for the first line without a `=`.
///
/// # Examples
///
/// ```rust
/// use serde_properties::{scanner, PropertiesOptions};
///
/// let text = "# settings\nname = demo\nurl=http://h/?a=b\n";
/// let props = scanner::scan(text, &PropertiesOptions::new()).unwrap();
/// assert_eq!(props.get("name"), Some("demo"));
/// assert_eq!(props.get("url"), Some("http://h/?a=b"));
/// ```
pub fn scan(input: &str, options: &PropertiesOptions) -> Result<Properties> {
    let prefix = options.root.as_ref().map(|root| format!("{}.", root));
    let mut props = Properties::new();
    let mut lines = 0;

    for (index, raw) in input.lines().enumerate() {
        lines += 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with(options.comment) {
            continue;
        }

        let (key, value) = line
            .split_once('=')
            .ok_or_else(|| Error::malformed_input(index + 1, line))?;
        let (key, value) = (key.trim(), value.trim());

        let key = match &prefix {
            Some(prefix) => match key.strip_prefix(prefix.as_str()) {
                Some(rest) => rest,
                None => continue,
            },
            None => key,
        };

        props.insert(key.to_string(), value.to_string());
    }

    trace!(lines, entries = props.len(), "scanned properties");
    Ok(props)
}
