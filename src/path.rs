//! Key-path addressing shared by the encoder and the decoder.
//!
//! A key path is built by appending one step per level of nesting:
//!
//! | Step | Rule | Example |
//! |------|------|---------|
//! | struct field | `parent.field` | `server.port` |
//! | map entry | `parent.key` | `labels.env` |
//! | sequence element | `parent[index]` | `hosts[2]` |
//!
//! An empty parent contributes nothing, so top-level fields have bare names.
//! Map keys are assumed not to contain `.`, `[` or `]`; nothing checks this.
//!
//! The decoder works on a *scope*: the keys at or below the path it stands
//! on. Each level splits its scope into one group per child in a single pass,
//! so every key is visited once per level of nesting above it.

use indexmap::IndexMap;
use std::collections::BTreeMap;

/// Keys at or below one path, borrowed from the mapping being decoded.
pub(crate) type Scope<'a> = Vec<&'a str>;

/// Appends a struct field or map entry name to `parent`.
#[inline]
pub(crate) fn child(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        let mut key = String::with_capacity(parent.len() + 1 + name.len());
        key.push_str(parent);
        key.push('.');
        key.push_str(name);
        key
    }
}

/// Appends a sequence index to `parent`.
#[inline]
pub(crate) fn element(parent: &str, index: usize) -> String {
    format!("{}[{}]", parent, index)
}

/// Returns `true` if `key` addresses `path` itself or something nested below it.
///
/// `a.b` and `a[1]` are under `a`, but `ab` is not, and `a[10]` is not under
/// `a[1]`: the byte after the prefix must be `.` or `[`.
#[inline]
pub(crate) fn is_under(key: &str, path: &str) -> bool {
    if path.is_empty() {
        return true;
    }
    match key.strip_prefix(path) {
        Some(rest) => rest.is_empty() || rest.starts_with('.') || rest.starts_with('['),
        None => false,
    }
}

/// Strips the map prefix (`path.`, or nothing at the root) from `key`.
#[inline]
pub(crate) fn entry_suffix<'k>(key: &'k str, path: &str) -> Option<&'k str> {
    if path.is_empty() {
        return Some(key);
    }
    key.strip_prefix(path)?.strip_prefix('.')
}

/// The first step of a suffix: everything up to the first `.` or `[`.
#[inline]
pub(crate) fn first_segment(suffix: &str) -> &str {
    match suffix.find(['.', '[']) {
        Some(end) => &suffix[..end],
        None => suffix,
    }
}

/// Parses the index of `key` as an element of `path`, e.g. `2` for
/// `hosts[2].name` under `hosts`. Only canonical base-10 indices count.
fn element_index(key: &str, path: &str) -> Option<usize> {
    let rest = key.strip_prefix(path)?.strip_prefix('[')?;
    let (digits, tail) = rest.split_once(']')?;
    if !(tail.is_empty() || tail.starts_with('.') || tail.starts_with('[')) {
        return None;
    }
    if digits.is_empty()
        || !digits.bytes().all(|b| b.is_ascii_digit())
        || (digits.len() > 1 && digits.starts_with('0'))
    {
        return None;
    }
    digits.parse().ok()
}

/// Keeps the keys of `scope` that lie at or below `path`.
pub(crate) fn narrow<'a>(scope: &[&'a str], path: &str) -> Scope<'a> {
    scope
        .iter()
        .copied()
        .filter(|key| is_under(key, path))
        .collect()
}

/// Groups the keys directly below `path` by map entry name, in first-seen order.
///
/// Each group is the scope of the entry `path.name`.
pub(crate) fn entries<'a>(scope: &[&'a str], path: &str) -> IndexMap<&'a str, Scope<'a>> {
    let mut groups: IndexMap<&'a str, Scope<'a>> = IndexMap::new();
    for &key in scope {
        let Some(suffix) = entry_suffix(key, path) else {
            continue;
        };
        let name = first_segment(suffix);
        if name.is_empty() {
            continue;
        }
        groups.entry(name).or_default().push(key);
    }
    groups
}

/// Groups the keys below `path[` by element index.
///
/// Each group is the scope of the element `path[index]`.
pub(crate) fn elements<'a>(scope: &[&'a str], path: &str) -> BTreeMap<usize, Scope<'a>> {
    let mut groups: BTreeMap<usize, Scope<'a>> = BTreeMap::new();
    for &key in scope {
        if let Some(index) = element_index(key, path) {
            groups.entry(index).or_default().push(key);
        }
    }
    groups
}

/// Length of the contiguous run of element indices starting at 0.
pub(crate) fn contiguous_len<T>(groups: &BTreeMap<usize, T>) -> usize {
    groups
        .keys()
        .enumerate()
        .take_while(|(position, index)| position == *index)
        .count()
}
