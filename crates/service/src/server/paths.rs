//! Dot-notation field paths and the record walker that applies them.
//!
//! A path names object properties separated by dots. A `[]` suffix expands
//! every element of an array, so `"entries[].text"` reaches the `text` of each
//! entry. Missing properties and values of the wrong shape along the way are
//! skipped: a record without the field simply has nothing to protect.

use serde_json::Value;
use thiserror::Error;

/// A path string that cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid field path {path:?}: {reason}")]
pub struct PathError {
    pub path: String,
    pub reason: &'static str,
}

/// Segments of a dot-notation field path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Navigate into an object property by name.
    Key(String),
    /// Expand into every element of a JSON array.
    ArrayItem,
}

/// Parse a dot-notation path into a list of [`PathSegment`]s.
///
/// `"entries[].text"` → `[Key("entries"), ArrayItem, Key("text")]`.
///
/// # Errors
///
/// Returns [`PathError`] for an empty path or an empty property name.
pub fn parse_path(path: &str) -> Result<Vec<PathSegment>, PathError> {
    let invalid = |reason| PathError {
        path: path.to_owned(),
        reason,
    };
    if path.trim().is_empty() {
        return Err(invalid("path is empty"));
    }

    let mut segments = Vec::new();
    for part in path.split('.') {
        let (key, expand) = match part.strip_suffix("[]") {
            Some(key) => (key, true),
            None => (part, false),
        };
        if key.is_empty() {
            return Err(invalid("empty property name"));
        }
        if key.contains("[]") {
            return Err(invalid("`[]` must end a property name"));
        }
        segments.push(PathSegment::Key(key.to_owned()));
        if expand {
            segments.push(PathSegment::ArrayItem);
        }
    }
    Ok(segments)
}

/// Call `visit` on every leaf of `value` reached by `segments`.
///
/// The first argument to `visit` is the concrete location of the leaf, with
/// array indices in place of `[]` (e.g. `"entries.2.text"`). The walk stops at
/// the first error `visit` returns.
pub fn for_each_leaf<F, E>(
    value: &mut Value,
    segments: &[PathSegment],
    visit: &mut F,
) -> Result<(), E>
where
    F: FnMut(&str, &mut Value) -> Result<(), E>,
{
    let mut location = Vec::new();
    walk(value, segments, &mut location, visit)
}

fn walk<F, E>(
    value: &mut Value,
    segments: &[PathSegment],
    location: &mut Vec<String>,
    visit: &mut F,
) -> Result<(), E>
where
    F: FnMut(&str, &mut Value) -> Result<(), E>,
{
    let Some((head, rest)) = segments.split_first() else {
        return visit(&location.join("."), value);
    };

    match head {
        PathSegment::Key(key) => {
            if let Value::Object(map) = value {
                if let Some(child) = map.get_mut(key) {
                    location.push(key.clone());
                    let result = walk(child, rest, location, visit);
                    location.pop();
                    result?;
                }
            }
        }
        PathSegment::ArrayItem => {
            if let Value::Array(items) = value {
                for (index, item) in items.iter_mut().enumerate() {
                    location.push(index.to_string());
                    let result = walk(item, rest, location, visit);
                    location.pop();
                    result?;
                }
            }
        }
    }
    Ok(())
}
