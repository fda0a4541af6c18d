//! Nested key-path access on JSON-style mappings
//!
//! A path is an ordered list of keys, outermost first. `set_path` creates the
//! intermediate mappings it needs; `get_path` and `has_path` never modify
//! anything.

use serde_json::{Map, Value};

use super::error::PathError;

/// Write `value` at `path`, creating empty mappings for missing intermediate keys.
pub fn set_path<S: AsRef<str>>(
    root: &mut Map<String, Value>,
    path: &[S],
    value: Value,
) -> Result<(), PathError> {
    let Some((last, parents)) = path.split_last() else {
        return Err(PathError::EmptyPath);
    };

    let mut node = root;
    for (depth, key) in parents.iter().enumerate() {
        let key = key.as_ref();
        let entry = node.entry(key.to_string()).or_insert_with(|| Value::Object(Map::new()));
        node = match entry {
            Value::Object(child) => child,
            _ => return Err(PathError::NotAMapping(join_path(&path[..=depth]))),
        };
    }

    node.insert(last.as_ref().to_string(), value);
    Ok(())
}

/// Look up the value at `path`.
pub fn get_path<'a, S: AsRef<str>>(
    root: &'a Map<String, Value>,
    path: &[S],
) -> Result<&'a Value, PathError> {
    let Some((first, rest)) = path.split_first() else {
        return Err(PathError::EmptyPath);
    };

    let mut current =
        root.get(first.as_ref()).ok_or_else(|| PathError::KeyNotFound(join_path(&path[..1])))?;
    for (offset, key) in rest.iter().enumerate() {
        let walked = &path[..offset + 2];
        current = match current {
            Value::Object(map) => {
                map.get(key.as_ref()).ok_or_else(|| PathError::KeyNotFound(join_path(walked)))?
            }
            _ => return Err(PathError::KeyNotFound(join_path(walked))),
        };
    }
    Ok(current)
}

/// Whether `path` resolves to a value. An empty path never does.
pub fn has_path<S: AsRef<str>>(root: &Map<String, Value>, path: &[S]) -> bool {
    get_path(root, path).is_ok()
}

/// Render a key path the way diagnostics show it: `tuning.rate`.
pub fn join_path<S: AsRef<str>>(path: &[S]) -> String {
    path.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(".")
}
