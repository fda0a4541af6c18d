//! Configuration merge logic
//!
//! - Mappings: deep-merge by key
//! - Everything else (scalars, sequences, null): the source value replaces the destination

use serde_json::{Map, Value};

/// Merge `src` into `dst` in place and hand `dst` back.
///
/// Where both sides hold a mapping under the same key the two mappings are merged
/// recursively. Any other pairing is a plain overwrite, including a mapping being
/// replaced by a scalar or a scalar by a mapping.
pub fn deep_merge(dst: &mut Map<String, Value>, src: Map<String, Value>) -> &mut Map<String, Value> {
    for (key, src_value) in src {
        match src_value {
            Value::Object(src_child) => match dst.get_mut(&key) {
                Some(Value::Object(dst_child)) => {
                    deep_merge(dst_child, src_child);
                }
                _ => {
                    dst.insert(key, Value::Object(src_child));
                }
            },
            other => {
                dst.insert(key, other);
            }
        }
    }
    dst
}
