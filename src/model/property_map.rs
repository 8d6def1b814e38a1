//! PropertyMap: the key-value store on nodes and relationships.

use std::collections::HashMap;
use super::Value;

/// A map of property names to values.
pub type PropertyMap = HashMap<String, Value>;

/// Copy `props` with every key lower-cased.
///
/// Keys are visited in sorted order, so when two source keys fold to the
/// same lower-case form (`NAME` and `name`) the one that was already
/// lower-case wins.
pub fn lowercase_keys(props: &PropertyMap) -> PropertyMap {
    let mut keys: Vec<&String> = props.keys().collect();
    keys.sort();
    let mut out = PropertyMap::with_capacity(props.len());
    for key in keys {
        out.insert(key.to_lowercase(), props[key].clone());
    }
    out
}
