//! Field composition.
//!
//! Merges the three field layers of a log call into one [`FieldSet`]:
//!
//! ```text
//! name  →  message fields  →  dynamic fields  →  static fields
//!                                   (later layers overwrite earlier keys)
//! ```
//!
//! Static (process identity) fields always win, so a caller can never shadow
//! them with an ad hoc field of the same name.

use std::collections::BTreeMap;

use crate::value::FieldValue;

/// Key under which a non-empty logger name is written.
pub const NAME_KEY: &str = "name";

/// Composed mapping from field name to value. Built fresh for every call.
pub type FieldSet = BTreeMap<String, FieldValue>;

/// Iterate the complete `(key, value)` pairs of a flat field list.
///
/// Pairs with a null key or a null value are skipped; the walk always advances
/// by two, so a dropped pair never shifts the ones after it. A trailing
/// unpaired element is ignored.
pub fn pairs(fields: &[FieldValue]) -> impl Iterator<Item = (&FieldValue, &FieldValue)> {
    fields.chunks_exact(2).filter_map(|pair| match pair {
        [key, value] if !key.is_null() && !value.is_null() => Some((key, value)),
        _ => None,
    })
}

/// Compose the field layers of one call.
#[must_use]
pub fn compose(
    name: &str,
    message: &[FieldValue],
    dynamic: &[FieldValue],
    statics: &[FieldValue],
) -> FieldSet {
    let mut set = FieldSet::new();
    if !name.is_empty() {
        set.insert(NAME_KEY.to_string(), FieldValue::from(name));
    }
    for layer in [message, dynamic, statics] {
        for (key, value) in pairs(layer) {
            set.insert(key.key_string().into_owned(), value.clone());
        }
    }
    set
}
