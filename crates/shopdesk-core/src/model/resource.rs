// ── Resource trait and field-level updates ──
//
// Every type held by a `ResourceStore` implements `Resource`. Partial
// updates travel as JSON objects keyed by the resource's serialized field
// names, so a store can patch any resource through its serde form.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::ResourceId;

/// Field name -> new value. Keys use the serialized (wire) field names.
pub type FieldUpdates = Map<String, Value>;

/// Identifier field names a patch is never allowed to touch.
const ID_FIELDS: [&str; 2] = ["id", "_id"];

/// A backend entity with a stable identity.
pub trait Resource:
    Clone + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Human-readable kind, used in errors and logs ("order", "banner").
    const KIND: &'static str;

    fn id(&self) -> &ResourceId;

    /// Whether a fetched item belongs in the collection at all.
    fn is_listed(&self) -> bool {
        true
    }
}

/// Apply `updates` to `item` through its serde form.
///
/// Returns the patched item and the previous value of every named field
/// (`Value::Null` where the field was absent). A `Null` update removes the
/// field, which is how absent fields are restored on rollback.
pub(crate) fn apply_fields<T: Resource>(
    item: &T,
    updates: &FieldUpdates,
) -> Result<(T, FieldUpdates), String> {
    if let Some(key) = ID_FIELDS.iter().find(|k| updates.contains_key(**k)) {
        return Err(format!("field '{key}' is immutable"));
    }

    let Value::Object(mut fields) = serde_json::to_value(item).map_err(|e| e.to_string())? else {
        return Err(format!("{} does not serialize to an object", T::KIND));
    };

    let mut previous = FieldUpdates::new();
    for (key, value) in updates {
        let old = if value.is_null() {
            fields.remove(key)
        } else {
            fields.insert(key.clone(), value.clone())
        };
        previous.insert(key.clone(), old.unwrap_or(Value::Null));
    }

    let patched: T = serde_json::from_value(Value::Object(fields)).map_err(|e| e.to_string())?;
    if patched.id() != item.id() {
        return Err("patch changed the identifier".into());
    }
    Ok((patched, previous))
}

/// Decode a raw backend item into `T`.
///
/// Records may carry both the Mongo `_id` and an `id` virtual; `_id` wins
/// and the other is dropped before decoding, at every nesting level.
pub fn decode<T: Resource>(mut value: Value) -> Result<T, crate::CoreError> {
    canonical_ids(&mut value);
    serde_json::from_value(value).map_err(|e| crate::CoreError::Decode {
        kind: T::KIND,
        message: e.to_string(),
    })
}

/// Collapse `_id` / `id` pairs to a single identifier field.
pub(crate) fn canonical_ids(value: &mut Value) {
    match value {
        Value::Object(fields) => {
            match fields.get("_id").map(Value::is_null) {
                Some(true) if fields.contains_key("id") => {
                    fields.remove("_id");
                }
                Some(false) => {
                    fields.remove("id");
                }
                _ => {}
            }
            fields.values_mut().for_each(canonical_ids);
        }
        Value::Array(items) => items.iter_mut().for_each(canonical_ids),
        _ => {}
    }
}

/// `deserialize_with` helper: an explicit `null` becomes `T::default()`.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Widget {
        id: ResourceId,
        status: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        note: Option<String>,
    }

    impl Resource for Widget {
        const KIND: &'static str = "widget";
        fn id(&self) -> &ResourceId {
            &self.id
        }
    }

    fn widget() -> Widget {
        Widget {
            id: ResourceId::from("w1"),
            status: "active".into(),
            note: None,
        }
    }

    #[test]
    fn apply_fields_returns_previous_values() {
        let mut updates = FieldUpdates::new();
        updates.insert("status".into(), json!("inactive"));
        updates.insert("note".into(), json!("hello"));

        let (patched, previous) = apply_fields(&widget(), &updates).unwrap();
        assert_eq!(patched.status, "inactive");
        assert_eq!(patched.note.as_deref(), Some("hello"));
        assert_eq!(previous["status"], json!("active"));
        assert_eq!(previous["note"], Value::Null);

        // Re-applying the previous values restores the original exactly.
        let (restored, _) = apply_fields(&patched, &previous).unwrap();
        assert_eq!(restored, widget());
    }

    #[test]
    fn apply_fields_rejects_id_changes() {
        let mut updates = FieldUpdates::new();
        updates.insert("id".into(), json!("w2"));
        assert!(apply_fields(&widget(), &updates).is_err());
    }

    #[test]
    fn apply_fields_rejects_type_mismatch() {
        let mut updates = FieldUpdates::new();
        updates.insert("status".into(), json!(17));
        assert!(apply_fields(&widget(), &updates).is_err());
    }

    #[test]
    fn canonical_ids_prefers_mongo_id() {
        let mut value = json!({
            "_id": "64ab",
            "id": "ORD-1",
            "lines": [{ "_id": "l1", "id": "virtual" }, { "id": 7 }],
        });
        canonical_ids(&mut value);
        assert_eq!(
            value,
            json!({ "_id": "64ab", "lines": [{ "_id": "l1" }, { "id": 7 }] })
        );

        let mut null_mongo = json!({ "_id": null, "id": 3 });
        canonical_ids(&mut null_mongo);
        assert_eq!(null_mongo, json!({ "id": 3 }));
    }
}
