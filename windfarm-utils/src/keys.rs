use serde_json::{Map, Value};

pub fn remove_space_from_keys(obj: &Map<String, Value>) -> Map<String, Value> {
    obj.iter()
        .map(|(key, value)| (key.trim().to_string(), value.clone()))
        .collect()
}

/// Strips surrounding whitespace from the keys of a raw document.
///
/// Covers the root object, objects nested one and two levels below it, and
/// the records of every top-level list. Values are never touched and anything
/// that is not an object is passed through as-is.
pub fn clean_keys(raw_data: &Value) -> Value {
    let root = match raw_data {
        Value::Object(obj) => remove_space_from_keys(obj),
        other => return other.clone(),
    };

    let mut clean_data = Map::new();
    for (key, value) in root {
        let cleaned = match value {
            Value::Object(section) => {
                let mut section = remove_space_from_keys(&section);
                for nested in section.values_mut() {
                    if let Value::Object(inner) = nested {
                        *inner = remove_space_from_keys(inner);
                    }
                }
                Value::Object(section)
            }
            Value::Array(records) => Value::Array(
                records
                    .into_iter()
                    .map(|record| match record {
                        Value::Object(obj) => Value::Object(remove_space_from_keys(&obj)),
                        other => other,
                    })
                    .collect(),
            ),
            other => other,
        };
        clean_data.insert(key, cleaned);
    }
    Value::Object(clean_data)
}
