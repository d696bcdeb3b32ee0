//! Turns lists of records into maps keyed by id.
//!
//! The reshaping is purely structural: no catalog is consulted. A section
//! that is already a map is left untouched, so normalizing twice gives the
//! same document as normalizing once.

use crate::error::Diagnostics;
use serde_json::{Map, Value};
use windfarm_structs::shape::{Keying, RecordShape};

/// Integer >= 1 that fits an id.
pub fn as_id(value: &Value) -> Option<u32> {
    value
        .as_u64()
        .filter(|id| *id >= 1)
        .and_then(|id| u32::try_from(id).ok())
}

/// Normalizes every section of `document` described by `shapes`. Other
/// sections are copied as they are.
pub fn normalize_document(document: &Value, shapes: &[RecordShape]) -> Result<Value, Diagnostics> {
    let mut diagnostics = Diagnostics::new();
    let root = match document {
        Value::Object(root) => root,
        _ => {
            diagnostics.push("The document isn't a dictionary");
            return Err(diagnostics);
        }
    };

    let mut normalized = Map::new();
    for (key, value) in root {
        let converted = match shapes.iter().find(|shape| shape.matches_section(key)) {
            Some(shape) => normalize_section(shape, value, &mut diagnostics),
            None => value.clone(),
        };
        normalized.insert(key.clone(), converted);
    }
    diagnostics.into_result(Value::Object(normalized))
}

pub fn normalize_section(shape: &RecordShape, data: &Value, diagnostics: &mut Diagnostics) -> Value {
    let records = match data {
        Value::Array(records) => records,
        Value::Object(_) => return data.clone(),
        _ => {
            diagnostics.push(format!(
                "The element at key '{}' is not a list",
                shape.section
            ));
            return data.clone();
        }
    };

    let mut indexed = Map::new();
    for (i, record) in records.iter().enumerate() {
        let fields = match record {
            Value::Object(fields) => fields,
            _ => {
                diagnostics.push(format!(
                    "In {}, element {} is not a dictionary",
                    shape.section,
                    i + 1
                ));
                continue;
            }
        };

        match shape.keying {
            Keying::Single(id_field) => {
                let Some(id) = extract_id(shape, i, fields, id_field, diagnostics) else {
                    continue;
                };
                let key = id.to_string();
                if indexed.contains_key(&key) {
                    diagnostics.push(format!(
                        "The {} with id {} appears at least twice",
                        shape.record, id
                    ));
                    continue;
                }
                let mut body = fields.clone();
                body.remove(id_field);
                indexed.insert(key, Value::Object(body));
            }
            Keying::Symmetric { from, to } => {
                let a = extract_id(shape, i, fields, from, diagnostics);
                let b = extract_id(shape, i, fields, to, diagnostics);
                let (Some(a), Some(b)) = (a, b) else {
                    continue;
                };
                if a == b {
                    diagnostics.push(format!(
                        "The {} {} links substation {} to itself",
                        shape.record,
                        i + 1,
                        a
                    ));
                    continue;
                }
                let mut already_linked = false;
                for end in [a, b] {
                    if indexed.contains_key(&end.to_string()) {
                        diagnostics.push(format!(
                            "Substation {} is linked to more than one other substation",
                            end
                        ));
                        already_linked = true;
                    }
                }
                if already_linked {
                    continue;
                }

                let mut body = fields.clone();
                body.remove(from);
                for (here, there) in [(a, b), (b, a)] {
                    let mut half = body.clone();
                    half.insert(to.to_string(), Value::from(there));
                    indexed.insert(here.to_string(), Value::Object(half));
                }
            }
        }
    }
    Value::Object(indexed)
}

fn extract_id(
    shape: &RecordShape,
    index: usize,
    fields: &Map<String, Value>,
    name: &str,
    diagnostics: &mut Diagnostics,
) -> Option<u32> {
    match fields.get(name) {
        None => {
            diagnostics.push(format!(
                "In {}, element {} has no '{}' field",
                shape.section,
                index + 1,
                name
            ));
            None
        }
        Some(value) => {
            let id = as_id(value);
            if id.is_none() {
                diagnostics.push(format!(
                    "In {}, the '{}' of element {} must be a positive integer",
                    shape.section,
                    name,
                    index + 1
                ));
            }
            id
        }
    }
}
