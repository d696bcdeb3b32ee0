//! Shape checks on raw documents, run before anything is indexed.

use crate::{error::Diagnostics, normalize::as_id};
use serde_json::{Map, Value};
use windfarm_structs::shape::{
    FieldKind, FieldSpec, RecordShape, GENERAL_PARAMETERS, GENERAL_PARAMETER_FIELDS,
    INSTANCE_SHAPES, MAIN_LAND_STATION_ALIASES, SOLUTION_SHAPES,
};

/// Checks that a solution has exactly the three expected sections and that
/// every record carries exactly the expected integer fields.
pub fn check_solution_format(solution: &Value) -> Result<(), Diagnostics> {
    let mut diagnostics = Diagnostics::new();
    let root = match solution {
        Value::Object(root) => root,
        _ => {
            diagnostics.push("The solution isn't a dictionary");
            return Err(diagnostics);
        }
    };

    let expected: Vec<&str> = SOLUTION_SHAPES.iter().map(|shape| shape.section).collect();
    let mut wrong_keys = false;
    for section in &expected {
        if !root.contains_key(*section) {
            diagnostics.push(format!("Key '{}' is missing from the solution", section));
            wrong_keys = true;
        }
    }
    for key in root.keys() {
        if !expected.contains(&key.as_str()) {
            diagnostics.push(format!("Key '{}' is not expected in the solution", key));
            wrong_keys = true;
        }
    }
    if wrong_keys {
        diagnostics.push(format!(
            "The solution must contain exactly three keys: '{}', '{}' and '{}'",
            expected[0], expected[1], expected[2]
        ));
    }

    for shape in &SOLUTION_SHAPES {
        if let Some(section) = root.get(shape.section) {
            check_records(shape, section, &mut diagnostics);
        }
    }
    diagnostics.into_result(())
}

/// Checks the sections and field types of an instance document. Instances may
/// carry extra sections and extra record fields.
pub fn check_instance_format(instance: &Value) -> Result<(), Diagnostics> {
    let mut diagnostics = Diagnostics::new();
    let root = match instance {
        Value::Object(root) => root,
        _ => {
            diagnostics.push("The instance isn't a dictionary");
            return Err(diagnostics);
        }
    };

    match root.get(GENERAL_PARAMETERS) {
        None => diagnostics.push(format!(
            "The instance has no '{}' section",
            GENERAL_PARAMETERS
        )),
        Some(Value::Object(parameters)) => check_general_parameters(parameters, &mut diagnostics),
        Some(_) => diagnostics.push(format!(
            "The element at key '{}' is not a dictionary",
            GENERAL_PARAMETERS
        )),
    }

    for shape in &INSTANCE_SHAPES {
        match root.iter().find(|(key, _)| shape.matches_section(key)) {
            Some((_, section)) => check_records(shape, section, &mut diagnostics),
            None => diagnostics.push(format!(
                "The instance has no '{}' section",
                shape.section
            )),
        }
    }
    diagnostics.into_result(())
}

fn check_general_parameters(parameters: &Map<String, Value>, diagnostics: &mut Diagnostics) {
    for spec in GENERAL_PARAMETER_FIELDS {
        let value = parameters.get(spec.name).or_else(|| {
            if spec.kind == FieldKind::Position {
                MAIN_LAND_STATION_ALIASES
                    .iter()
                    .find_map(|alias| parameters.get(*alias))
            } else {
                None
            }
        });
        match value {
            None => diagnostics.push(format!(
                "In {}, key '{}' is missing",
                GENERAL_PARAMETERS, spec.name
            )),
            Some(value) => {
                if let Some(expected) = type_mismatch(spec, value) {
                    diagnostics.push(format!(
                        "In {}, '{}' must be {}",
                        GENERAL_PARAMETERS, spec.name, expected
                    ));
                }
            }
        }
    }
}

fn check_records(shape: &RecordShape, section: &Value, diagnostics: &mut Diagnostics) {
    let records = match section {
        Value::Array(records) => records,
        // instance tables may already be indexed by id
        Value::Object(_) if !shape.strict => return,
        _ => {
            diagnostics.push(format!(
                "The element at key '{}' is not a list",
                shape.section
            ));
            return;
        }
    };

    for (i, record) in records.iter().enumerate() {
        let fields = match record {
            Value::Object(fields) => fields,
            _ => {
                diagnostics.push(format!(
                    "The list of {} must contain dictionaries, element {} is not one",
                    shape.section,
                    i + 1
                ));
                continue;
            }
        };

        for spec in shape.fields {
            match fields.get(spec.name) {
                None if spec.required => diagnostics.push(format!(
                    "In {}, key '{}' is missing from the {} {}",
                    shape.section,
                    spec.name,
                    shape.record,
                    i + 1
                )),
                None => {}
                Some(value) => {
                    if let Some(expected) = type_mismatch(spec, value) {
                        diagnostics.push(format!(
                            "In {}, the '{}' of {} {} must be {}",
                            shape.section,
                            spec.name,
                            shape.record,
                            i + 1,
                            expected
                        ));
                    }
                }
            }
        }

        if shape.strict {
            for key in fields.keys() {
                if shape.field(key).is_none() {
                    diagnostics.push(format!(
                        "In {}, key '{}' is not expected in the {} {}",
                        shape.section,
                        key,
                        shape.record,
                        i + 1
                    ));
                }
            }
        }
    }
}

/// Description of the expected type when `value` does not fit `spec`.
fn type_mismatch(spec: &FieldSpec, value: &Value) -> Option<&'static str> {
    let fits = match spec.kind {
        FieldKind::Id => as_id(value).is_some(),
        FieldKind::Number => value.is_number(),
        FieldKind::Position => match value {
            Value::Object(position) => ["x", "y"]
                .iter()
                .all(|axis| position.get(*axis).map_or(false, Value::is_number)),
            _ => false,
        },
    };
    if fits {
        None
    } else {
        Some(match spec.kind {
            FieldKind::Id => "a positive integer",
            FieldKind::Number => "a number",
            FieldKind::Position => "a position with numeric 'x' and 'y'",
        })
    }
}
