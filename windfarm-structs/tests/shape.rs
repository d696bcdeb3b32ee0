use std::collections::HashSet;
use windfarm_structs::shape::*;

#[test]
fn test_sections_are_unique() {
    let mut seen = HashSet::new();
    for shape in SOLUTION_SHAPES.iter().chain(INSTANCE_SHAPES.iter()) {
        assert!(seen.insert(shape.section), "{} listed twice", shape.section);
        for alias in shape.aliases {
            assert!(seen.insert(*alias), "{} listed twice", alias);
        }
    }
    assert!(!seen.contains(GENERAL_PARAMETERS));
}

#[test]
fn test_keying_fields_are_ids() {
    for shape in SOLUTION_SHAPES.iter().chain(INSTANCE_SHAPES.iter()) {
        let keys = match shape.keying {
            Keying::Single(id) => vec![id],
            Keying::Symmetric { from, to } => vec![from, to],
        };
        for key in keys {
            let spec = shape.field(key).unwrap();
            assert_eq!(spec.kind, FieldKind::Id);
            assert!(spec.required);
        }
    }
}

#[test]
fn test_solution_shapes_are_strict() {
    assert!(SOLUTION_SHAPES.iter().all(|shape| shape.strict));
    assert!(INSTANCE_SHAPES.iter().all(|shape| !shape.strict));
    assert_eq!(
        SUBSTATION_SUBSTATION_CABLES.field_names().collect::<Vec<_>>(),
        vec![SUBSTATION_ID, OTHER_SUBSTATION_ID, "cable_type"]
    );
    assert!(WIND_SCENARIOS.matches_section("wind_scenario"));
}
