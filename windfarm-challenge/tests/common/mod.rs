#![allow(dead_code)]

use serde_json::{json, Value};

/// One substation next to the main land station with two turbines on it.
pub fn tiny_instance() -> Value {
    json!({
        "general_parameters": {
            "maximum_power": 60,
            "curtailing_cost": 2,
            "curtailing_penalty": 10,
            "maximum_curtailing": 5,
            "fixed_cost_cable": 0,
            "variable_cost_cable": 0,
            "main_land_station": {"x": 0, "y": 0}
        },
        "substation_types": [
            {"id": 1, "cost": 50, "rating": 100, "probability_of_failure": 0}
        ],
        "land_substation_cable_types": [
            {"id": 1, "fixed_cost": 10, "variable_cost": 1, "rating": 100, "probability_of_failure": 0}
        ],
        "substation_substation_cable_types": [
            {"id": 1, "fixed_cost": 4, "variable_cost": 1, "rating": 30}
        ],
        "substation_locations": [{"id": 1, "x": 0, "y": 0}],
        "wind_turbines": [{"id": 1, "x": 0, "y": 0}, {"id": 2, "x": 0, "y": 0}],
        "wind_scenarios": [{"id": 1, "probability": 1, "power_generation": 60}]
    })
}

pub fn tiny_solution() -> Value {
    json!({
        "substations": [{"id": 1, "substation_type": 1, "land_cable_type": 1}],
        "turbines": [{"id": 1, "substation_id": 1}, {"id": 2, "substation_id": 1}],
        "substation_substation_cables": []
    })
}

/// Two sites at (3, 4) and (6, 8), five apart, with failures and two wind
/// scenarios.
pub fn pair_instance() -> Value {
    json!({
        "general_parameters": {
            "maximum_power": 30,
            "curtailing_cost": 1,
            "curtailing_penalty": 3,
            "maximum_curtailing": 10,
            "fixed_cost_cable": 1,
            "variable_cost_cable": 1,
            "main_land_station": {"x": 0, "y": 0}
        },
        "substation_types": [
            {"id": 1, "cost": 10, "rating": 50, "probability_of_failure": 0.1}
        ],
        "land_substation_cable_types": [
            {"id": 1, "fixed_cost": 2, "variable_cost": 1, "rating": 40, "probability_of_failure": 0.05}
        ],
        "substation_substation_cable_types": [
            {"id": 1, "fixed_cost": 3, "variable_cost": 2, "rating": 15}
        ],
        "substation_locations": [{"id": 1, "x": 3, "y": 4}, {"id": 2, "x": 6, "y": 8}],
        "wind_turbines": [
            {"id": 1, "x": 3, "y": 0},
            {"id": 2, "x": 3, "y": 4},
            {"id": 3, "x": 6, "y": 8}
        ],
        "wind_scenarios": [
            {"id": 1, "probability": 0.5, "power_generation": 30},
            {"id": 2, "probability": 0.5, "power_generation": 10}
        ]
    })
}

pub fn pair_solution(linked: bool) -> Value {
    let cables = if linked {
        json!([{"substation_id": 1, "other_substation_id": 2, "cable_type": 1}])
    } else {
        json!([])
    };
    json!({
        "substations": [
            {"id": 1, "substation_type": 1, "land_cable_type": 1},
            {"id": 2, "substation_type": 1, "land_cable_type": 1}
        ],
        "turbines": [
            {"id": 1, "substation_id": 1},
            {"id": 2, "substation_id": 1},
            {"id": 3, "substation_id": 2}
        ],
        "substation_substation_cables": cables
    })
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}
