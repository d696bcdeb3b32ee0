mod common;

use common::assert_close;
use serde_json::json;
use windfarm_challenge::{
    cost::{construction_cost, cost_of_curtailing, evaluate, operational_cost, Network},
    evaluate_solution, Instance, JudgeError, Solution,
};

fn load(instance: serde_json::Value, solution: serde_json::Value) -> (Instance, Solution) {
    (
        Instance::from_value(&instance).unwrap(),
        Solution::from_value(&solution).unwrap(),
    )
}

#[test]
fn test_single_substation_score() {
    let (instance, solution) = load(common::tiny_instance(), common::tiny_solution());
    let breakdown = evaluate(&instance, &solution).unwrap();
    assert_close(breakdown.substations, 50.0);
    assert_close(breakdown.land_cables, 10.0);
    assert_close(breakdown.turbine_cables, 0.0);
    assert_close(breakdown.substation_cables, 0.0);
    assert_close(breakdown.construction, 60.0);
    // 120 produced, 100 exported: 2 * 20 + 10 * 15
    assert_close(breakdown.operational, 190.0);
    assert_close(breakdown.total, 250.0);
}

#[test]
fn test_linked_pair_construction() {
    let (instance, solution) = load(common::pair_instance(), common::pair_solution(true));
    let breakdown = construction_cost(&instance, &solution).unwrap();
    assert_close(breakdown.substations, 20.0);
    assert_close(breakdown.land_cables, 19.0);
    assert_close(breakdown.turbine_cables, 7.0);
    assert_close(breakdown.substation_cables, 13.0);
    assert_close(breakdown.construction, 59.0);
}

#[test]
fn test_swapped_cable_costs_the_same() {
    let mut swapped = common::pair_solution(true);
    swapped["substation_substation_cables"] =
        json!([{"substation_id": 2, "other_substation_id": 1, "cable_type": 1}]);
    let (instance, solution) = load(common::pair_instance(), common::pair_solution(true));
    let (_, reversed) = load(common::pair_instance(), swapped);
    assert_eq!(
        construction_cost(&instance, &solution).unwrap(),
        construction_cost(&instance, &reversed).unwrap()
    );
}

#[test]
fn test_failure_reroutes_through_link() {
    let (instance, solution) = load(common::pair_instance(), common::pair_solution(true));
    let network = Network::build(&instance, &solution).unwrap();
    assert_eq!(network.nodes.len(), 2);
    assert_close(network.nodes[0].capacity, 40.0);
    assert_close(network.total_failure_probability(), 0.3);

    assert_close(network.no_failure_curtailing(30.0), 20.0);
    // 60 produced at 1, 15 rerouted to 2 which then exports 45 of 40
    assert_close(network.failure_curtailing(0, 30.0), 50.0);
    // 30 produced at 2, 15 lost there, 1 then exports 75 of 40
    assert_close(network.failure_curtailing(1, 30.0), 50.0);
    assert_close(network.failure_curtailing(0, 10.0), 5.0);
    assert_close(network.failure_curtailing(1, 10.0), 0.0);

    // 0.5 * (0.15 * 170 + 0.15 * 170 + 0.7 * 50) + 0.5 * (0.15 * 5)
    assert_close(operational_cost(&instance, &solution).unwrap(), 43.375);
    assert_close(evaluate(&instance, &solution).unwrap().total, 102.375);
}

#[test]
fn test_failure_without_link_loses_everything() {
    let (instance, solution) = load(common::pair_instance(), common::pair_solution(false));
    let network = Network::build(&instance, &solution).unwrap();
    assert!(network.nodes.iter().all(|node| node.link.is_none()));
    assert_close(network.failure_curtailing(0, 30.0), 60.0);
    assert_close(network.failure_curtailing(1, 30.0), 50.0);
    assert_close(operational_cost(&instance, &solution).unwrap(), 50.5);
}

#[test]
fn test_curtailing_cost_penalty_starts_past_threshold() {
    let instance = Instance::from_value(&common::pair_instance()).unwrap();
    let parameters = &instance.general_parameters;
    assert_close(cost_of_curtailing(parameters, 0.0), 0.0);
    assert_close(cost_of_curtailing(parameters, 10.0), 10.0);
    assert_close(cost_of_curtailing(parameters, 12.0), 18.0);
}

#[test]
fn test_no_failures_reduce_to_plain_curtailing() {
    let mut raw = common::pair_instance();
    raw["substation_types"][0]["probability_of_failure"] = json!(0);
    raw["land_substation_cable_types"][0]["probability_of_failure"] = json!(0);
    let (instance, solution) = load(raw, common::pair_solution(true));
    let network = Network::build(&instance, &solution).unwrap();

    let expected: f64 = instance
        .wind_scenarios
        .values()
        .map(|s| {
            s.probability
                * cost_of_curtailing(
                    &instance.general_parameters,
                    network.no_failure_curtailing(s.power_generation),
                )
        })
        .sum();
    assert_close(operational_cost(&instance, &solution).unwrap(), expected);
    // 0.5 * (20 + 3 * 10) + 0.5 * 0
    assert_close(expected, 25.0);
}

#[test]
fn test_larger_ratings_never_curtail_more() {
    let (instance, solution) = load(common::pair_instance(), common::pair_solution(true));
    let before = Network::build(&instance, &solution).unwrap();

    let mut upgraded = instance.clone();
    for cable in upgraded.land_substation_cable_types.values_mut() {
        cable.rating += 25.0;
    }
    let after = Network::build(&upgraded, &solution).unwrap();

    for power in [0.0, 10.0, 30.0, 80.0] {
        assert!(after.no_failure_curtailing(power) <= before.no_failure_curtailing(power));
        for k in 0..before.nodes.len() {
            assert!(after.failure_curtailing(k, power) <= before.failure_curtailing(k, power));
        }
    }
}

#[test]
fn test_failure_probabilities_above_one_are_rejected() {
    let mut raw = common::pair_instance();
    raw["substation_types"][0]["probability_of_failure"] = json!(0.55);
    let instance = Instance::from_value(&raw).unwrap();
    match evaluate_solution(&instance, &common::pair_solution(true)) {
        Err(JudgeError::ProbabilityOutOfRange { total }) => assert_close(total, 1.2),
        other => panic!("expected an out of range probability, got {:?}", other),
    }
}
