use crate::{error::Diagnostics, instance::Instance, solution::Solution};
use std::collections::BTreeSet;
use tracing::debug;

/// Checks every reference of a normalized solution against the instance and
/// the solution itself.
///
/// All checks run to the end and the problems come back as one list.
pub fn check_constraints(solution: &Solution, instance: &Instance) -> Result<(), Diagnostics> {
    let mut diagnostics = Diagnostics::new();
    check_substations(solution, instance, &mut diagnostics);
    check_turbines(solution, instance, &mut diagnostics);
    check_substation_cables(solution, instance, &mut diagnostics);
    debug!("Constraint check found {} problems", diagnostics.len());
    diagnostics.into_result(())
}

/// Sites exist, and the chosen substation and land cable types are in their
/// catalogs.
pub fn check_substations(solution: &Solution, instance: &Instance, diagnostics: &mut Diagnostics) {
    for (id, substation) in &solution.substations {
        if !instance.substation_locations.contains_key(id) {
            diagnostics.push(format!(
                "The id of substation {} is not valid, it does not exist in the list of substation_locations",
                id
            ));
        }
        if !instance
            .substation_types
            .contains_key(&substation.substation_type)
        {
            diagnostics.push(format!(
                "The substation_type {} of substation {} is not valid, it does not exist in the list of substation_types",
                substation.substation_type, id
            ));
        }
        if !instance
            .land_substation_cable_types
            .contains_key(&substation.land_cable_type)
        {
            diagnostics.push(format!(
                "The land_cable_type {} of substation {} is not valid, it does not exist in the list of land_substation_cable_types",
                substation.land_cable_type, id
            ));
        }
    }
}

/// Every catalog turbine appears once and is wired to a built substation.
pub fn check_turbines(solution: &Solution, instance: &Instance, diagnostics: &mut Diagnostics) {
    for (id, turbine) in &solution.turbines {
        if !instance.wind_turbines.contains_key(id) {
            diagnostics.push(format!(
                "The id of turbine {} is not valid - it doesn't exist in the list of wind_turbines",
                id
            ));
        }
        if !solution.substations.contains_key(&turbine.substation_id) {
            diagnostics.push(format!(
                "The turbine {} is linked to the substation {}, which is not built",
                id, turbine.substation_id
            ));
        }
    }
    let listed: BTreeSet<u32> = solution.turbines.keys().copied().collect();
    check_missing_turbines(&listed, instance, diagnostics);
}

/// Every catalog turbine is among `listed`.
pub fn check_missing_turbines(
    listed: &BTreeSet<u32>,
    instance: &Instance,
    diagnostics: &mut Diagnostics,
) {
    for id in instance.wind_turbines.keys() {
        if !listed.contains(id) {
            diagnostics.push(format!(
                "The turbine with id {} does not appear in the list of turbines, but it should",
                id
            ));
        }
    }
}

/// Both ends of every cable are built substations and the cable type is in
/// its catalog. Each physical cable is checked once.
pub fn check_substation_cables(
    solution: &Solution,
    instance: &Instance,
    diagnostics: &mut Diagnostics,
) {
    for (id, half) in &solution.substation_substation_cables {
        if *id > half.other_substation_id {
            continue;
        }
        for end in [*id, half.other_substation_id] {
            if !solution.substations.contains_key(&end) {
                diagnostics.push(format!(
                    "The cable between substations {} and {} is linked to the substation {}, which is not built",
                    id, half.other_substation_id, end
                ));
            }
        }
        if !instance
            .substation_substation_cable_types
            .contains_key(&half.cable_type)
        {
            diagnostics.push(format!(
                "The cable_type {} of the cable between substations {} and {} is not valid, it does not exist in the list of substation_substation_cable_types",
                half.cable_type, id, half.other_substation_id
            ));
        }
    }
}
