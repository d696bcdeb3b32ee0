//! Construction cost and expected curtailing cost of a checked solution.

use crate::{
    error::{Diagnostics, JudgeError, Result},
    instance::{Catalog, GeneralParameters, Instance},
    solution::Solution,
};
use tracing::{debug, info};
use windfarm_structs::core::CostBreakdown;

fn lookup<'a, T>(catalog: &'a Catalog<T>, id: u32, what: &str) -> Result<&'a T> {
    catalog.get(&id).ok_or_else(|| {
        JudgeError::Invalid(Diagnostics::from(vec![format!(
            "The {} {} does not exist",
            what, id
        )]))
    })
}

/// Linear rate on every unit curtailed plus a penalty rate on what exceeds
/// the maximum curtailing.
pub fn cost_of_curtailing(parameters: &GeneralParameters, curtailing: f64) -> f64 {
    parameters.curtailing_cost * curtailing
        + parameters.curtailing_penalty * (curtailing - parameters.maximum_curtailing).max(0.0)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    pub other_substation_id: u32,
    pub rating: f64,
}

/// A built substation as seen by the curtailing model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node {
    pub substation_id: u32,
    /// min(substation rating, land cable rating)
    pub capacity: f64,
    /// Substation failure plus land cable failure.
    pub failure_probability: f64,
    pub num_turbines: usize,
    pub link: Option<Link>,
}

/// Power flow view of a solution: one node per built substation, in id order.
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    pub nodes: Vec<Node>,
}

impl Network {
    pub fn build(instance: &Instance, solution: &Solution) -> Result<Network> {
        let counts = solution.turbine_counts();
        let mut nodes = Vec::with_capacity(solution.substations.len());
        for (id, substation) in &solution.substations {
            let substation_type = lookup(
                &instance.substation_types,
                substation.substation_type,
                "substation type",
            )?;
            let land_cable = lookup(
                &instance.land_substation_cable_types,
                substation.land_cable_type,
                "land cable type",
            )?;
            let link = match solution.linked_substation(*id) {
                Some(half) => Some(Link {
                    other_substation_id: half.other_substation_id,
                    rating: lookup(
                        &instance.substation_substation_cable_types,
                        half.cable_type,
                        "substation-substation cable type",
                    )?
                    .rating,
                }),
                None => None,
            };
            nodes.push(Node {
                substation_id: *id,
                capacity: substation_type.rating.min(land_cable.rating),
                failure_probability: substation_type.probability_of_failure
                    + land_cable.probability_of_failure,
                num_turbines: counts.get(id).copied().unwrap_or(0),
                link,
            });
        }
        Ok(Network { nodes })
    }

    pub fn total_failure_probability(&self) -> f64 {
        self.nodes.iter().map(|node| node.failure_probability).sum()
    }

    /// Probability that no substation fails. Errors when the failure
    /// probabilities add up to more than one.
    pub fn no_failure_probability(&self) -> Result<f64> {
        let total = self.total_failure_probability();
        if !(0.0..=1.0).contains(&total) {
            return Err(JudgeError::ProbabilityOutOfRange { total });
        }
        Ok((1.0 - total).max(0.0))
    }

    /// Power that cannot be exported when every substation works and each
    /// turbine produces `power`.
    pub fn no_failure_curtailing(&self, power: f64) -> f64 {
        self.nodes
            .iter()
            .map(|node| (power * node.num_turbines as f64 - node.capacity).max(0.0))
            .sum()
    }

    /// Curtailing when the node at `failed` is down.
    ///
    /// Its turbines' power goes through its substation-substation cable up to
    /// the cable rating and the rest is lost. The linked substation has to
    /// export the rerouted power on top of its own.
    pub fn failure_curtailing(&self, failed: usize, power: f64) -> f64 {
        let node = &self.nodes[failed];
        let produced = power * node.num_turbines as f64;
        let (rerouted, neighbour) = match node.link {
            Some(link) => (produced.min(link.rating), Some(link.other_substation_id)),
            None => (0.0, None),
        };

        let mut curtailing = produced - rerouted;
        for (j, other) in self.nodes.iter().enumerate() {
            if j == failed {
                continue;
            }
            let mut incoming = power * other.num_turbines as f64;
            if neighbour == Some(other.substation_id) {
                incoming += rerouted;
            }
            curtailing += (incoming - other.capacity).max(0.0);
        }
        curtailing
    }

    /// Expected curtailing cost of one scenario over the no-failure case and
    /// every single-substation failure.
    pub fn scenario_cost(
        &self,
        parameters: &GeneralParameters,
        power: f64,
        no_failure_probability: f64,
    ) -> f64 {
        let mut cost = 0.0;
        for (k, node) in self.nodes.iter().enumerate() {
            cost += node.failure_probability
                * cost_of_curtailing(parameters, self.failure_curtailing(k, power));
        }
        cost + no_failure_probability
            * cost_of_curtailing(parameters, self.no_failure_curtailing(power))
    }
}

pub fn construction_cost(instance: &Instance, solution: &Solution) -> Result<CostBreakdown> {
    let parameters = &instance.general_parameters;
    let main_land = parameters.main_land_station;

    let mut substations = 0.0;
    let mut land_cables = 0.0;
    for (id, substation) in &solution.substations {
        let site = lookup(&instance.substation_locations, *id, "substation location")?;
        let substation_type = lookup(
            &instance.substation_types,
            substation.substation_type,
            "substation type",
        )?;
        let land_cable = lookup(
            &instance.land_substation_cable_types,
            substation.land_cable_type,
            "land cable type",
        )?;
        substations += substation_type.cost;
        land_cables += land_cable.cost(site.distance(&main_land));
    }

    let mut turbine_cables = 0.0;
    for (id, turbine) in &solution.turbines {
        let position = lookup(&instance.wind_turbines, *id, "wind turbine")?;
        let site = lookup(
            &instance.substation_locations,
            turbine.substation_id,
            "substation location",
        )?;
        turbine_cables +=
            parameters.fixed_cost_cable + parameters.variable_cost_cable * position.distance(site);
    }

    // both halves of a physical cable are stored, each pays half
    let mut substation_cables = 0.0;
    for (id, half) in &solution.substation_substation_cables {
        let from = lookup(&instance.substation_locations, *id, "substation location")?;
        let to = lookup(
            &instance.substation_locations,
            half.other_substation_id,
            "substation location",
        )?;
        let cable = lookup(
            &instance.substation_substation_cable_types,
            half.cable_type,
            "substation-substation cable type",
        )?;
        substation_cables += cable.cost(from.distance(to)) / 2.0;
    }

    let construction = substations + land_cables + turbine_cables + substation_cables;
    Ok(CostBreakdown {
        substations,
        land_cables,
        turbine_cables,
        substation_cables,
        construction,
        operational: 0.0,
        total: construction,
    })
}

/// Probability weighted curtailing cost over all wind scenarios.
pub fn operational_cost(instance: &Instance, solution: &Solution) -> Result<f64> {
    let network = Network::build(instance, solution)?;
    let no_failure_probability = network.no_failure_probability()?;
    debug!(
        "Contingency sweep over {} scenarios and {} substations, no-failure probability {}",
        instance.wind_scenarios.len(),
        network.nodes.len(),
        no_failure_probability
    );

    let mut operational = 0.0;
    for scenario in instance.wind_scenarios.values() {
        operational += scenario.probability
            * network.scenario_cost(
                &instance.general_parameters,
                scenario.power_generation,
                no_failure_probability,
            );
    }
    Ok(operational)
}

/// Total score: construction cost plus operational cost.
pub fn evaluate(instance: &Instance, solution: &Solution) -> Result<CostBreakdown> {
    let mut breakdown = construction_cost(instance, solution)?;
    breakdown.operational = operational_cost(instance, solution)?;
    breakdown.total = breakdown.construction + breakdown.operational;
    info!(
        "Construction cost {} (substations {}, land cables {}, turbine cables {}, substation cables {}), operational cost {}, total {}",
        breakdown.construction,
        breakdown.substations,
        breakdown.land_cables,
        breakdown.turbine_cables,
        breakdown.substation_cables,
        breakdown.operational,
        breakdown.total
    );
    Ok(breakdown)
}
