use crate::{
    error::{Diagnostics, JudgeError, Result},
    format::check_solution_format,
    instance::Instance,
    normalize::{as_id, normalize_document},
};
use anyhow::anyhow;
use rand::{
    rngs::{SmallRng, StdRng},
    seq::SliceRandom,
    Rng, SeedableRng,
};
use serde::{Deserialize, Serialize};
use serde_json::{from_value, to_value, Value};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;
use windfarm_structs::shape::{ID, SOLUTION_SHAPES, TURBINES};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct SubstationRecord {
    pub id: u32,
    pub substation_type: u32,
    pub land_cable_type: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct TurbineRecord {
    pub id: u32,
    pub substation_id: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct SubSubCableRecord {
    pub substation_id: u32,
    pub other_substation_id: u32,
    pub cable_type: u32,
}

/// A solution as contestants write it: three lists of records.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct SolutionFile {
    pub substations: Vec<SubstationRecord>,
    pub turbines: Vec<TurbineRecord>,
    pub substation_substation_cables: Vec<SubSubCableRecord>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct BuiltSubstation {
    pub substation_type: u32,
    pub land_cable_type: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct TurbineAssignment {
    pub substation_id: u32,
}

/// One direction of a physical substation-substation cable.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct HalfCable {
    pub other_substation_id: u32,
    pub cable_type: u32,
}

/// A solution indexed by id.
///
/// `substation_substation_cables` holds both directions of every physical
/// cable, keyed by the substation each half leaves from.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Solution {
    pub substations: BTreeMap<u32, BuiltSubstation>,
    pub turbines: BTreeMap<u32, TurbineAssignment>,
    pub substation_substation_cables: BTreeMap<u32, HalfCable>,
}

impl Solution {
    /// Format checks then id normalization of a raw document whose keys are
    /// already cleaned.
    pub fn from_value(raw: &Value) -> Result<Solution> {
        check_solution_format(raw).map_err(JudgeError::Invalid)?;
        Solution::normalize(raw)
    }

    /// Id normalization of a raw document that already passed the format
    /// checks.
    pub fn normalize(raw: &Value) -> Result<Solution> {
        let normalized = normalize_document(raw, &SOLUTION_SHAPES).map_err(JudgeError::Invalid)?;
        let solution: Solution = from_value(normalized).map_err(|e| {
            JudgeError::Invalid(Diagnostics::from(vec![format!(
                "The solution cannot be read: {}",
                e
            )]))
        })?;
        debug!(
            "Solution normalized: {} substations, {} turbines, {} cables",
            solution.substations.len(),
            solution.turbines.len(),
            solution.substation_substation_cables.len() / 2
        );
        Ok(solution)
    }

    /// Every turbine id listed in a raw document, repeated ids once.
    pub fn listed_turbine_ids(raw: &Value) -> BTreeSet<u32> {
        raw.get(TURBINES.section)
            .and_then(Value::as_array)
            .map(|records| {
                records
                    .iter()
                    .filter_map(|record| record.get(ID).and_then(as_id))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn linked_substation(&self, substation_id: u32) -> Option<&HalfCable> {
        self.substation_substation_cables.get(&substation_id)
    }

    /// Number of turbines wired to each built substation.
    pub fn turbine_counts(&self) -> BTreeMap<u32, usize> {
        let mut counts: BTreeMap<u32, usize> =
            self.substations.keys().map(|id| (*id, 0)).collect();
        for turbine in self.turbines.values() {
            *counts.entry(turbine.substation_id).or_default() += 1;
        }
        counts
    }
}

impl TryFrom<&SolutionFile> for Solution {
    type Error = JudgeError;

    fn try_from(file: &SolutionFile) -> Result<Self> {
        let raw = to_value(file).map_err(|e| {
            JudgeError::Invalid(Diagnostics::from(vec![format!(
                "The solution cannot be written as JSON: {}",
                e
            )]))
        })?;
        Solution::from_value(&raw)
    }
}

impl SolutionFile {
    /// Random feasible solution for `instance`.
    ///
    /// A random non-empty subset of sites is built with random types, every
    /// turbine goes to a random built substation and disjoint pairs of built
    /// substations are linked at random.
    pub fn random(instance: &Instance, seed: &[u8; 32]) -> anyhow::Result<SolutionFile> {
        if instance.substation_locations.is_empty()
            || instance.substation_types.is_empty()
            || instance.land_substation_cable_types.is_empty()
        {
            return Err(anyhow!(
                "Instance needs at least one site, substation type and land cable type"
            ));
        }
        let mut rng = SmallRng::from_seed(StdRng::from_seed(seed.clone()).gen());

        let mut sites: Vec<u32> = instance.substation_locations.keys().copied().collect();
        sites.shuffle(&mut rng);
        let num_built = rng.gen_range(1..=sites.len());
        let mut built: Vec<u32> = sites[..num_built].to_vec();
        built.sort_unstable();

        let num_substation_types = instance.substation_types.len() as u32;
        let num_land_cable_types = instance.land_substation_cable_types.len() as u32;
        let num_sub_sub_cable_types = instance.substation_substation_cable_types.len() as u32;

        let substations = built
            .iter()
            .map(|&id| SubstationRecord {
                id,
                substation_type: rng.gen_range(1..=num_substation_types),
                land_cable_type: rng.gen_range(1..=num_land_cable_types),
            })
            .collect();

        let turbines = instance
            .wind_turbines
            .keys()
            .map(|&id| TurbineRecord {
                id,
                substation_id: built[rng.gen_range(0..built.len())],
            })
            .collect();

        let mut unlinked = built.clone();
        unlinked.shuffle(&mut rng);
        let mut substation_substation_cables = Vec::new();
        if num_sub_sub_cable_types > 0 {
            for pair in unlinked.chunks_exact(2) {
                if rng.gen_bool(0.5) {
                    substation_substation_cables.push(SubSubCableRecord {
                        substation_id: pair[0],
                        other_substation_id: pair[1],
                        cable_type: rng.gen_range(1..=num_sub_sub_cable_types),
                    });
                }
            }
        }

        Ok(SolutionFile {
            substations,
            turbines,
            substation_substation_cables,
        })
    }
}
