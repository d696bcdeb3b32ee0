use crate::{
    error::{Diagnostics, JudgeError, Result},
    format::check_instance_format,
    normalize::normalize_document,
};
use anyhow::anyhow;
use rand::{
    rngs::{SmallRng, StdRng},
    Rng, SeedableRng,
};
use serde::{Deserialize, Serialize};
use serde_json::{from_value, to_value, Map, Value};
use std::collections::BTreeMap;
use tracing::debug;
use windfarm_structs::shape::{
    GENERAL_PARAMETERS, ID, INSTANCE_SHAPES, LAND_SUBSTATION_CABLE_TYPES, SUBSTATION_LOCATIONS,
    SUBSTATION_SUBSTATION_CABLE_TYPES, SUBSTATION_TYPES, WIND_SCENARIOS, WIND_TURBINES,
};

/// Instance table indexed by id.
pub type Catalog<T> = BTreeMap<u32, T>;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Position) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GeneralParameters {
    pub maximum_power: f64,
    pub curtailing_cost: f64,
    pub curtailing_penalty: f64,
    pub maximum_curtailing: f64,
    /// Turbine to substation cable.
    pub fixed_cost_cable: f64,
    pub variable_cost_cable: f64,
    #[serde(alias = "main_land_sation")]
    pub main_land_station: Position,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SubstationType {
    pub cost: f64,
    pub rating: f64,
    pub probability_of_failure: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CableType {
    pub fixed_cost: f64,
    pub variable_cost: f64,
    pub rating: f64,
    #[serde(default)]
    pub probability_of_failure: f64,
}

impl CableType {
    pub fn cost(&self, length: f64) -> f64 {
        self.fixed_cost + self.variable_cost * length
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WindScenario {
    pub probability: f64,
    /// Power produced by each turbine in this scenario.
    pub power_generation: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Instance {
    pub general_parameters: GeneralParameters,
    pub substation_types: Catalog<SubstationType>,
    pub land_substation_cable_types: Catalog<CableType>,
    pub substation_substation_cable_types: Catalog<CableType>,
    pub substation_locations: Catalog<Position>,
    pub wind_turbines: Catalog<Position>,
    #[serde(alias = "wind_scenario")]
    pub wind_scenarios: Catalog<WindScenario>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct InstanceSize {
    pub num_sites: usize,
    pub num_turbines: usize,
    pub num_substation_types: usize,
    pub num_cable_types: usize,
    pub num_scenarios: usize,
}

impl TryFrom<Vec<i32>> for InstanceSize {
    type Error = anyhow::Error;

    fn try_from(arr: Vec<i32>) -> anyhow::Result<Self> {
        let sizes = <[i32; 5]>::try_from(arr.as_slice())
            .map_err(|_| anyhow!("Expecting 5 numbers for the size, got {}", arr.len()))?;
        if sizes.iter().any(|n| *n < 1) {
            return Err(anyhow!("Every size must be positive, got {:?}", sizes));
        }
        let [num_sites, num_turbines, num_substation_types, num_cable_types, num_scenarios] =
            sizes.map(|n| n as usize);
        Ok(Self {
            num_sites,
            num_turbines,
            num_substation_types,
            num_cable_types,
            num_scenarios,
        })
    }
}

pub const FIELD_SIZE: f64 = 1000.0;

fn records<T: Serialize>(catalog: &Catalog<T>) -> serde_json::Result<Value> {
    let mut list = Vec::with_capacity(catalog.len());
    for (id, entry) in catalog {
        let mut record = Map::new();
        record.insert(ID.to_string(), Value::from(*id));
        if let Value::Object(fields) = to_value(entry)? {
            record.extend(fields);
        }
        list.push(Value::Object(record));
    }
    Ok(Value::Array(list))
}

impl Instance {
    /// Builds an instance from a raw document with its keys already cleaned.
    ///
    /// The document goes through the format checks, then every catalog is
    /// indexed by id. Catalog ids must cover `1..=N` without gaps.
    pub fn from_value(raw: &Value) -> Result<Instance> {
        check_instance_format(raw).map_err(JudgeError::Instance)?;
        let normalized = normalize_document(raw, &INSTANCE_SHAPES).map_err(JudgeError::Instance)?;
        let instance: Instance = from_value(normalized).map_err(|e| {
            JudgeError::Instance(Diagnostics::from(vec![format!(
                "The instance cannot be read: {}",
                e
            )]))
        })?;
        instance.check_dense_ids().map_err(JudgeError::Instance)?;
        debug!(
            "Instance loaded: {} sites, {} turbines, {} scenarios",
            instance.num_sites(),
            instance.num_turbines(),
            instance.wind_scenarios.len()
        );
        Ok(instance)
    }

    fn check_dense_ids(&self) -> std::result::Result<(), Diagnostics> {
        fn check<T>(section: &str, catalog: &Catalog<T>, diagnostics: &mut Diagnostics) {
            let n = catalog.len() as u32;
            for (expected, id) in (1..=n).zip(catalog.keys()) {
                if expected != *id {
                    diagnostics.push(format!(
                        "In {}, ids must be 1..{} without gaps, id {} is missing",
                        section, n, expected
                    ));
                    return;
                }
            }
        }

        let mut diagnostics = Diagnostics::new();
        check(SUBSTATION_TYPES.section, &self.substation_types, &mut diagnostics);
        check(
            LAND_SUBSTATION_CABLE_TYPES.section,
            &self.land_substation_cable_types,
            &mut diagnostics,
        );
        check(
            SUBSTATION_SUBSTATION_CABLE_TYPES.section,
            &self.substation_substation_cable_types,
            &mut diagnostics,
        );
        check(SUBSTATION_LOCATIONS.section, &self.substation_locations, &mut diagnostics);
        check(WIND_TURBINES.section, &self.wind_turbines, &mut diagnostics);
        check(WIND_SCENARIOS.section, &self.wind_scenarios, &mut diagnostics);
        diagnostics.into_result(())
    }

    /// The instance as a document with every catalog written as a list of
    /// records carrying their `id`.
    pub fn to_document(&self) -> serde_json::Result<Value> {
        let mut document = Map::new();
        document.insert(
            GENERAL_PARAMETERS.to_string(),
            to_value(&self.general_parameters)?,
        );
        let catalogs = [
            (SUBSTATION_TYPES.section, records(&self.substation_types)?),
            (
                LAND_SUBSTATION_CABLE_TYPES.section,
                records(&self.land_substation_cable_types)?,
            ),
            (
                SUBSTATION_SUBSTATION_CABLE_TYPES.section,
                records(&self.substation_substation_cable_types)?,
            ),
            (SUBSTATION_LOCATIONS.section, records(&self.substation_locations)?),
            (WIND_TURBINES.section, records(&self.wind_turbines)?),
            (WIND_SCENARIOS.section, records(&self.wind_scenarios)?),
        ];
        for (section, list) in catalogs {
            document.insert(section.to_string(), list);
        }
        Ok(Value::Object(document))
    }

    pub fn num_sites(&self) -> usize {
        self.substation_locations.len()
    }

    pub fn num_turbines(&self) -> usize {
        self.wind_turbines.len()
    }

    /// Random but well formed instance on a square field, with the main land
    /// station at the origin.
    ///
    /// Failure probabilities are drawn small enough that building every site
    /// with the least reliable options keeps their total below one.
    pub fn generate(seed: &[u8; 32], size: &InstanceSize) -> anyhow::Result<Instance> {
        if size.num_sites == 0
            || size.num_turbines == 0
            || size.num_substation_types == 0
            || size.num_cable_types == 0
            || size.num_scenarios == 0
        {
            return Err(anyhow!("Every catalog of the instance needs at least one entry"));
        }
        let mut rng = SmallRng::from_seed(StdRng::from_seed(seed.clone()).gen());
        let max_failure = 0.45 / size.num_sites as f64;

        let general_parameters = GeneralParameters {
            maximum_power: 10.0,
            curtailing_cost: rng.gen_range(1.0..5.0),
            curtailing_penalty: rng.gen_range(5.0..50.0),
            maximum_curtailing: rng.gen_range(0.0..(5.0 * size.num_turbines as f64)),
            fixed_cost_cable: rng.gen_range(0.0..10.0),
            variable_cost_cable: rng.gen_range(0.1..1.0),
            main_land_station: Position::new(0.0, 0.0),
        };

        let substation_types = (1..=size.num_substation_types as u32)
            .map(|id| {
                let rating = rng.gen_range(20.0..200.0);
                let substation_type = SubstationType {
                    cost: rating * rng.gen_range(1.0..3.0),
                    rating,
                    probability_of_failure: rng.gen_range(0.0..max_failure),
                };
                (id, substation_type)
            })
            .collect();

        let cable_catalog = |rng: &mut SmallRng, with_failures: bool| -> Catalog<CableType> {
            (1..=size.num_cable_types as u32)
                .map(|id| {
                    let rating = rng.gen_range(20.0..200.0);
                    let cable_type = CableType {
                        fixed_cost: rng.gen_range(10.0..100.0),
                        variable_cost: rating * rng.gen_range(0.01..0.05),
                        rating,
                        probability_of_failure: if with_failures {
                            rng.gen_range(0.0..max_failure)
                        } else {
                            0.0
                        },
                    };
                    (id, cable_type)
                })
                .collect()
        };
        let land_substation_cable_types = cable_catalog(&mut rng, true);
        let substation_substation_cable_types = cable_catalog(&mut rng, false);

        let random_position = |rng: &mut SmallRng, min_x: f64| {
            Position::new(rng.gen_range(min_x..FIELD_SIZE), rng.gen_range(0.0..FIELD_SIZE))
        };
        let substation_locations = (1..=size.num_sites as u32)
            .map(|id| (id, random_position(&mut rng, FIELD_SIZE * 0.25)))
            .collect();
        let wind_turbines = (1..=size.num_turbines as u32)
            .map(|id| (id, random_position(&mut rng, FIELD_SIZE * 0.5)))
            .collect();

        let weights: Vec<f64> = (0..size.num_scenarios)
            .map(|_| rng.gen_range(0.1..1.0))
            .collect();
        let total_weight: f64 = weights.iter().sum();
        let wind_scenarios = weights
            .iter()
            .enumerate()
            .map(|(i, w)| {
                let scenario = WindScenario {
                    probability: w / total_weight,
                    power_generation: rng.gen_range(0.0..general_parameters.maximum_power),
                };
                (i as u32 + 1, scenario)
            })
            .collect();

        Ok(Instance {
            general_parameters,
            substation_types,
            land_substation_cable_types,
            substation_substation_cable_types,
            substation_locations,
            wind_turbines,
            wind_scenarios,
        })
    }
}
