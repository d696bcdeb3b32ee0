use crate::serializable_struct_with_getters;
use serde::{Deserialize, Serialize};
use windfarm_utils::jsonify;

serializable_struct_with_getters! {
    CostBreakdown {
        /// Build cost of every substation.
        substations: f64,
        land_cables: f64,
        turbine_cables: f64,
        substation_cables: f64,
        construction: f64,
        /// Expected curtailing cost over scenarios and failures.
        operational: f64,
        total: f64,
    }
}

serializable_struct_with_getters! {
    Verdict {
        score: f64,
        errors: Vec<String>,
        breakdown: Option<CostBreakdown>,
    }
}

impl Verdict {
    pub fn scored(breakdown: CostBreakdown) -> Self {
        Self {
            score: breakdown.total,
            errors: Vec::new(),
            breakdown: Some(breakdown),
        }
    }

    pub fn rejected(failure_score: f64, errors: Vec<String>) -> Self {
        Self {
            score: failure_score,
            errors,
            breakdown: None,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        jsonify(self)
    }
}
