//! End to end judging: load, check, score, and the report handed back to
//! the caller.
//!
//! Each pass accumulates its own problems. A failing pass stops the ones
//! after it: format before normalization, normalization before references,
//! references before scoring.

use crate::{
    constraints::{check_constraints, check_missing_turbines},
    cost::evaluate,
    error::{JudgeError, Result},
    format::check_solution_format,
    instance::Instance,
    solution::Solution,
};
use serde_json::Value;
use std::path::Path;
use tracing::{debug, warn};
use windfarm_structs::{
    config::JudgeConfig,
    core::{CostBreakdown, Verdict},
};
use windfarm_utils::{clean_keys, load_json};

pub fn load_document(path: impl AsRef<Path>, config: &JudgeConfig) -> Result<Value> {
    let path = path.as_ref();
    debug!("Loading {}", path.display());
    let raw = load_json(path)?;
    Ok(if config.clean_keys {
        clean_keys(&raw)
    } else {
        raw
    })
}

/// Checks a raw solution against an already loaded instance.
///
/// A normalization failure still reports the catalog turbines missing from
/// the document, so a repeated turbine does not hide a forgotten one.
pub fn verify_solution(instance: &Instance, raw_solution: &Value) -> Result<Solution> {
    check_solution_format(raw_solution).map_err(JudgeError::Invalid)?;
    let solution = match Solution::normalize(raw_solution) {
        Ok(solution) => solution,
        Err(JudgeError::Invalid(mut problems)) => {
            let listed = Solution::listed_turbine_ids(raw_solution);
            check_missing_turbines(&listed, instance, &mut problems);
            return Err(JudgeError::Invalid(problems));
        }
        Err(e) => return Err(e),
    };
    check_constraints(&solution, instance).map_err(JudgeError::Invalid)?;
    Ok(solution)
}

/// Checks then scores a raw solution against an already loaded instance.
pub fn evaluate_solution(instance: &Instance, raw_solution: &Value) -> Result<CostBreakdown> {
    let solution = verify_solution(instance, raw_solution)?;
    evaluate(instance, &solution)
}

/// Loads both documents and checks the solution without scoring it.
pub fn check(
    instance_path: impl AsRef<Path>,
    solution_path: impl AsRef<Path>,
    config: &JudgeConfig,
) -> Result<(Instance, Solution)> {
    let instance = Instance::from_value(&load_document(instance_path, config)?)?;
    let solution = verify_solution(&instance, &load_document(solution_path, config)?)?;
    Ok((instance, solution))
}

pub fn judge(
    instance_path: impl AsRef<Path>,
    solution_path: impl AsRef<Path>,
    config: &JudgeConfig,
) -> Result<CostBreakdown> {
    let (instance, solution) = check(instance_path, solution_path, config)?;
    evaluate(&instance, &solution)
}

/// Scored verdict, or the failure score with the report lines.
pub fn verdict(result: &Result<CostBreakdown>, config: &JudgeConfig) -> Verdict {
    match result {
        Ok(breakdown) => Verdict::scored(breakdown.clone()),
        Err(e) => {
            warn!("Solution rejected with {} problems", e.problems().len());
            Verdict::rejected(config.failure_score, e.problems())
        }
    }
}

/// The score on the first line, followed by the error report when the
/// solution could not be judged.
pub fn render_text(result: &Result<CostBreakdown>, config: &JudgeConfig) -> String {
    match result {
        Ok(breakdown) => format!("{}", breakdown.total),
        Err(e) => format!("{}\n{}", config.failure_score, e.to_string().trim_end()),
    }
}
