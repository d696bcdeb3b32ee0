use std::fmt;
use thiserror::Error;
use windfarm_utils::LoadError;

/// Problems accumulated over one checking pass.
///
/// Checks push every defect they find and the pass fails once at the end, so
/// a contestant sees the whole list in a single report.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Diagnostics(Vec<String>);

impl Diagnostics {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, problem: impl Into<String>) {
        self.0.push(problem.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.0.iter().any(|p| p.contains(needle))
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }

    /// `Ok(value)` when nothing was reported.
    pub fn into_result<T>(self, value: T) -> std::result::Result<T, Diagnostics> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for problem in &self.0 {
            writeln!(f, "{}", problem)?;
        }
        Ok(())
    }
}

impl From<Vec<String>> for Diagnostics {
    fn from(problems: Vec<String>) -> Self {
        Self(problems)
    }
}

#[derive(Debug, Error)]
pub enum JudgeError {
    #[error("Error: {0}")]
    Load(#[from] LoadError),
    #[error("Error: instance is not valid, traceback list for information:\n{0}")]
    Instance(Diagnostics),
    #[error("Error: solution is not valid, traceback list for information:\n{0}")]
    Invalid(Diagnostics),
    #[error(
        "Error: the failure probabilities of the built substations sum to {total}, \
         outside of [0, 1]"
    )]
    ProbabilityOutOfRange { total: f64 },
}

impl JudgeError {
    /// Report lines, one per problem.
    pub fn problems(&self) -> Vec<String> {
        match self {
            JudgeError::Instance(d) | JudgeError::Invalid(d) => d.iter().cloned().collect(),
            other => vec![other.to_string()],
        }
    }
}

pub type Result<T> = std::result::Result<T, JudgeError>;
