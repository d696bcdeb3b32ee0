use crate::serializable_struct_with_getters;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Invalid output format: {}", s)),
        }
    }
}

serializable_struct_with_getters! {
    #[serde(default)]
    JudgeConfig {
        /// Score reported for a solution that could not be judged.
        failure_score: f64,
        /// Strip whitespace around document keys before judging.
        clean_keys: bool,
        output: OutputFormat,
    }
}

impl Default for JudgeConfig {
    fn default() -> Self {
        Self {
            failure_score: -1.0,
            clean_keys: true,
            output: OutputFormat::Text,
        }
    }
}
