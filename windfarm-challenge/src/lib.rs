pub mod constraints;
pub mod cost;
pub mod error;
pub mod format;
pub mod instance;
pub mod judge;
pub mod normalize;
pub mod solution;

pub use error::{Diagnostics, JudgeError, Result};
pub use instance::*;
pub use judge::*;
pub use solution::*;
pub use windfarm_structs::{
    config::{JudgeConfig, OutputFormat},
    core::{CostBreakdown, Verdict},
};
