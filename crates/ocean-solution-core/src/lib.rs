pub mod catalog;
pub mod config;
pub mod context;
pub mod error;
pub mod scenario;
pub mod solution;
pub mod time_series;
pub mod types;

#[cfg(feature = "adoption")]
pub mod adoption;

#[cfg(feature = "financial")]
pub mod financial;

#[cfg(feature = "carbon")]
pub mod carbon;

#[cfg(all(feature = "adoption", feature = "financial", feature = "carbon"))]
pub mod report;

#[cfg(test)]
mod fixtures;

pub use context::{ContextSettings, ScenarioContext};
pub use error::OceanSolutionError;
pub use scenario::{Degradation, ScenarioParameters, ScenarioProvider};
pub use solution::{OceanSolution, ScenarioInfo, SolutionSnapshot};
pub use time_series::{GappedSeries, TimeSeries};
pub use types::*;

/// Standard result type for all ocean-solution operations
pub type OceanResult<T> = Result<T, OceanSolutionError>;
