//! Scenario catalog: the JSON file naming every published scenario of a
//! solution together with its economic and ecological inputs.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::SolutionConfig;
use crate::context::ContextSettings;
use crate::error::OceanSolutionError;
use crate::scenario::ScenarioParameters;
use crate::types::{Money, Rate};
use crate::OceanResult;

/// One named scenario of a solution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioRecord {
    #[serde(default)]
    pub description: String,
    /// Adoption scenario used for the PDS handle.
    pub pds_scenario_name: String,
    /// Adoption scenario used for the REF handle.
    pub ref_scenario_name: String,
    pub soln_first_cost: Money,
    pub soln_expected_lifetime: Decimal,
    pub soln_net_profit_margin: Money,
    pub soln_operating_cost: Money,
    pub sequestration_rate_all_ocean: Rate,
    pub disturbance_rate: Rate,
    pub growth_rate_of_ocean_degradation: Rate,
    pub npv_discount_rate: Rate,
    #[serde(default)]
    pub delay_impact_of_protection_by_one_year: bool,
    #[serde(default)]
    pub delay_regrowth_of_degraded_land_by_one_year: bool,
}

impl ScenarioRecord {
    /// Parameters injected into both the PDS and REF handles.
    pub fn parameters(&self) -> ScenarioParameters {
        ScenarioParameters {
            first_cost: self.soln_first_cost,
            expected_lifetime: self.soln_expected_lifetime,
            net_profit_margin: self.soln_net_profit_margin,
            operating_cost: self.soln_operating_cost,
            sequestration_rate_all_ocean: self.sequestration_rate_all_ocean,
            disturbance_rate: self.disturbance_rate,
            growth_rate_of_ocean_degradation: self.growth_rate_of_ocean_degradation,
        }
    }

    pub fn settings(&self, config: &SolutionConfig) -> ContextSettings {
        ContextSettings {
            base_year: config.base_year,
            start_year: config.start_year,
            end_year: config.end_year,
            npv_discount_rate: self.npv_discount_rate,
            disturbance_rate: self.disturbance_rate,
            growth_rate_of_ocean_degradation: self.growth_rate_of_ocean_degradation,
            sequestration_rate_all_ocean: self.sequestration_rate_all_ocean,
            delay_impact_of_protection_by_one_year: self.delay_impact_of_protection_by_one_year,
            delay_regrowth_of_degraded_land_by_one_year: self
                .delay_regrowth_of_degraded_land_by_one_year,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScenarioCatalog {
    scenarios: BTreeMap<String, ScenarioRecord>,
}

impl ScenarioCatalog {
    pub fn from_json_str(contents: &str) -> OceanResult<Self> {
        serde_json::from_str(contents)
            .map_err(|e| OceanSolutionError::config("ScenariosFile", e.to_string()))
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> OceanResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            OceanSolutionError::config(
                "ScenariosFile",
                format!("Failed to read '{}': {}", path.display(), e),
            )
        })?;
        Self::from_json_str(&contents)
    }

    /// Scenario names in sorted order.
    pub fn scenario_names(&self) -> Vec<String> {
        self.scenarios.keys().cloned().collect()
    }

    pub fn get(&self, name: &str) -> OceanResult<&ScenarioRecord> {
        self.scenarios.get(name).ok_or_else(|| {
            OceanSolutionError::config("scenario", format!("Unknown scenario '{name}'"))
        })
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }
}
