//! Loading a solution from its configuration file.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::catalog::{ScenarioCatalog, ScenarioRecord};
use crate::config::SolutionConfig;
use crate::context::{ContextSettings, ScenarioContext};
use crate::scenario::TabulatedScenario;
use crate::OceanResult;

/// A fully loaded scenario of an ocean solution.
#[derive(Debug, Clone)]
pub struct OceanSolution {
    scenario_name: String,
    record: ScenarioRecord,
    context: ScenarioContext<TabulatedScenario>,
    warnings: Vec<String>,
}

/// Descriptive information about the loaded scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioInfo {
    pub name: String,
    pub description: String,
    pub pds_scenario_name: String,
    pub ref_scenario_name: String,
}

impl OceanSolution {
    /// Load the configuration at `config_path` and build the named scenario.
    ///
    /// A configuration requiring a newer version than this crate still loads;
    /// the mismatch is kept in [`OceanSolution::warnings`].
    pub fn load(config_path: impl AsRef<Path>, scenario_name: &str) -> OceanResult<Self> {
        let config = SolutionConfig::from_yaml_file(config_path)?;
        let catalog = ScenarioCatalog::from_json_file(&config.scenarios_file)?;
        Self::from_config(&config, &catalog, scenario_name)
    }

    pub fn from_config(
        config: &SolutionConfig,
        catalog: &ScenarioCatalog,
        scenario_name: &str,
    ) -> OceanResult<Self> {
        let warnings: Vec<String> = config
            .check_required_version(env!("CARGO_PKG_VERSION"))?
            .into_iter()
            .collect();

        let record = catalog.get(scenario_name)?.clone();
        let parameters = record.parameters();

        let pds_scenario = TabulatedScenario::load(
            &config.pds_adoption_file,
            &record.pds_scenario_name,
            parameters.clone(),
        )?;
        debug!(scenario = %record.pds_scenario_name, "loaded PDS adoption scenario");
        let ref_scenario = TabulatedScenario::load(
            &config.ref_adoption_file,
            &record.ref_scenario_name,
            parameters,
        )?;
        debug!(scenario = %record.ref_scenario_name, "loaded REF adoption scenario");

        let context = ScenarioContext::new(record.settings(config), pds_scenario, ref_scenario)?;
        info!(scenario = scenario_name, "ocean solution loaded");

        Ok(OceanSolution {
            scenario_name: scenario_name.to_string(),
            record,
            context,
            warnings,
        })
    }

    pub fn context(&self) -> &ScenarioContext<TabulatedScenario> {
        &self.context
    }

    pub fn record(&self) -> &ScenarioRecord {
        &self.record
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn scenario_info(&self) -> ScenarioInfo {
        ScenarioInfo {
            name: self.scenario_name.clone(),
            description: self.record.description.clone(),
            pds_scenario_name: self.record.pds_scenario_name.clone(),
            ref_scenario_name: self.record.ref_scenario_name.clone(),
        }
    }
}

/// Names of every scenario listed by the configuration's scenario catalog.
pub fn scenario_names(config_path: impl AsRef<Path>) -> OceanResult<Vec<String>> {
    let config = SolutionConfig::from_yaml_file(config_path)?;
    Ok(ScenarioCatalog::from_json_file(&config.scenarios_file)?.scenario_names())
}

/// Self-contained context: settings plus both scenarios with their series,
/// serialisable as a single JSON document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolutionSnapshot {
    pub settings: ContextSettings,
    pub pds_scenario: TabulatedScenario,
    pub ref_scenario: TabulatedScenario,
}

impl SolutionSnapshot {
    pub fn into_context(self) -> OceanResult<ScenarioContext<TabulatedScenario>> {
        ScenarioContext::new(self.settings, self.pds_scenario, self.ref_scenario)
    }
}

impl From<&OceanSolution> for SolutionSnapshot {
    fn from(solution: &OceanSolution) -> Self {
        let context = solution.context();
        SolutionSnapshot {
            settings: context.settings().clone(),
            pds_scenario: context.pds_scenario().clone(),
            ref_scenario: context.ref_scenario().clone(),
        }
    }
}
