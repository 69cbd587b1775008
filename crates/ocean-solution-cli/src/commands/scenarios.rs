use clap::Args;
use serde::Serialize;
use serde_json::Value;

use ocean_solution_core::catalog::ScenarioCatalog;
use ocean_solution_core::config::SolutionConfig;
use ocean_solution_core::{ContextSettings, OceanSolution, ScenarioInfo};

/// Arguments for listing a solution's scenarios
#[derive(Args)]
pub struct ScenariosArgs {
    /// Path to the solution's YAML configuration
    #[arg(long)]
    pub config: String,
}

/// Arguments for describing one scenario
#[derive(Args)]
pub struct InfoArgs {
    /// Path to the solution's YAML configuration
    #[arg(long)]
    pub config: String,

    /// Scenario name from the configuration's scenario catalog
    #[arg(long)]
    pub scenario: String,
}

#[derive(Debug, Serialize)]
struct InfoOutput {
    #[serde(flatten)]
    info: ScenarioInfo,
    #[serde(flatten)]
    settings: ContextSettings,
    warnings: Vec<String>,
}

pub fn run_scenarios(args: ScenariosArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let config = SolutionConfig::from_yaml_file(&args.config)?;
    let catalog = ScenarioCatalog::from_json_file(&config.scenarios_file)?;

    let rows = catalog
        .scenario_names()
        .into_iter()
        .map(|name| {
            let record = catalog.get(&name)?;
            Ok(ScenarioInfo {
                description: record.description.clone(),
                pds_scenario_name: record.pds_scenario_name.clone(),
                ref_scenario_name: record.ref_scenario_name.clone(),
                name,
            })
        })
        .collect::<Result<Vec<_>, ocean_solution_core::OceanSolutionError>>()?;
    Ok(serde_json::to_value(rows)?)
}

pub fn run_info(args: InfoArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let solution = OceanSolution::load(&args.config, &args.scenario)?;
    let output = InfoOutput {
        info: solution.scenario_info(),
        settings: solution.context().settings().clone(),
        warnings: solution.warnings().to_vec(),
    };
    Ok(serde_json::to_value(output)?)
}
