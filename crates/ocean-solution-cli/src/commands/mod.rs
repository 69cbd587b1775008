pub mod metrics;
pub mod scenarios;

use clap::Args;
use tracing::debug;

use ocean_solution_core::scenario::TabulatedScenario;
use ocean_solution_core::{OceanSolution, ScenarioContext, SolutionSnapshot};

use crate::input;

/// Where the scenario context comes from
#[derive(Args)]
pub struct SourceArgs {
    /// Path to the solution's YAML configuration
    #[arg(long, requires = "scenario")]
    pub config: Option<String>,

    /// Scenario name from the configuration's scenario catalog
    #[arg(long, requires = "config")]
    pub scenario: Option<String>,

    /// Path to a JSON context snapshot (settings plus PDS and REF series)
    #[arg(long, conflicts_with = "config")]
    pub input: Option<String>,
}

pub struct LoadedContext {
    pub context: ScenarioContext<TabulatedScenario>,
    pub warnings: Vec<String>,
}

pub fn load_context(source: &SourceArgs) -> Result<LoadedContext, Box<dyn std::error::Error>> {
    if let (Some(config), Some(scenario)) = (&source.config, &source.scenario) {
        debug!(%config, %scenario, "loading scenario from configuration");
        let solution = OceanSolution::load(config, scenario)?;
        return Ok(LoadedContext {
            context: solution.context().clone(),
            warnings: solution.warnings().to_vec(),
        });
    }

    let snapshot: SolutionSnapshot = if let Some(ref path) = source.input {
        debug!(%path, "loading context snapshot");
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err(
            "--config <solution.yaml> --scenario <name>, --input <snapshot.json> or stdin required"
                .into(),
        );
    };
    Ok(LoadedContext {
        context: snapshot.into_context()?,
        warnings: Vec::new(),
    })
}
