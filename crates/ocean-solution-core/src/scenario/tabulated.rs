//! Scenario provider backed by precomputed series.
//!
//! An adoption snapshot file is a JSON object keyed by adoption scenario
//! name. Each entry holds the series the adoption model already produced for
//! that scenario; nothing is fitted or interpolated here. The series already
//! reflect the solution's parameters, so the injected [`ScenarioParameters`]
//! and the rates passed to `carbon_sequestration` are carried but not applied.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use rust_decimal::{Decimal, MathematicalOps};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::OceanSolutionError;
use crate::scenario::{Degradation, ScenarioParameters, ScenarioProvider};
use crate::time_series::{per_period_discount, TimeSeries};
use crate::types::{Rate, Year};
use crate::OceanResult;

/// Precomputed series for one adoption scenario.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TabulatedSeries {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub units_adopted: TimeSeries,
    pub tam_units: TimeSeries,
    pub annual_world_first_cost: TimeSeries,
    pub operating_cost: TimeSeries,
    pub lifetime_operating_savings: TimeSeries,
    pub net_profit_margin: TimeSeries,
    pub carbon_sequestration: TimeSeries,
    /// Sequestration including degradation growth; falls back to
    /// `carbon_sequestration` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carbon_sequestration_degraded: Option<TimeSeries>,
    pub change_in_ppm_equiv: TimeSeries,
    /// Undiscounted lifetime cashflow keyed by purchase year.
    #[serde(default)]
    pub lifetime_cashflow: BTreeMap<Year, TimeSeries>,
}

impl TabulatedSeries {
    fn validate(&self) -> Result<(), String> {
        let required = [
            ("units_adopted", &self.units_adopted),
            ("tam_units", &self.tam_units),
            ("annual_world_first_cost", &self.annual_world_first_cost),
        ];
        for (name, series) in required {
            if series.is_empty() {
                return Err(format!("series '{name}' is empty"));
            }
        }
        Ok(())
    }
}

/// A named adoption scenario with its injected parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabulatedScenario {
    pub name: String,
    #[serde(default)]
    pub parameters: ScenarioParameters,
    pub series: TabulatedSeries,
}

impl TabulatedScenario {
    pub fn new(name: impl Into<String>, series: TabulatedSeries) -> Self {
        TabulatedScenario {
            name: name.into(),
            parameters: ScenarioParameters::default(),
            series,
        }
    }

    pub fn with_parameters(mut self, parameters: ScenarioParameters) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn description(&self) -> Option<&str> {
        self.series.description.as_deref()
    }

    /// Read `name` from the snapshot file at `path`. Any failure is reported
    /// as a scenario initialisation error carrying the scenario name.
    pub fn load(
        path: impl AsRef<Path>,
        name: &str,
        parameters: ScenarioParameters,
    ) -> OceanResult<Self> {
        let snapshot = AdoptionSnapshot::from_json_file(path.as_ref()).map_err(|e| {
            OceanSolutionError::ScenarioInitialization {
                scenario: name.to_string(),
                reason: e.to_string(),
            }
        })?;
        snapshot.scenario(name, parameters)
    }
}

impl ScenarioProvider for TabulatedScenario {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> &ScenarioParameters {
        &self.parameters
    }

    fn units_adopted(&self) -> OceanResult<TimeSeries> {
        Ok(self.series.units_adopted.clone())
    }

    fn tam_units(&self) -> OceanResult<TimeSeries> {
        Ok(self.series.tam_units.clone())
    }

    fn annual_world_first_cost(&self) -> OceanResult<TimeSeries> {
        Ok(self.series.annual_world_first_cost.clone())
    }

    fn operating_cost(&self, end_year: Year) -> OceanResult<TimeSeries> {
        Ok(self.series.operating_cost.until(end_year))
    }

    fn lifetime_operating_savings(&self, end_year: Year) -> OceanResult<TimeSeries> {
        Ok(self.series.lifetime_operating_savings.until(end_year))
    }

    fn lifetime_cashflow_npv(
        &self,
        purchase_year: Year,
        discount_rate: Rate,
    ) -> OceanResult<TimeSeries> {
        let flows = self.series.lifetime_cashflow.get(&purchase_year).ok_or_else(|| {
            let mut known = self.series.lifetime_cashflow.keys();
            let range = match (known.next(), known.next_back()) {
                (Some(first), Some(last)) => format!("purchase years {first}..={last}"),
                (Some(only), None) => format!("purchase year {only}"),
                _ => "no purchase years".to_string(),
            };
            OceanSolutionError::SeriesRange {
                year: purchase_year,
                range,
            }
        })?;

        // Year y of a unit bought in purchase_year is discounted over
        // (y - purchase_year + 1) periods.
        let factor = per_period_discount(discount_rate)?;
        Ok(flows
            .iter()
            .map(|(year, value)| {
                let periods = i64::from(year - purchase_year + 1);
                let multiplier = if periods >= 0 {
                    factor.powi(periods)
                } else {
                    Decimal::ONE / factor.powi(-periods)
                };
                (year, value * multiplier)
            })
            .collect())
    }

    fn net_profit_margin(&self, end_year: Year) -> OceanResult<TimeSeries> {
        Ok(self.series.net_profit_margin.until(end_year))
    }

    fn carbon_sequestration(
        &self,
        _sequestration_rate: Rate,
        _disturbance_rate: Rate,
        degradation: Option<Degradation>,
    ) -> OceanResult<TimeSeries> {
        let series = match (degradation, &self.series.carbon_sequestration_degraded) {
            (Some(_), Some(degraded)) => degraded,
            _ => &self.series.carbon_sequestration,
        };
        Ok(series.clone())
    }

    fn change_in_ppm_equiv_series(&self) -> OceanResult<TimeSeries> {
        Ok(self.series.change_in_ppm_equiv.clone())
    }
}

/// Contents of an adoption snapshot file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdoptionSnapshot {
    scenarios: BTreeMap<String, TabulatedSeries>,
}

impl AdoptionSnapshot {
    pub fn from_json_str(contents: &str) -> OceanResult<Self> {
        Ok(serde_json::from_str(contents)?)
    }

    pub fn from_json_file(path: &Path) -> OceanResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            OceanSolutionError::Io(format!("Failed to read '{}': {}", path.display(), e))
        })?;
        debug!(path = %path.display(), "loaded adoption snapshot");
        Self::from_json_str(&contents)
    }

    pub fn scenario_names(&self) -> impl Iterator<Item = &str> {
        self.scenarios.keys().map(String::as_str)
    }

    /// Build the named scenario with `parameters` injected.
    pub fn scenario(
        &self,
        name: &str,
        parameters: ScenarioParameters,
    ) -> OceanResult<TabulatedScenario> {
        let series = self.scenarios.get(name).ok_or_else(|| {
            OceanSolutionError::ScenarioInitialization {
                scenario: name.to_string(),
                reason: "scenario not present in adoption file".into(),
            }
        })?;
        series
            .validate()
            .map_err(|reason| OceanSolutionError::ScenarioInitialization {
                scenario: name.to_string(),
                reason,
            })?;
        Ok(TabulatedScenario::new(name, series.clone()).with_parameters(parameters))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn sample_series() -> TabulatedSeries {
        let years = |values: &[Decimal]| TimeSeries::from_values(2019, values);
        let mut lifetime_cashflow = BTreeMap::new();
        lifetime_cashflow.insert(2020, years(&[dec!(0), dec!(-110), dec!(121)]));
        TabulatedSeries {
            description: Some("Seaweed farming, high growth".into()),
            units_adopted: years(&[dec!(1), dec!(2), dec!(3)]),
            tam_units: years(&[dec!(10), dec!(10), dec!(10)]),
            annual_world_first_cost: years(&[dec!(5), dec!(5), dec!(5)]),
            operating_cost: years(&[dec!(1), dec!(2), dec!(3)]),
            lifetime_operating_savings: years(&[dec!(4), dec!(5), dec!(6)]),
            net_profit_margin: years(&[dec!(7), dec!(8), dec!(9)]),
            carbon_sequestration: years(&[dec!(1), dec!(1), dec!(1)]),
            carbon_sequestration_degraded: Some(years(&[dec!(2), dec!(2), dec!(2)])),
            change_in_ppm_equiv: years(&[dec!(0.1), dec!(0.2), dec!(0.3)]),
            lifetime_cashflow,
        }
    }

    fn sample_scenario() -> TabulatedScenario {
        TabulatedScenario::new("PDS-60p2050", sample_series())
    }

    #[test]
    fn test_operating_cost_truncated_to_end_year() {
        let scenario = sample_scenario();
        let cost = scenario.operating_cost(2020).unwrap();
        assert_eq!(cost.last_year(), Some(2020));
        assert_eq!(cost.sum(), dec!(3));
    }

    #[test]
    fn test_lifetime_cashflow_discounted_from_purchase_year() {
        let scenario = sample_scenario();
        let npv = scenario.lifetime_cashflow_npv(2020, dec!(0.10)).unwrap();
        // 2019 is compounded forward zero periods, 2020 over one, 2021 over two
        assert_eq!(npv.get(2019).unwrap(), dec!(0));
        assert_eq!(npv.get(2020).unwrap().round_dp(10), dec!(-100));
        assert_eq!(npv.get(2021).unwrap().round_dp(10), dec!(100));
    }

    #[test]
    fn test_lifetime_cashflow_zero_rate_unchanged() {
        let scenario = sample_scenario();
        let npv = scenario.lifetime_cashflow_npv(2020, Decimal::ZERO).unwrap();
        assert_eq!(npv, scenario.series.lifetime_cashflow[&2020]);
    }

    #[test]
    fn test_lifetime_cashflow_unknown_purchase_year() {
        let scenario = sample_scenario();
        let err = scenario.lifetime_cashflow_npv(2035, dec!(0.04)).unwrap_err();
        assert!(matches!(err, OceanSolutionError::SeriesRange { year: 2035, .. }));
    }

    #[test]
    fn test_sequestration_selects_degraded_series() {
        let scenario = sample_scenario();
        let degradation = Degradation {
            growth_rate: dec!(0.01),
            delay_impact_of_protection_by_one_year: false,
        };
        let plain = scenario
            .carbon_sequestration(dec!(1), dec!(0), None)
            .unwrap();
        let degraded = scenario
            .carbon_sequestration(dec!(1), dec!(0), Some(degradation))
            .unwrap();
        assert_eq!(plain.sum(), dec!(3));
        assert_eq!(degraded.sum(), dec!(6));
    }

    #[test]
    fn test_snapshot_missing_scenario() {
        let snapshot = AdoptionSnapshot::from_json_str("{}").unwrap();
        let err = snapshot
            .scenario("REF-baseline", ScenarioParameters::default())
            .unwrap_err();
        match err {
            OceanSolutionError::ScenarioInitialization { scenario, .. } => {
                assert_eq!(scenario, "REF-baseline");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_snapshot_rejects_empty_units() {
        let mut series = sample_series();
        series.units_adopted = TimeSeries::new();
        let json = serde_json::json!({ "PDS-60p2050": series }).to_string();
        let snapshot = AdoptionSnapshot::from_json_str(&json).unwrap();
        assert!(snapshot
            .scenario("PDS-60p2050", ScenarioParameters::default())
            .is_err());
    }

    #[test]
    fn test_load_missing_file_names_scenario() {
        let err = TabulatedScenario::load(
            "/nonexistent/adoption.json",
            "PDS-60p2050",
            ScenarioParameters::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("PDS-60p2050"));
    }

    #[test]
    fn test_parameters_injected() {
        let parameters = ScenarioParameters {
            first_cost: dec!(12.5),
            disturbance_rate: dec!(0.02),
            ..ScenarioParameters::default()
        };
        let scenario = sample_scenario().with_parameters(parameters.clone());
        assert_eq!(scenario.parameters(), &parameters);
    }
}
