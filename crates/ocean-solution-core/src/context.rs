use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::OceanSolutionError;
use crate::scenario::{Degradation, ScenarioProvider};
use crate::types::{Rate, Year};
use crate::OceanResult;

/// Scalar configuration shared by every metric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextSettings {
    pub base_year: Year,
    pub start_year: Year,
    pub end_year: Year,
    pub npv_discount_rate: Rate,
    pub disturbance_rate: Rate,
    pub growth_rate_of_ocean_degradation: Rate,
    pub sequestration_rate_all_ocean: Rate,
    #[serde(default)]
    pub delay_impact_of_protection_by_one_year: bool,
    #[serde(default)]
    pub delay_regrowth_of_degraded_land_by_one_year: bool,
}

impl ContextSettings {
    /// Enforce `base_year <= start_year <= end_year`.
    pub fn validate(&self) -> OceanResult<()> {
        if self.base_year > self.start_year {
            return Err(OceanSolutionError::config(
                "base_year",
                format!(
                    "base year {} is after start year {}",
                    self.base_year, self.start_year
                ),
            ));
        }
        if self.start_year > self.end_year {
            return Err(OceanSolutionError::config(
                "start_year",
                format!(
                    "start year {} is after end year {}",
                    self.start_year, self.end_year
                ),
            ));
        }
        Ok(())
    }
}

/// Configuration plus the PDS and REF scenario handles.
///
/// Immutable once built: every metric is a pure function of this value, so a
/// context whose provider is `Send + Sync` can be queried from any number of
/// threads.
#[derive(Debug, Clone)]
pub struct ScenarioContext<S> {
    settings: ContextSettings,
    pds_scenario: S,
    ref_scenario: S,
}

impl<S: ScenarioProvider> ScenarioContext<S> {
    pub fn new(settings: ContextSettings, pds_scenario: S, ref_scenario: S) -> OceanResult<Self> {
        settings.validate()?;
        Ok(ScenarioContext {
            settings,
            pds_scenario,
            ref_scenario,
        })
    }

    pub fn settings(&self) -> &ContextSettings {
        &self.settings
    }

    pub fn pds_scenario(&self) -> &S {
        &self.pds_scenario
    }

    pub fn ref_scenario(&self) -> &S {
        &self.ref_scenario
    }

    pub fn base_year(&self) -> Year {
        self.settings.base_year
    }

    pub fn start_year(&self) -> Year {
        self.settings.start_year
    }

    pub fn end_year(&self) -> Year {
        self.settings.end_year
    }

    pub fn npv_discount_rate(&self) -> Rate {
        self.settings.npv_discount_rate
    }

    pub fn disturbance_rate(&self) -> Rate {
        self.settings.disturbance_rate
    }

    pub fn growth_rate_of_ocean_degradation(&self) -> Rate {
        self.settings.growth_rate_of_ocean_degradation
    }

    pub fn sequestration_rate_all_ocean(&self) -> Rate {
        self.settings.sequestration_rate_all_ocean
    }

    pub fn delay_impact_of_protection_by_one_year(&self) -> bool {
        self.settings.delay_impact_of_protection_by_one_year
    }

    pub fn delay_regrowth_of_degraded_land_by_one_year(&self) -> bool {
        self.settings.delay_regrowth_of_degraded_land_by_one_year
    }

    /// `1 + disturbance_rate`, applied to operating cost and savings.
    pub(crate) fn disturbance_uplift(&self) -> Decimal {
        Decimal::ONE + self.settings.disturbance_rate
    }

    /// `1 - disturbance_rate`, applied to profit margins.
    pub(crate) fn disturbance_haircut(&self) -> Decimal {
        Decimal::ONE - self.settings.disturbance_rate
    }

    pub(crate) fn degradation(&self) -> Degradation {
        Degradation {
            growth_rate: self.settings.growth_rate_of_ocean_degradation,
            delay_impact_of_protection_by_one_year: self
                .settings
                .delay_impact_of_protection_by_one_year,
        }
    }
}
