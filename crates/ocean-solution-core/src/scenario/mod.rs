//! The adoption-scenario seam.
//!
//! Every metric pulls its inputs from two [`ScenarioProvider`]s, one for the
//! PDS scenario and one for the reference scenario. Providers are expected to
//! cover at least `[base_year - 1, end_year]` for every series.

pub mod tabulated;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::time_series::TimeSeries;
use crate::types::{Money, Rate, Year};
use crate::OceanResult;

pub use tabulated::{AdoptionSnapshot, TabulatedScenario, TabulatedSeries};

/// Extra inputs for the degradation-aware sequestration series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Degradation {
    /// Annual growth rate of ocean degradation.
    pub growth_rate: Rate,
    /// Whether protection takes effect one year late.
    pub delay_impact_of_protection_by_one_year: bool,
}

/// Economic and ecological parameters injected into a scenario at load time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioParameters {
    /// First cost per unit, thousands of USD.
    pub first_cost: Money,
    /// Expected lifetime of an adopted unit, years.
    pub expected_lifetime: Decimal,
    /// Net profit margin per unit.
    pub net_profit_margin: Money,
    /// Operating cost per unit.
    pub operating_cost: Money,
    pub sequestration_rate_all_ocean: Rate,
    pub disturbance_rate: Rate,
    pub growth_rate_of_ocean_degradation: Rate,
}

/// Time-series capability set of one adoption scenario.
pub trait ScenarioProvider {
    fn name(&self) -> &str;

    fn parameters(&self) -> &ScenarioParameters;

    fn units_adopted(&self) -> OceanResult<TimeSeries>;

    /// Total addressable market, in the same units as [`Self::units_adopted`].
    fn tam_units(&self) -> OceanResult<TimeSeries>;

    fn annual_world_first_cost(&self) -> OceanResult<TimeSeries>;

    fn operating_cost(&self, end_year: Year) -> OceanResult<TimeSeries>;

    fn lifetime_operating_savings(&self, end_year: Year) -> OceanResult<TimeSeries>;

    fn lifetime_cashflow_npv(&self, purchase_year: Year, discount_rate: Rate)
        -> OceanResult<TimeSeries>;

    fn net_profit_margin(&self, end_year: Year) -> OceanResult<TimeSeries>;

    /// Annual carbon sequestration. `degradation` selects the extended form
    /// that also accounts for ocean degradation growth and protection delay.
    fn carbon_sequestration(
        &self,
        sequestration_rate: Rate,
        disturbance_rate: Rate,
        degradation: Option<Degradation>,
    ) -> OceanResult<TimeSeries>;

    fn change_in_ppm_equiv_series(&self) -> OceanResult<TimeSeries>;
}
