//! Synthetic scenarios shared by the metric unit tests.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::context::{ContextSettings, ScenarioContext};
use crate::scenario::{TabulatedScenario, TabulatedSeries};
use crate::time_series::TimeSeries;
use crate::types::Year;

/// Fixture series cover `[FIRST_YEAR, LAST_YEAR]`, one year either side of
/// the configured `[base_year, end_year]`.
pub(crate) const FIRST_YEAR: Year = 2018;
pub(crate) const LAST_YEAR: Year = 2031;

pub(crate) fn settings() -> ContextSettings {
    ContextSettings {
        base_year: 2019,
        start_year: 2020,
        end_year: 2030,
        npv_discount_rate: Decimal::ZERO,
        disturbance_rate: Decimal::ZERO,
        growth_rate_of_ocean_degradation: dec!(0.01),
        sequestration_rate_all_ocean: dec!(1.5),
        delay_impact_of_protection_by_one_year: false,
        delay_regrowth_of_degraded_land_by_one_year: false,
    }
}

pub(crate) fn constant(value: Decimal) -> TimeSeries {
    (FIRST_YEAR..=LAST_YEAR).map(|year| (year, value)).collect()
}

/// `intercept + slope * (year - FIRST_YEAR)`
pub(crate) fn linear(intercept: Decimal, slope: Decimal) -> TimeSeries {
    (FIRST_YEAR..=LAST_YEAR)
        .map(|year| (year, intercept + slope * Decimal::from(year - FIRST_YEAR)))
        .collect()
}

/// All series zero, TAM one.
pub(crate) fn blank_series() -> TabulatedSeries {
    TabulatedSeries {
        description: None,
        units_adopted: constant(Decimal::ZERO),
        tam_units: constant(Decimal::ONE),
        annual_world_first_cost: constant(Decimal::ZERO),
        operating_cost: constant(Decimal::ZERO),
        lifetime_operating_savings: constant(Decimal::ZERO),
        net_profit_margin: constant(Decimal::ZERO),
        carbon_sequestration: constant(Decimal::ZERO),
        carbon_sequestration_degraded: None,
        change_in_ppm_equiv: constant(Decimal::ZERO),
        lifetime_cashflow: Default::default(),
    }
}

pub(crate) fn context(
    settings: ContextSettings,
    pds: TabulatedSeries,
    reference: TabulatedSeries,
) -> ScenarioContext<TabulatedScenario> {
    ScenarioContext::new(
        settings,
        TabulatedScenario::new("PDS", pds),
        TabulatedScenario::new("REF", reference),
    )
    .expect("fixture settings are valid")
}
