//! Financial metrics: first cost, operating cost, NPV, payback and
//! abatement cost.
//!
//! Conventions that must hold for results to tie out with the solution
//! workbooks:
//! - Money totals are divided by 1000 and reported in billions. Payback
//!   values are not rescaled.
//! - Cumulative-difference totals subtract the running sum at `start_year`
//!   from the running sum at `end_year`, so `start_year` itself is excluded.
//! - NPV discounting is positional: row `i` of the combined cashflow is
//!   multiplied by `(1 / (1 + r))^(i + 1)` regardless of its calendar year.
//! - Disturbance raises costs and savings by `(1 + d)` and cuts margins by
//!   `(1 - d)`.

use rust_decimal::Decimal;

use crate::context::ScenarioContext;
use crate::error::OceanSolutionError;
use crate::scenario::ScenarioProvider;
use crate::time_series::{GappedSeries, TimeSeries};
use crate::types::{Money, Rate, Year, THOUSAND};
use crate::OceanResult;

impl<S: ScenarioProvider> ScenarioContext<S> {
    // -----------------------------------------------------------------------
    // First cost
    // -----------------------------------------------------------------------

    /// Sum of `PDS - REF` annual world first cost over `[base_year, end_year]`.
    pub fn marginal_first_cost(&self) -> OceanResult<Money> {
        let pds = self.pds_scenario().annual_world_first_cost()?;
        let reference = self.ref_scenario().annual_world_first_cost()?;
        let total = pds
            .subtract(&reference)
            .sum_years(self.base_year(), self.end_year())?;
        Ok(total / THOUSAND)
    }

    pub fn cumulative_first_cost_pds(&self) -> OceanResult<Money> {
        let total = self
            .pds_scenario()
            .annual_world_first_cost()?
            .sum_years(self.base_year(), self.end_year())?;
        Ok(total / THOUSAND)
    }

    // -----------------------------------------------------------------------
    // Operating cost
    // -----------------------------------------------------------------------

    /// Difference in operating cost, reference minus PDS, over
    /// `(start_year, end_year]`.
    pub fn operating_cost(&self) -> OceanResult<Money> {
        let uplift = self.disturbance_uplift();
        let (start, end) = (self.start_year(), self.end_year());

        let pds = self
            .pds_scenario()
            .operating_cost(end)?
            .scale(uplift)
            .cumulative_difference(start, end)?;
        let reference = self
            .ref_scenario()
            .operating_cost(end)?
            .scale(uplift)
            .cumulative_difference(start, end)?;

        Ok((reference - pds) / THOUSAND)
    }

    pub fn lifetime_operating_savings(&self) -> OceanResult<Money> {
        let savings = self
            .pds_scenario()
            .lifetime_operating_savings(self.end_year())?
            .scale(self.disturbance_uplift());
        Ok(-savings.sum() / THOUSAND)
    }

    // -----------------------------------------------------------------------
    // NPV and payback
    // -----------------------------------------------------------------------

    /// Lifetime cashflow NPV of a single unit purchased in `purchase_year`.
    pub fn lifetime_cashflow_npv_single(&self, purchase_year: Year) -> OceanResult<Money> {
        let cashflow = self
            .pds_scenario()
            .lifetime_cashflow_npv(purchase_year, self.npv_discount_rate())?
            .negate();
        Ok(cashflow.sum() / THOUSAND)
    }

    pub fn payback_period_soln_only(&self, purchase_year: Year) -> OceanResult<Money> {
        self.peak_cumulative_cashflow(purchase_year, self.npv_discount_rate())
    }

    pub fn payback_period_soln_only_npv(&self, purchase_year: Year) -> OceanResult<Money> {
        self.peak_cumulative_cashflow(purchase_year, self.npv_discount_rate())
    }

    /// Undiscounted payback against the conventional technology, which for
    /// ocean solutions is a zero series.
    pub fn payback_period_soln_to_conv(&self, purchase_year: Year) -> OceanResult<Money> {
        self.peak_cumulative_cashflow(purchase_year, Decimal::ZERO)
    }

    pub fn payback_period_soln_to_conv_npv(&self, purchase_year: Year) -> OceanResult<Money> {
        self.peak_cumulative_cashflow(purchase_year, self.npv_discount_rate())
    }

    /// Highest value reached by the running total of the signed cashflow.
    fn peak_cumulative_cashflow(&self, purchase_year: Year, rate: Rate) -> OceanResult<Money> {
        self.pds_scenario()
            .lifetime_cashflow_npv(purchase_year, rate)?
            .negate()
            .cumsum()
            .max()
    }

    /// NPV of the whole adoption: net first cost over
    /// `[start_year - 1, end_year]` plus PDS operating savings.
    pub fn lifetime_cashflow_npv_all(&self) -> OceanResult<Money> {
        let net_first_cost = self.net_first_cost()?;
        let net_operating_cost = GappedSeries::from(
            &self
                .pds_scenario()
                .lifetime_operating_savings(self.end_year())?
                .scale(self.disturbance_uplift())
                .negate(),
        );

        let net_cash_flow = net_first_cost
            .add_filled(&net_operating_cost)
            .fill(Decimal::ZERO);
        let npv = net_cash_flow.discount_by_position(self.npv_discount_rate())?;
        Ok(npv.sum() / THOUSAND)
    }

    /// Discounted net cost per unit of CO2 sequestered.
    pub fn abatement_cost(&self) -> OceanResult<Money> {
        let total_co2 = self.total_co2_seq()?;

        let net_first_cost = self.net_first_cost()?;
        let end = self.end_year();
        let pds_savings = self.pds_scenario().lifetime_operating_savings(end)?;
        let ref_savings = self.ref_scenario().lifetime_operating_savings(end)?;
        let net_operating_cost = ref_savings
            .subtract_aligned(&pds_savings)
            .scale(self.disturbance_uplift());

        // Years covered by only one side stay as zero rows.
        let net_cash_flow = net_first_cost
            .add(&net_operating_cost)
            .fill(Decimal::ZERO);
        let npv = net_cash_flow
            .discount_by_position(self.npv_discount_rate())?
            .between(self.start_year(), end)
            .sum();

        if total_co2.is_zero() {
            return Err(OceanSolutionError::DivisionByZero {
                context: "abatement cost, total CO2 sequestered is zero".into(),
            });
        }
        Ok(-npv / total_co2 / THOUSAND)
    }

    /// REF minus PDS first cost, clipped to `[start_year - 1, end_year]`. A
    /// year covered by only one scenario is blank.
    fn net_first_cost(&self) -> OceanResult<GappedSeries> {
        let pds = self.pds_scenario().annual_world_first_cost()?;
        let reference = self.ref_scenario().annual_world_first_cost()?;
        Ok(reference
            .subtract_aligned(&pds)
            .between(self.start_year() - 1, self.end_year()))
    }

    // -----------------------------------------------------------------------
    // Profit margin
    // -----------------------------------------------------------------------

    pub fn net_profit_margin(&self) -> OceanResult<Money> {
        let total = self
            .disturbed_margin()?
            .cumulative_difference(self.start_year(), self.end_year())?;
        Ok(total / THOUSAND)
    }

    pub fn lifetime_profit_margin(&self) -> OceanResult<Money> {
        Ok(self.disturbed_margin()?.sum() / THOUSAND)
    }

    fn disturbed_margin(&self) -> OceanResult<TimeSeries> {
        Ok(self
            .pds_scenario()
            .net_profit_margin(self.end_year())?
            .scale(self.disturbance_haircut()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{blank_series, constant, context, linear, settings};
    use crate::scenario::TabulatedScenario;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    type Context = ScenarioContext<TabulatedScenario>;

    fn first_cost_context() -> Context {
        let mut pds = blank_series();
        pds.annual_world_first_cost = linear(dec!(100), dec!(10));
        // Sentinels outside [base_year, end_year]
        pds.annual_world_first_cost.insert(2018, dec!(1000000));
        pds.annual_world_first_cost.insert(2031, dec!(1000000));
        let mut reference = blank_series();
        reference.annual_world_first_cost = constant(dec!(50));
        context(settings(), pds, reference)
    }

    #[test]
    fn test_marginal_first_cost_excludes_sentinels() {
        let ctx = first_cost_context();
        // sum over k = 1..=12 of (50 + 10k) = 600 + 780
        assert_eq!(ctx.marginal_first_cost().unwrap(), dec!(1.38));
    }

    #[test]
    fn test_cumulative_first_cost_pds() {
        let ctx = first_cost_context();
        assert_eq!(ctx.cumulative_first_cost_pds().unwrap(), dec!(1.98));
    }

    #[test]
    fn test_marginal_first_cost_requires_every_year() {
        let mut pds = blank_series();
        pds.annual_world_first_cost = constant(dec!(1)).between(2021, 2031);
        let ctx = context(settings(), pds, blank_series());
        assert!(matches!(
            ctx.marginal_first_cost(),
            Err(OceanSolutionError::SeriesRange { year: 2019, .. })
        ));
    }

    fn operating_context(disturbance_rate: Decimal) -> Context {
        let mut s = settings();
        s.disturbance_rate = disturbance_rate;
        let mut pds = blank_series();
        pds.operating_cost = linear(dec!(0), dec!(1));
        let mut reference = blank_series();
        reference.operating_cost = constant(dec!(10));
        context(s, pds, reference)
    }

    #[test]
    fn test_operating_cost_cumulative_difference() {
        let ctx = operating_context(Decimal::ZERO);
        // REF: 10 * 10 years; PDS: years 2021..=2030 -> 3 + ... + 12 = 75
        assert_eq!(ctx.operating_cost().unwrap(), dec!(0.025));
    }

    #[test]
    fn test_operating_cost_with_disturbance() {
        let ctx = operating_context(dec!(0.1));
        assert_eq!(ctx.operating_cost().unwrap(), dec!(0.0275));
    }

    #[test]
    fn test_lifetime_operating_savings() {
        let mut s = settings();
        s.disturbance_rate = dec!(0.5);
        let mut pds = blank_series();
        pds.lifetime_operating_savings = constant(dec!(2));
        let ctx = context(s, pds, blank_series());
        // 13 years (2018..=2030) * 2 * 1.5
        assert_eq!(ctx.lifetime_operating_savings().unwrap(), dec!(-0.039));
    }

    fn payback_series(rate: Decimal) -> Context {
        let mut s = settings();
        s.npv_discount_rate = rate;
        let mut pds = blank_series();
        pds.lifetime_cashflow.insert(
            2020,
            TimeSeries::from_values(
                2020,
                &[dec!(100), dec!(-40), dec!(-40), dec!(-40), dec!(5)],
            ),
        );
        context(s, pds, blank_series())
    }

    #[test]
    fn test_payback_peak_of_cumulative_cashflow() {
        let ctx = payback_series(Decimal::ZERO);
        // signed cashflow [-100, 40, 40, 40, -5] -> cumsum peaks at 20
        assert_eq!(ctx.payback_period_soln_only(2020).unwrap(), dec!(20));
        assert_eq!(ctx.payback_period_soln_only_npv(2020).unwrap(), dec!(20));
        assert_eq!(ctx.payback_period_soln_to_conv(2020).unwrap(), dec!(20));
        assert_eq!(ctx.payback_period_soln_to_conv_npv(2020).unwrap(), dec!(20));
    }

    #[test]
    fn test_payback_to_conv_ignores_discount_rate() {
        let ctx = payback_series(dec!(0.1));
        assert_eq!(ctx.payback_period_soln_to_conv(2020).unwrap(), dec!(20));

        let discounted = ctx.payback_period_soln_only(2020).unwrap();
        assert!(discounted < dec!(0), "discounted peak should be negative, got {discounted}");
        assert_eq!(ctx.payback_period_soln_only_npv(2020).unwrap(), discounted);
        assert_eq!(ctx.payback_period_soln_to_conv_npv(2020).unwrap(), discounted);
    }

    #[test]
    fn test_lifetime_cashflow_npv_single() {
        let ctx = payback_series(Decimal::ZERO);
        assert_eq!(ctx.lifetime_cashflow_npv_single(2020).unwrap(), dec!(0.015));
    }

    #[test]
    fn test_payback_unknown_purchase_year() {
        let ctx = payback_series(Decimal::ZERO);
        assert!(ctx.payback_period_soln_only(2025).is_err());
    }

    #[test]
    fn test_npv_all_zero_rate_is_plain_sum() {
        let mut pds = blank_series();
        pds.annual_world_first_cost = linear(dec!(100), dec!(10));
        pds.lifetime_operating_savings = constant(dec!(2));
        let mut reference = blank_series();
        reference.annual_world_first_cost = constant(dec!(50));
        let ctx = context(settings(), pds, reference);
        // net first cost 2019..=2030: -1380; operating 2018..=2030: -26
        assert_eq!(ctx.lifetime_cashflow_npv_all().unwrap(), dec!(-1.406));
    }

    #[test]
    fn test_npv_all_discounts_by_position() {
        let mut s = settings();
        s.npv_discount_rate = dec!(0.1);
        let mut pds = blank_series();
        pds.lifetime_operating_savings = constant(dec!(0));
        pds.lifetime_operating_savings.insert(2018, dec!(-110));
        pds.lifetime_operating_savings.insert(2019, dec!(-121));
        let ctx = context(s, pds, blank_series());
        // 2018 is row 0 (one period), 2019 row 1 (two periods)
        assert_eq!(ctx.lifetime_cashflow_npv_all().unwrap().round_dp(10), dec!(0.2));
    }

    fn abatement_context() -> Context {
        let mut pds = blank_series();
        pds.annual_world_first_cost = constant(dec!(80));
        pds.lifetime_operating_savings = constant(dec!(2));
        pds.carbon_sequestration = constant(dec!(30));
        let mut reference = blank_series();
        reference.annual_world_first_cost = constant(dec!(50));
        reference.carbon_sequestration = constant(dec!(10));
        context(settings(), pds, reference)
    }

    #[test]
    fn test_abatement_cost() {
        let ctx = abatement_context();
        // total CO2: 20 * 10 years / 1000 = 0.2
        // net cashflow 2020..=2030: (-30 - 2) * 11 = -352
        assert_eq!(ctx.abatement_cost().unwrap(), dec!(1.76));
    }

    #[test]
    fn test_abatement_cost_zero_co2() {
        let mut pds = blank_series();
        pds.annual_world_first_cost = constant(dec!(80));
        let ctx = context(settings(), pds, blank_series());
        assert!(matches!(
            ctx.abatement_cost(),
            Err(OceanSolutionError::DivisionByZero { .. })
        ));
    }

    // A discount rate of 100% makes every factor a power of one half.
    fn half_discount_settings() -> crate::context::ContextSettings {
        let mut s = settings();
        s.npv_discount_rate = dec!(1);
        s
    }

    #[test]
    fn test_abatement_keeps_rows_for_one_sided_savings() {
        let mut pds = blank_series();
        pds.lifetime_operating_savings = constant(dec!(1)).between(2018, 2030);
        pds.carbon_sequestration = constant(dec!(10));
        let mut reference = blank_series();
        reference.lifetime_operating_savings = constant(dec!(0)).between(2020, 2031);
        let ctx = context(half_discount_settings(), pds, reference);

        // Rows 2018 and 2019 are blank, so 2020..=2030 sit at rows 2..=12:
        // npv = -(0.5^3 + ... + 0.5^13) = -(0.25 - 0.5^13)
        // total CO2 = 10 * 10 / 1000
        assert_eq!(ctx.abatement_cost().unwrap(), dec!(0.002498779296875));
    }

    #[test]
    fn test_npv_all_keeps_rows_for_one_sided_first_cost() {
        let mut pds = blank_series();
        pds.lifetime_operating_savings = constant(dec!(-1)).between(2021, 2030);
        let mut reference = blank_series();
        reference.annual_world_first_cost = constant(dec!(0)).between(2021, 2031);
        let ctx = context(half_discount_settings(), pds, reference);

        // 2019 and 2020 have neither a first-cost difference nor savings but
        // keep rows 0 and 1: npv = 0.5^3 + ... + 0.5^12 = 0.25 - 0.5^12
        assert_eq!(
            ctx.lifetime_cashflow_npv_all().unwrap(),
            dec!(0.000249755859375)
        );
    }

    fn margin_context(disturbance_rate: Decimal) -> Context {
        let mut s = settings();
        s.disturbance_rate = disturbance_rate;
        let mut pds = blank_series();
        pds.net_profit_margin = linear(dec!(0), dec!(1));
        context(s, pds, blank_series())
    }

    #[test]
    fn test_net_profit_margin() {
        assert_eq!(margin_context(Decimal::ZERO).net_profit_margin().unwrap(), dec!(0.075));
        assert_eq!(margin_context(dec!(0.2)).net_profit_margin().unwrap(), dec!(0.06));
    }

    #[test]
    fn test_lifetime_profit_margin() {
        // 0 + 1 + ... + 12 over 2018..=2030
        assert_eq!(margin_context(Decimal::ZERO).lifetime_profit_margin().unwrap(), dec!(0.078));
    }

    #[test]
    fn test_metrics_are_idempotent() {
        let ctx = abatement_context();
        assert_eq!(ctx.abatement_cost().unwrap(), ctx.abatement_cost().unwrap());
        assert_eq!(
            ctx.lifetime_cashflow_npv_all().unwrap(),
            ctx.lifetime_cashflow_npv_all().unwrap()
        );
    }
}
