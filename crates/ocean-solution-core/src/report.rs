use std::fmt;
use std::time::Instant;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::context::{ContextSettings, ScenarioContext};
use crate::scenario::ScenarioProvider;
use crate::types::{with_metadata, ComputationOutput, Money, Year};
use crate::OceanResult;

/// Every adoption, financial and carbon metric for one purchase year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolutionSummary {
    pub purchase_year: Year,
    pub adoption_unit_increase_pds_vs_ref_final_year: Decimal,
    pub adoption_unit_increase_pds_final_year: Decimal,
    pub global_percent_adoption_base_year: Decimal,
    pub percent_adoption_start_year: Decimal,
    pub percent_adoption_end_year: Decimal,
    pub marginal_first_cost: Money,
    pub cumulative_first_cost_pds: Money,
    pub operating_cost: Money,
    pub lifetime_operating_savings: Money,
    pub lifetime_cashflow_npv_single: Money,
    pub payback_period_soln_only: Money,
    pub payback_period_soln_only_npv: Money,
    pub payback_period_soln_to_conv: Money,
    pub payback_period_soln_to_conv_npv: Money,
    pub lifetime_cashflow_npv_all: Money,
    pub abatement_cost: Money,
    pub net_profit_margin: Money,
    pub lifetime_profit_margin: Money,
    pub total_co2_seq: Decimal,
    pub change_in_ppm_equiv: Decimal,
    pub change_in_ppm_equiv_final_year: Decimal,
    pub max_annual_co2_sequestered: Decimal,
    pub co2_sequestered_final_year: Decimal,
}

/// Evaluate every metric. Any failure fails the whole summary.
pub fn summarize<S: ScenarioProvider>(
    context: &ScenarioContext<S>,
    purchase_year: Year,
    warnings: Vec<String>,
) -> OceanResult<ComputationOutput<SolutionSummary>> {
    let start = Instant::now();

    let summary = SolutionSummary {
        purchase_year,
        adoption_unit_increase_pds_vs_ref_final_year: context
            .adoption_unit_increase_pds_vs_ref_final_year()?,
        adoption_unit_increase_pds_final_year: context.adoption_unit_increase_pds_final_year()?,
        global_percent_adoption_base_year: context.global_percent_adoption_base_year()?,
        percent_adoption_start_year: context.percent_adoption_start_year()?,
        percent_adoption_end_year: context.percent_adoption_end_year()?,
        marginal_first_cost: context.marginal_first_cost()?,
        cumulative_first_cost_pds: context.cumulative_first_cost_pds()?,
        operating_cost: context.operating_cost()?,
        lifetime_operating_savings: context.lifetime_operating_savings()?,
        lifetime_cashflow_npv_single: context.lifetime_cashflow_npv_single(purchase_year)?,
        payback_period_soln_only: context.payback_period_soln_only(purchase_year)?,
        payback_period_soln_only_npv: context.payback_period_soln_only_npv(purchase_year)?,
        payback_period_soln_to_conv: context.payback_period_soln_to_conv(purchase_year)?,
        payback_period_soln_to_conv_npv: context.payback_period_soln_to_conv_npv(purchase_year)?,
        lifetime_cashflow_npv_all: context.lifetime_cashflow_npv_all()?,
        abatement_cost: context.abatement_cost()?,
        net_profit_margin: context.net_profit_margin()?,
        lifetime_profit_margin: context.lifetime_profit_margin()?,
        total_co2_seq: context.total_co2_seq()?,
        change_in_ppm_equiv: context.change_in_ppm_equiv(0)?,
        change_in_ppm_equiv_final_year: context.change_in_ppm_equiv_final_year()?,
        max_annual_co2_sequestered: context.max_annual_co2_sequestered()?,
        co2_sequestered_final_year: context.co2_sequestered_final_year()?,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "PDS vs REF adoption comparison (first cost, operating cost, NPV, payback, abatement, CO2)",
        &SummaryAssumptions::from(context.settings()),
        warnings,
        elapsed,
        summary,
    ))
}

#[derive(Debug, Serialize)]
struct SummaryAssumptions<'a> {
    #[serde(flatten)]
    settings: &'a ContextSettings,
    money_scale: &'static str,
    discounting: &'static str,
}

impl<'a> From<&'a ContextSettings> for SummaryAssumptions<'a> {
    fn from(settings: &'a ContextSettings) -> Self {
        SummaryAssumptions {
            settings,
            money_scale: "billions of USD",
            discounting: "positional, (1 / (1 + r))^(row + 1)",
        }
    }
}

/// A single metric, addressable by its snake_case name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    AdoptionUnitIncreasePdsVsRefFinalYear,
    AdoptionUnitIncreasePdsFinalYear,
    GlobalPercentAdoptionBaseYear,
    PercentAdoptionStartYear,
    PercentAdoptionEndYear,
    MarginalFirstCost,
    CumulativeFirstCostPds,
    OperatingCost,
    LifetimeOperatingSavings,
    LifetimeCashflowNpvSingle,
    PaybackPeriodSolnOnly,
    PaybackPeriodSolnOnlyNpv,
    PaybackPeriodSolnToConv,
    PaybackPeriodSolnToConvNpv,
    LifetimeCashflowNpvAll,
    AbatementCost,
    NetProfitMargin,
    LifetimeProfitMargin,
    TotalCo2Seq,
    ChangeInPpmEquiv,
    ChangeInPpmEquivFinalYear,
    MaxAnnualCo2Sequestered,
    Co2SequesteredFinalYear,
}

/// Arguments only some metrics use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricArgs {
    pub purchase_year: Year,
    pub delay_period: u32,
}

impl Metric {
    pub const ALL: [Metric; 23] = [
        Metric::AdoptionUnitIncreasePdsVsRefFinalYear,
        Metric::AdoptionUnitIncreasePdsFinalYear,
        Metric::GlobalPercentAdoptionBaseYear,
        Metric::PercentAdoptionStartYear,
        Metric::PercentAdoptionEndYear,
        Metric::MarginalFirstCost,
        Metric::CumulativeFirstCostPds,
        Metric::OperatingCost,
        Metric::LifetimeOperatingSavings,
        Metric::LifetimeCashflowNpvSingle,
        Metric::PaybackPeriodSolnOnly,
        Metric::PaybackPeriodSolnOnlyNpv,
        Metric::PaybackPeriodSolnToConv,
        Metric::PaybackPeriodSolnToConvNpv,
        Metric::LifetimeCashflowNpvAll,
        Metric::AbatementCost,
        Metric::NetProfitMargin,
        Metric::LifetimeProfitMargin,
        Metric::TotalCo2Seq,
        Metric::ChangeInPpmEquiv,
        Metric::ChangeInPpmEquivFinalYear,
        Metric::MaxAnnualCo2Sequestered,
        Metric::Co2SequesteredFinalYear,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Metric::AdoptionUnitIncreasePdsVsRefFinalYear => {
                "adoption_unit_increase_pds_vs_ref_final_year"
            }
            Metric::AdoptionUnitIncreasePdsFinalYear => "adoption_unit_increase_pds_final_year",
            Metric::GlobalPercentAdoptionBaseYear => "global_percent_adoption_base_year",
            Metric::PercentAdoptionStartYear => "percent_adoption_start_year",
            Metric::PercentAdoptionEndYear => "percent_adoption_end_year",
            Metric::MarginalFirstCost => "marginal_first_cost",
            Metric::CumulativeFirstCostPds => "cumulative_first_cost_pds",
            Metric::OperatingCost => "operating_cost",
            Metric::LifetimeOperatingSavings => "lifetime_operating_savings",
            Metric::LifetimeCashflowNpvSingle => "lifetime_cashflow_npv_single",
            Metric::PaybackPeriodSolnOnly => "payback_period_soln_only",
            Metric::PaybackPeriodSolnOnlyNpv => "payback_period_soln_only_npv",
            Metric::PaybackPeriodSolnToConv => "payback_period_soln_to_conv",
            Metric::PaybackPeriodSolnToConvNpv => "payback_period_soln_to_conv_npv",
            Metric::LifetimeCashflowNpvAll => "lifetime_cashflow_npv_all",
            Metric::AbatementCost => "abatement_cost",
            Metric::NetProfitMargin => "net_profit_margin",
            Metric::LifetimeProfitMargin => "lifetime_profit_margin",
            Metric::TotalCo2Seq => "total_co2_seq",
            Metric::ChangeInPpmEquiv => "change_in_ppm_equiv",
            Metric::ChangeInPpmEquivFinalYear => "change_in_ppm_equiv_final_year",
            Metric::MaxAnnualCo2Sequestered => "max_annual_co2_sequestered",
            Metric::Co2SequesteredFinalYear => "co2_sequestered_final_year",
        }
    }

    pub fn evaluate<S: ScenarioProvider>(
        &self,
        context: &ScenarioContext<S>,
        args: MetricArgs,
    ) -> OceanResult<Decimal> {
        let year = args.purchase_year;
        match self {
            Metric::AdoptionUnitIncreasePdsVsRefFinalYear => {
                context.adoption_unit_increase_pds_vs_ref_final_year()
            }
            Metric::AdoptionUnitIncreasePdsFinalYear => {
                context.adoption_unit_increase_pds_final_year()
            }
            Metric::GlobalPercentAdoptionBaseYear => context.global_percent_adoption_base_year(),
            Metric::PercentAdoptionStartYear => context.percent_adoption_start_year(),
            Metric::PercentAdoptionEndYear => context.percent_adoption_end_year(),
            Metric::MarginalFirstCost => context.marginal_first_cost(),
            Metric::CumulativeFirstCostPds => context.cumulative_first_cost_pds(),
            Metric::OperatingCost => context.operating_cost(),
            Metric::LifetimeOperatingSavings => context.lifetime_operating_savings(),
            Metric::LifetimeCashflowNpvSingle => context.lifetime_cashflow_npv_single(year),
            Metric::PaybackPeriodSolnOnly => context.payback_period_soln_only(year),
            Metric::PaybackPeriodSolnOnlyNpv => context.payback_period_soln_only_npv(year),
            Metric::PaybackPeriodSolnToConv => context.payback_period_soln_to_conv(year),
            Metric::PaybackPeriodSolnToConvNpv => context.payback_period_soln_to_conv_npv(year),
            Metric::LifetimeCashflowNpvAll => context.lifetime_cashflow_npv_all(),
            Metric::AbatementCost => context.abatement_cost(),
            Metric::NetProfitMargin => context.net_profit_margin(),
            Metric::LifetimeProfitMargin => context.lifetime_profit_margin(),
            Metric::TotalCo2Seq => context.total_co2_seq(),
            Metric::ChangeInPpmEquiv => context.change_in_ppm_equiv(args.delay_period),
            Metric::ChangeInPpmEquivFinalYear => context.change_in_ppm_equiv_final_year(),
            Metric::MaxAnnualCo2Sequestered => context.max_annual_co2_sequestered(),
            Metric::Co2SequesteredFinalYear => context.co2_sequestered_final_year(),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
