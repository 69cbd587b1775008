//! Carbon metrics: CO2 sequestered and the resulting change in atmospheric
//! PPM equivalent, PDS relative to REF.
//!
//! Total sequestration uses the two-rate form of the provider's series while
//! the annual maximum and final-year figures use the degradation-aware form.
//! The two are kept distinct to reproduce the workbook.

use rust_decimal::Decimal;

use crate::context::ScenarioContext;
use crate::error::OceanSolutionError;
use crate::scenario::{Degradation, ScenarioProvider};
use crate::time_series::TimeSeries;
use crate::types::THOUSAND;
use crate::OceanResult;

impl<S: ScenarioProvider> ScenarioContext<S> {
    /// PDS minus REF annual sequestration.
    pub fn net_co2_sequestration_series(
        &self,
        degradation: Option<Degradation>,
    ) -> OceanResult<TimeSeries> {
        let rate = self.sequestration_rate_all_ocean();
        let disturbance = self.disturbance_rate();
        let pds = self
            .pds_scenario()
            .carbon_sequestration(rate, disturbance, degradation)?;
        let reference = self
            .ref_scenario()
            .carbon_sequestration(rate, disturbance, degradation)?;
        Ok(pds.subtract(&reference))
    }

    /// PDS minus REF change in PPM equivalent.
    pub fn net_ppm_equiv_series(&self) -> OceanResult<TimeSeries> {
        let pds = self.pds_scenario().change_in_ppm_equiv_series()?;
        let reference = self.ref_scenario().change_in_ppm_equiv_series()?;
        Ok(pds.subtract(&reference))
    }

    /// Net sequestration over `[start_year + 1, end_year]`.
    pub fn total_co2_seq(&self) -> OceanResult<Decimal> {
        let total = self
            .net_co2_sequestration_series(None)?
            .between(self.start_year() + 1, self.end_year())
            .sum();
        Ok(total / THOUSAND)
    }

    /// Net change in PPM equivalent at `end_year - delay_period`.
    pub fn change_in_ppm_equiv(&self, delay_period: u32) -> OceanResult<Decimal> {
        let year = i32::try_from(delay_period)
            .ok()
            .and_then(|delay| self.end_year().checked_sub(delay))
            .ok_or_else(|| OceanSolutionError::InvalidInput {
                field: "delay_period".into(),
                reason: format!("delay of {delay_period} years is not a representable offset"),
            })?;
        self.net_ppm_equiv_series()?.get(year)
    }

    pub fn change_in_ppm_equiv_final_year(&self) -> OceanResult<Decimal> {
        let net = self.net_ppm_equiv_series()?;
        let end = self.end_year();
        Ok(net.get(end)? - net.get(end - 1)?)
    }

    pub fn max_annual_co2_sequestered(&self) -> OceanResult<Decimal> {
        let net = self.net_co2_sequestration_series(Some(self.degradation()))?;
        let (mut start, mut end) = (self.start_year(), self.end_year());
        if self.delay_regrowth_of_degraded_land_by_one_year() {
            start -= 1;
            end -= 1;
        }
        Ok(net.between(start, end).max()? / THOUSAND)
    }

    pub fn co2_sequestered_final_year(&self) -> OceanResult<Decimal> {
        let net = self.net_co2_sequestration_series(Some(self.degradation()))?;
        let mut end = self.end_year();
        if self.delay_regrowth_of_degraded_land_by_one_year() {
            end -= 1;
        }
        Ok(net.get(end)? / THOUSAND)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ContextSettings;
    use crate::fixtures::{blank_series, constant, context, linear, settings};
    use crate::scenario::TabulatedScenario;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn carbon_context(settings: ContextSettings) -> ScenarioContext<TabulatedScenario> {
        let mut pds = blank_series();
        // 2020: 2, 2021: 3, ..., 2030: 12
        pds.carbon_sequestration = linear(dec!(0), dec!(1));
        // Decreasing: 2019: 12000, 2020: 11000, ..., 2030: 1000
        pds.carbon_sequestration_degraded = Some(linear(dec!(13000), dec!(-1000)));
        pds.change_in_ppm_equiv = linear(dec!(0), dec!(0.1));
        let mut reference = blank_series();
        reference.change_in_ppm_equiv = constant(dec!(0.05));
        context(settings, pds, reference)
    }

    #[test]
    fn test_total_co2_seq_excludes_start_year() {
        let ctx = carbon_context(settings());
        // 3 + 4 + ... + 12
        assert_eq!(ctx.total_co2_seq().unwrap(), dec!(0.075));
    }

    #[test]
    fn test_change_in_ppm_equiv() {
        let ctx = carbon_context(settings());
        assert_eq!(ctx.change_in_ppm_equiv(0).unwrap(), dec!(1.15));
        assert_eq!(ctx.change_in_ppm_equiv(2).unwrap(), dec!(0.95));
    }

    #[test]
    fn test_change_in_ppm_equiv_final_year() {
        let ctx = carbon_context(settings());
        assert_eq!(ctx.change_in_ppm_equiv_final_year().unwrap(), dec!(0.1));
    }

    #[test]
    fn test_ppm_delay_beyond_series() {
        let ctx = carbon_context(settings());
        assert!(matches!(
            ctx.change_in_ppm_equiv(20),
            Err(OceanSolutionError::SeriesRange { year: 2010, .. })
        ));
    }

    #[test]
    fn test_ppm_delay_never_reads_past_end_year() {
        let ctx = carbon_context(settings());
        assert!(matches!(
            ctx.change_in_ppm_equiv(u32::MAX),
            Err(OceanSolutionError::InvalidInput { .. })
        ));
        assert!(matches!(
            ctx.change_in_ppm_equiv(1 << 31),
            Err(OceanSolutionError::InvalidInput { .. })
        ));
        assert!(matches!(
            ctx.change_in_ppm_equiv(i32::MAX as u32),
            Err(OceanSolutionError::SeriesRange { .. })
        ));
    }

    #[test]
    fn test_max_annual_uses_degraded_series() {
        let ctx = carbon_context(settings());
        assert_eq!(ctx.max_annual_co2_sequestered().unwrap(), dec!(11));
    }

    #[test]
    fn test_final_year_uses_degraded_series() {
        let ctx = carbon_context(settings());
        assert_eq!(ctx.co2_sequestered_final_year().unwrap(), dec!(1));
    }

    #[test]
    fn test_regrowth_delay_shifts_one_year_earlier() {
        let mut s = settings();
        s.delay_regrowth_of_degraded_land_by_one_year = true;
        let ctx = carbon_context(s);
        assert_eq!(ctx.max_annual_co2_sequestered().unwrap(), dec!(12));
        assert_eq!(ctx.co2_sequestered_final_year().unwrap(), dec!(2));
    }

    #[test]
    fn test_regrowth_delay_does_not_affect_total() {
        let mut s = settings();
        s.delay_regrowth_of_degraded_land_by_one_year = true;
        assert_eq!(
            carbon_context(s).total_co2_seq().unwrap(),
            carbon_context(settings()).total_co2_seq().unwrap()
        );
    }

    #[test]
    fn test_max_annual_empty_range() {
        let mut pds = blank_series();
        pds.carbon_sequestration = constant(dec!(1)).between(2018, 2019);
        let mut reference = blank_series();
        reference.carbon_sequestration = constant(dec!(0)).between(2018, 2019);
        let ctx = context(settings(), pds, reference);
        assert!(matches!(
            ctx.max_annual_co2_sequestered(),
            Err(OceanSolutionError::InsufficientData(_))
        ));
    }
}
