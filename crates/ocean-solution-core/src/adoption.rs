//! Unit adoption metrics: how far the PDS scenario gets, absolutely, relative
//! to the reference scenario and as a share of the total addressable market.

use rust_decimal::Decimal;

use crate::context::ScenarioContext;
use crate::error::OceanSolutionError;
use crate::scenario::ScenarioProvider;
use crate::types::Year;
use crate::OceanResult;

impl<S: ScenarioProvider> ScenarioContext<S> {
    /// PDS minus REF units adopted in the final year.
    pub fn adoption_unit_increase_pds_vs_ref_final_year(&self) -> OceanResult<Decimal> {
        let pds = self.pds_scenario().units_adopted()?;
        let reference = self.ref_scenario().units_adopted()?;
        pds.subtract(&reference).get(self.end_year())
    }

    pub fn adoption_unit_increase_pds_final_year(&self) -> OceanResult<Decimal> {
        self.pds_scenario().units_adopted()?.get(self.end_year())
    }

    /// Adoption share of TAM one year into the scenario (`base_year + 1`).
    pub fn global_percent_adoption_base_year(&self) -> OceanResult<Decimal> {
        self.percent_adoption(self.base_year() + 1)
    }

    pub fn percent_adoption_start_year(&self) -> OceanResult<Decimal> {
        self.percent_adoption(self.start_year())
    }

    pub fn percent_adoption_end_year(&self) -> OceanResult<Decimal> {
        self.percent_adoption(self.end_year())
    }

    fn percent_adoption(&self, year: Year) -> OceanResult<Decimal> {
        let units = self.pds_scenario().units_adopted()?.get(year)?;
        let tam = self.pds_scenario().tam_units()?.get(year)?;
        if tam.is_zero() {
            return Err(OceanSolutionError::DivisionByZero {
                context: format!("percent adoption, TAM is zero in {year}"),
            });
        }
        Ok(units / tam)
    }
}
