//! Yearly time series and the spreadsheet-style operations the metrics are
//! built from.
//!
//! A [`TimeSeries`] maps calendar years to decimal values, ordered by year.
//! Positional operations ([`TimeSeries::discount_by_position`],
//! [`TimeSeries::cumsum`]) follow that ordering, not the year distance from
//! any epoch.
//!
//! Alignment rules for binary operations:
//! - [`TimeSeries::subtract`] keeps only the years present in both operands.
//! - [`TimeSeries::subtract_aligned`] covers the union of years and leaves a
//!   blank wherever one operand is missing. Blanks are carried by a
//!   [`GappedSeries`] so that they keep their row for positional discounting.
//! - [`GappedSeries::add`] blanks any year where either side is blank.
//! - [`GappedSeries::add_filled`] treats a blank side as zero unless both
//!   sides are blank.

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::OceanSolutionError;
use crate::types::{Rate, Year};
use crate::OceanResult;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeSeries {
    values: BTreeMap<Year, Decimal>,
}

impl TimeSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a contiguous series starting at `first_year`.
    pub fn from_values(first_year: Year, values: &[Decimal]) -> Self {
        values
            .iter()
            .enumerate()
            .map(|(offset, value)| (first_year + offset as Year, *value))
            .collect()
    }

    pub fn insert(&mut self, year: Year, value: Decimal) -> Option<Decimal> {
        self.values.insert(year, value)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn first_year(&self) -> Option<Year> {
        self.values.keys().next().copied()
    }

    pub fn last_year(&self) -> Option<Year> {
        self.values.keys().next_back().copied()
    }

    pub fn contains_year(&self, year: Year) -> bool {
        self.values.contains_key(&year)
    }

    pub fn years(&self) -> impl Iterator<Item = Year> + '_ {
        self.values.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Year, Decimal)> + '_ {
        self.values.iter().map(|(year, value)| (*year, *value))
    }

    /// Value at `year`, or a range error if the year is not covered.
    pub fn get(&self, year: Year) -> OceanResult<Decimal> {
        self.values
            .get(&year)
            .copied()
            .ok_or_else(|| OceanSolutionError::SeriesRange {
                year,
                range: self.describe_range(),
            })
    }

    /// Human-readable covered range, used in error messages.
    pub fn describe_range(&self) -> String {
        match (self.first_year(), self.last_year()) {
            (Some(first), Some(last)) => format!("{first}..={last}"),
            _ => "empty series".to_string(),
        }
    }

    pub fn subtract(&self, other: &TimeSeries) -> TimeSeries {
        self.values
            .iter()
            .filter_map(|(year, value)| other.values.get(year).map(|rhs| (*year, value - rhs)))
            .collect()
    }

    /// Difference over the union of years, blank where either side is missing.
    pub fn subtract_aligned(&self, other: &TimeSeries) -> GappedSeries {
        union_years(&self.values, &other.values)
            .into_iter()
            .map(|year| {
                let value = match (self.values.get(&year), other.values.get(&year)) {
                    (Some(lhs), Some(rhs)) => Some(lhs - rhs),
                    _ => None,
                };
                (year, value)
            })
            .collect()
    }

    pub fn scale(&self, factor: Decimal) -> TimeSeries {
        self.map_values(|value| value * factor)
    }

    pub fn negate(&self) -> TimeSeries {
        self.map_values(|value| -value)
    }

    /// Running total in year order.
    pub fn cumsum(&self) -> TimeSeries {
        let mut running = Decimal::ZERO;
        self.values
            .iter()
            .map(|(year, value)| {
                running += value;
                (*year, running)
            })
            .collect()
    }

    /// Years within `[start, end]`. Bounds need not be present.
    pub fn between(&self, start: Year, end: Year) -> TimeSeries {
        if start > end {
            return TimeSeries::new();
        }
        self.values
            .range(start..=end)
            .map(|(year, value)| (*year, *value))
            .collect()
    }

    /// Years up to and including `end`.
    pub fn until(&self, end: Year) -> TimeSeries {
        self.values
            .range(..=end)
            .map(|(year, value)| (*year, *value))
            .collect()
    }

    pub fn sum(&self) -> Decimal {
        self.values.values().copied().sum()
    }

    /// Sum over `[start, end]`; every year in the range must be present.
    pub fn sum_years(&self, start: Year, end: Year) -> OceanResult<Decimal> {
        let mut total = Decimal::ZERO;
        for year in start..=end {
            total += self.get(year)?;
        }
        Ok(total)
    }

    pub fn max(&self) -> OceanResult<Decimal> {
        self.values.values().copied().max().ok_or_else(|| {
            OceanSolutionError::InsufficientData("maximum of an empty series".into())
        })
    }

    /// `cumsum[end] - cumsum[start]`, i.e. the total of `(start, end]`.
    pub fn cumulative_difference(&self, start: Year, end: Year) -> OceanResult<Decimal> {
        let cumulative = self.cumsum();
        Ok(cumulative.get(end)? - cumulative.get(start)?)
    }

    /// Multiply row `i` (0-based, in year order) by `(1 / (1 + rate))^(i + 1)`.
    pub fn discount_by_position(&self, rate: Rate) -> OceanResult<TimeSeries> {
        let factor = per_period_discount(rate)?;
        let mut discount = Decimal::ONE;
        Ok(self
            .values
            .iter()
            .map(|(year, value)| {
                discount *= factor;
                (*year, value * discount)
            })
            .collect())
    }

    fn map_values(&self, f: impl Fn(Decimal) -> Decimal) -> TimeSeries {
        self.values
            .iter()
            .map(|(year, value)| (*year, f(*value)))
            .collect()
    }
}

/// `1 / (1 + rate)`, rejecting rates at or below -100%.
pub(crate) fn per_period_discount(rate: Rate) -> OceanResult<Decimal> {
    if rate <= -Decimal::ONE {
        return Err(OceanSolutionError::InvalidInput {
            field: "discount_rate".into(),
            reason: "Discount rate must be greater than -100%".into(),
        });
    }
    Ok(Decimal::ONE / (Decimal::ONE + rate))
}

/// Year-aligned series whose rows may be blank.
///
/// A blank row has no value but still occupies its position, which matters
/// once the series is filled and discounted by row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GappedSeries {
    values: BTreeMap<Year, Option<Decimal>>,
}

impl GappedSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `None` for a blank row or a year outside the series.
    pub fn get(&self, year: Year) -> Option<Decimal> {
        self.values.get(&year).copied().flatten()
    }

    /// Rows within `[start, end]`, blanks included.
    pub fn between(&self, start: Year, end: Year) -> GappedSeries {
        if start > end {
            return GappedSeries::default();
        }
        self.values
            .range(start..=end)
            .map(|(year, value)| (*year, *value))
            .collect()
    }

    pub fn scale(&self, factor: Decimal) -> GappedSeries {
        self.values
            .iter()
            .map(|(year, value)| (*year, value.map(|v| v * factor)))
            .collect()
    }

    /// Sum over the union of years, blank unless both sides have a value.
    pub fn add(&self, other: &GappedSeries) -> GappedSeries {
        self.combine(other, |lhs, rhs| match (lhs, rhs) {
            (Some(lhs), Some(rhs)) => Some(lhs + rhs),
            _ => None,
        })
    }

    /// Sum over the union of years, a blank side counting as zero. Blank only
    /// where both sides are.
    pub fn add_filled(&self, other: &GappedSeries) -> GappedSeries {
        self.combine(other, |lhs, rhs| match (lhs, rhs) {
            (None, None) => None,
            (lhs, rhs) => Some(lhs.unwrap_or_default() + rhs.unwrap_or_default()),
        })
    }

    /// Replace every blank with `value`, keeping all rows.
    pub fn fill(&self, value: Decimal) -> TimeSeries {
        self.values
            .iter()
            .map(|(year, v)| (*year, v.unwrap_or(value)))
            .collect()
    }

    fn combine(
        &self,
        other: &GappedSeries,
        f: impl Fn(Option<Decimal>, Option<Decimal>) -> Option<Decimal>,
    ) -> GappedSeries {
        union_years(&self.values, &other.values)
            .into_iter()
            .map(|year| (year, f(self.get(year), other.get(year))))
            .collect()
    }
}

fn union_years<A, B>(lhs: &BTreeMap<Year, A>, rhs: &BTreeMap<Year, B>) -> BTreeSet<Year> {
    lhs.keys().chain(rhs.keys()).copied().collect()
}

impl FromIterator<(Year, Option<Decimal>)> for GappedSeries {
    fn from_iter<I: IntoIterator<Item = (Year, Option<Decimal>)>>(iter: I) -> Self {
        GappedSeries {
            values: iter.into_iter().collect(),
        }
    }
}

impl From<&TimeSeries> for GappedSeries {
    fn from(series: &TimeSeries) -> Self {
        series.iter().map(|(year, value)| (year, Some(value))).collect()
    }
}

impl FromIterator<(Year, Decimal)> for TimeSeries {
    fn from_iter<I: IntoIterator<Item = (Year, Decimal)>>(iter: I) -> Self {
        TimeSeries {
            values: iter.into_iter().collect(),
        }
    }
}

impl From<BTreeMap<Year, Decimal>> for TimeSeries {
    fn from(values: BTreeMap<Year, Decimal>) -> Self {
        TimeSeries { values }
    }
}
