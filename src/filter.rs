//! Date-window selection over date numbers
//!
//! Both window bounds are exclusive: an observation is kept only when
//! `start < dnum < end`. When a bound is left open it defaults to the
//! extreme date number of the data, so the first and last observations of
//! a dataset are dropped by an unbounded request.

use ndarray::ArrayView1;

/// How missing bounds are filled in across the years of a range request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundsPolicy {
    /// Fill the bounds from the first year with data and reuse them for every
    /// later year
    #[default]
    CarryFirstYear,
    /// Fill the bounds from each year's own data
    PerYear,
}

/// Optional date-number bounds requested by the caller
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DateWindow {
    pub start: Option<f64>,
    pub end: Option<f64>,
}

impl DateWindow {
    pub fn new(start: Option<f64>, end: Option<f64>) -> Self {
        Self { start, end }
    }

    /// No caller bounds; both default to the data extent
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn between(start: f64, end: f64) -> Self {
        Self::new(Some(start), Some(end))
    }

    /// True when both bounds are set
    pub fn is_closed(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }

    /// Fill open bounds from `dnum`.
    ///
    /// Returns `None` when a bound is open and `dnum` has no finite values.
    pub fn resolve(&self, dnum: ArrayView1<'_, f64>) -> Option<(f64, f64)> {
        if let (Some(start), Some(end)) = (self.start, self.end) {
            return Some((start, end));
        }
        let (lo, hi) = data_bounds(dnum)?;
        Some((self.start.unwrap_or(lo), self.end.unwrap_or(hi)))
    }
}

/// Smallest and largest finite date number, ignoring NaN fill values
pub fn data_bounds(dnum: ArrayView1<'_, f64>) -> Option<(f64, f64)> {
    dnum.iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Indices of observations strictly inside `(start, end)`
pub fn select_indices(dnum: ArrayView1<'_, f64>, start: f64, end: f64) -> Vec<usize> {
    dnum.indexed_iter()
        .filter(|(_, d)| **d > start && **d < end)
        .map(|(i, _)| i)
        .collect()
}
