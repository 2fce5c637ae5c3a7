//! The Pier Record returned to callers

use crate::errors::{PierDataError, Result};
use ndarray::{Array1, ArrayView1};
use serde_json::{json, Value as JsonValue};

/// Aligned date-number, temperature and pressure sequences with provenance
///
/// `dnum`, `temperature` and `pressure` always have the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct PierRecord {
    pub dnum: Array1<f64>,
    pub temperature: Array1<f64>,
    pub pressure: Array1<f64>,
    pub readme: String,
}

/// Min/mean/max/std over the finite values of one sequence
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
    pub valid: usize,
}

/// Quick overview of a record
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSummary {
    pub count: usize,
    pub first_dnum: Option<f64>,
    pub last_dnum: Option<f64>,
    pub temperature: Option<SeriesStats>,
    pub pressure: Option<SeriesStats>,
}

impl PierRecord {
    /// Assemble a record from aligned sequences
    ///
    /// Fails with [`PierDataError::MisalignedRecord`] if the lengths differ.
    pub fn new(
        dnum: Array1<f64>,
        temperature: Array1<f64>,
        pressure: Array1<f64>,
        readme: impl Into<String>,
    ) -> Result<Self> {
        if dnum.len() != temperature.len() || dnum.len() != pressure.len() {
            return Err(PierDataError::MisalignedRecord {
                dnum: dnum.len(),
                temperature: temperature.len(),
                pressure: pressure.len(),
            });
        }
        Ok(Self {
            dnum,
            temperature,
            pressure,
            readme: readme.into(),
        })
    }

    /// A record with no observations
    pub fn empty(readme: impl Into<String>) -> Self {
        Self {
            dnum: Array1::zeros(0),
            temperature: Array1::zeros(0),
            pressure: Array1::zeros(0),
            readme: readme.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.dnum.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dnum.is_empty()
    }

    pub fn summary(&self) -> RecordSummary {
        RecordSummary {
            count: self.len(),
            first_dnum: self.dnum.iter().next().copied(),
            last_dnum: self.dnum.iter().next_back().copied(),
            temperature: series_stats(self.temperature.view()),
            pressure: series_stats(self.pressure.view()),
        }
    }

    /// JSON object with `dnum`, `temperature`, `pressure` and `readme` keys
    ///
    /// NaN values become `null`.
    pub fn to_json(&self) -> JsonValue {
        json!({
            "dnum": self.dnum.to_vec(),
            "temperature": self.temperature.to_vec(),
            "pressure": self.pressure.to_vec(),
            "readme": self.readme,
        })
    }
}

/// Statistics over finite values; `None` if there are none
pub fn series_stats(values: ArrayView1<'_, f64>) -> Option<SeriesStats> {
    let valid: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if valid.is_empty() {
        return None;
    }

    let n = valid.len() as f64;
    let min = valid.iter().copied().fold(f64::INFINITY, f64::min);
    let max = valid.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mean = valid.iter().sum::<f64>() / n;
    let std_dev = (valid.iter().map(|&x| (x - mean).powi(2)).sum::<f64>() / n).sqrt();

    Some(SeriesStats {
        min,
        max,
        mean,
        std_dev,
        valid: valid.len(),
    })
}
