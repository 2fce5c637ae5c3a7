//! Dataset access
//!
//! [`DatasetSource`] is the read-only seam between the retriever and the
//! remote archive: given a location it returns the aligned `time`,
//! `temperature` and `pressure` sequences of one dataset. [`NetcdfSource`]
//! implements it with libnetcdf, built with DAP so that OPeNDAP URLs and
//! local files open alike.

use crate::datenum::{parse_time_units, TimeUnits};
use crate::errors::{PierDataError, RemoteAccessCause, Result};
use log::{debug, info};
use ndarray::Array1;
use netcdf::{AttributeValue, File, Variable};

pub const TIME_VAR: &str = "time";
pub const TEMPERATURE_VAR: &str = "temperature";
pub const PRESSURE_VAR: &str = "pressure";

/// Aligned observation sequences of one dataset
///
/// `time` is in seconds since 1970-01-01; masked values are NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationArrays {
    pub time: Array1<f64>,
    pub temperature: Array1<f64>,
    pub pressure: Array1<f64>,
}

impl ObservationArrays {
    /// Build from equal-length sequences
    ///
    /// Fails with [`RemoteAccessCause::LengthMismatch`] attributed to `url`
    /// when the lengths differ.
    pub fn new(
        url: &str,
        time: Vec<f64>,
        temperature: Vec<f64>,
        pressure: Vec<f64>,
    ) -> Result<Self> {
        if time.len() != temperature.len() || time.len() != pressure.len() {
            return Err(PierDataError::remote(
                url,
                RemoteAccessCause::LengthMismatch {
                    time: time.len(),
                    temperature: temperature.len(),
                    pressure: pressure.len(),
                },
            ));
        }
        Ok(Self {
            time: Array1::from_vec(time),
            temperature: Array1::from_vec(temperature),
            pressure: Array1::from_vec(pressure),
        })
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}

/// Read-only access to a pier dataset by location
pub trait DatasetSource {
    /// Fetch the full observation arrays stored at `url`
    fn open_dataset(&self, url: &str) -> Result<ObservationArrays>;
}

impl<S: DatasetSource + ?Sized> DatasetSource for &S {
    fn open_dataset(&self, url: &str) -> Result<ObservationArrays> {
        (**self).open_dataset(url)
    }
}

/// [`DatasetSource`] backed by the `netcdf` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct NetcdfSource;

impl NetcdfSource {
    pub fn new() -> Self {
        Self
    }
}

impl DatasetSource for NetcdfSource {
    fn open_dataset(&self, url: &str) -> Result<ObservationArrays> {
        info!("Opening pier dataset {}", url);
        // Dropping `file` closes the dataset on every return path
        let file = netcdf::open(url)
            .map_err(|e| PierDataError::remote(url, RemoteAccessCause::Open(e)))?;

        let arrays = read_observations(&file, url)?;
        debug!("Read {} observations from {}", arrays.len(), url);
        Ok(arrays)
    }
}

fn read_observations(file: &File, url: &str) -> Result<ObservationArrays> {
    let time_var = required_variable(file, url, TIME_VAR)?;
    let temperature_var = required_variable(file, url, TEMPERATURE_VAR)?;
    let pressure_var = required_variable(file, url, PRESSURE_VAR)?;

    let units = time_units(&time_var, url)?;
    let time: Vec<f64> = read_values(&time_var, url)?
        .into_iter()
        .map(|t| units.to_epoch_seconds(t))
        .collect();
    let temperature = read_values(&temperature_var, url)?;
    let pressure = read_values(&pressure_var, url)?;

    ObservationArrays::new(url, time, temperature, pressure)
}

fn required_variable<'f>(file: &'f File, url: &str, name: &str) -> Result<Variable<'f>> {
    file.variable(name).ok_or_else(|| {
        PierDataError::remote(url, RemoteAccessCause::MissingVariable(name.to_string()))
    })
}

/// Reads a variable as `f64` with CF mask-and-scale applied
///
/// Raw values equal to `_FillValue` / `missing_value`, or outside
/// `valid_min` / `valid_max` / `valid_range`, become NaN. The rest are
/// unpacked as `raw * scale_factor + add_offset`.
fn read_values(var: &Variable, url: &str) -> Result<Vec<f64>> {
    let raw = var.get_values::<f64, _>(..).map_err(|e| {
        PierDataError::remote(
            url,
            RemoteAccessCause::Read {
                var: var.name(),
                source: e,
            },
        )
    })?;

    let mask = ValidMask::from_variable(var);
    let scale = numeric_attribute(var, "scale_factor").unwrap_or(1.0);
    let add_offset = numeric_attribute(var, "add_offset").unwrap_or(0.0);

    Ok(raw
        .into_iter()
        .map(|v| {
            if mask.rejects(v) {
                f64::NAN
            } else {
                v * scale + add_offset
            }
        })
        .collect())
}

/// Masking attributes of one variable, compared against packed values
#[derive(Debug, Default)]
struct ValidMask {
    fills: Vec<f64>,
    min: Option<f64>,
    max: Option<f64>,
}

impl ValidMask {
    fn from_variable(var: &Variable) -> Self {
        let fills = ["_FillValue", "missing_value"]
            .iter()
            .filter_map(|name| numeric_attribute_values(var, name))
            .flatten()
            .collect();

        let (mut min, mut max) = match numeric_attribute_values(var, "valid_range").as_deref() {
            Some([lo, hi]) => (Some(*lo), Some(*hi)),
            _ => (None, None),
        };
        if let Some(v) = numeric_attribute(var, "valid_min") {
            min = Some(v);
        }
        if let Some(v) = numeric_attribute(var, "valid_max") {
            max = Some(v);
        }

        Self { fills, min, max }
    }

    fn rejects(&self, v: f64) -> bool {
        self.fills.contains(&v)
            || self.min.is_some_and(|lo| v < lo)
            || self.max.is_some_and(|hi| v > hi)
    }
}

fn numeric_attribute(var: &Variable, name: &str) -> Option<f64> {
    numeric_attribute_values(var, name)?.first().copied()
}

fn numeric_attribute_values(var: &Variable, name: &str) -> Option<Vec<f64>> {
    fn widen<T: Copy + Into<f64>>(vs: Vec<T>) -> Vec<f64> {
        vs.into_iter().map(Into::into).collect()
    }

    let values = match var.attribute(name)?.value().ok()? {
        AttributeValue::Double(v) => vec![v],
        AttributeValue::Float(v) => vec![f64::from(v)],
        AttributeValue::Int(v) => vec![f64::from(v)],
        AttributeValue::Short(v) => vec![f64::from(v)],
        AttributeValue::Uint(v) => vec![f64::from(v)],
        AttributeValue::Ushort(v) => vec![f64::from(v)],
        AttributeValue::Schar(v) => vec![f64::from(v)],
        AttributeValue::Uchar(v) => vec![f64::from(v)],
        AttributeValue::Longlong(v) => vec![v as f64],
        AttributeValue::Ulonglong(v) => vec![v as f64],
        AttributeValue::Doubles(vs) => vs,
        AttributeValue::Floats(vs) => widen(vs),
        AttributeValue::Ints(vs) => widen(vs),
        AttributeValue::Shorts(vs) => widen(vs),
        AttributeValue::Uints(vs) => widen(vs),
        AttributeValue::Ushorts(vs) => widen(vs),
        AttributeValue::Schars(vs) => widen(vs),
        AttributeValue::Uchars(vs) => widen(vs),
        AttributeValue::Longlongs(vs) => vs.into_iter().map(|v| v as f64).collect(),
        AttributeValue::Ulonglongs(vs) => vs.into_iter().map(|v| v as f64).collect(),
        _ => return None,
    };
    (!values.is_empty()).then_some(values)
}

fn time_units(var: &Variable, url: &str) -> Result<TimeUnits> {
    let units = match var.attribute("units").and_then(|a| a.value().ok()) {
        Some(AttributeValue::Str(units)) => units,
        _ => return Ok(TimeUnits::UNIX_SECONDS),
    };
    parse_time_units(&units)
        .ok_or_else(|| PierDataError::remote(url, RemoteAccessCause::BadTimeUnits(units)))
}
