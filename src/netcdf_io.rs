//! Writing Pier Records to NetCDF
//!
//! The output mirrors the layout of the source datasets closely enough to be
//! read back with [`NetcdfSource`](crate::source::NetcdfSource): one `obs`
//! dimension, a `time` variable in Unix seconds alongside `dnum`, and
//! `temperature` / `pressure`.

use crate::datenum::{EPOCH_ORDINAL, SECONDS_PER_DAY};
use crate::errors::Result;
use crate::record::PierRecord;
use crate::source::{PRESSURE_VAR, TEMPERATURE_VAR, TIME_VAR};
use chrono::Utc;
use log::info;
use netcdf::create;
use std::{fs, path::Path};

/// Name of the observation dimension in written files
pub const OBS_DIM: &str = "obs";

/// Writes a [`PierRecord`] to a NetCDF file
pub struct PierRecordWriter<'a> {
    output_path: &'a Path,
}

impl<'a> PierRecordWriter<'a> {
    pub fn new(output_path: &'a Path) -> Self {
        Self { output_path }
    }

    /// Write `record`, replacing any existing file at the output path
    pub fn write(&self, record: &PierRecord) -> Result<()> {
        if self.output_path.exists() {
            fs::remove_file(self.output_path)?;
        }

        let mut file = create(self.output_path)?;
        file.add_dimension(OBS_DIM, record.len())?;

        let time = record
            .dnum
            .mapv(|d| (d - EPOCH_ORDINAL) * SECONDS_PER_DAY);
        let columns = [
            (TIME_VAR, &time),
            ("dnum", &record.dnum),
            (TEMPERATURE_VAR, &record.temperature),
            (PRESSURE_VAR, &record.pressure),
        ];

        for (name, values) in columns {
            let mut var = file.add_variable::<f64>(name, &[OBS_DIM])?;
            match name {
                TIME_VAR => {
                    var.put_attribute("units", "seconds since 1970-01-01 00:00:00")?;
                }
                "dnum" => {
                    var.put_attribute("long_name", "date number, 0001-01-01 is day 1")?;
                }
                _ => {}
            }
            // A zero-length dimension is stored as unlimited; there is nothing to put
            if !values.is_empty() {
                var.put(values.view(), ..)?;
            }
        }

        file.add_attribute("readme", record.readme.as_str())?;
        file.add_attribute(
            "history",
            format!("Created by pier-data on {}", Utc::now().to_rfc3339()),
        )?;

        info!(
            "Wrote {} observations to {}",
            record.len(),
            self.output_path.display()
        );
        Ok(())
    }
}

/// Writes `record` to `output_path`.
pub fn write_record_to_netcdf(record: &PierRecord, output_path: &Path) -> Result<()> {
    PierRecordWriter::new(output_path).write(record)
}
