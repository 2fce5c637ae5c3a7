//! pier-data: Scripps Pier temperature and pressure retrieval
//!
//! Fetches the yearly Scripps Pier automated shore station datasets published
//! by SCCOOS over OPeNDAP, converts their `time` axis to continuous date
//! numbers, filters observations to a date window and merges multiple years
//! into one [`PierRecord`](record::PierRecord).
//!
//! ## Module Organization
//!
//! - [`retriever`]: `fetch_single_year` / `fetch_year_range`
//! - [`source`]: the `DatasetSource` seam and its NetCDF/OPeNDAP implementation
//! - [`filter`]: strict date-window selection and default-bound policy
//! - [`datenum`]: date-number and CF time-unit conversion
//! - [`record`]: the returned record and its summary statistics
//! - [`netcdf_io`]: writing records to local NetCDF files
//! - [`config`]: dataset location and retrieval settings
//! - [`errors`]: centralized error handling
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pier_data::prelude::*;
//!
//! // Everything from 2015 through 2016, default bounds carried from 2015
//! let record = pier_data::fetch_year_range(2015, 2016, None, None).unwrap();
//! assert_eq!(record.dnum.len(), record.temperature.len());
//!
//! // The single-year dataset, restricted to March 2021
//! let start = datenum_from_date(chrono::NaiveDate::from_ymd_opt(2021, 3, 1).unwrap());
//! let end = datenum_from_date(chrono::NaiveDate::from_ymd_opt(2021, 4, 1).unwrap());
//! let march = pier_data::fetch_single_year(Some(start), Some(end)).unwrap();
//! println!("{}: {} observations", march.readme, march.len());
//! ```
//!
//! Each call opens its datasets fresh, sequentially, and either returns a
//! complete record or an error.

pub mod config;
pub mod datenum;
pub mod errors;
pub mod filter;
pub mod netcdf_io;
pub mod record;
pub mod retriever;
pub mod source;

pub use errors::{PierDataError, RemoteAccessCause, Result};
pub use record::PierRecord;
pub use retriever::{fetch_single_year, fetch_year_range, PierDataRetriever};

pub mod prelude {
    //! Commonly used imports for convenience
    pub use crate::config::PierConfig;
    pub use crate::datenum::{datenum_from_date, datenum_from_datetime, seconds_to_datenum};
    pub use crate::errors::{PierDataError, Result};
    pub use crate::filter::{BoundsPolicy, DateWindow};
    pub use crate::netcdf_io::PierRecordWriter;
    pub use crate::record::{PierRecord, RecordSummary};
    pub use crate::retriever::PierDataRetriever;
    pub use crate::source::{DatasetSource, NetcdfSource, ObservationArrays};
}
