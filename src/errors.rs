//! Centralized error handling for pier-data
//!
//! Two failure families matter to callers: a bad year range, detected before
//! any network access, and a remote dataset that cannot be opened or read.
//! Everything else (date parsing, local output files) gets its own variant.

use std::fmt;

/// Main error type for pier-data operations
#[derive(Debug)]
pub enum PierDataError {
    /// `year_end` precedes `year_start`
    InvalidRange { year_start: i32, year_end: i32 },

    /// A remote (or local stand-in) dataset could not be opened or read
    RemoteAccess {
        url: String,
        cause: RemoteAccessCause,
    },

    /// A record was assembled from sequences of different lengths
    MisalignedRecord {
        dnum: usize,
        temperature: usize,
        pressure: usize,
    },

    /// A date bound could not be parsed
    InvalidDate(String),

    /// NetCDF errors while writing local output files
    NetCDFError(netcdf::Error),

    /// I/O operation errors
    IoError(std::io::Error),
}

/// Why a dataset fetch failed
#[derive(Debug)]
pub enum RemoteAccessCause {
    /// The dataset could not be opened at all (network failure, bad URL)
    Open(netcdf::Error),

    /// A required variable exists but its values could not be read
    Read { var: String, source: netcdf::Error },

    /// A required variable is absent
    MissingVariable(String),

    /// The three aligned sequences differ in length
    LengthMismatch {
        time: usize,
        temperature: usize,
        pressure: usize,
    },

    /// The `time` variable carries a `units` attribute we cannot interpret
    BadTimeUnits(String),
}

impl PierDataError {
    pub(crate) fn remote(url: &str, cause: RemoteAccessCause) -> Self {
        PierDataError::RemoteAccess {
            url: url.to_string(),
            cause,
        }
    }

    /// True for failures caused by the remote dataset
    pub fn is_remote_access(&self) -> bool {
        matches!(self, PierDataError::RemoteAccess { .. })
    }
}

impl fmt::Display for RemoteAccessCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteAccessCause::Open(e) => write!(f, "cannot open dataset: {}", e),
            RemoteAccessCause::Read { var, source } => {
                write!(f, "cannot read variable '{}': {}", var, source)
            }
            RemoteAccessCause::MissingVariable(var) => {
                write!(f, "variable '{}' not found in dataset", var)
            }
            RemoteAccessCause::LengthMismatch {
                time,
                temperature,
                pressure,
            } => write!(
                f,
                "misaligned variables: time={}, temperature={}, pressure={}",
                time, temperature, pressure
            ),
            RemoteAccessCause::BadTimeUnits(units) => {
                write!(f, "unsupported time units '{}'", units)
            }
        }
    }
}

impl fmt::Display for PierDataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PierDataError::InvalidRange {
                year_start,
                year_end,
            } => write!(
                f,
                "Invalid year range {}..{}: 'year_end' should be greater than or equal to 'year_start'",
                year_start, year_end
            ),
            PierDataError::RemoteAccess { url, cause } => {
                write!(f, "Remote access error for {}: {}", url, cause)
            }
            PierDataError::MisalignedRecord {
                dnum,
                temperature,
                pressure,
            } => write!(
                f,
                "Misaligned record: dnum={}, temperature={}, pressure={}",
                dnum, temperature, pressure
            ),
            PierDataError::InvalidDate(msg) => write!(f, "Invalid date: {}", msg),
            PierDataError::NetCDFError(e) => write!(f, "NetCDF error: {}", e),
            PierDataError::IoError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for PierDataError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PierDataError::RemoteAccess { cause, .. } => match cause {
                RemoteAccessCause::Open(e) => Some(e),
                RemoteAccessCause::Read { source, .. } => Some(source),
                _ => None,
            },
            PierDataError::NetCDFError(e) => Some(e),
            PierDataError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<netcdf::Error> for PierDataError {
    fn from(error: netcdf::Error) -> Self {
        PierDataError::NetCDFError(error)
    }
}

impl From<std::io::Error> for PierDataError {
    fn from(error: std::io::Error) -> Self {
        PierDataError::IoError(error)
    }
}

/// Result type alias for pier-data operations
pub type Result<T> = std::result::Result<T, PierDataError>;
