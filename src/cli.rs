//! Defines command-line interface options using `clap` for the pier-data tool.

use clap::Parser;
use pier_data::config::{PierConfig, DEFAULT_SINGLE_YEAR, DEFAULT_URL_TEMPLATE, YEAR_PLACEHOLDER};
use pier_data::datenum::parse_datenum;
use pier_data::filter::BoundsPolicy;
use std::path::PathBuf;

/// Fetch Scripps Pier temperature and pressure records
#[derive(Parser, Debug)]
#[command(
    version,
    name = "pier-data",
    about = "Fetch and date-filter Scripps Pier temperature/pressure records"
)]
pub struct Args {
    /// First year of a range request. Without a range the single-year dataset is read.
    #[arg(long, requires = "year_end")]
    pub year_start: Option<i32>,

    /// Last year (inclusive) of a range request
    #[arg(long, requires = "year_start")]
    pub year_end: Option<i32>,

    /// Exclusive lower date bound: YYYY-MM-DD, YYYY-MM-DDTHH:MM:SS or a date number
    #[arg(long, value_parser = parse_date_arg)]
    pub date_start: Option<f64>,

    /// Exclusive upper date bound: YYYY-MM-DD, YYYY-MM-DDTHH:MM:SS or a date number
    #[arg(long, value_parser = parse_date_arg)]
    pub date_end: Option<f64>,

    /// Dataset location with a {year} placeholder (URL or local path)
    #[arg(long, default_value = DEFAULT_URL_TEMPLATE, value_parser = parse_template_arg)]
    pub url_template: String,

    /// Year read in single-year mode
    #[arg(long, default_value_t = DEFAULT_SINGLE_YEAR)]
    pub single_year: i32,

    /// Default missing date bounds from each year's own data instead of the first year's
    #[arg(long, default_value_t = false)]
    pub per_year_bounds: bool,

    /// Path to save the record as NetCDF
    #[arg(long)]
    pub output_netcdf: Option<PathBuf>,

    /// Print the full record as JSON instead of a summary
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Enable verbose output.
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl Args {
    pub fn config(&self) -> PierConfig {
        let policy = if self.per_year_bounds {
            BoundsPolicy::PerYear
        } else {
            BoundsPolicy::CarryFirstYear
        };
        PierConfig::new(self.url_template.clone())
            .with_single_year(self.single_year)
            .with_bounds_policy(policy)
    }

    /// `(year_start, year_end)` when a range was requested
    pub fn year_range(&self) -> Option<(i32, i32)> {
        self.year_start.zip(self.year_end)
    }
}

fn parse_date_arg(s: &str) -> Result<f64, String> {
    parse_datenum(s).map_err(|e| e.to_string())
}

fn parse_template_arg(s: &str) -> Result<String, String> {
    if s.contains(YEAR_PLACEHOLDER) {
        Ok(s.to_string())
    } else {
        Err(format!("Invalid template: expected a '{}' placeholder.", YEAR_PLACEHOLDER))
    }
}
