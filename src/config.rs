//! Retrieval configuration
//!
//! Where the per-year pier datasets live, which year the single-year fetch
//! reads, and how missing date bounds are defaulted across a year range.

use crate::filter::BoundsPolicy;

/// SCCOOS THREDDS OPeNDAP endpoint for the Scripps Pier automated shore station
pub const DEFAULT_URL_TEMPLATE: &str =
    "http://sccoos.org/thredds/dodsC/autoss/scripps_pier-{year}.nc";

/// Year read by the single-year fetch
pub const DEFAULT_SINGLE_YEAR: i32 = 2021;

/// Placeholder substituted with the four-digit year
pub const YEAR_PLACEHOLDER: &str = "{year}";

/// Configuration for a [`PierDataRetriever`](crate::retriever::PierDataRetriever)
#[derive(Debug, Clone, PartialEq)]
pub struct PierConfig {
    /// Dataset location with a `{year}` placeholder; a URL or a local path
    pub url_template: String,
    /// Year of the dataset read by `fetch_single_year`
    pub single_year: i32,
    /// How default date bounds are computed across a year range
    pub bounds_policy: BoundsPolicy,
}

impl PierConfig {
    /// Create a configuration for a custom dataset location
    pub fn new(url_template: impl Into<String>) -> Self {
        Self {
            url_template: url_template.into(),
            ..Self::default()
        }
    }

    /// Replace the dataset location template
    pub fn with_url_template(mut self, url_template: impl Into<String>) -> Self {
        self.url_template = url_template.into();
        self
    }

    /// Read `year` in the single-year fetch
    pub fn with_single_year(mut self, year: i32) -> Self {
        self.single_year = year;
        self
    }

    /// Select the default-bounds policy for year ranges
    pub fn with_bounds_policy(mut self, policy: BoundsPolicy) -> Self {
        self.bounds_policy = policy;
        self
    }

    /// Dataset location for `year`
    pub fn url_for_year(&self, year: i32) -> String {
        self.url_template
            .replace(YEAR_PLACEHOLDER, &format!("{:04}", year))
    }

    /// Dataset location read by `fetch_single_year`
    pub fn single_year_url(&self) -> String {
        self.url_for_year(self.single_year)
    }
}

impl Default for PierConfig {
    fn default() -> Self {
        Self {
            url_template: DEFAULT_URL_TEMPLATE.to_string(),
            single_year: DEFAULT_SINGLE_YEAR,
            bounds_policy: BoundsPolicy::default(),
        }
    }
}
