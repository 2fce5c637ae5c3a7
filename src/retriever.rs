//! Pier Data Retriever
//!
//! Every call is a stateless pipeline: fetch each dataset, convert `time` to
//! date numbers, keep observations strictly inside the date window, merge the
//! years in ascending order. Years are fetched one after another and the first
//! failure aborts the call; no partial record is ever returned.

use crate::config::PierConfig;
use crate::datenum::seconds_to_datenum;
use crate::errors::{PierDataError, Result};
use crate::filter::{select_indices, BoundsPolicy, DateWindow};
use crate::record::PierRecord;
use crate::source::{DatasetSource, NetcdfSource};
use log::{debug, info, warn};
use ndarray::{Array1, Axis};

/// Fetches and date-filters pier observations through a [`DatasetSource`]
#[derive(Debug, Clone)]
pub struct PierDataRetriever<S = NetcdfSource> {
    source: S,
    config: PierConfig,
}

impl PierDataRetriever<NetcdfSource> {
    /// Retriever reading the SCCOOS archive with default settings
    pub fn remote() -> Self {
        Self::new(NetcdfSource::new(), PierConfig::default())
    }
}

impl Default for PierDataRetriever<NetcdfSource> {
    fn default() -> Self {
        Self::remote()
    }
}

impl<S: DatasetSource> PierDataRetriever<S> {
    pub fn new(source: S, config: PierConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &PierConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Observations of the configured single-year dataset strictly inside
    /// `(date_start, date_end)`
    ///
    /// Open bounds default to the dataset's own min/max date number, which
    /// excludes the first and last observations.
    ///
    /// # Errors
    ///
    /// [`PierDataError::RemoteAccess`] if the dataset cannot be opened or lacks
    /// a required variable.
    pub fn fetch_single_year(
        &self,
        date_start: Option<f64>,
        date_end: Option<f64>,
    ) -> Result<PierRecord> {
        let year = self.config.single_year;
        let url = self.config.single_year_url();
        let window = DateWindow::new(date_start, date_end);

        let (part, _) = self.fetch_year(year, &url, window)?;
        let readme = format!("{} Pier data, SIO221a, function fetch_single_year", year);
        Ok(PierRecord { readme, ..part })
    }

    /// Observations of every year in `year_start..=year_end`, each filtered to
    /// `(date_start, date_end)` and concatenated in year order
    ///
    /// Open bounds are filled according to the configured [`BoundsPolicy`].
    /// Under [`BoundsPolicy::CarryFirstYear`] the first year with data fixes
    /// them for all later years.
    ///
    /// # Errors
    ///
    /// [`PierDataError::InvalidRange`] if `year_end < year_start`, raised before
    /// any dataset is opened; [`PierDataError::RemoteAccess`] if any year fails.
    pub fn fetch_year_range(
        &self,
        year_start: i32,
        year_end: i32,
        date_start: Option<f64>,
        date_end: Option<f64>,
    ) -> Result<PierRecord> {
        if year_end < year_start {
            return Err(PierDataError::InvalidRange {
                year_start,
                year_end,
            });
        }

        info!(
            "Fetching pier data for years {} to {} ({:?})",
            year_start, year_end, self.config.bounds_policy
        );

        let requested = DateWindow::new(date_start, date_end);
        let mut window = requested;
        let mut parts = Vec::new();

        for year in year_start..=year_end {
            let url = self.config.url_for_year(year);
            let (part, resolved) = self.fetch_year(year, &url, window)?;

            window = match (self.config.bounds_policy, resolved) {
                (BoundsPolicy::CarryFirstYear, Some((start, end))) => {
                    DateWindow::between(start, end)
                }
                _ => requested,
            };
            parts.push(part);
        }

        let readme = format!(
            "Pier data for years {} to {}, function fetch_year_range",
            year_start, year_end
        );
        let merged = merge(parts, readme)?;
        debug!("Merged record holds {} observations", merged.len());
        Ok(merged)
    }

    /// Fetches one dataset and applies `window`, returning the selection and
    /// the bounds actually used (`None` when an open bound had no data to
    /// default from).
    fn fetch_year(
        &self,
        year: i32,
        url: &str,
        window: DateWindow,
    ) -> Result<(PierRecord, Option<(f64, f64)>)> {
        let obs = self.source.open_dataset(url)?;
        let dnum = obs.time.mapv(seconds_to_datenum);

        let resolved = window.resolve(dnum.view());
        let Some((start, end)) = resolved else {
            warn!("No finite time values for {}; year contributes nothing", year);
            return Ok((PierRecord::empty(String::new()), None));
        };

        let idx = select_indices(dnum.view(), start, end);
        debug!(
            "{}: kept {} of {} observations in ({}, {})",
            year,
            idx.len(),
            obs.len(),
            start,
            end
        );

        let part = PierRecord::new(
            dnum.select(Axis(0), &idx),
            obs.temperature.select(Axis(0), &idx),
            obs.pressure.select(Axis(0), &idx),
            String::new(),
        )?;
        Ok((part, resolved))
    }
}

fn merge(parts: Vec<PierRecord>, readme: String) -> Result<PierRecord> {
    PierRecord::new(
        concat(&parts, |p| &p.dnum),
        concat(&parts, |p| &p.temperature),
        concat(&parts, |p| &p.pressure),
        readme,
    )
}

fn concat(parts: &[PierRecord], field: impl Fn(&PierRecord) -> &Array1<f64>) -> Array1<f64> {
    parts.iter().flat_map(|p| field(p).iter().copied()).collect()
}

/// [`PierDataRetriever::fetch_single_year`] against the SCCOOS archive
pub fn fetch_single_year(date_start: Option<f64>, date_end: Option<f64>) -> Result<PierRecord> {
    PierDataRetriever::remote().fetch_single_year(date_start, date_end)
}

/// [`PierDataRetriever::fetch_year_range`] against the SCCOOS archive
pub fn fetch_year_range(
    year_start: i32,
    year_end: i32,
    date_start: Option<f64>,
    date_end: Option<f64>,
) -> Result<PierRecord> {
    PierDataRetriever::remote().fetch_year_range(year_start, year_end, date_start, date_end)
}
