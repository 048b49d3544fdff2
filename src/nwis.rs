//! Main entry point for fetching USGS NWIS daily-value water data.
//!
//! [`Nwis`] wraps the daily-values HTTP endpoint and returns results as
//! Polars `DataFrame`s. Remote-service trouble (outages, malformed bodies,
//! sites with no data) never surfaces as an error: affected sites simply
//! contribute no rows. Only malformed caller input is reported.

use crate::error::NwisError;
use crate::fetch::daily_fetcher::DailyFetcher;
use crate::normalize::{empty_frame, waterml_to_df, SITE_COLUMN};
use crate::types::waterml::WaterMlResponse;
use bon::bon;
use chrono::{Local, NaiveDate};
use log::info;
use polars::prelude::*;
use std::collections::HashMap;
use std::time::Duration;

const DEFAULT_MAX_RETRIES: u32 = 3;
const DEFAULT_PAUSE: Duration = Duration::from_secs(5);

/// Client for the NWIS daily-values service.
///
/// # Examples
///
/// ```no_run
/// # use nwis::{Nwis, NwisError};
/// # use chrono::NaiveDate;
/// # #[tokio::main]
/// # async fn main() -> Result<(), NwisError> {
/// let client = Nwis::new();
/// let sites = vec!["01491000".to_string(), "01646500".to_string()];
/// let codes = vec!["00060".to_string(), "80155".to_string()];
/// let required = vec!["80155".to_string()];
///
/// // Batch fetch, keeping only sites that have sediment records.
/// let frame = client
///     .batch_daily()
///     .sites(&sites)
///     .parameter_codes(&codes)
///     .start(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
///     .required_params(&required)
///     .min_records(1)
///     .call()
///     .await?;
/// println!("{frame}");
/// # Ok(())
/// # }
/// ```
pub struct Nwis {
    fetcher: DailyFetcher,
}

#[bon]
impl Nwis {
    /// Creates a client against the production daily-values endpoint.
    pub fn new() -> Self {
        Self {
            fetcher: DailyFetcher::new(),
        }
    }

    /// Creates a client against a custom base URL. Intended for tests and
    /// mirror deployments.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            fetcher: DailyFetcher::with_base_url(base_url),
        }
    }

    /// Fetches one daily-values payload for a set of sites and parameter
    /// codes.
    ///
    /// Retries failed attempts `max_retries` times total (default 3) with a
    /// fixed `pause` between attempts (default 5s). Returns `Ok(None)` when
    /// every attempt fails; that is the expected outcome for an unreachable
    /// service or an unknown site, not an error.
    ///
    /// # Errors
    ///
    /// [`NwisError::EmptySites`] / [`NwisError::EmptyParameterCodes`] when
    /// the caller supplies an empty selector list.
    #[builder]
    pub async fn daily_values(
        &self,
        sites: &[String],
        parameter_codes: &[String],
        start: NaiveDate,
        end: Option<NaiveDate>,
        max_retries: Option<u32>,
        pause: Option<Duration>,
    ) -> Result<Option<WaterMlResponse>, NwisError> {
        validate_request(sites, parameter_codes)?;
        Ok(self
            .fetcher
            .fetch_daily(
                sites,
                parameter_codes,
                start,
                end,
                max_retries.unwrap_or(DEFAULT_MAX_RETRIES),
                pause.unwrap_or(DEFAULT_PAUSE),
            )
            .await)
    }

    /// Fetches and normalizes one daily-values request into a `DataFrame`
    /// with columns `site_no`, `time`, and one column per parameter code.
    ///
    /// A fetch that yields no data produces a zero-row frame with the full
    /// column set.
    #[builder]
    pub async fn daily_frame(
        &self,
        sites: &[String],
        parameter_codes: &[String],
        start: NaiveDate,
        end: Option<NaiveDate>,
        max_retries: Option<u32>,
        pause: Option<Duration>,
    ) -> Result<DataFrame, NwisError> {
        validate_request(sites, parameter_codes)?;
        let payload = self
            .fetcher
            .fetch_daily(
                sites,
                parameter_codes,
                start,
                end,
                max_retries.unwrap_or(DEFAULT_MAX_RETRIES),
                pause.unwrap_or(DEFAULT_PAUSE),
            )
            .await;
        waterml_to_df(payload.as_ref(), parameter_codes)
    }

    /// Fetches daily values for many sites and merges them into one frame.
    ///
    /// Sites are processed independently and sequentially; a failed or empty
    /// fetch contributes zero rows and never aborts the rest of the batch.
    /// When `required_params` is supplied, each site must have at least
    /// `min_records` (default 1) non-null values summed across those columns
    /// or all of its rows are dropped from the result.
    ///
    /// # Errors
    ///
    /// [`NwisError::EmptySites`] / [`NwisError::EmptyParameterCodes`] for
    /// empty selector lists, and [`NwisError::RequiredParamNotRequested`]
    /// when a required parameter is missing from `parameter_codes`. An
    /// all-sites-failed batch returns an empty frame, not an error.
    #[builder]
    pub async fn batch_daily(
        &self,
        sites: &[String],
        parameter_codes: &[String],
        start: NaiveDate,
        end: Option<NaiveDate>,
        required_params: Option<&[String]>,
        min_records: Option<usize>,
        max_retries: Option<u32>,
        pause: Option<Duration>,
    ) -> Result<DataFrame, NwisError> {
        validate_request(sites, parameter_codes)?;
        if let Some(required) = required_params {
            for code in required {
                if !parameter_codes.contains(code) {
                    return Err(NwisError::RequiredParamNotRequested(code.clone()));
                }
            }
        }

        let max_retries = max_retries.unwrap_or(DEFAULT_MAX_RETRIES);
        let pause = pause.unwrap_or(DEFAULT_PAUSE);
        // Resolved once so a batch running across midnight queries the same
        // end date for every site.
        let end = Some(end.unwrap_or_else(|| Local::now().date_naive()));

        let mut merged = empty_frame(parameter_codes)?;
        for site in sites {
            let payload = self
                .fetcher
                .fetch_daily(
                    std::slice::from_ref(site),
                    parameter_codes,
                    start,
                    end,
                    max_retries,
                    pause,
                )
                .await;
            if payload.is_none() {
                info!("no data for site {site}, contributing zero rows");
            }
            let frame = waterml_to_df(payload.as_ref(), parameter_codes)?;
            if frame.height() > 0 {
                merged.vstack_mut(&frame)?;
            }
        }
        info!(
            "batch fetched {} rows across {} sites",
            merged.height(),
            sites.len()
        );

        match required_params {
            Some(required) if !required.is_empty() => {
                drop_sparse_sites(merged, required, min_records.unwrap_or(1))
            }
            _ => Ok(merged),
        }
    }
}

impl Default for Nwis {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_request(sites: &[String], parameter_codes: &[String]) -> Result<(), NwisError> {
    if sites.is_empty() {
        return Err(NwisError::EmptySites);
    }
    if parameter_codes.is_empty() {
        return Err(NwisError::EmptyParameterCodes);
    }
    Ok(())
}

/// Drops every row of any site whose non-null count, summed across the
/// `required_params` columns, is below `min_records`. Sites with zero rows
/// are already absent and need no handling.
fn drop_sparse_sites(
    frame: DataFrame,
    required_params: &[String],
    min_records: usize,
) -> Result<DataFrame, NwisError> {
    if frame.height() == 0 {
        return Ok(frame);
    }

    let site_col = frame.column(SITE_COLUMN)?.str()?;
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for code in required_params {
        let values = frame.column(code)?.f64()?;
        for (site, value) in site_col.into_iter().zip(values.into_iter()) {
            if let (Some(site), Some(_)) = (site, value) {
                *counts.entry(site).or_insert(0) += 1;
            }
        }
    }

    let mask: Vec<bool> = site_col
        .into_iter()
        .map(|site| site.is_some_and(|s| counts.get(s).copied().unwrap_or(0) >= min_records))
        .collect();
    let kept = frame.filter(&BooleanChunked::from_slice("keep".into(), &mask))?;

    if kept.height() < frame.height() {
        info!(
            "data-sufficiency filter dropped {} of {} rows",
            frame.height() - kept.height(),
            frame.height()
        );
    }
    Ok(kept)
}
