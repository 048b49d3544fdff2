//! Reshapes a WaterML daily-values payload into a flat Polars `DataFrame`.
//!
//! Each `timeSeries` entry contributes values to its own parameter column;
//! observations sharing a (site, timestamp) key are merged into one row.

use crate::error::NwisError;
use crate::types::waterml::WaterMlResponse;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use log::{debug, warn};
use polars::prelude::*;
use std::collections::HashMap;

/// Name of the site identifier column in normalized output.
pub const SITE_COLUMN: &str = "site_no";
/// Name of the timestamp column in normalized output.
pub const TIME_COLUMN: &str = "time";

/// Normalizes a daily-values payload into a `DataFrame` with columns
/// `site_no`, `time`, and one Float64 column per requested parameter code.
///
/// Rows are keyed by (site, timestamp) in first-appearance order; a series
/// that only covers parameter A leaves parameter B's column null for its
/// rows. `None`, a structurally empty payload, or a payload with no
/// `timeSeries` entries all yield a zero-row frame with the full column set,
/// so downstream concatenation never hits a shape mismatch.
///
/// Empty value strings become nulls, never zero. Series for parameter codes
/// that were not requested are skipped.
pub fn waterml_to_df(
    payload: Option<&WaterMlResponse>,
    parameter_codes: &[String],
) -> Result<DataFrame, NwisError> {
    let series_list = match payload {
        Some(p) => p.time_series(),
        None => return empty_frame(parameter_codes),
    };
    if series_list.is_empty() {
        return empty_frame(parameter_codes);
    }

    let column_slots: HashMap<&str, usize> = parameter_codes
        .iter()
        .enumerate()
        .map(|(slot, code)| (code.as_str(), slot))
        .collect();

    // (site, timestamp) -> row index; rows kept in first-appearance order.
    let mut row_index: HashMap<(String, NaiveDateTime), usize> = HashMap::new();
    let mut sites: Vec<String> = Vec::new();
    let mut times: Vec<NaiveDateTime> = Vec::new();
    let mut cells: Vec<Vec<Option<f64>>> = Vec::new();

    for series in series_list {
        let Some(site_no) = series.site_no() else {
            warn!("skipping time series without a site code");
            continue;
        };
        let Some(code) = series.parameter_code() else {
            warn!("skipping time series for site {site_no} without a variable code");
            continue;
        };
        let Some(&slot) = column_slots.get(code) else {
            debug!("skipping unrequested parameter {code} for site {site_no}");
            continue;
        };
        let no_data_value = series.variable.no_data_value;

        for observation in series.observations() {
            let Some(timestamp) = parse_datetime(&observation.date_time) else {
                warn!(
                    "skipping observation with unparseable timestamp '{}' for site {site_no}",
                    observation.date_time
                );
                continue;
            };
            let key = (site_no.to_string(), timestamp);
            let row = *row_index.entry(key).or_insert_with(|| {
                sites.push(site_no.to_string());
                times.push(timestamp);
                cells.push(vec![None; parameter_codes.len()]);
                cells.len() - 1
            });
            // Duplicate (site, timestamp, parameter) triples: last write wins.
            cells[row][slot] = parse_value(&observation.value, no_data_value, site_no);
        }
    }

    if cells.is_empty() {
        return empty_frame(parameter_codes);
    }

    let mut columns = Vec::with_capacity(parameter_codes.len() + 2);
    columns.push(Column::new(SITE_COLUMN.into(), sites));
    columns.push(
        DatetimeChunked::from_naive_datetime(TIME_COLUMN.into(), times, TimeUnit::Milliseconds)
            .into_column(),
    );
    for (slot, code) in parameter_codes.iter().enumerate() {
        let values: Vec<Option<f64>> = cells.iter().map(|row| row[slot]).collect();
        columns.push(Column::new(code.as_str().into(), values));
    }

    Ok(DataFrame::new(columns)?)
}

/// Zero-row frame exposing the normalized schema for the given codes.
pub(crate) fn empty_frame(parameter_codes: &[String]) -> Result<DataFrame, NwisError> {
    let mut columns = vec![
        Column::new_empty(SITE_COLUMN.into(), &DataType::String),
        Column::new_empty(
            TIME_COLUMN.into(),
            &DataType::Datetime(TimeUnit::Milliseconds, None),
        ),
    ];
    for code in parameter_codes {
        columns.push(Column::new_empty(code.as_str().into(), &DataType::Float64));
    }
    Ok(DataFrame::new(columns)?)
}

/// Parses a WaterML timestamp. Daily values arrive as
/// `2024-01-01T00:00:00.000`; instantaneous endpoints append a UTC offset,
/// and some legacy responses carry a bare date.
fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }
    raw.parse::<NaiveDate>()
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

/// Parses one observation value string. An empty string is a reading the
/// site did not take; the service's `noDataValue` sentinel means the same.
fn parse_value(raw: &str, no_data_value: Option<f64>, site_no: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.parse::<f64>() {
        Ok(value) => {
            if no_data_value.is_some_and(|sentinel| (value - sentinel).abs() < 0.1) {
                return None;
            }
            Some(value)
        }
        Err(_) => {
            warn!("skipping non-numeric value '{trimmed}' for site {site_no}");
            None
        }
    }
}
