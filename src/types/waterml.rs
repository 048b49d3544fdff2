//! Typed model of the USGS NWIS WaterML JSON envelope.
//!
//! The daily-values service renders WaterML as JSON:
//! `value.timeSeries[]` entries each describe one (site, parameter) pair and
//! carry the timestamped observations under `values[].value[]`. Every level
//! is deserialized tolerantly: a bare `{}`, an unrelated object, or a missing
//! `timeSeries` list are all valid "no data" payloads rather than errors.

use serde::{Deserialize, Serialize};

/// Top-level daily-values response payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WaterMlResponse {
    #[serde(default)]
    pub value: Option<TimeSeriesList>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimeSeriesList {
    #[serde(rename = "timeSeries", default)]
    pub time_series: Vec<TimeSeries>,
}

/// One (site, parameter) pair's ordered observations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimeSeries {
    #[serde(rename = "sourceInfo", default)]
    pub source_info: SourceInfo,
    #[serde(default)]
    pub variable: Variable,
    #[serde(default)]
    pub values: Vec<ValueBlock>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceInfo {
    #[serde(rename = "siteCode", default)]
    pub site_code: Vec<CodeValue>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Variable {
    #[serde(rename = "variableCode", default)]
    pub variable_code: Vec<CodeValue>,
    /// Sentinel the service substitutes for readings it cannot provide,
    /// typically -999999.
    #[serde(rename = "noDataValue", default)]
    pub no_data_value: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CodeValue {
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValueBlock {
    #[serde(default)]
    pub value: Vec<Observation>,
}

/// A single timestamped reading. `value` is a numeric string, or empty when
/// the site recorded nothing for that day.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Observation {
    #[serde(rename = "dateTime", default)]
    pub date_time: String,
    #[serde(default)]
    pub value: String,
}

impl WaterMlResponse {
    /// The `timeSeries` entries, or an empty slice for a "no data" payload.
    pub fn time_series(&self) -> &[TimeSeries] {
        self.value
            .as_ref()
            .map(|v| v.time_series.as_slice())
            .unwrap_or_default()
    }
}

impl TimeSeries {
    /// Site identifier for this series. The service repeats it in a
    /// single-element `siteCode` list.
    pub fn site_no(&self) -> Option<&str> {
        self.source_info.site_code.first().map(|c| c.value.as_str())
    }

    /// Parameter code for this series, from the first `variableCode` entry.
    pub fn parameter_code(&self) -> Option<&str> {
        self.variable.variable_code.first().map(|c| c.value.as_str())
    }

    /// All observations across the `values` blocks, in payload order.
    pub fn observations(&self) -> impl Iterator<Item = &Observation> {
        self.values.iter().flat_map(|block| block.value.iter())
    }
}
