//! Resilient single-request client for the NWIS daily-values endpoint.

use crate::fetch::error::FetchError;
use crate::types::waterml::WaterMlResponse;
use chrono::{Local, NaiveDate};
use log::warn;
use reqwest::Client;
use std::time::Duration;
use tokio::time::sleep;

const DV_BASE_URL: &str = "https://waterservices.usgs.gov/nwis/dv/";

pub(crate) struct DailyFetcher {
    client: Client,
    base_url: String,
}

impl DailyFetcher {
    pub(crate) fn new() -> Self {
        Self::with_base_url(DV_BASE_URL)
    }

    pub(crate) fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Performs one daily-values request, retrying with a fixed pause on any
    /// attempt failure (transport error, non-2xx status, unparseable body).
    /// The first success is returned immediately; exhausting `max_retries`
    /// attempts returns `None`, the expected "no data" outcome.
    ///
    /// When `end` is omitted it is resolved to the local calendar date here,
    /// at call time.
    pub(crate) async fn fetch_daily(
        &self,
        sites: &[String],
        parameter_codes: &[String],
        start: NaiveDate,
        end: Option<NaiveDate>,
        max_retries: u32,
        pause: Duration,
    ) -> Option<WaterMlResponse> {
        let end = end.unwrap_or_else(|| Local::now().date_naive());
        let url = self.daily_values_url(sites, parameter_codes, start, end);

        let attempts = max_retries.max(1);
        for attempt in 1..=attempts {
            match self.fetch_once(&url).await {
                Ok(payload) => return Some(payload),
                Err(err) => {
                    warn!("attempt {attempt}/{attempts} failed for {url}: {err}");
                    if attempt < attempts {
                        sleep(pause).await;
                    }
                }
            }
        }
        warn!("giving up on {url} after {attempts} attempts");
        None
    }

    fn daily_values_url(
        &self,
        sites: &[String],
        parameter_codes: &[String],
        start: NaiveDate,
        end: NaiveDate,
    ) -> String {
        format!(
            "{}?format=json&sites={}&parameterCd={}&startDT={}&endDT={}",
            self.base_url,
            sites.join(","),
            parameter_codes.join(","),
            start,
            end
        )
    }

    async fn fetch_once(&self, url: &str) -> Result<WaterMlResponse, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::NetworkRequest(url.to_string(), e))?;

        let response = response.error_for_status().map_err(|e| {
            if let Some(status) = e.status() {
                FetchError::HttpStatus {
                    url: url.to_string(),
                    status,
                    source: e,
                }
            } else {
                FetchError::NetworkRequest(url.to_string(), e)
            }
        })?;

        response
            .json::<WaterMlResponse>()
            .await
            .map_err(|e| FetchError::MalformedBody(url.to_string(), e))
    }
}
