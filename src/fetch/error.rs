use thiserror::Error;

/// Failure of a single fetch attempt. Never surfaces to callers; the retry
/// loop logs it and ultimately collapses into the "no data" signal.
#[derive(Debug, Error)]
pub(crate) enum FetchError {
    #[error("network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("response body for {0} is not valid WaterML JSON")]
    MalformedBody(String, #[source] reqwest::Error),
}
