pub(crate) mod daily_fetcher;
pub(crate) mod error;
