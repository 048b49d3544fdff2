use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NwisError {
    #[error("at least one site identifier is required")]
    EmptySites,

    #[error("at least one parameter code is required")]
    EmptyParameterCodes,

    #[error("required parameter '{0}' is not among the requested parameter codes")]
    RequiredParamNotRequested(String),

    #[error(transparent)]
    Polars(#[from] PolarsError),
}
