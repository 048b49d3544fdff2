mod error;
mod fetch;
mod normalize;
mod nwis;
mod parameters;
#[cfg(test)]
mod testutil;
mod types;

pub use error::NwisError;
pub use normalize::{waterml_to_df, SITE_COLUMN, TIME_COLUMN};
pub use nwis::*;
pub use parameters::{parameter_catalog, parameters_df, search_parameters, Parameter};
pub use types::waterml::*;
