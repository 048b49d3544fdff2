//! Built-in catalog of common NWIS parameter codes.
//!
//! Reference data for callers picking codes before building a request; the
//! fetch/normalize/batch path never consults it.

use crate::error::NwisError;
use polars::prelude::*;

/// One catalog entry: a measured quantity and its unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parameter {
    pub code: &'static str,
    pub group: &'static str,
    pub name: &'static str,
    pub unit: &'static str,
}

const CATALOG: &[Parameter] = &[
    Parameter { code: "00010", group: "Physical", name: "Temperature, water, degrees Celsius", unit: "deg C" },
    Parameter { code: "00020", group: "Physical", name: "Temperature, air, degrees Celsius", unit: "deg C" },
    Parameter { code: "00045", group: "Physical", name: "Precipitation, total, inches", unit: "in" },
    Parameter { code: "00060", group: "Physical", name: "Discharge, cubic feet per second", unit: "ft3/s" },
    Parameter { code: "00065", group: "Physical", name: "Gage height, feet", unit: "ft" },
    Parameter { code: "00095", group: "Physical", name: "Specific conductance, water, unfiltered, uS/cm at 25C", unit: "uS/cm" },
    Parameter { code: "00300", group: "Physical", name: "Dissolved oxygen, water, unfiltered, mg/L", unit: "mg/L" },
    Parameter { code: "00400", group: "Physical", name: "pH, water, unfiltered, field, standard units", unit: "std units" },
    Parameter { code: "00410", group: "Physical", name: "Acid neutralizing capacity, water, unfiltered, mg/L as CaCO3", unit: "mg/L" },
    Parameter { code: "00480", group: "Sediment", name: "Salinity, water, unfiltered, parts per thousand", unit: "ppt" },
    Parameter { code: "00530", group: "Sediment", name: "Suspended solids, water, unfiltered, mg/L", unit: "mg/L" },
    Parameter { code: "00600", group: "Nutrient", name: "Total nitrogen, water, unfiltered, mg/L", unit: "mg/L" },
    Parameter { code: "00605", group: "Nutrient", name: "Organic nitrogen, water, unfiltered, mg/L", unit: "mg/L" },
    Parameter { code: "00608", group: "Nutrient", name: "Ammonia, water, filtered, mg/L as N", unit: "mg/L" },
    Parameter { code: "00613", group: "Nutrient", name: "Nitrite, water, filtered, mg/L as N", unit: "mg/L" },
    Parameter { code: "00618", group: "Nutrient", name: "Nitrate, water, filtered, mg/L as N", unit: "mg/L" },
    Parameter { code: "00625", group: "Nutrient", name: "Ammonia plus organic nitrogen, water, unfiltered, mg/L as N", unit: "mg/L" },
    Parameter { code: "00630", group: "Nutrient", name: "Nitrate plus nitrite, water, unfiltered, mg/L as N", unit: "mg/L" },
    Parameter { code: "00631", group: "Nutrient", name: "Nitrate plus nitrite, water, filtered, mg/L as N", unit: "mg/L" },
    Parameter { code: "00665", group: "Nutrient", name: "Phosphorus, water, unfiltered, mg/L as P", unit: "mg/L" },
    Parameter { code: "00680", group: "Nutrient", name: "Organic carbon, water, unfiltered, mg/L", unit: "mg/L" },
    Parameter { code: "00681", group: "Nutrient", name: "Organic carbon, water, filtered, mg/L", unit: "mg/L" },
    Parameter { code: "70331", group: "Physical", name: "Suspended sediment, sieve diameter, percent finer than 0.0625 mm", unit: "%" },
    Parameter { code: "72019", group: "Physical", name: "Depth to water level, feet below land surface", unit: "ft" },
    Parameter { code: "72020", group: "Physical", name: "Elevation above NGVD 1929, feet", unit: "ft" },
    Parameter { code: "80154", group: "Sediment", name: "Suspended sediment concentration, mg/L", unit: "mg/L" },
    Parameter { code: "80155", group: "Sediment", name: "Suspended sediment discharge, short tons per day", unit: "tons/day" },
    Parameter { code: "80225", group: "Sediment", name: "Bedload sediment discharge, short tons per day", unit: "tons/day" },
    Parameter { code: "99133", group: "Nutrient", name: "Nitrate plus nitrite, water, in situ, mg/L as N", unit: "mg/L" },
    Parameter { code: "63680", group: "Physical", name: "Turbidity, water, unfiltered, FNU", unit: "FNU" },
];

/// The full catalog, in source order.
pub fn parameter_catalog() -> &'static [Parameter] {
    CATALOG
}

/// The catalog as a `DataFrame` with columns `parm_cd`, `group`,
/// `parameter_nm`, `parameter_unit`, sorted by `parm_cd`.
pub fn parameters_df() -> Result<DataFrame, NwisError> {
    let mut entries: Vec<&Parameter> = CATALOG.iter().collect();
    entries.sort_by_key(|p| p.code);

    let codes: Vec<&str> = entries.iter().map(|p| p.code).collect();
    let groups: Vec<&str> = entries.iter().map(|p| p.group).collect();
    let names: Vec<&str> = entries.iter().map(|p| p.name).collect();
    let units: Vec<&str> = entries.iter().map(|p| p.unit).collect();

    Ok(DataFrame::new(vec![
        Column::new("parm_cd".into(), codes),
        Column::new("group".into(), groups),
        Column::new("parameter_nm".into(), names),
        Column::new("parameter_unit".into(), units),
    ])?)
}

/// Case-insensitive substring search over parameter names and groups.
pub fn search_parameters(query: &str) -> Vec<&'static Parameter> {
    let needle = query.to_lowercase();
    CATALOG
        .iter()
        .filter(|p| {
            p.name.to_lowercase().contains(&needle) || p.group.to_lowercase().contains(&needle)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_contains_common_codes() {
        let codes: Vec<&str> = parameter_catalog().iter().map(|p| p.code).collect();
        assert!(codes.contains(&"00060")); // Discharge
        assert!(codes.contains(&"00065")); // Gage height
        assert!(codes.contains(&"80154")); // Suspended sediment concentration
    }

    #[test]
    fn dataframe_is_sorted_by_code() -> Result<(), NwisError> {
        let frame = parameters_df()?;
        assert_eq!(frame.height(), CATALOG.len());
        assert_eq!(
            frame.get_column_names(),
            ["parm_cd", "group", "parameter_nm", "parameter_unit"]
        );

        let codes: Vec<&str> = frame.column("parm_cd")?.str()?.into_iter().flatten().collect();
        let mut sorted = codes.clone();
        sorted.sort_unstable();
        assert_eq!(codes, sorted);
        Ok(())
    }

    #[test]
    fn search_finds_matches() {
        let matches = search_parameters("discharge");
        assert!(!matches.is_empty());
        assert!(matches.iter().any(|p| p.code == "00060"));
    }

    #[test]
    fn search_is_case_insensitive() {
        assert_eq!(
            search_parameters("DISCHARGE").len(),
            search_parameters("discharge").len()
        );
        assert!(!search_parameters("DISCHARGE").is_empty());
    }

    #[test]
    fn search_matches_group_names() {
        let matches = search_parameters("nutrient");
        assert!(matches.len() >= 2);
        assert!(matches.iter().all(|p| p.group == "Nutrient"));
    }

    #[test]
    fn search_without_matches_is_empty() {
        assert!(search_parameters("nonexistent_param_xyz").is_empty());
    }

    #[test]
    fn search_sediment_finds_multiple_entries() {
        assert!(search_parameters("sediment").len() >= 2);
    }
}
