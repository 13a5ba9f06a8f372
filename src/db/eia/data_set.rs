use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// The EIA-930 hourly data sets this crate knows how to scrape.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq, Copy)]
#[serde(rename_all = "lowercase")]
pub enum DataSet {
    /// Net generation by energy source, one row per (hour, respondent, fuel type).
    Generation,
    /// Interchange between directly connected balancing authorities, one row
    /// per (hour, from BA, to BA).
    Interchange,
}

impl DataSet {
    pub const ALL: [DataSet; 2] = [DataSet::Generation, DataSet::Interchange];

    /// Path of the data endpoint, relative to the API base url.
    pub fn path(&self) -> &'static str {
        match self {
            DataSet::Generation => "/electricity/rto/fuel-type-data/data",
            DataSet::Interchange => "/electricity/rto/interchange-data/data",
        }
    }

    /// Name of the facet used to restrict the query to one balancing authority.
    pub fn facet_field(&self) -> &'static str {
        match self {
            DataSet::Generation => "respondent",
            DataSet::Interchange => "fromba",
        }
    }
}

impl fmt::Display for DataSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DataSet::Generation => write!(f, "generation"),
            DataSet::Interchange => write!(f, "interchange"),
        }
    }
}

impl FromStr for DataSet {
    type Err = ConfigError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "generation" => Ok(DataSet::Generation),
            "interchange" => Ok(DataSet::Interchange),
            _ => Err(ConfigError::UnknownDataSet(s.to_string())),
        }
    }
}

/// Which balancing authority and which hours to pull.  Times are EIA hour
/// strings, e.g. `2022-12-13T00`, passed through as is.  A blank end counts
/// as no end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchWindow {
    pub balancing_authority: String,
    pub start: String,
    pub end: Option<String>,
}

impl FetchWindow {
    pub fn new(balancing_authority: &str, start: &str, end: Option<&str>) -> FetchWindow {
        FetchWindow {
            balancing_authority: balancing_authority.to_string(),
            start: start.to_string(),
            end: end
                .filter(|e| !e.trim().is_empty())
                .map(|e| e.to_string()),
        }
    }
}

/// Query parameters for one data set request, in the order they are sent.
/// The api key is not part of it, the client adds it last.
pub fn query_parameters(data_set: DataSet, window: &FetchWindow) -> Vec<(String, String)> {
    let mut params = vec![
        ("frequency".to_string(), "hourly".to_string()),
        ("data[0]".to_string(), "value".to_string()),
        ("start".to_string(), window.start.clone()),
    ];
    if let Some(end) = &window.end {
        params.push(("end".to_string(), end.clone()));
    }
    params.push((
        format!("facets[{}][]", data_set.facet_field()),
        window.balancing_authority.clone(),
    ));
    params
}
