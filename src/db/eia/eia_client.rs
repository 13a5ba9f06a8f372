// Client for the EIA Open Data API, v2.
// https://www.eia.gov/opendata/documentation.php

use std::time::Duration;

use async_trait::async_trait;
use itertools::Itertools;
use log::{info, warn};
use reqwest::{Client, Request};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::{
    db::eia::data_set::{query_parameters, DataSet, FetchWindow},
    errors::FetchError,
    scrape::EiaSource,
};

/// One row of an EIA-930 data set, kept as the upstream sent it.
///
/// For [DataSet::Generation] the other fields are `respondent`,
/// `respondent-name`, `fueltype`, `type-name`, `value`, `value-units`.
/// For [DataSet::Interchange] they are `fromba`, `fromba-name`, `toba`,
/// `toba-name`, `value`, `value-units`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Hour beginning in UTC, e.g. `2022-12-13T05`
    pub period: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl RawRecord {
    pub fn value(&self) -> Option<&Value> {
        self.fields.get("value")
    }

    pub fn value_units(&self) -> Option<&str> {
        self.fields.get("value-units").and_then(|v| v.as_str())
    }
}

/// The `response` object of an EIA data reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EiaResponse {
    /// Number of rows matching the query, as declared by EIA.  Can be larger
    /// than `data.len()` if the reply was truncated to one page.
    #[serde(deserialize_with = "deserialize_total")]
    pub total: u64,
    #[serde(default)]
    pub date_format: String,
    #[serde(default)]
    pub frequency: String,
    #[serde(default)]
    pub description: String,
    pub data: Vec<RawRecord>,
}

/// EIA has sent `total` both as a number and as a string.
fn deserialize_total<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| D::Error::custom(format!("invalid total {}", n))),
        Value::String(s) => s
            .trim()
            .parse::<u64>()
            .map_err(|_| D::Error::custom(format!("invalid total {:?}", s))),
        other => Err(D::Error::custom(format!("invalid total {}", other))),
    }
}

#[derive(Deserialize)]
struct Reply {
    response: EiaResponse,
}

/// Extract the inner `response` object from a reply body.
pub fn parse_response(body: &str) -> Result<EiaResponse, FetchError> {
    let reply: Reply = serde_json::from_str(body)?;
    Ok(reply.response)
}

pub struct EiaClient {
    base_url: String,
    api_key: String,
    client: Client,
}

impl EiaClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<EiaClient, FetchError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(EiaClient {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client,
        })
    }

    /// Build the GET request for one data set.
    pub fn request(&self, data_set: DataSet, window: &FetchWindow) -> Result<Request, FetchError> {
        let mut params = query_parameters(data_set, window);
        params.push(("api_key".to_string(), self.api_key.clone()));
        let request = self
            .client
            .get(format!("{}{}", self.base_url, data_set.path()))
            .query(&params)
            .build()?;
        Ok(request)
    }

    /// Fetch one page of a data set.  Single attempt, no pagination.
    pub async fn fetch_data_set(
        &self,
        data_set: DataSet,
        window: &FetchWindow,
    ) -> Result<EiaResponse, FetchError> {
        info!(
            "fetching EIA {} data: {}",
            data_set,
            query_parameters(data_set, window)
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .join("&")
        );
        let request = self.request(data_set, window)?;
        let response = self.client.execute(request).await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(FetchError::Status {
                status,
                body: body.chars().take(500).collect(),
            });
        }

        let res = parse_response(&body)?;
        if res.total > res.data.len() as u64 {
            warn!(
                "EIA declared {} rows but returned {}, the rest is not fetched",
                res.total,
                res.data.len()
            );
        }
        Ok(res)
    }
}

#[async_trait]
impl EiaSource for EiaClient {
    async fn fetch(
        &self,
        data_set: DataSet,
        window: &FetchWindow,
    ) -> Result<EiaResponse, FetchError> {
        self.fetch_data_set(data_set, window).await
    }
}
