use reqwest::StatusCode;
use thiserror::Error;

/// Problems with the process configuration.  Fatal before any network or
/// storage work starts.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Must set \"{0}\" environment variable")]
    MissingEnv(&'static str),
    #[error("Invalid value for \"{name}\": {value}")]
    InvalidEnv { name: &'static str, value: String },
    #[error("Unknown data set: {0}.  Allowed: ['generation', 'interchange']")]
    UnknownDataSet(String),
    #[error("Failed loading env file: {0}")]
    EnvFile(#[from] dotenvy::Error),
}

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("EIA request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("EIA returned {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("Malformed EIA response: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error("No records returned, nothing to store")]
    EmptyResults,
    #[error("Failed parsing period {period}: {source}")]
    InvalidPeriod {
        period: String,
        #[source]
        source: jiff::Error,
    },
}

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),
    #[error("Failed encoding record as BSON: {0}")]
    Encode(#[from] mongodb::bson::ser::Error),
    #[error("Failed decoding stored record: {0}")]
    Decode(String),
    #[error("Unexpected inserted id: {0}")]
    UnexpectedId(String),
    #[error("Store is already closed")]
    Closed,
}

/// Anything that aborts one scrape run.
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}
