use std::fmt;

use async_trait::async_trait;
use log::{error, info};

use crate::{
    db::eia::{
        data_set::{DataSet, FetchWindow},
        eia_client::EiaResponse,
        persistence_record::{normalize, PersistenceRecord},
    },
    errors::{FetchError, PersistenceError, ScrapeError},
};

/// Identifier the store assigned to an inserted record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordId(pub String);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where the raw data comes from.
#[async_trait]
pub trait EiaSource: Send + Sync {
    async fn fetch(&self, data_set: DataSet, window: &FetchWindow)
        -> Result<EiaResponse, FetchError>;
}

/// Where the normalized data goes.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn insert(&self, record: &PersistenceRecord) -> Result<RecordId, PersistenceError>;
    /// Release the underlying connection.  Safe to call more than once.
    async fn close(&mut self);
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Row count declared by EIA
    pub total: u64,
    pub id: RecordId,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Number of fetch records: {}", self.total)?;
        write!(f, "Stored records with ID: {}", self.id)
    }
}

/// Fetch one data set for one balancing authority, normalize it and store it.
/// The store is closed before returning, whatever the outcome.
pub async fn run<S, R>(
    data_set: DataSet,
    window: &FetchWindow,
    source: &S,
    store: &mut R,
) -> Result<RunSummary, ScrapeError>
where
    S: EiaSource + ?Sized,
    R: RecordStore + ?Sized,
{
    let res = scrape(data_set, window, source, &*store).await;
    store.close().await;
    if let Err(e) = &res {
        error!("scraping {} for {} failed: {}", data_set, window.balancing_authority, e);
    }
    res
}

async fn scrape<S, R>(
    data_set: DataSet,
    window: &FetchWindow,
    source: &S,
    store: &R,
) -> Result<RunSummary, ScrapeError>
where
    S: EiaSource + ?Sized,
    R: RecordStore + ?Sized,
{
    let res = source.fetch(data_set, window).await?;
    let total = res.total;
    info!("Number of fetch records: {}", total);

    let record = normalize(data_set, res.data)?;
    info!(
        "{} records from {} to {}",
        record.results.len(),
        record.metadata.min_record_time,
        record.metadata.max_record_time
    );

    let id = store.insert(&record).await?;
    info!("Stored records with ID: {}", id);
    Ok(RunSummary { total, id })
}
