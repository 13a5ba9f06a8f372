use crate::{
    config::Config,
    db::eia::{eia_client::EiaClient, mongo_store::MongoRawDataStore},
    errors::{FetchError, PersistenceError},
};

pub const EIA_BASE_URL: &str = "https://api.eia.gov/v2";
pub const EIA_DATABASE: &str = "EIA";
pub const RAW_DATA_COLLECTION: &str = "rawData";

pub struct ProdDb {}

impl ProdDb {
    pub fn eia_client(config: &Config) -> Result<EiaClient, FetchError> {
        EiaClient::new(EIA_BASE_URL, &config.api_key, config.timeout)
    }

    pub async fn eia_raw_data(config: &Config) -> Result<MongoRawDataStore, PersistenceError> {
        MongoRawDataStore::connect(
            &config.mongo_connection_string,
            EIA_DATABASE,
            RAW_DATA_COLLECTION,
        )
        .await
    }
}
