use async_trait::async_trait;
use jiff::Timestamp;
use log::info;
use mongodb::{
    bson::{self, doc, oid::ObjectId, Bson, DateTime, Document},
    Client, Collection,
};
use serde::{Deserialize, Serialize};

use crate::{
    db::eia::{
        eia_client::RawRecord,
        persistence_record::{Metadata, PersistenceRecord},
    },
    errors::PersistenceError,
    scrape::{RecordId, RecordStore},
};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MetadataDocument {
    scrape_time: DateTime,
    max_record_time: DateTime,
    min_record_time: DateTime,
    source: String,
}

/// Shape of a document in the raw data collection.
#[derive(Debug, Serialize, Deserialize)]
struct RawDataDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    metadata: MetadataDocument,
    results: Vec<RawRecord>,
}

fn to_bson_datetime(ts: Timestamp) -> DateTime {
    DateTime::from_millis(ts.as_millisecond())
}

fn from_bson_datetime(dt: DateTime) -> Result<Timestamp, PersistenceError> {
    Timestamp::from_millisecond(dt.timestamp_millis())
        .map_err(|e| PersistenceError::Decode(e.to_string()))
}

/// Encode a record the way it is stored.  Instants are truncated to the
/// millisecond.
pub fn to_document(record: &PersistenceRecord) -> Result<Document, PersistenceError> {
    let doc = RawDataDocument {
        id: None,
        metadata: MetadataDocument {
            scrape_time: to_bson_datetime(record.metadata.scrape_time),
            max_record_time: to_bson_datetime(record.metadata.max_record_time),
            min_record_time: to_bson_datetime(record.metadata.min_record_time),
            source: record.metadata.source.clone(),
        },
        results: record.results.clone(),
    };
    Ok(bson::to_document(&doc)?)
}

pub fn from_document(doc: Document) -> Result<PersistenceRecord, PersistenceError> {
    let doc: RawDataDocument =
        bson::from_document(doc).map_err(|e| PersistenceError::Decode(e.to_string()))?;
    Ok(PersistenceRecord {
        metadata: Metadata {
            scrape_time: from_bson_datetime(doc.metadata.scrape_time)?,
            max_record_time: from_bson_datetime(doc.metadata.max_record_time)?,
            min_record_time: from_bson_datetime(doc.metadata.min_record_time)?,
            source: doc.metadata.source,
        },
        results: doc.results,
    })
}

/// Append-only store of scrape results in one MongoDB collection.
pub struct MongoRawDataStore {
    client: Option<Client>,
    collection: Collection<Document>,
}

impl MongoRawDataStore {
    pub async fn connect(
        connection_string: &str,
        database: &str,
        collection: &str,
    ) -> Result<MongoRawDataStore, PersistenceError> {
        let client = Client::with_uri_str(connection_string).await?;
        let collection = client.database(database).collection::<Document>(collection);
        Ok(MongoRawDataStore {
            client: Some(client),
            collection,
        })
    }

    /// Insert one document.  Every call adds a new document, there is no
    /// check against what is already stored.
    pub async fn insert_record(
        &self,
        record: &PersistenceRecord,
    ) -> Result<RecordId, PersistenceError> {
        if self.client.is_none() {
            return Err(PersistenceError::Closed);
        }
        let doc = to_document(record)?;
        let res = self.collection.insert_one(doc).await?;
        match res.inserted_id {
            Bson::ObjectId(oid) => Ok(RecordId(oid.to_hex())),
            other => Err(PersistenceError::UnexpectedId(other.to_string())),
        }
    }

    /// Read back a stored record.
    pub async fn find(&self, id: &RecordId) -> Result<Option<PersistenceRecord>, PersistenceError> {
        if self.client.is_none() {
            return Err(PersistenceError::Closed);
        }
        let oid = ObjectId::parse_str(&id.0).map_err(|e| PersistenceError::Decode(e.to_string()))?;
        match self.collection.find_one(doc! {"_id": oid}).await? {
            Some(doc) => Ok(Some(from_document(doc)?)),
            None => Ok(None),
        }
    }

    /// Release the connection pool.  Calling it again does nothing.
    pub async fn shutdown(&mut self) {
        if let Some(client) = self.client.take() {
            client.shutdown().await;
            info!("closed MongoDB connection");
        }
    }
}

#[async_trait]
impl RecordStore for MongoRawDataStore {
    async fn insert(&self, record: &PersistenceRecord) -> Result<RecordId, PersistenceError> {
        self.insert_record(record).await
    }

    async fn close(&mut self) {
        self.shutdown().await
    }
}
