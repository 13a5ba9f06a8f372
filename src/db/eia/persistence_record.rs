use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::{
    db::eia::{data_set::DataSet, eia_client::RawRecord},
    errors::NormalizeError,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub scrape_time: Timestamp,
    pub max_record_time: Timestamp,
    pub min_record_time: Timestamp,
    pub source: String,
}

/// What gets stored for one scrape: the records as fetched plus a summary of
/// when and what was scraped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistenceRecord {
    pub metadata: Metadata,
    pub results: Vec<RawRecord>,
}

/// Parse an EIA hour, e.g. `2022-12-13T05`, as the UTC instant
/// `2022-12-13T05:00:00Z`.
pub fn period_to_timestamp(period: &str) -> Result<Timestamp, NormalizeError> {
    format!("{}:00:00Z", period)
        .parse::<Timestamp>()
        .map_err(|source| NormalizeError::InvalidPeriod {
            period: period.to_string(),
            source,
        })
}

/// Wrap the records of a data set into a [PersistenceRecord].  The records are
/// kept in the order given.  An empty set is rejected.
pub fn normalize(
    data_set: DataSet,
    records: Vec<RawRecord>,
) -> Result<PersistenceRecord, NormalizeError> {
    normalize_at(data_set, records, Timestamp::now())
}

pub fn normalize_at(
    data_set: DataSet,
    records: Vec<RawRecord>,
    scrape_time: Timestamp,
) -> Result<PersistenceRecord, NormalizeError> {
    let times = records
        .iter()
        .map(|e| period_to_timestamp(&e.period))
        .collect::<Result<Vec<_>, _>>()?;
    let (Some(min), Some(max)) = (times.iter().min(), times.iter().max()) else {
        return Err(NormalizeError::EmptyResults);
    };

    Ok(PersistenceRecord {
        metadata: Metadata {
            scrape_time,
            max_record_time: *max,
            min_record_time: *min,
            source: data_set.to_string(),
        },
        results: records,
    })
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use serde_json::{json, Map, Value};

    use super::*;

    fn record(period: &str, fueltype: &str, value: i64) -> RawRecord {
        let fields: Map<String, Value> = json!({
            "respondent": "PJM",
            "respondent-name": "PJM Interconnection, LLC",
            "fueltype": fueltype,
            "value": value,
            "value-units": "megawatthours",
        })
        .as_object()
        .unwrap()
        .clone();
        RawRecord {
            period: period.to_string(),
            fields,
        }
    }

    #[test]
    fn parse_period() -> Result<(), Box<dyn Error>> {
        assert_eq!(
            period_to_timestamp("2022-12-13T05")?,
            "2022-12-13T05:00:00Z".parse::<Timestamp>()?
        );
        assert!(matches!(
            period_to_timestamp("2022-12-13"),
            Err(NormalizeError::InvalidPeriod { .. })
        ));
        assert!(period_to_timestamp("13/12/2022 05").is_err());
        Ok(())
    }

    #[test]
    fn min_max_record_time() -> Result<(), Box<dyn Error>> {
        let records = vec![
            record("2022-12-13T03", "NG", 100),
            record("2022-12-12T23", "NG", 90),
            record("2022-12-13T10", "NUC", 80),
            record("2022-12-13T03", "NUC", 70),
        ];
        let now: Timestamp = "2024-01-01T12:34:56Z".parse()?;
        let res = normalize_at(DataSet::Generation, records.clone(), now)?;
        assert_eq!(res.metadata.scrape_time, now);
        assert_eq!(
            res.metadata.min_record_time,
            "2022-12-12T23:00:00Z".parse::<Timestamp>()?
        );
        assert_eq!(
            res.metadata.max_record_time,
            "2022-12-13T10:00:00Z".parse::<Timestamp>()?
        );
        assert_eq!(res.metadata.source, "generation");
        assert_eq!(res.results, records);
        Ok(())
    }

    #[test]
    fn single_record() -> Result<(), Box<dyn Error>> {
        let res = normalize(DataSet::Interchange, vec![record("2022-12-13T00", "NG", 1)])?;
        assert_eq!(res.metadata.min_record_time, res.metadata.max_record_time);
        assert_eq!(res.metadata.source, "interchange");
        assert!(res.metadata.scrape_time > res.metadata.max_record_time);
        Ok(())
    }

    #[test]
    fn empty_records_are_rejected() {
        assert!(matches!(
            normalize(DataSet::Generation, vec![]),
            Err(NormalizeError::EmptyResults)
        ));
    }

    #[test]
    fn bad_period_is_rejected() {
        let records = vec![record("2022-12-13T00", "NG", 1), record("yesterday", "NG", 2)];
        match normalize(DataSet::Generation, records) {
            Err(NormalizeError::InvalidPeriod { period, .. }) => assert_eq!(period, "yesterday"),
            other => panic!("expected InvalidPeriod, got {:?}", other),
        }
    }
}
