//! Conversion between live entities and their on-disk records.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::models::{Entity, Kind};

/// Timestamp layout used in records, always with six fractional digits.
pub const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

// `%.f` also accepts a missing fraction.
const PARSE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Errors rebuilding an entity from a record.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("unknown class: {0}")]
    UnknownClass(String),

    #[error("invalid timestamp in {field}: {value}")]
    Timestamp { field: &'static str, value: String },
}

/// The flat serialization record of one entity.
///
/// Field order on disk is `id`, `created_at`, `updated_at`, the extra
/// attributes in insertion order, then `__class__`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub created_at: String,
    pub updated_at: String,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
    #[serde(rename = "__class__")]
    pub class: String,
}

pub fn encode(entity: &Entity) -> Record {
    Record {
        id: entity.id.clone(),
        created_at: format_timestamp(&entity.created_at),
        updated_at: format_timestamp(&entity.updated_at),
        attributes: entity.attributes.clone(),
        class: entity.kind.as_str().to_string(),
    }
}

pub fn decode(record: Record) -> Result<Entity, CodecError> {
    let kind = Kind::from_str(&record.class).ok_or(CodecError::UnknownClass(record.class))?;
    Ok(Entity {
        kind,
        created_at: parse_timestamp("created_at", &record.created_at)?,
        updated_at: parse_timestamp("updated_at", &record.updated_at)?,
        id: record.id,
        attributes: record.attributes,
    })
}

pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format(TIME_FORMAT).to_string()
}

fn parse_timestamp(field: &'static str, value: &str) -> Result<DateTime<Utc>, CodecError> {
    NaiveDateTime::parse_from_str(value, PARSE_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| CodecError::Timestamp {
            field,
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_field_order() {
        let mut entity = Entity::new(Kind::City);
        entity.set("name", json!("Lagos"));
        let text = serde_json::to_string(&entity.to_record()).unwrap();

        let id = text.find("\"id\"").unwrap();
        let created = text.find("\"created_at\"").unwrap();
        let updated = text.find("\"updated_at\"").unwrap();
        let name = text.find("\"name\"").unwrap();
        let class = text.find("\"__class__\"").unwrap();
        assert!(id < created && created < updated && updated < name && name < class);
    }

    #[test]
    fn test_parse_timestamp_without_fraction() {
        let ts = parse_timestamp("created_at", "2017-09-28T21:05:54").unwrap();
        assert_eq!(format_timestamp(&ts), "2017-09-28T21:05:54.000000");
    }

    #[test]
    fn test_parse_timestamp_with_fraction() {
        let ts = parse_timestamp("created_at", "2017-09-28T21:05:54.119427").unwrap();
        assert_eq!(format_timestamp(&ts), "2017-09-28T21:05:54.119427");
    }

    #[test]
    fn test_decode_rejects_unknown_class() {
        let record = Record {
            id: "1".to_string(),
            created_at: "2017-09-28T21:05:54.119427".to_string(),
            updated_at: "2017-09-28T21:05:54.119427".to_string(),
            attributes: Map::new(),
            class: "Spaceship".to_string(),
        };
        assert!(matches!(decode(record), Err(CodecError::UnknownClass(c)) if c == "Spaceship"));
    }

    #[test]
    fn test_decode_rejects_bad_timestamp() {
        let record = Record {
            id: "1".to_string(),
            created_at: "yesterday".to_string(),
            updated_at: "2017-09-28T21:05:54.119427".to_string(),
            attributes: Map::new(),
            class: "User".to_string(),
        };
        assert!(matches!(
            decode(record),
            Err(CodecError::Timestamp { field: "created_at", .. })
        ));
    }
}
