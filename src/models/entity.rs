use std::fmt;

use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::Kind;
use crate::storage::codec::{self, Record};

/// Build the store key `"<kind>.<id>"`.
pub fn store_key(kind: &str, id: &str) -> String {
    format!("{}.{}", kind, id)
}

/// A live object in the store.
///
/// `id`, `created_at` and `updated_at` are held as typed fields; everything
/// else lives in `attributes`, which keeps insertion order. Declared fields of
/// the entity's [`Kind`] are not materialized until they are set; reading one
/// through [`Entity::get`] falls back to the declared default.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub kind: Kind,
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub attributes: Map<String, Value>,
}

impl Entity {
    /// A fresh entity with a new v4 id and both timestamps set to now.
    ///
    /// This does not register the entity anywhere; use
    /// [`FileStorage::create`](crate::storage::FileStorage::create) for that.
    pub fn new(kind: Kind) -> Self {
        let now = now();
        Self {
            kind,
            id: Uuid::new_v4().to_string(),
            created_at: now,
            updated_at: now,
            attributes: Map::new(),
        }
    }

    /// Rebuild an entity from its serialization record.
    pub fn from_record(record: Record) -> Result<Self, codec::CodecError> {
        codec::decode(record)
    }

    pub fn to_record(&self) -> Record {
        codec::encode(self)
    }

    pub fn key(&self) -> String {
        store_key(self.kind.as_str(), &self.id)
    }

    /// Read an attribute, falling back to the kind's declared default.
    ///
    /// This is the library-side view of an entity: every declared field of
    /// its kind reads as a value even before it is set. The console rendering
    /// and the storage file only carry attributes that were actually set, so
    /// defaults never leak into `show` output or the backing file.
    pub fn get(&self, name: &str) -> Option<Value> {
        match name {
            "id" => Some(Value::String(self.id.clone())),
            "created_at" => Some(Value::String(codec::format_timestamp(&self.created_at))),
            "updated_at" => Some(Value::String(codec::format_timestamp(&self.updated_at))),
            _ => self
                .attributes
                .get(name)
                .cloned()
                .or_else(|| self.kind.field(name).map(|f| f.ty.default_value())),
        }
    }

    /// Store `value` under `name` as-is. Callers coerce beforehand.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.attributes.insert(name.into(), value);
    }

    /// Refresh `updated_at`. The new value is always strictly later than the old one.
    pub fn touch(&mut self) {
        let now = now();
        self.updated_at = if now > self.updated_at {
            now
        } else {
            self.updated_at + Duration::microseconds(1)
        };
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] ({}) {{", self.kind, self.id)?;
        write!(f, "\"id\": {}", Value::String(self.id.clone()))?;
        write!(f, ", \"created_at\": \"{}\"", codec::format_timestamp(&self.created_at))?;
        write!(f, ", \"updated_at\": \"{}\"", codec::format_timestamp(&self.updated_at))?;
        for (name, value) in &self.attributes {
            write!(f, ", {}: {}", Value::String(name.clone()), value)?;
        }
        f.write_str("}")
    }
}

// Stored timestamps carry microseconds, so truncate here to keep round-trips exact.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}
