//! File-backed registry of every live entity.
//!
//! The whole store is the unit of durability: [`FileStorage::save`] rewrites
//! the backing file in full and [`FileStorage::reload`] reads it in full.

pub mod codec;

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::ser::{Serialize, Serializer};
use serde_json::{Map, Value};
use tempfile::Builder;

use crate::error::StorageError;
use crate::models::{Entity, Kind};
use codec::Record;

pub struct FileStorage {
    path: PathBuf,
    // Keyed by store key, in insertion order.
    objects: IndexMap<String, Entity>,
}

impl FileStorage {
    /// Open the store backed by `path`, loading it if the file exists.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let mut storage = Self {
            path: path.into(),
            objects: IndexMap::new(),
        };
        storage.reload()?;
        tracing::info!(
            path = %storage.path.display(),
            count = storage.len(),
            "Storage opened"
        );
        Ok(storage)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Every live entity, in insertion order.
    pub fn all(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.objects.values()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.objects.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Entity> {
        self.objects.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Entity> {
        self.objects.get_mut(key)
    }

    /// Register `entity` under its store key, replacing any entity already there.
    pub fn register(&mut self, entity: Entity) {
        tracing::debug!(key = %entity.key(), "Registering entity");
        self.insert(entity);
    }

    /// Construct a fresh entity of `kind` and register it.
    pub fn create(&mut self, kind: Kind) -> &Entity {
        let entity = kind.instantiate();
        let key = entity.key();
        self.register(entity);
        &self.objects[&key]
    }

    pub fn remove(&mut self, key: &str) -> Option<Entity> {
        let removed = self.objects.shift_remove(key)?;
        tracing::debug!(key, "Removed entity");
        Some(removed)
    }

    /// Refresh the entity's `updated_at` and persist the whole store.
    ///
    /// Returns `false` without writing if no entity has that key.
    pub fn save_entity(&mut self, key: &str) -> Result<bool, StorageError> {
        let Some(entity) = self.objects.get_mut(key) else {
            return Ok(false);
        };
        entity.touch();
        self.save()?;
        Ok(true)
    }

    /// Rewrite the backing file with every live entity.
    ///
    /// The content goes to a temporary file in the same directory which then
    /// replaces the backing file, so readers never see a half-written store.
    pub fn save(&self) -> Result<(), StorageError> {
        let write_err = |source| StorageError::Write {
            path: self.path.clone(),
            source,
        };

        let bytes = serde_json::to_vec_pretty(&Snapshot(self)).map_err(|source| {
            StorageError::Encode {
                path: self.path.clone(),
                source,
            }
        })?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(write_err)?;

        // The replacement keeps the mode of the file it replaces.
        let existing = fs::metadata(&self.path).ok().map(|meta| meta.permissions());
        let mut builder = Builder::new();
        if let Some(permissions) = existing.clone().or_else(default_permissions) {
            builder.permissions(permissions);
        }
        let mut tmp = builder.tempfile_in(dir).map_err(write_err)?;
        if let Some(permissions) = existing {
            tmp.as_file().set_permissions(permissions).map_err(write_err)?;
        }
        tmp.write_all(&bytes).map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;
        tmp.persist(&self.path).map_err(|e| write_err(e.error))?;

        tracing::debug!(path = %self.path.display(), count = self.len(), "Storage saved");
        Ok(())
    }

    /// Load every record from the backing file into the store.
    ///
    /// A missing file leaves the store unchanged. Any malformed content fails
    /// the whole reload and nothing is inserted.
    pub fn reload(&mut self) -> Result<(), StorageError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "No storage file, starting empty");
                return Ok(());
            }
            Err(source) => {
                return Err(StorageError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let malformed = |source| StorageError::Malformed {
            path: self.path.clone(),
            source,
        };

        let records: Map<String, Value> = serde_json::from_str(&text).map_err(malformed)?;
        let mut loaded = Vec::with_capacity(records.len());
        for (key, value) in records {
            let record: Record = serde_json::from_value(value).map_err(malformed)?;
            let entity = Entity::from_record(record)
                .map_err(|source| StorageError::InvalidRecord { key, source })?;
            loaded.push(entity);
        }

        tracing::debug!(path = %self.path.display(), count = loaded.len(), "Storage reloaded");
        for entity in loaded {
            self.insert(entity);
        }
        Ok(())
    }

    /// Drop the store without writing it.
    pub fn close(self) {
        tracing::debug!(path = %self.path.display(), "Storage closed");
    }

    fn insert(&mut self, entity: Entity) {
        self.objects.insert(entity.key(), entity);
    }
}

/// Mode for a store file created from scratch, before the umask applies.
#[cfg(unix)]
fn default_permissions() -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(fs::Permissions::from_mode(0o666))
}

#[cfg(not(unix))]
fn default_permissions() -> Option<fs::Permissions> {
    None
}

/// Serializes the store as one JSON object keyed by store key.
struct Snapshot<'a>(&'a FileStorage);

impl Serialize for Snapshot<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.all().map(|entity| (entity.key(), entity.to_record())))
    }
}
