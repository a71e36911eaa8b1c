use std::path::PathBuf;

use thiserror::Error;

use crate::storage::codec::CodecError;

/// Failures of the backing file. All of these are fatal to a console session.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to encode {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("malformed storage file {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid record {key}: {source}")]
    InvalidRecord { key: String, source: CodecError },
}

/// A rejected command. Every variant except `Storage` is reported to the
/// user and the session continues.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("** class name missing **")]
    ClassNameMissing,

    #[error("** class doesn't exist **")]
    ClassDoesntExist,

    #[error("** instance id missing **")]
    InstanceIdMissing,

    #[error("** no instance found **")]
    NoInstanceFound,

    #[error("** attribute name missing **")]
    AttributeNameMissing,

    #[error("** value missing **")]
    ValueMissing,

    #[error("** invalid value for {0} **")]
    InvalidValue(String),

    #[error("** attribute is read-only: {0} **")]
    ReadOnlyAttribute(String),

    #[error("*** Unknown syntax: {0}")]
    UnknownSyntax(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors that end a console session.
#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("console output failed: {0}")]
    Io(#[from] std::io::Error),
}
