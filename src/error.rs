use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot open database at {path}: {source}")]
    Connection {
        path: PathBuf,
        source: rusqlite::Error,
    },

    #[error("migration lock is held by another runner: {0}")]
    LockContention(String),

    #[error("change-set {id} failed: {source}")]
    SqlExecution {
        id: String,
        source: rusqlite::Error,
    },

    #[error("change-set {id} left {violations} foreign key violation(s)")]
    ForeignKeyCheck { id: String, violations: usize },

    #[error("embedded script {name} is not in the manifest")]
    MissingScript { name: String },

    #[error("embedded script {name} does not match its manifest checksum")]
    ScriptChecksum { name: String },

    #[error("change-set {id} is forward-only and cannot be rolled back")]
    IrreversibleMigration { id: String },

    #[error("change-set ordering conflict: {0}")]
    OrderingConflict(String),

    #[error("no change-set named {0} in the history")]
    UnknownTarget(String),

    #[error("invalid change-set id: {0}")]
    InvalidId(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
