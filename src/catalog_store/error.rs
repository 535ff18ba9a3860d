use super::trait_def::TableName;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Row with id '{id}' already exists in {table}")]
    KeyViolation { table: TableName, id: String },

    #[error("Row in {table} does not match the table layout")]
    UnexpectedRow { table: TableName },

    #[error("Table {table} has no field {field}")]
    UnknownField { table: TableName, field: &'static str },

    #[error("Write attempted through a read-only transaction")]
    ReadOnly,

    #[error("Store lock poisoned")]
    Poisoned,

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Schema error: {0}")]
    Schema(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl<T> From<std::sync::PoisonError<T>> for StoreError {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        StoreError::Poisoned
    }
}
