use super::validation::ValidationError;
use crate::catalog_store::{StoreError, TableName};
use std::fmt;
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityKind {
    Artist,
    Album,
    Track,
}

impl EntityKind {
    pub fn table(&self) -> TableName {
        match self {
            EntityKind::Artist => TableName::Artists,
            EntityKind::Album => TableName::Albums,
            EntityKind::Track => TableName::Tracks,
        }
    }
}

impl From<TableName> for EntityKind {
    fn from(table: TableName) -> Self {
        match table {
            TableName::Artists => EntityKind::Artist,
            TableName::Albums => EntityKind::Album,
            TableName::Tracks => EntityKind::Track,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EntityKind::Artist => "Artist",
            EntityKind::Album => "Album",
            EntityKind::Track => "Track",
        })
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Invalid field '{field}': {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("Referenced {entity} '{id}' does not exist")]
    DanglingReference { entity: EntityKind, id: String },

    #[error("{entity} with id '{id}' already exists")]
    Duplicate { entity: EntityKind, id: String },

    #[error("{entity} '{id}' not found")]
    NotFound { entity: EntityKind, id: String },

    #[error("Storage failure: {0}")]
    Storage(#[from] StoreError),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

impl From<ValidationError> for CatalogError {
    fn from(err: ValidationError) -> Self {
        CatalogError::Validation {
            field: err.field(),
            reason: err.to_string(),
        }
    }
}

impl CatalogError {
    pub fn not_found(entity: EntityKind, id: &str) -> Self {
        CatalogError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn dangling(entity: EntityKind, id: &str) -> Self {
        CatalogError::DanglingReference {
            entity,
            id: id.to_string(),
        }
    }

    /// Insert-time store error, where a key violation means another writer
    /// created the same entity first.
    pub(super) fn from_insert(err: StoreError) -> Self {
        match err {
            StoreError::KeyViolation { table, id } => CatalogError::Duplicate {
                entity: table.into(),
                id,
            },
            other => CatalogError::Storage(other),
        }
    }
}
